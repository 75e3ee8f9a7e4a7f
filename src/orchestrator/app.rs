//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源管理和一次完整运行的收尾。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：读取账号、定位简历、选择通知方式、打开浏览器
//! 2. **运行会话**：委托 `SearchSession` 登录并投递
//! 3. **资源管理**：唯一持有 `BrowserSession` 的模块，无论成败都会释放
//! 4. **全局汇总**：打印最终汇总，按需保存 JSON 报告

use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::browser::{self, BrowserSession};
use crate::config::{Config, Credentials};
use crate::error::AppResult;
use crate::infrastructure::ChromiumSurface;
use crate::models::SessionReport;
use crate::orchestrator::session::SearchSession;
use crate::services::{build_notifier, Notifier, ReportWriter};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    credentials: Credentials,
    resume: PathBuf,
    session: BrowserSession,
    surface: ChromiumSurface,
    notifier: Box<dyn Notifier>,
    cancel: CancellationToken,
}

impl App {
    /// 初始化应用
    ///
    /// 账号文件或简历缺失时直接返回错误，不会打开浏览器
    pub async fn initialize(config: Config) -> AppResult<Self> {
        logging::log_startup(&config);

        let credentials = Credentials::load(Path::new(&config.files.credentials_file))?;
        let resume = config.resolve_resume_path()?;
        info!("📎 简历: {}", resume.display());

        let notifier = build_notifier(&config, &credentials);

        let (session, page) = browser::open_session(&config.browser).await?;
        let session = session.with_exit_timeout(config.timings.browser_exit());
        let surface = ChromiumSurface::new(page, config.timings.poll_interval());

        Ok(Self {
            config,
            credentials,
            resume,
            session,
            surface,
            notifier,
            cancel: CancellationToken::new(),
        })
    }

    /// 取消令牌，触发后在下一个职位/页面边界停止
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 运行应用主逻辑
    ///
    /// 无论会话结果如何都会释放浏览器
    pub async fn run(self) -> AppResult<SessionReport> {
        let Self {
            config,
            credentials,
            resume,
            session,
            surface,
            notifier,
            cancel,
        } = self;

        let result = SearchSession::new(&surface, notifier.as_ref(), &config, &credentials)
            .with_resume(Some(resume))
            .with_cancellation(cancel)
            .run_search_session(
                &config.search.keywords,
                &config.search.location,
                config.search.filters.clone(),
                config.limits.max_applications,
            )
            .await;

        drop(surface);
        session.close().await;

        let report = result?;
        logging::print_final_summary(&report, &config.files.output_log_file);

        if let Some(path) = &config.files.report_file {
            let writer = ReportWriter::with_path(path);
            match writer.write(&report).await {
                Ok(()) => info!("💾 报告已保存至: {}", writer.path().display()),
                Err(e) => warn!("⚠️ 保存报告失败: {:#}", e),
            }
        }

        Ok(report)
    }
}
