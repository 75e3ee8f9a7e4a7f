//! 搜索会话 - 编排层
//!
//! 登录一次，然后按给定的关键词/地点/筛选条件运行投递循环。

use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::{Config, Credentials};
use crate::error::{AppError, AppResult};
use crate::infrastructure::PageSurface;
use crate::models::{SearchFilters, SearchQuery, SessionReport};
use crate::orchestrator::application_loop::ApplicationLoop;
use crate::services::{LoginService, Notifier};

/// 一次完整的搜索会话
pub struct SearchSession<'a, S: PageSurface> {
    surface: &'a S,
    notifier: &'a dyn Notifier,
    config: &'a Config,
    credentials: &'a Credentials,
    resume: Option<PathBuf>,
    cancel: CancellationToken,
}

impl<'a, S: PageSurface> SearchSession<'a, S> {
    pub fn new(
        surface: &'a S,
        notifier: &'a dyn Notifier,
        config: &'a Config,
        credentials: &'a Credentials,
    ) -> Self {
        Self {
            surface,
            notifier,
            config,
            credentials,
            resume: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_resume(mut self, resume: Option<PathBuf>) -> Self {
        self.resume = resume;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// 登录并运行投递循环
    ///
    /// # 参数
    /// - `keywords`: 搜索关键词
    /// - `location`: 搜索地点
    /// - `filters`: 搜索筛选条件
    /// - `max_applications`: 本次最多申请的职位数
    ///
    /// # 返回
    /// 登录失败返回错误；登录成功后总是返回会话报告
    pub async fn run_search_session(
        &self,
        keywords: &str,
        location: &str,
        filters: SearchFilters,
        max_applications: usize,
    ) -> AppResult<SessionReport> {
        LoginService::new(self.config)
            .login(self.surface, self.credentials)
            .await
            .map_err(|e| {
                error!("❌ 登录失败: {}", e);
                AppError::Login(e)
            })?;

        let query = SearchQuery::new(keywords, location, filters);
        info!("🔍 开始搜索: {} @ {}", query.keywords, query.location);

        let report = ApplicationLoop::new(self.surface, self.notifier, self.config)
            .with_resume(self.resume.clone())
            .with_cancellation(self.cancel.clone())
            .run(&query, max_applications)
            .await;

        Ok(report)
    }
}
