use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::connection::open_blank_page;
use crate::browser::session::BrowserSession;
use crate::config::BrowserSettings;
use crate::error::{AppError, AppResult};

/// 启动参数：关闭站点通知弹窗，窗口最大化
const LAUNCH_ARGS: [&str; 4] = [
    "--disable-notifications",
    "--no-sandbox",            // 禁用沙盒，防止权限问题导致的崩溃
    "--disable-dev-shm-usage", // 防止共享内存不足
    "--start-maximized",
];

/// 启动一个新的浏览器实例并打开空白页面
pub async fn launch_browser(settings: &BrowserSettings) -> AppResult<(BrowserSession, Page)> {
    info!(
        "🚀 启动浏览器 ({})...",
        if settings.headless { "无头模式" } else { "有界面" }
    );

    let config = build_config(settings).map_err(|e| {
        error!("配置浏览器失败: {}", e);
        AppError::Browser(format!("配置浏览器失败: {}", e))
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        AppError::Browser(format!("启动浏览器失败: {}", e))
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handle = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = open_blank_page(&browser).await?;
    Ok((BrowserSession::new(browser, handle, true), page))
}

fn build_config(settings: &BrowserSettings) -> Result<BrowserConfig, String> {
    let mut builder = BrowserConfig::builder().args(LAUNCH_ARGS.to_vec());

    builder = if settings.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    if let Some(executable) = &settings.chrome_executable {
        builder = builder.chrome_executable(Path::new(executable));
    }

    builder.build()
}
