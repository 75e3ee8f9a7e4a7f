use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::session::BrowserSession;
use crate::error::{AppError, AppResult};

/// 连接到已开启调试端口的浏览器，并新建一个空白页面
///
/// # 参数
/// - `port`: 浏览器远程调试端口
pub async fn connect_to_browser_and_page(port: u16) -> AppResult<(BrowserSession, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::Browser(e.to_string())
    })?;
    debug!("浏览器连接成功");

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
    Ok((BrowserSession::new(browser, handle, false), page))
}

pub(crate) async fn open_blank_page(browser: &Browser) -> AppResult<Page> {
    debug!("创建空白页面");
    browser.new_page("about:blank").await.map_err(|e| {
        error!("创建空白页面失败: {}", e);
        AppError::Browser(e.to_string())
    })
}
