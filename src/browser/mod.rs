//! 浏览器资源
//!
//! 连接已有浏览器（调试端口）或启动新实例，统一返回 `BrowserSession` 和一个页面。

pub mod connection;
pub mod launcher;
pub mod session;

pub use connection::connect_to_browser_and_page;
pub use launcher::launch_browser;
pub use session::BrowserSession;

use chromiumoxide::Page;

use crate::config::BrowserSettings;
use crate::error::AppResult;

/// 按配置打开浏览器会话
pub async fn open_session(settings: &BrowserSettings) -> AppResult<(BrowserSession, Page)> {
    match settings.debug_port {
        Some(port) => connect_to_browser_and_page(port).await,
        None => launch_browser(settings).await,
    }
}
