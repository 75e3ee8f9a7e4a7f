use std::future::Future;
use std::time::Duration;

use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 等待浏览器进程退出的默认上限
pub const DEFAULT_EXIT_TIMEOUT: Duration = Duration::from_secs(10);

/// 浏览器会话
///
/// 持有 `Browser` 和后台事件处理任务。自己启动的浏览器在结束时关闭，
/// 通过调试端口连接的浏览器只断开连接，不关闭用户的窗口。
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    launched: bool,
    exit_timeout: Duration,
}

impl BrowserSession {
    pub fn new(browser: Browser, handler: JoinHandle<()>, launched: bool) -> Self {
        Self {
            browser,
            handler,
            launched,
            exit_timeout: DEFAULT_EXIT_TIMEOUT,
        }
    }

    pub fn with_exit_timeout(mut self, exit_timeout: Duration) -> Self {
        self.exit_timeout = exit_timeout;
        self
    }

    /// 结束会话
    ///
    /// 浏览器拒绝关闭或在 `exit_timeout` 内没有退出时强制结束进程。
    pub async fn close(mut self) {
        if self.launched {
            info!("🧹 正在关闭浏览器...");
            if let Err(e) = self.browser.close().await {
                warn!("关闭浏览器失败: {}，强制结束", e);
                self.kill().await;
            } else {
                let exited = wait_bounded(self.browser.wait(), self.exit_timeout).await;
                match exited {
                    Some(Ok(_)) => debug!("浏览器进程已退出"),
                    Some(Err(e)) => debug!("等待浏览器进程退出失败: {}", e),
                    None => {
                        warn!("浏览器 {:?} 内未退出，强制结束", self.exit_timeout);
                        self.kill().await;
                    }
                }
            }
        } else {
            debug!("断开与浏览器的连接");
        }
        self.handler.abort();
    }

    async fn kill(&mut self) {
        if let Some(Err(e)) = self.browser.kill().await {
            warn!("强制结束浏览器失败: {}", e);
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// 在 `limit` 内等待 `fut` 完成，超时返回 `None`
async fn wait_bounded<F: Future>(fut: F, limit: Duration) -> Option<F::Output> {
    tokio::time::timeout(limit, fut).await.ok()
}
