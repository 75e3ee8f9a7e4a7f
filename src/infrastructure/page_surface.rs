//! 页面自动化能力 - 基础设施层
//!
//! Driver 只通过这个 trait 操作浏览器：导航、查找、点击、输入、上传、取文本、等待。
//! 元素定位和页面渲染的细节都留在实现里。

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

use crate::error::{AutomationError, AutomationResult};

/// 页面自动化能力
///
/// 实现者持有唯一的浏览器会话；Driver 一次只发一条命令，等它完成再发下一条。
#[async_trait]
pub trait PageSurface: Send + Sync {
    /// 页面元素的不透明引用，页面跳转后失效
    type Element: Send + Sync;

    async fn navigate(&self, url: &str) -> AutomationResult<()>;

    /// 按文档顺序返回当前匹配的所有元素，没有时返回空列表
    async fn find_all(&self, selector: &str) -> AutomationResult<Vec<Self::Element>>;

    async fn click(&self, element: &Self::Element) -> AutomationResult<()>;

    async fn type_text(&self, element: &Self::Element, text: &str) -> AutomationResult<()>;

    async fn upload_file(&self, element: &Self::Element, path: &Path) -> AutomationResult<()>;

    async fn text_of(&self, element: &Self::Element) -> AutomationResult<String>;

    /// 轮询间隔
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(250)
    }

    /// 暂停一段时间，让页面有时间渲染
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// 在 `timeout` 内轮询，返回第一个匹配的元素
    ///
    /// 超时返回 `AutomationError::Timeout`，其他错误原样返回。
    async fn find(&self, selector: &str, timeout: Duration) -> AutomationResult<Self::Element> {
        let interval = self.poll_interval().max(Duration::from_millis(1));
        let attempts = (timeout.as_millis() / interval.as_millis()).max(1);

        for attempt in 0..attempts {
            if let Some(element) = self.find_all(selector).await?.into_iter().next() {
                return Ok(element);
            }
            if attempt + 1 < attempts {
                self.pause(interval).await;
            }
        }

        Err(AutomationError::Timeout {
            selector: selector.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    /// 同 [`find`](Self::find)，但超时返回 `None`
    async fn find_optional(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> AutomationResult<Option<Self::Element>> {
        match self.find(selector, timeout).await {
            Ok(element) => Ok(Some(element)),
            Err(AutomationError::Timeout { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
