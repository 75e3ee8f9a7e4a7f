//! 基于 chromiumoxide 的页面自动化实现
//!
//! 持有唯一的 Page 资源，只暴露 PageSurface 能力

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::AutomationResult;
use crate::infrastructure::page_surface::PageSurface;

/// 浏览器页面
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 把 CDP 错误映射为 AutomationError
/// - 不认识职位 / 申请向导
pub struct ChromiumSurface {
    page: Page,
    poll_interval: Duration,
}

impl ChromiumSurface {
    pub fn new(page: Page, poll_interval: Duration) -> Self {
        Self {
            page,
            poll_interval,
        }
    }
}

#[async_trait]
impl PageSurface for ChromiumSurface {
    type Element = Element;

    async fn navigate(&self, url: &str) -> AutomationResult<()> {
        debug!("导航到: {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn find_all(&self, selector: &str) -> AutomationResult<Vec<Element>> {
        Ok(self.page.find_elements(selector).await?)
    }

    async fn click(&self, element: &Element) -> AutomationResult<()> {
        element.click().await?;
        Ok(())
    }

    async fn type_text(&self, element: &Element, text: &str) -> AutomationResult<()> {
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn upload_file(&self, element: &Element, path: &Path) -> AutomationResult<()> {
        let mut params = SetFileInputFilesParams::new(vec![path.to_string_lossy().to_string()]);
        params.backend_node_id = Some(element.backend_node_id.clone());
        self.page.execute(params).await?;
        Ok(())
    }

    async fn text_of(&self, element: &Element) -> AutomationResult<String> {
        Ok(element.inner_text().await?.unwrap_or_default())
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
