//! 职位扫描服务 - 业务能力层
//!
//! 只负责"列出当前搜索结果页上的职位卡片"，不关心申请流程

use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::AutomationResult;
use crate::infrastructure::PageSurface;
use crate::models::{ListingDetails, ListingHandle};

/// 职位扫描服务
///
/// 职责：
/// - 在限定时间内等待职位卡片出现
/// - 按文档顺序返回全部卡片（一次性取完，之后点击职位可能改变页面结构）
/// - 卡片文本解析失败时字段记为未知，不影响其他卡片
pub struct ListingScanner {
    card_selector: String,
    wait: Duration,
}

impl ListingScanner {
    pub fn new(config: &Config) -> Self {
        Self::with_selector(
            config.selectors.listing_card.clone(),
            Duration::from_millis(config.timings.listing_wait_ms),
        )
    }

    pub fn with_selector(card_selector: impl Into<String>, wait: Duration) -> Self {
        Self {
            card_selector: card_selector.into(),
            wait,
        }
    }

    /// 扫描当前页面
    ///
    /// # 返回
    /// 等待超时返回空列表（这是正常的翻页信号，不是错误）；
    /// 其他自动化错误原样返回，由调用方决定如何处理这一页
    pub async fn scan<S: PageSurface>(
        &self,
        surface: &S,
    ) -> AutomationResult<Vec<ListingHandle<S::Element>>> {
        if surface
            .find_optional(&self.card_selector, self.wait)
            .await?
            .is_none()
        {
            debug!(
                "{}ms 内没有出现职位卡片 ({})",
                self.wait.as_millis(),
                self.card_selector
            );
            return Ok(Vec::new());
        }

        let cards = surface.find_all(&self.card_selector).await?;
        let mut listings = Vec::with_capacity(cards.len());

        for (position, card) in cards.into_iter().enumerate() {
            let details = match surface.text_of(&card).await {
                Ok(text) => ListingDetails::from_card_text(&text),
                Err(e) if e.is_session_lost() => return Err(e),
                Err(e) => {
                    debug!("读取第 {} 个职位卡片文本失败: {}", position, e);
                    ListingDetails::unknown()
                }
            };
            listings.push(ListingHandle::new(position, details, card));
        }

        debug!("扫描到 {} 个职位卡片", listings.len());
        Ok(listings)
    }
}
