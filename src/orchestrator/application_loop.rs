//! 投递循环 - 编排层
//!
//! ## 职责
//!
//! 按页遍历搜索结果，对每个职位调用申请向导，直到配额用完。
//!
//! ## 核心功能
//!
//! 1. **翻页**：从第 0 页开始，依次生成搜索 URL
//! 2. **扫描**：委托 `ListingScanner` 列出当前页的职位
//! 3. **投递**：委托 `WizardStepExecutor` 处理单个职位
//! 4. **配额**：每次提交成功占用一个名额，用完即停
//! 5. **通知**：成功后发送通知，失败只记日志
//! 6. **容错**：单个职位/单页失败不影响整个会话，只有浏览器会话丢失才终止
//!
//! 取消请求只在页/职位边界生效，不会打断进行中的向导。

use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{Config, Timings};
use crate::error::AutomationError;
use crate::infrastructure::PageSurface;
use crate::models::{PageOutcome, Quota, SearchQuery, SessionReport, Termination};
use crate::services::{ListingScanner, Notifier};
use crate::utils::logging;
use crate::workflow::{ListingCtx, WizardStepExecutor};

/// 投递循环
pub struct ApplicationLoop<'a, S: PageSurface> {
    surface: &'a S,
    notifier: &'a dyn Notifier,
    scanner: ListingScanner,
    executor: WizardStepExecutor,
    search_url: String,
    page_size: usize,
    max_pages: usize,
    max_consecutive_empty_pages: usize,
    timings: Timings,
    resume: Option<PathBuf>,
    cancel: CancellationToken,
}

impl<'a, S: PageSurface> ApplicationLoop<'a, S> {
    pub fn new(surface: &'a S, notifier: &'a dyn Notifier, config: &Config) -> Self {
        Self {
            surface,
            notifier,
            scanner: ListingScanner::new(config),
            executor: WizardStepExecutor::new(config),
            search_url: config.portal.search_url.clone(),
            page_size: config.portal.page_size,
            max_pages: config.limits.max_pages,
            max_consecutive_empty_pages: config.limits.max_consecutive_empty_pages,
            timings: config.timings.clone(),
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

    /// 运行投递循环
    ///
    /// # 返回
    /// 总是返回会话报告（包括中途终止时已经完成的部分），结束原因见 `termination`
    pub async fn run(&self, query: &SearchQuery, max_applications: usize) -> SessionReport {
        let mut quota = Quota::new(max_applications);
        let mut report = SessionReport::new();

        let termination = self.run_pages(query, &mut quota, &mut report).await;
        info!("🏁 投递循环结束: {}", termination);

        report.termination = Some(termination);
        report
    }

    async fn run_pages(
        &self,
        query: &SearchQuery,
        quota: &mut Quota,
        report: &mut SessionReport,
    ) -> Termination {
        let mut empty_streak = 0;

        for page_number in 0..self.max_pages {
            if quota.is_exhausted() {
                return Termination::QuotaReached;
            }
            if self.cancel.is_cancelled() {
                return Termination::Cancelled;
            }

            logging::log_page_start(page_number, quota);

            let outcome = match self.process_page(query, page_number, quota, report).await {
                Ok(outcome) => outcome,
                Err(termination) => return termination,
            };

            match &outcome {
                PageOutcome::Listings { .. } => empty_streak = 0,
                PageOutcome::NoListingsFound => {
                    empty_streak += 1;
                    info!(
                        "[第 {} 页] 没有找到职位，继续下一页 (连续 {} 页)",
                        page_number + 1,
                        empty_streak
                    );
                }
                PageOutcome::LoadFailed { detail } => {
                    warn!("[第 {} 页] ❌ 页面加载失败: {}，继续下一页", page_number + 1, detail);
                }
            }
            report.pages.push(outcome);

            logging::log_page_complete(page_number, quota);

            if self.max_consecutive_empty_pages > 0 && empty_streak >= self.max_consecutive_empty_pages {
                return Termination::ResultsExhausted {
                    empty_pages: empty_streak,
                };
            }
        }

        if quota.is_exhausted() {
            Termination::QuotaReached
        } else {
            Termination::PagesExhausted
        }
    }

    /// 处理单个搜索结果页
    ///
    /// `Err` 表示整个会话需要终止（会话丢失或取消）。
    /// 已开始处理职位的页面在返回 `Err` 前自行写入 `report.pages`。
    async fn process_page(
        &self,
        query: &SearchQuery,
        page_number: usize,
        quota: &mut Quota,
        report: &mut SessionReport,
    ) -> Result<PageOutcome, Termination> {
        let url = match query.page_url(&self.search_url, page_number, self.page_size) {
            Ok(url) => url,
            Err(e) => {
                return Ok(PageOutcome::LoadFailed {
                    detail: e.to_string(),
                })
            }
        };
        debug!("[第 {} 页] 搜索 URL: {}", page_number + 1, url);

        if let Err(e) = self.surface.navigate(&url).await {
            return page_failure(e);
        }
        self.surface
            .pause(Timings::ms(self.timings.page_settle_ms))
            .await;

        let listings = match self.scanner.scan(self.surface).await {
            Ok(listings) => listings,
            Err(e) => return page_failure(e),
        };

        if listings.is_empty() {
            return Ok(PageOutcome::NoListingsFound);
        }

        let count = listings.len();
        info!("[第 {} 页] 找到 {} 个职位", page_number + 1, count);

        for listing in &listings {
            if quota.is_exhausted() {
                debug!("[第 {} 页] 配额已用完，剩余职位不再处理", page_number + 1);
                break;
            }
            if self.cancel.is_cancelled() {
                report.pages.push(PageOutcome::Listings { count });
                return Err(Termination::Cancelled);
            }

            let ctx = ListingCtx::new(page_number, listing.position);
            let outcome = self
                .executor
                .drive(self.surface, listing, self.resume.as_deref(), &ctx)
                .await;

            if outcome.is_submitted() {
                if let Some(record) = outcome.into_record() {
                    let number = quota.applied() + 1;
                    let message = record.notification_message(number);
                    logging::log_application_success(number, &record);

                    if report.push_record(quota, record) {
                        self.send_notification(&ctx, &message).await;
                    }
                }
            } else if let Some(reason) = outcome.failure() {
                report.failed += 1;
                warn!(
                    "{} ❌ 处理失败 (page={}, position={}, kind={}): {}",
                    ctx,
                    page_number,
                    listing.position,
                    reason.kind(),
                    reason
                );
                if reason.is_fatal() {
                    report.pages.push(PageOutcome::Listings { count });
                    return Err(Termination::SessionLost {
                        detail: reason.to_string(),
                    });
                }
            } else {
                report.abandoned += 1;
                info!("{} 已跳过", ctx);
            }

            self.surface
                .pause(Timings::ms(self.timings.between_listings_ms))
                .await;
        }

        Ok(PageOutcome::Listings { count })
    }

    async fn send_notification(&self, ctx: &ListingCtx, message: &str) {
        if let Err(e) = self.notifier.notify(message).await {
            warn!("{} ⚠️ 通知发送失败: {}", ctx, e);
        }
    }
}

/// 页面级错误：会话丢失时终止，其他情况记为加载失败
fn page_failure(err: AutomationError) -> Result<PageOutcome, Termination> {
    match err {
        AutomationError::SessionLost(detail) => Err(Termination::SessionLost { detail }),
        other => Ok(PageOutcome::LoadFailed {
            detail: other.to_string(),
        }),
    }
}
