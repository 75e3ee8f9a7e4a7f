//! 投递记录与会话报告

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::listing::{FieldValue, ListingDetails};

/// 一次成功投递的记录，只在 `Submitted` 时产生，之后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub title: FieldValue,
    pub company: FieldValue,
    pub location: FieldValue,
    pub submitted_at: DateTime<Local>,
}

impl ApplicationRecord {
    pub fn new(details: ListingDetails, submitted_at: DateTime<Local>) -> Self {
        Self {
            title: details.title,
            company: details.company,
            location: details.location,
            submitted_at,
        }
    }

    pub fn timestamp(&self) -> String {
        self.submitted_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// 发给通知服务的可读文本
    pub fn notification_message(&self, number: usize) -> String {
        format!(
            "✅ 第 {} 个职位投递成功\n职位: {}\n公司: {}\n地点: {}\n时间: {}",
            number,
            self.title,
            self.company,
            self.location,
            self.timestamp()
        )
    }
}

impl fmt::Display for ApplicationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({}) [{}]",
            self.title,
            self.company,
            self.location,
            self.timestamp()
        )
    }
}

/// 投递配额
///
/// `applied` 只增不减，且永远不超过 `max`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    applied: usize,
    max: usize,
}

impl Quota {
    pub fn new(max: usize) -> Self {
        Self { applied: 0, max }
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn remaining(&self) -> usize {
        self.max.saturating_sub(self.applied)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// 占用一个名额；配额已满时返回 false
    pub fn try_consume(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.applied += 1;
        true
    }
}

/// 单个搜索结果页的处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PageOutcome {
    /// 扫描到若干职位
    Listings { count: usize },
    /// 页面正常加载，但没有职位
    NoListingsFound,
    /// 页面加载或扫描失败
    LoadFailed { detail: String },
}

/// 整个会话的结束原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Termination {
    /// 达到投递上限
    QuotaReached,
    /// 达到最大页数
    PagesExhausted,
    /// 连续多页没有职位，视为搜索结果已到底
    ResultsExhausted { empty_pages: usize },
    /// 收到取消请求
    Cancelled,
    /// 浏览器会话丢失
    SessionLost { detail: String },
}

impl Termination {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Termination::SessionLost { .. })
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::QuotaReached => write!(f, "已达到投递上限"),
            Termination::PagesExhausted => write!(f, "已达到最大页数"),
            Termination::ResultsExhausted { empty_pages } => {
                write!(f, "连续 {} 页没有职位", empty_pages)
            }
            Termination::Cancelled => write!(f, "已取消"),
            Termination::SessionLost { detail } => write!(f, "浏览器会话丢失: {}", detail),
        }
    }
}

/// 会话报告
///
/// 记录按投递顺序排列，只增不减；`total_applied()` 始终等于记录数。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionReport {
    records: Vec<ApplicationRecord>,
    pub pages: Vec<PageOutcome>,
    pub abandoned: usize,
    pub failed: usize,
    pub termination: Option<Termination>,
}

impl SessionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn total_applied(&self) -> usize {
        self.records.len()
    }

    /// 追加一条记录，必须先从 `quota` 中占到名额
    pub fn push_record(&mut self, quota: &mut Quota, record: ApplicationRecord) -> bool {
        if !quota.try_consume() {
            return false;
        }
        self.records.push(record);
        debug_assert_eq!(self.records.len(), quota.applied());
        true
    }

    pub fn is_complete_success(&self) -> bool {
        matches!(self.termination, Some(Termination::QuotaReached))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> ApplicationRecord {
        ApplicationRecord::new(
            ListingDetails::from_card_text(&format!("{}\nAcme\nRemote", title)),
            Local::now(),
        )
    }

    #[test]
    fn test_quota_never_exceeds_max() {
        let mut quota = Quota::new(2);
        assert!(quota.try_consume());
        assert!(quota.try_consume());
        assert!(!quota.try_consume());
        assert_eq!(quota.applied(), 2);
        assert_eq!(quota.remaining(), 0);
        assert!(quota.is_exhausted());
    }

    #[test]
    fn test_zero_quota_is_exhausted() {
        let quota = Quota::new(0);
        assert!(quota.is_exhausted());
    }

    #[test]
    fn test_report_tracks_quota() {
        let mut quota = Quota::new(1);
        let mut report = SessionReport::new();

        assert!(report.push_record(&mut quota, record("First")));
        assert!(!report.push_record(&mut quota, record("Second")));

        assert_eq!(report.total_applied(), 1);
        assert_eq!(report.records()[0].title.as_deref(), Some("First"));
    }

    #[test]
    fn test_notification_message_contains_fields() {
        let message = record("Rust Developer").notification_message(3);
        assert!(message.contains("第 3 个"));
        assert!(message.contains("Rust Developer"));
        assert!(message.contains("Acme"));
        assert!(message.contains("Remote"));
    }

    #[test]
    fn test_termination_serializes_with_kind_tag() {
        let json = serde_json::to_value(Termination::ResultsExhausted { empty_pages: 3 }).unwrap();
        assert_eq!(json["kind"], "results_exhausted");
        assert_eq!(json["empty_pages"], 3);
        assert!(Termination::SessionLost {
            detail: "gone".to_string()
        }
        .is_fatal());
    }
}
