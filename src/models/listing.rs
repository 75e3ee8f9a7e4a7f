//! 职位卡片
//!
//! `ListingHandle` 是搜索结果页上一个职位卡片的不透明引用，页面跳转后即失效。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 尽力解析得到的字段值
///
/// 解析失败时是 `Unknown`，调用方不会把占位符误当成真实数据。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum FieldValue {
    Resolved(String),
    Unknown,
}

impl FieldValue {
    /// 去掉首尾空白，空字符串视为 `Unknown`
    pub fn from_text(text: impl AsRef<str>) -> Self {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            FieldValue::Unknown
        } else {
            FieldValue::Resolved(trimmed.to_string())
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, FieldValue::Resolved(_))
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            FieldValue::Resolved(value) => Some(value),
            FieldValue::Unknown => None,
        }
    }

    /// 优先使用自身，未知时退回到 `fallback`
    pub fn or(self, fallback: FieldValue) -> FieldValue {
        match self {
            FieldValue::Resolved(_) => self,
            FieldValue::Unknown => fallback,
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => FieldValue::from_text(text),
            None => FieldValue::Unknown,
        }
    }
}

impl From<FieldValue> for Option<String> {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Resolved(text) => Some(text),
            FieldValue::Unknown => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Resolved(value) => write!(f, "{}", value),
            FieldValue::Unknown => write!(f, "未知"),
        }
    }
}

/// 职位的标题、公司、地点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetails {
    pub title: FieldValue,
    pub company: FieldValue,
    pub location: FieldValue,
}

impl ListingDetails {
    pub fn unknown() -> Self {
        Self {
            title: FieldValue::Unknown,
            company: FieldValue::Unknown,
            location: FieldValue::Unknown,
        }
    }

    /// 从卡片文本解析：按行依次是标题、公司、地点
    pub fn from_card_text(text: &str) -> Self {
        let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

        Self {
            title: lines.next().map(FieldValue::from_text).unwrap_or(FieldValue::Unknown),
            company: lines.next().map(FieldValue::from_text).unwrap_or(FieldValue::Unknown),
            location: lines.next().map(FieldValue::from_text).unwrap_or(FieldValue::Unknown),
        }
    }

    /// 逐字段合并，`self` 中未知的字段取 `fallback` 的值
    pub fn merged_with(self, fallback: &ListingDetails) -> Self {
        Self {
            title: self.title.or(fallback.title.clone()),
            company: self.company.or(fallback.company.clone()),
            location: self.location.or(fallback.location.clone()),
        }
    }
}

impl fmt::Display for ListingDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} ({})", self.title, self.company, self.location)
    }
}

/// 搜索结果页上的一个职位卡片
///
/// `E` 是 PageSurface 的元素类型。
#[derive(Debug, Clone)]
pub struct ListingHandle<E> {
    /// 在当前页中的位置（从 0 开始）
    pub position: usize,
    /// 从卡片文本中解析出的信息
    pub details: ListingDetails,
    element: E,
}

impl<E> ListingHandle<E> {
    pub fn new(position: usize, details: ListingDetails, element: E) -> Self {
        Self {
            position,
            details,
            element,
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }
}
