//! 控件分类
//!
//! 把按钮文字映射为类型化的动作，流程层不直接做字符串匹配。

use std::sync::LazyLock;

use regex::Regex;

/// 职位主按钮指向的申请方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPath {
    /// 站内快速申请
    Easy,
    /// 跳转到外部网站
    External,
}

/// 申请向导中按钮的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// 下一步 / 审核
    Continue,
    /// 提交申请
    Submit,
    Unknown,
}

static EASY_APPLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\beasy\s+apply\b").unwrap());
static SUBMIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bsubmit\b").unwrap());
static CONTINUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(next|continue|review)\b").unwrap());

/// 控件分类器
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlClassifier;

impl ControlClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn apply_path(&self, label: &str) -> ApplyPath {
        if EASY_APPLY_RE.is_match(label) {
            ApplyPath::Easy
        } else {
            ApplyPath::External
        }
    }

    /// “提交”优先于“下一步”
    pub fn action_kind(&self, label: &str) -> ActionKind {
        if SUBMIT_RE.is_match(label) {
            ActionKind::Submit
        } else if CONTINUE_RE.is_match(label) {
            ActionKind::Continue
        } else {
            ActionKind::Unknown
        }
    }
}
