//! 错误类型
//!
//! 分三层：
//! - `AutomationError`：页面自动化层（PageSurface）的调用失败
//! - `ConfigError`：启动阶段的配置/凭据错误，全部是致命错误
//! - `AppError`：应用顶层错误，只有这里的错误会终止整个程序

use std::path::PathBuf;

use thiserror::Error;

/// 页面自动化错误
///
/// 任何一次对浏览器的调用都可能失败，Driver 从不假设调用成功。
#[derive(Debug, Clone, Error)]
pub enum AutomationError {
    /// 在限定时间内没有等到元素出现
    #[error("等待元素超时: {selector} ({timeout_ms}ms)")]
    Timeout { selector: String, timeout_ms: u64 },

    /// 浏览器命令执行失败（页面仍然可用）
    #[error("浏览器命令失败: {0}")]
    Command(String),

    /// 浏览器会话已不可用
    #[error("浏览器会话已断开: {0}")]
    SessionLost(String),
}

impl AutomationError {
    pub fn command(detail: impl std::fmt::Display) -> Self {
        AutomationError::Command(detail.to_string())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AutomationError::Timeout { .. })
    }

    pub fn is_session_lost(&self) -> bool {
        matches!(self, AutomationError::SessionLost(_))
    }
}

impl From<chromiumoxide::error::CdpError> for AutomationError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        use chromiumoxide::error::CdpError;

        match err {
            CdpError::Ws(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse => {
                AutomationError::SessionLost(err.to_string())
            }
            other => AutomationError::Command(other.to_string()),
        }
    }
}

pub type AutomationResult<T> = Result<T, AutomationError>;

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("文件不存在: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("读取文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("凭据文件 JSON 格式错误 ({}): {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置文件 TOML 格式错误 ({}): {source}", .path.display())]
    InvalidToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("凭据文件缺少必填字段: {0:?}")]
    MissingFields(Vec<String>),

    #[error("简历文件不存在: {}", .0.display())]
    ResumeNotFound(PathBuf),

    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },

    #[error("未知的搜索筛选项 {kind}: {value}")]
    UnknownFilter { kind: &'static str, value: String },

    #[error("无效的 URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// 通知发送错误
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("通知请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("通知服务返回错误状态: {0}")]
    BadStatus(u16),

    #[error("无效的邮箱地址: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("构建通知邮件失败: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP 发送失败: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// 应用顶层错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("浏览器启动/连接失败: {0}")]
    Browser(String),

    #[error("登录失败: {0}")]
    Login(#[source] AutomationError),

    #[error("浏览器会话丢失: {0}")]
    SessionLost(String),

    #[error("日志初始化失败: {0}")]
    Logging(String),

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_automation_error_kinds() {
        let timeout = AutomationError::Timeout {
            selector: ".jobs-apply-button".to_string(),
            timeout_ms: 5000,
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_session_lost());
        assert!(timeout.to_string().contains(".jobs-apply-button"));

        let lost = AutomationError::SessionLost("websocket closed".to_string());
        assert!(lost.is_session_lost());
        assert!(!AutomationError::command("boom").is_session_lost());
    }

    #[test]
    fn test_missing_fields_message() {
        let err = ConfigError::MissingFields(vec!["password".to_string()]);
        assert!(err.to_string().contains("password"));

        let app: AppError = err.into();
        assert!(matches!(app, AppError::Config(_)));
    }
}
