//! 程序配置
//!
//! 加载顺序：内置默认值 → TOML 配置文件（可选）→ 环境变量覆盖。
//! 账号凭据单独放在 JSON 文件中，见 [`Credentials`]。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::SearchQuery;

/// 未设置 `AUTO_APPLY_CONFIG` 时尝试读取的配置文件
pub const DEFAULT_CONFIG_FILE: &str = "auto_apply.toml";

/// 程序配置
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserSettings,
    pub portal: PortalSettings,
    pub search: SearchQuery,
    pub limits: Limits,
    pub timings: Timings,
    pub selectors: Selectors,
    pub files: FileSettings,
    pub smtp: SmtpSettings,
    /// 通知转发服务地址，未配置 SMTP 时使用
    pub notify_webhook_url: Option<String>,
    /// 默认日志级别，`RUST_LOG` 优先
    pub log_level: String,
}

/// 浏览器设置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// 设置后连接已启动的浏览器（远程调试端口），否则自行启动
    pub debug_port: Option<u16>,
    pub headless: bool,
    pub chrome_executable: Option<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            debug_port: None,
            headless: false,
            chrome_executable: None,
        }
    }
}

/// 通知邮件的 SMTP 服务器（隐式 TLS）
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 465,
        }
    }
}

/// 门户网站地址
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub login_url: String,
    pub search_url: String,
    /// 每页职位数，用于计算 `start` 参数
    pub page_size: usize,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            login_url: "https://www.linkedin.com/login".to_string(),
            search_url: "https://www.linkedin.com/jobs/search/".to_string(),
            page_size: 25,
        }
    }
}

/// 数量上限
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_applications: usize,
    pub max_pages: usize,
    /// 连续多少页没有职位时认为搜索结果已到底
    pub max_consecutive_empty_pages: usize,
    /// 申请向导最多点击多少次“下一步”
    pub max_wizard_steps: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_applications: 10,
            max_pages: 40,
            max_consecutive_empty_pages: 3,
            max_wizard_steps: 20,
        }
    }
}

/// 各类等待时长（毫秒）
///
/// 所有等待都有上限，超时后干净地失败。
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub poll_interval_ms: u64,
    pub listing_wait_ms: u64,
    pub detail_render_ms: u64,
    pub field_wait_ms: u64,
    pub action_control_wait_ms: u64,
    pub form_open_ms: u64,
    pub resume_wait_ms: u64,
    pub after_upload_ms: u64,
    pub step_wait_ms: u64,
    pub step_pause_ms: u64,
    pub dismiss_wait_ms: u64,
    pub between_listings_ms: u64,
    pub page_settle_ms: u64,
    pub login_wait_ms: u64,
    pub after_login_ms: u64,
    /// 单条通知的发送上限
    pub notify_timeout_ms: u64,
    /// 关闭浏览器后等待进程退出的上限，超时强制结束
    pub browser_exit_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            listing_wait_ms: 10_000,
            detail_render_ms: 3_000,
            field_wait_ms: 1_000,
            action_control_wait_ms: 5_000,
            form_open_ms: 3_000,
            resume_wait_ms: 5_000,
            after_upload_ms: 2_000,
            step_wait_ms: 5_000,
            step_pause_ms: 2_000,
            dismiss_wait_ms: 2_000,
            between_listings_ms: 3_000,
            page_settle_ms: 5_000,
            login_wait_ms: 10_000,
            after_login_ms: 3_000,
            notify_timeout_ms: 10_000,
            browser_exit_ms: 10_000,
        }
    }
}

impl Timings {
    pub fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    pub fn poll_interval(&self) -> Duration {
        Self::ms(self.poll_interval_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Self::ms(self.notify_timeout_ms)
    }

    pub fn browser_exit(&self) -> Duration {
        Self::ms(self.browser_exit_ms)
    }
}

/// 页面元素选择器
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub login_username: String,
    pub login_password: String,
    pub login_submit: String,
    pub listing_card: String,
    pub detail_title: String,
    pub detail_company: String,
    pub detail_location: String,
    pub apply_button: String,
    pub resume_input: String,
    pub wizard_action: String,
    pub dialog_dismiss: String,
    pub discard_confirm: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            login_username: "#username".to_string(),
            login_password: "#password".to_string(),
            login_submit: "button[type='submit']".to_string(),
            listing_card: ".job-card-container".to_string(),
            detail_title: ".job-details-jobs-unified-top-card__job-title".to_string(),
            detail_company: ".job-details-jobs-unified-top-card__company-name".to_string(),
            detail_location: ".job-details-jobs-unified-top-card__bullet".to_string(),
            apply_button: ".jobs-apply-button".to_string(),
            resume_input: "input[type='file']".to_string(),
            wizard_action: "button[aria-label='Continue to next step'], \
                            button[aria-label='Review your application'], \
                            button[aria-label='Submit application']"
                .to_string(),
            dialog_dismiss: "button[aria-label='Dismiss']".to_string(),
            discard_confirm: "button[data-control-name='discard_application_confirm_btn']"
                .to_string(),
        }
    }
}

/// 文件路径
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub credentials_file: String,
    pub resume_path: String,
    pub output_log_file: String,
    /// 设置后把会话报告写成 JSON
    pub report_file: Option<String>,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            credentials_file: "credentials.json".to_string(),
            resume_path: "resume.pdf".to_string(),
            output_log_file: "linkedin_auto_apply.log".to_string(),
            report_file: None,
        }
    }
}

impl Config {
    /// 按默认顺序加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("AUTO_APPLY_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };

        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::InvalidToml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 用环境变量覆盖配置项
    ///
    /// `lookup` 一般是 `std::env::var`，测试中可以替换。
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, "MAX_APPLICATIONS", "usize")? {
            self.limits.max_applications = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_PAGES", "usize")? {
            self.limits.max_pages = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_WIZARD_STEPS", "usize")? {
            self.limits.max_wizard_steps = v;
        }
        if let Some(v) = parse_var(&lookup, "BROWSER_DEBUG_PORT", "u16")? {
            self.browser.debug_port = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "HEADLESS", "bool")? {
            self.browser.headless = v;
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            self.browser.chrome_executable = Some(v);
        }
        if let Some(v) = lookup("CREDENTIALS_FILE") {
            self.files.credentials_file = v;
        }
        if let Some(v) = lookup("RESUME_PATH") {
            self.files.resume_path = v;
        }
        if let Some(v) = lookup("OUTPUT_LOG_FILE") {
            self.files.output_log_file = v;
        }
        if let Some(v) = lookup("REPORT_FILE") {
            self.files.report_file = Some(v);
        }
        if let Some(v) = lookup("SEARCH_KEYWORDS") {
            self.search.keywords = v;
        }
        if let Some(v) = lookup("SEARCH_LOCATION") {
            self.search.location = v;
        }
        if let Some(v) = lookup("SMTP_HOST") {
            self.smtp.host = v;
        }
        if let Some(v) = parse_var(&lookup, "SMTP_PORT", "u16")? {
            self.smtp.port = v;
        }
        if let Some(v) = parse_var(&lookup, "NOTIFY_TIMEOUT_MS", "u64")? {
            self.timings.notify_timeout_ms = v;
        }
        if let Some(v) = lookup("NOTIFY_WEBHOOK_URL") {
            self.notify_webhook_url = Some(v);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(())
    }

    /// 启动前检查，筛选项名称错误等问题在这里暴露
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search
            .page_url(&self.portal.search_url, 0, self.portal.page_size)
            .map(|_| ())
    }

    /// 返回简历的绝对路径，文件不存在时报错
    pub fn resolve_resume_path(&self) -> Result<PathBuf, ConfigError> {
        let path = Path::new(&self.files.resume_path);
        std::fs::canonicalize(path).map_err(|_| ConfigError::ResumeNotFound(path.to_path_buf()))
    }

    pub fn log_level(&self) -> &str {
        if self.log_level.is_empty() {
            "info"
        } else {
            &self.log_level
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}

/// 账号凭据
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// 接收通知的邮箱
    #[serde(default)]
    pub notification_email: Option<String>,
    /// 发件邮箱的 SMTP 密码（应用专用密码）
    #[serde(default)]
    pub email_password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .field("notification_email", &self.notification_email)
            .field("email_password", &self.email_password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Credentials {
    const REQUIRED_FIELDS: [&'static str; 2] = ["email", "password"];

    /// 从 JSON 文件加载凭据
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content, path)
    }

    pub fn from_json_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let invalid = |source: serde_json::Error| ConfigError::InvalidJson {
            path: path.to_path_buf(),
            source,
        };

        let value: serde_json::Value = serde_json::from_str(content).map_err(invalid)?;

        let missing: Vec<String> = Self::REQUIRED_FIELDS
            .iter()
            .filter(|field| value.get(**field).and_then(|v| v.as_str()).is_none())
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        serde_json::from_value(value).map_err(invalid)
    }
}
