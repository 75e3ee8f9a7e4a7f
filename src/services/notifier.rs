//! 通知服务 - 业务能力层
//!
//! 每次投递成功后发送一条可读消息。发送失败只记日志，不影响投递流程。
//!
//! ## 发送方式（按优先级）
//! 1. SMTP：凭据里同时有 `email_password` 和 `notification_email`
//! 2. HTTP 转发：配置了 `notify_webhook_url` 且有收件人
//! 3. 只写日志
//!
//! 每种网络发送都受 `timings.notify_timeout_ms` 限制。

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Config, Credentials, SmtpSettings};
use crate::error::NotifyError;

/// 通知邮件标题
pub const NOTIFICATION_SUBJECT: &str = "LinkedIn Auto Apply Update";

/// 隐式 TLS 端口，其余端口走 STARTTLS
const SMTPS_PORT: u16 = 465;

/// 通知能力
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;

    /// 发送方式名称，用于日志
    fn kind(&self) -> &'static str;
}

/// 只写日志的通知
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        info!("📨 通知: {}", message.replace('\n', " | "));
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "log"
    }
}

// ========== SMTP ==========

/// 通过 SMTP 发送邮件通知
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// 创建 SMTP 通知
    ///
    /// # 参数
    /// - `settings`: SMTP 服务器地址和端口
    /// - `from` / `password`: 发件账号及其密码
    /// - `to`: 收件人
    /// - `timeout`: 单次发送上限
    ///
    /// # 返回
    /// 地址无法解析或服务器地址无效时返回错误
    pub fn new(
        settings: &SmtpSettings,
        from: &str,
        password: &str,
        to: &str,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let from: Mailbox = from.parse()?;
        let to: Mailbox = to.parse()?;

        let builder = if settings.port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        };
        let transport = builder
            .port(settings.port)
            .credentials(SmtpCredentials::new(
                from.email.to_string(),
                password.to_string(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport, from, to })
    }

    fn build_message(&self, text: &str) -> Result<Message, NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(NOTIFICATION_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(text.to_string())?;
        Ok(message)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let email = self.build_message(message)?;
        debug!("通过 SMTP 发送通知 (收件人: {})", self.to);
        self.transport.send(email).await?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "smtp"
    }
}

// ========== HTTP 转发 ==========

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// 通过 HTTP 转发服务发送邮件通知
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    from: String,
    to: String,
}

impl WebhookNotifier {
    pub fn new(
        url: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            from: from.into(),
            to: to.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            from: &self.from,
            to: &self.to,
            subject: NOTIFICATION_SUBJECT,
            text: message,
        };
        debug!("发送通知到 {} (收件人: {})", self.url, self.to);

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::BadStatus(status.as_u16()));
        }
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "webhook"
    }
}

/// 根据配置选择通知方式
///
/// 创建失败时退回到只写日志，不影响启动。
pub fn build_notifier(config: &Config, credentials: &Credentials) -> Box<dyn Notifier> {
    let timeout = config.timings.notify_timeout();

    let Some(to) = &credentials.notification_email else {
        info!("📨 未配置通知收件人，通知只写入日志");
        return Box::new(LogNotifier);
    };

    if let Some(password) = &credentials.email_password {
        match SmtpNotifier::new(&config.smtp, &credentials.email, password, to, timeout) {
            Ok(notifier) => {
                info!("📨 通知将通过 {}:{} 发送到: {}", config.smtp.host, config.smtp.port, to);
                return Box::new(notifier);
            }
            Err(e) => warn!("⚠️ 初始化 SMTP 通知失败: {}", e),
        }
    }

    if let Some(url) = &config.notify_webhook_url {
        match WebhookNotifier::new(url, &credentials.email, to, timeout) {
            Ok(notifier) => {
                info!("📨 通知将通过转发服务发送到: {}", to);
                return Box::new(notifier);
            }
            Err(e) => warn!("⚠️ 初始化通知转发失败: {}", e),
        }
    }

    info!("📨 没有可用的通知发送方式，通知只写入日志");
    Box::new(LogNotifier)
}
