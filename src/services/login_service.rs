//! 登录服务 - 业务能力层
//!
//! 只负责"登录门户网站"能力

use std::time::Duration;
use tracing::info;

use crate::config::{Config, Credentials, Selectors, Timings};
use crate::error::AutomationResult;
use crate::infrastructure::PageSurface;

/// 登录服务
pub struct LoginService {
    login_url: String,
    selectors: Selectors,
    field_wait: Duration,
    settle: Duration,
}

impl LoginService {
    pub fn new(config: &Config) -> Self {
        Self {
            login_url: config.portal.login_url.clone(),
            selectors: config.selectors.clone(),
            field_wait: Timings::ms(config.timings.login_wait_ms),
            settle: Timings::ms(config.timings.after_login_ms),
        }
    }

    /// 打开登录页，填写账号密码并提交
    ///
    /// 任何一步失败都返回错误，由调用方决定终止程序
    pub async fn login<S: PageSurface>(&self, surface: &S, credentials: &Credentials) -> AutomationResult<()> {
        info!("🔐 正在登录: {}", credentials.email);
        surface.navigate(&self.login_url).await?;

        let email_field = surface.find(&self.selectors.login_username, self.field_wait).await?;
        surface.type_text(&email_field, &credentials.email).await?;

        let password_field = surface.find(&self.selectors.login_password, self.field_wait).await?;
        surface.type_text(&password_field, &credentials.password).await?;

        let submit = surface.find(&self.selectors.login_submit, self.field_wait).await?;
        surface.click(&submit).await?;

        // 等待登录完成
        surface.pause(self.settle).await;

        info!("✓ 登录成功");
        Ok(())
    }
}
