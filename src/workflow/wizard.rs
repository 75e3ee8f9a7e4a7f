//! 申请向导处理流程 - 流程层
//!
//! 核心职责：把"一个职位"的申请向导推进到终态
//!
//! 流程顺序：
//! 1. 打开职位 → 解析标题/公司/地点（尽力而为）
//! 2. 找到申请按钮 → 判断是否站内快速申请
//! 3. 打开向导 → 上传简历（尽力而为）
//! 4. 循环点击"下一步"，直到"提交"
//!
//! 状态机：
//!
//! ```text
//! NotStarted → FormOpen → [ResumeAttached] → StepInProgress ⇄ AwaitingNextAction → Submitted
//!                         任意状态 → Abandoned / Failed
//! ```
//!
//! 所有错误都在这里收敛为终态，不会抛给调用方。

use chrono::Local;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{Config, Selectors, Timings};
use crate::error::{AutomationError, AutomationResult};
use crate::infrastructure::{ActionKind, ApplyPath, ControlClassifier, PageSurface};
use crate::models::{ApplicationRecord, FieldValue, ListingDetails, ListingHandle};
use crate::utils::logging::truncate_text;
use crate::workflow::listing_ctx::ListingCtx;

/// 失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// 限定时间内没有出现申请按钮
    NoActionControl,
    /// 某一步既没有"下一步"也没有"提交"
    StalledStep { step: usize },
    /// 超过最大步数仍未提交
    StepLimitExceeded { max_steps: usize },
    /// 无法识别的向导按钮，不点击
    UnrecognizedAction { label: String },
    /// 浏览器命令失败
    Automation(String),
    /// 浏览器会话丢失，整个会话需要终止
    SessionLost(String),
}

impl FailureReason {
    pub fn is_fatal(&self) -> bool {
        matches!(self, FailureReason::SessionLost(_))
    }

    /// 简短的失败类别，用于日志
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::NoActionControl => "no-action-control",
            FailureReason::StalledStep { .. } => "stalled-step",
            FailureReason::StepLimitExceeded { .. } => "step-limit-exceeded",
            FailureReason::UnrecognizedAction { .. } => "unrecognized-action",
            FailureReason::Automation(_) => "automation-failure",
            FailureReason::SessionLost(_) => "session-lost",
        }
    }
}

impl From<AutomationError> for FailureReason {
    fn from(err: AutomationError) -> Self {
        match err {
            AutomationError::SessionLost(detail) => FailureReason::SessionLost(detail),
            other => FailureReason::Automation(other.to_string()),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoActionControl => write!(f, "没有找到申请按钮"),
            FailureReason::StalledStep { step } => write!(f, "第 {} 步无法继续", step + 1),
            FailureReason::StepLimitExceeded { max_steps } => {
                write!(f, "超过最大步数 {} 仍未提交", max_steps)
            }
            FailureReason::UnrecognizedAction { label } => {
                write!(f, "无法识别的向导按钮: {}", label)
            }
            FailureReason::Automation(detail) => write!(f, "自动化错误: {}", detail),
            FailureReason::SessionLost(detail) => write!(f, "浏览器会话丢失: {}", detail),
        }
    }
}

/// 申请向导状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    NotStarted,
    FormOpen,
    StepInProgress,
    ResumeAttached,
    AwaitingNextAction,
    Submitted,
    Abandoned,
    Failed(FailureReason),
}

impl WizardState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WizardState::Submitted | WizardState::Abandoned | WizardState::Failed(_)
        )
    }
}

/// 单个职位的处理结果
///
/// `state` 一定是终态；只有 `Submitted` 时才带有记录。
#[derive(Debug, Clone)]
pub struct WizardOutcome {
    state: WizardState,
    record: Option<ApplicationRecord>,
    steps: usize,
}

impl WizardOutcome {
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn record(&self) -> Option<&ApplicationRecord> {
        self.record.as_ref()
    }

    pub fn into_record(self) -> Option<ApplicationRecord> {
        self.record
    }

    /// 点击"下一步"的次数
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.state, WizardState::Submitted)
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.state {
            WizardState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// 单次向导运行的可变状态，只在 `drive` 期间存在
struct WizardRun {
    ctx: ListingCtx,
    state: WizardState,
    steps: usize,
    dialog_open: bool,
}

impl WizardRun {
    fn new(ctx: ListingCtx) -> Self {
        Self {
            ctx,
            state: WizardState::NotStarted,
            steps: 0,
            dialog_open: false,
        }
    }

    fn transition(&mut self, next: WizardState) {
        debug!("{} 状态: {:?} → {:?}", self.ctx, self.state, next);
        self.state = next;
    }

    fn finish(&mut self, state: WizardState, record: Option<ApplicationRecord>) -> WizardOutcome {
        self.transition(state.clone());
        WizardOutcome {
            state,
            record,
            steps: self.steps,
        }
    }

    fn submit(&mut self, record: ApplicationRecord) -> WizardOutcome {
        self.dialog_open = false;
        self.finish(WizardState::Submitted, Some(record))
    }

    fn abandon(&mut self) -> WizardOutcome {
        self.finish(WizardState::Abandoned, None)
    }

    fn fail(&mut self, reason: FailureReason) -> WizardOutcome {
        self.finish(WizardState::Failed(reason), None)
    }
}

/// 申请向导执行器
///
/// - 一次只处理一个职位
/// - 总是返回终态，从不把错误抛给调用方
/// - 不持有任何资源（page），通过 PageSurface 操作页面
pub struct WizardStepExecutor {
    selectors: Selectors,
    timings: Timings,
    max_steps: usize,
    classifier: ControlClassifier,
}

impl WizardStepExecutor {
    pub fn new(config: &Config) -> Self {
        Self {
            selectors: config.selectors.clone(),
            timings: config.timings.clone(),
            max_steps: config.limits.max_wizard_steps,
            classifier: ControlClassifier::new(),
        }
    }

    /// 处理一个职位，直到终态
    ///
    /// # 参数
    /// - `surface`: 页面自动化能力
    /// - `listing`: 职位卡片
    /// - `resume`: 简历路径；没有时跳过上传
    /// - `ctx`: 上下文（仅用于日志）
    pub async fn drive<S: PageSurface>(
        &self,
        surface: &S,
        listing: &ListingHandle<S::Element>,
        resume: Option<&Path>,
        ctx: &ListingCtx,
    ) -> WizardOutcome {
        let mut run = WizardRun::new(*ctx);

        let outcome = match self.run_steps(surface, listing, resume, &mut run).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("{} ❌ 自动化错误: {}", ctx, e);
                run.fail(FailureReason::from(e))
            }
        };

        let fatal = outcome.failure().map_or(false, FailureReason::is_fatal);
        if run.dialog_open && !fatal {
            self.discard_dialog(surface, ctx).await;
        }

        outcome
    }

    async fn run_steps<S: PageSurface>(
        &self,
        surface: &S,
        listing: &ListingHandle<S::Element>,
        resume: Option<&Path>,
        run: &mut WizardRun,
    ) -> AutomationResult<WizardOutcome> {
        let ctx = run.ctx;

        // ========== 1. 打开职位 ==========
        surface.click(listing.element()).await?;
        surface.pause(Timings::ms(self.timings.detail_render_ms)).await;

        let details = self.resolve_details(surface).await.merged_with(&listing.details);
        info!("{} 职位: {}", ctx, details);

        // ========== 2. 申请按钮 ==========
        let apply_button = match surface
            .find_optional(
                &self.selectors.apply_button,
                Timings::ms(self.timings.action_control_wait_ms),
            )
            .await?
        {
            Some(button) => button,
            None => {
                warn!("{} ⚠️ 没有找到申请按钮，跳过", ctx);
                return Ok(run.fail(FailureReason::NoActionControl));
            }
        };

        // ========== 3. 是否站内快速申请 ==========
        let label = surface.text_of(&apply_button).await?;
        if self.classifier.apply_path(&label) == ApplyPath::External {
            info!("{} 需要到外部网站申请 ({})，跳过", ctx, truncate_text(label.trim(), 40));
            return Ok(run.abandon());
        }

        // ========== 4. 打开向导 + 上传简历 ==========
        info!("{} 点击快速申请...", ctx);
        surface.click(&apply_button).await?;
        run.dialog_open = true;
        run.transition(WizardState::FormOpen);
        surface.pause(Timings::ms(self.timings.form_open_ms)).await;

        if let Some(path) = resume {
            self.attach_resume(surface, path, run).await?;
        }
        run.transition(WizardState::StepInProgress);

        // ========== 5. 下一步 / 提交 ==========
        let step_wait = Timings::ms(self.timings.step_wait_ms);
        for step in 0..self.max_steps {
            run.transition(WizardState::AwaitingNextAction);

            let control = match surface
                .find_optional(&self.selectors.wizard_action, step_wait)
                .await?
            {
                Some(control) => control,
                None => {
                    warn!("{} ⚠️ 第 {} 步没有可点击的按钮，放弃", ctx, step + 1);
                    return Ok(run.fail(FailureReason::StalledStep { step }));
                }
            };

            let label = surface.text_of(&control).await?;
            match self.classifier.action_kind(&label) {
                ActionKind::Submit => {
                    info!("{} 📤 提交申请...", ctx);
                    surface.click(&control).await?;
                    let record = ApplicationRecord::new(details, Local::now());
                    let outcome = run.submit(record);
                    self.dismiss_confirmation(surface, &ctx).await;
                    return Ok(outcome);
                }
                ActionKind::Continue => {
                    debug!("{} 下一步 ({})", ctx, truncate_text(label.trim(), 40));
                    surface.click(&control).await?;
                    run.steps += 1;
                    run.transition(WizardState::StepInProgress);
                    surface.pause(Timings::ms(self.timings.step_pause_ms)).await;
                }
                ActionKind::Unknown => {
                    warn!("{} ⚠️ 无法识别的按钮: {}", ctx, truncate_text(label.trim(), 40));
                    return Ok(run.fail(FailureReason::UnrecognizedAction {
                        label: label.trim().to_string(),
                    }));
                }
            }
        }

        warn!("{} ⚠️ 超过最大步数 {}，放弃", ctx, self.max_steps);
        Ok(run.fail(FailureReason::StepLimitExceeded {
            max_steps: self.max_steps,
        }))
    }

    /// 从职位详情区域读取标题/公司/地点，每个字段独立降级为未知
    async fn resolve_details<S: PageSurface>(&self, surface: &S) -> ListingDetails {
        ListingDetails {
            title: self.read_field(surface, &self.selectors.detail_title).await,
            company: self.read_field(surface, &self.selectors.detail_company).await,
            location: self.read_field(surface, &self.selectors.detail_location).await,
        }
    }

    async fn read_field<S: PageSurface>(&self, surface: &S, selector: &str) -> FieldValue {
        let wait = Timings::ms(self.timings.field_wait_ms);
        match surface.find_optional(selector, wait).await {
            Ok(Some(element)) => match surface.text_of(&element).await {
                Ok(text) => FieldValue::from_text(text),
                Err(e) => {
                    debug!("读取字段失败 ({}): {}", selector, e);
                    FieldValue::Unknown
                }
            },
            Ok(None) => FieldValue::Unknown,
            Err(e) => {
                debug!("查找字段失败 ({}): {}", selector, e);
                FieldValue::Unknown
            }
        }
    }

    /// 上传简历，找不到上传控件或上传失败都不影响后续步骤
    async fn attach_resume<S: PageSurface>(
        &self,
        surface: &S,
        path: &Path,
        run: &mut WizardRun,
    ) -> AutomationResult<()> {
        let ctx = run.ctx;
        let wait = Timings::ms(self.timings.resume_wait_ms);

        let input = match surface.find_optional(&self.selectors.resume_input, wait).await {
            Ok(Some(input)) => input,
            Ok(None) => {
                info!("{} 没有找到简历上传控件，继续", ctx);
                return Ok(());
            }
            Err(e) if e.is_session_lost() => return Err(e),
            Err(e) => {
                warn!("{} 查找简历上传控件失败: {}，继续", ctx, e);
                return Ok(());
            }
        };

        match surface.upload_file(&input, path).await {
            Ok(()) => {
                info!("{} 📎 简历已上传", ctx);
                run.transition(WizardState::ResumeAttached);
                surface.pause(Timings::ms(self.timings.after_upload_ms)).await;
                Ok(())
            }
            Err(e) if e.is_session_lost() => Err(e),
            Err(e) => {
                warn!("{} 简历上传失败: {}，继续", ctx, e);
                Ok(())
            }
        }
    }

    /// 关闭提交成功后的确认框（尽力而为）
    async fn dismiss_confirmation<S: PageSurface>(&self, surface: &S, ctx: &ListingCtx) {
        let wait = Timings::ms(self.timings.dismiss_wait_ms);
        if let Err(e) = click_if_present(surface, &self.selectors.dialog_dismiss, wait).await {
            debug!("{} 关闭确认框失败: {}", ctx, e);
        }
    }

    /// 关闭未完成的向导并确认放弃，以便继续处理下一个职位（尽力而为）
    async fn discard_dialog<S: PageSurface>(&self, surface: &S, ctx: &ListingCtx) {
        let wait = Timings::ms(self.timings.dismiss_wait_ms);

        match click_if_present(surface, &self.selectors.dialog_dismiss, wait).await {
            Ok(true) => {
                if let Err(e) = click_if_present(surface, &self.selectors.discard_confirm, wait).await {
                    debug!("{} 确认放弃失败: {}", ctx, e);
                }
                debug!("{} 已关闭未完成的申请向导", ctx);
            }
            Ok(false) => debug!("{} 没有找到向导关闭按钮", ctx),
            Err(e) => debug!("{} 关闭向导失败: {}", ctx, e),
        }
    }
}

async fn click_if_present<S: PageSurface>(
    surface: &S,
    selector: &str,
    wait: Duration,
) -> AutomationResult<bool> {
    match surface.find_optional(selector, wait).await? {
        Some(element) => {
            surface.click(&element).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}
