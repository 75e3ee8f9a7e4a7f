//! # Auto Apply
//!
//! 一个用于自动申请 LinkedIn "快速申请"职位的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageSurface` - 页面操作抽象（查找、点击、输入、上传、读文本）
//! - `ChromiumSurface` - 基于 chromiumoxide 的实现
//! - `ControlClassifier` - 根据按钮文字判断申请路径和下一步动作
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `ListingScanner` - 列出当前结果页的职位
//! - `LoginService` - 登录
//! - `Notifier` - 投递成功通知
//! - `ReportWriter` - 保存会话报告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个职位"的完整申请流程
//! - `ListingCtx` - 上下文封装（页码 + 位置）
//! - `WizardStepExecutor` - 申请向导状态机（打开 → 上传简历 → 下一步 → 提交）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/application_loop` - 翻页、配额、通知
//! - `orchestrator/session` - 登录 + 投递循环
//! - `orchestrator/app` - 浏览器资源和最终汇总
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{open_session, BrowserSession};
pub use config::{Config, Credentials};
pub use error::{AppError, AppResult, AutomationError, AutomationResult};
pub use infrastructure::{ChromiumSurface, PageSurface};
pub use models::{ApplicationRecord, SearchFilters, SearchQuery, SessionReport, Termination};
pub use orchestrator::{App, ApplicationLoop, SearchSession};
pub use workflow::{ListingCtx, WizardOutcome, WizardState, WizardStepExecutor};
