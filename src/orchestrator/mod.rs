//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责翻页、配额和资源调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行、清理）
//! - 持有浏览器会话（BrowserSession）和页面（ChromiumSurface）
//! - 输出最终汇总，保存报告
//!
//! ### `session` - 搜索会话
//! - 登录
//! - 用关键词/地点/筛选条件启动投递循环
//!
//! ### `application_loop` - 投递循环
//! - 翻页、扫描职位
//! - 调用申请向导，维护配额
//! - 发送通知，汇总 SessionReport
//!
//! ## 层次关系
//!
//! ```text
//! app (资源 + 收尾)
//!     ↓
//! session (登录 + 查询条件)
//!     ↓
//! application_loop (Vec<页> → Vec<职位>)
//!     ↓
//! workflow::WizardStepExecutor (处理单个职位)
//!     ↓
//! services (能力层：scanner / login / notifier / report)
//!     ↓
//! infrastructure (基础设施：PageSurface)
//! ```

pub mod app;
pub mod application_loop;
pub mod session;

// 重新导出主要类型
pub use app::App;
pub use application_loop::ApplicationLoop;
pub use session::SearchSession;
