//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数。
//!
//! 日志同时写到终端和日志文件，级别由 `RUST_LOG` 或配置中的 `log_level` 决定。

use std::fs::{self, OpenOptions};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ApplicationRecord, Quota, SessionReport};

/// 初始化全局日志
///
/// # 参数
/// - `level`: `RUST_LOG` 未设置时使用的过滤级别
/// - `log_file_path`: 日志文件路径（会先写入带日期的标题）
pub fn init(level: &str, log_file_path: &str) -> AppResult<()> {
    init_log_file(log_file_path)?;

    let file = OpenOptions::new().append(true).open(log_file_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// # 返回
/// 返回是否成功初始化
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n职位自动申请日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 职位自动申请");
    info!(
        "🔍 搜索: {} @ {}",
        config.search.keywords, config.search.location
    );
    info!("📊 最多申请: {} 个职位", config.limits.max_applications);
    info!("📄 最多翻页: {} 页", config.limits.max_pages);
    info!("{}", "=".repeat(60));
}

/// 记录搜索结果页开始
///
/// # 参数
/// - `page_number`: 页码（从 0 开始）
/// - `quota`: 当前配额
pub fn log_page_start(page_number: usize, quota: &Quota) {
    info!("\n{}", "=".repeat(60));
    info!("📄 开始处理第 {} 页", page_number + 1);
    info!("📊 已申请: {}/{}", quota.applied(), quota.max());
    info!("{}", "=".repeat(60));
}

/// 记录搜索结果页完成
pub fn log_page_complete(page_number: usize, quota: &Quota) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 第 {} 页完成: 已申请 {}/{}",
        page_number + 1,
        quota.applied(),
        quota.max()
    );
    info!("{}", "─".repeat(60));
}

/// 记录单次申请成功
pub fn log_application_success(number: usize, record: &ApplicationRecord) {
    info!("✅ 第 {} 个申请成功: {}", number, record);
}

/// 打印最终汇总
///
/// # 参数
/// - `report`: 会话报告
/// - `log_file_path`: 日志文件路径
pub fn print_final_summary(report: &SessionReport, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 申请汇总");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));

    for (idx, record) in report.records().iter().enumerate() {
        info!("{}. {}", idx + 1, record.title);
        info!("   公司: {}", record.company);
        info!("   地点: {}", record.location);
        info!("   时间: {}", record.timestamp());
    }

    info!("{}", "─".repeat(60));
    info!("✅ 共申请: {} 个职位", report.total_applied());
    info!("⏭️ 跳过: {}", report.abandoned);
    info!("❌ 失败: {}", report.failed);
    if let Some(termination) = &report.termination {
        info!("🏁 结束原因: {}", termination);
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Continue to next step", 8), "Continue...");
        assert_eq!(truncate_text("提交申请", 10), "提交申请");
    }

    #[test]
    fn test_init_log_file_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apply.log");
        let path = path.to_str().unwrap();

        init_log_file(path).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("职位自动申请日志"));
    }

    #[test]
    fn test_init_log_file_in_missing_directory_fails() {
        assert!(init_log_file("no/such/dir/apply.log").is_err());
    }
}
