//! 报告写入服务 - 业务能力层
//!
//! 只负责把会话报告写成 JSON 文件，是否保存由调用方决定

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::SessionReport;

/// 报告写入服务
pub struct ReportWriter {
    report_path: PathBuf,
}

impl ReportWriter {
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            report_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.report_path
    }

    /// 写入报告（覆盖已有文件）
    pub async fn write(&self, report: &SessionReport) -> Result<()> {
        debug!(
            "写入会话报告: {} (共 {} 条记录)",
            self.report_path.display(),
            report.total_applied()
        );

        let json = serde_json::to_string_pretty(report).context("无法序列化会话报告")?;
        tokio::fs::write(&self.report_path, json)
            .await
            .with_context(|| format!("无法写入报告文件: {}", self.report_path.display()))?;

        Ok(())
    }
}
