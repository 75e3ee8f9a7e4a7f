use anyhow::Result;
use tracing::{info, warn};

use auto_apply::models::Termination;
use auto_apply::utils::logging;
use auto_apply::{App, AppError, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.log_level(), &config.files.output_log_file)?;

    // 初始化应用
    let app = App::initialize(config).await?;

    // Ctrl+C 时在下一个职位边界停止
    let cancel = app.cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⏹️ 收到中断信号，完成当前职位后停止...");
            cancel.cancel();
        }
    });

    let report = app.run().await?;

    if let Some(Termination::SessionLost { detail }) = &report.termination {
        return Err(AppError::SessionLost(detail.clone()).into());
    }

    info!("✓ 程序结束，共申请 {} 个职位", report.total_applied());
    Ok(())
}
