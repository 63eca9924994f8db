//! Uptime Ping 主程序入口
//!
//! 用法: uptime-ping [OPTIONS] <WEBHOOK_URL>

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::{error, info};
use uptime_ping::cli::Args;
use uptime_ping::logging::LoggingSystem;
use uptime_ping::MonitorApp;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // 参数数量不对时统一以1退出
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let _logging_system =
        LoggingSystem::setup_logging(&args.log_config()).context("初始化日志系统失败")?;

    info!(
        "{} v{} 启动，日志级别: {}",
        uptime_ping::APP_NAME,
        uptime_ping::VERSION,
        args.log_level
    );

    if let Err(e) = run(&args).await {
        error!("检测运行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 加载配置并执行一轮检测
async fn run(args: &Args) -> Result<()> {
    let app = MonitorApp::from_args(args)
        .await
        .with_context(|| format!("无法初始化检测任务，配置文件: {}", args.config.display()))?;

    let results = app.run_once().await?;
    let alive = results.values().filter(|r| r.is_up()).count();

    info!(
        "检测完成: {}/{} 可用，快照已写入 {}",
        alive,
        results.len(),
        args.output.display()
    );
    Ok(())
}
