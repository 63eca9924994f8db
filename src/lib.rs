//! Uptime Ping - 一次性链接可用性检测工具
//!
//! 读取链接列表并逐个检测，支持：
//! - HTTP/HTTPS可用性检测（带超时）
//! - 检测结果JSON快照
//! - Discord风格webhook报告
//! - JSON/TOML配置与环境变量替换
//! - 结构化日志记录

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notification;
pub mod probe;
pub mod storage;

// 重新导出主要类型
pub use app::MonitorApp;
pub use config::{parse_duration, Config, Link};
pub use error::UptimeError;
pub use probe::{PingResult, ProbeOutcome, ResultSet};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
