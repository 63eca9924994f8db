//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::logging::LogConfig;
use crate::storage::DEFAULT_SNAPSHOT_PATH;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// uptime-ping - 一次性链接可用性检测
#[derive(Parser, Debug, Clone)]
#[command(
    name = "uptime-ping",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 接收检测报告的webhook地址
    #[arg(value_name = "WEBHOOK_URL")]
    pub webhook_url: String,

    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_PATH,
        env = "UPTIME_PING_CONFIG"
    )]
    pub config: PathBuf,

    /// 快照文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = DEFAULT_SNAPSHOT_PATH,
        env = "UPTIME_PING_OUTPUT"
    )]
    pub output: PathBuf,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        env = "UPTIME_PING_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 以JSON格式输出日志
    #[arg(long)]
    pub json_logs: bool,

    /// 日志写入文件而不是控制台
    #[arg(long, value_name = "FILE", env = "UPTIME_PING_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// 只检测并保存快照，不发送webhook
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    /// 根据命令行参数生成日志配置
    ///
    /// HTTP相关依赖库的日志默认压到warn级别。
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone().into(),
            file_path: self.log_file.clone(),
            console: self.log_file.is_none(),
            json_format: self.json_logs,
            ..LogConfig::default()
        }
        .with_quiet_dependencies()
    }
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}
