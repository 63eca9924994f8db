//! 配置管理模块
//!
//! 提供配置文件解析、时间间隔解析和验证功能

pub mod duration;
pub mod loader;
pub mod types;

// 重新导出主要类型
pub use duration::{parse_duration, parse_timeout};
pub use loader::{ConfigFormat, ConfigLoader, FileConfigLoader};
pub use types::{validate_config, Config, Link, NotificationConfig};
