//! 链接检测模块
//!
//! 提供HTTP链接检测、结果模型和批量执行功能

pub mod checker;
pub mod result;
pub mod runner;

// 重新导出主要类型
pub use checker::{HttpLinkProber, LinkProber};
pub use result::{PingResult, ProbeOutcome, ResultSet};
pub use runner::run_all;
