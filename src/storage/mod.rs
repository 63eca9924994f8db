//! 结果持久化模块

pub mod snapshot;

pub use snapshot::{load_results, save_results, DEFAULT_SNAPSHOT_PATH};
