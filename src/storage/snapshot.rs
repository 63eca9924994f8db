//! 检测结果快照
//!
//! 将整轮检测结果写入JSON文件，每次运行完整覆盖上一次的快照

use crate::error::PersistError;
use crate::probe::ResultSet;
use std::path::Path;
use tracing::{debug, info};

/// 默认快照文件名
pub const DEFAULT_SNAPSHOT_PATH: &str = "pingdata.json";

/// 保存检测结果
///
/// 覆盖 `path` 处已有的文件，父目录不存在时自动创建。
///
/// # 参数
/// * `results` - 结果集合
/// * `path` - 快照文件路径
pub async fn save_results(results: &ResultSet, path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(results).map_err(PersistError::Serialize)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PersistError::Write {
                path: path.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::write(path, json)
        .await
        .map_err(|source| PersistError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!("检测结果已保存到 {}（{} 条）", path.display(), results.len());
    Ok(())
}

/// 读取快照文件
pub async fn load_results(path: &Path) -> Result<ResultSet, PersistError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PersistError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let results: ResultSet =
        serde_json::from_str(&content).map_err(|source| PersistError::Deserialize {
            path: path.to_path_buf(),
            source,
        })?;

    debug!("从 {} 读取了 {} 条检测结果", path.display(), results.len());
    Ok(results)
}
