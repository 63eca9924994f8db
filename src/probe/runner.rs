//! 批量检测执行器
//!
//! 按配置顺序逐个检测链接，汇总为结果集合

use crate::config::Link;
use crate::error::ConfigError;
use crate::probe::checker::LinkProber;
use crate::probe::result::ResultSet;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::info;

/// 检查链接ID是否唯一
fn ensure_unique_ids(links: &[Link]) -> Result<(), ConfigError> {
    let mut seen = HashSet::with_capacity(links.len());
    for link in links {
        if !seen.insert(link.id.as_str()) {
            return Err(ConfigError::DuplicateLinkId {
                id: link.id.clone(),
            });
        }
    }
    Ok(())
}

/// 顺序检测所有链接
///
/// 每个链接的检测完成后才会开始下一个。ID重复时在发出任何请求之前返回错误。
///
/// # 参数
/// * `prober` - 链接检测器
/// * `links` - 链接列表
/// * `timeout_duration` - 每个链接的超时时间
///
/// # 返回
/// * `Result<ResultSet, ConfigError>` - 以链接ID为键的结果集合
pub async fn run_all(
    prober: &dyn LinkProber,
    links: &[Link],
    timeout_duration: Duration,
) -> Result<ResultSet, ConfigError> {
    ensure_unique_ids(links)?;

    let started = Instant::now();
    let mut results = ResultSet::new();
    for link in links {
        let result = prober.probe(link, timeout_duration).await;
        results.insert(link.id.clone(), result);
    }

    let up = results.values().filter(|r| r.is_up()).count();
    info!(
        "检测完成: {}/{} 个链接可用，耗时 {}ms",
        up,
        results.len(),
        started.elapsed().as_millis()
    );

    Ok(results)
}
