//! 时间间隔解析
//!
//! 将 "30s"、"5m" 这类字符串转换为秒数

use crate::error::ConfigError;
use std::time::Duration;

/// 将单位字符映射为秒数倍率
fn unit_factor(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3_600),
        'd' => Some(86_400),
        _ => None,
    }
}

fn invalid(input: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidFormat {
        input: input.to_string(),
        reason: reason.into(),
    }
}

/// 解析时间间隔字符串
///
/// 格式为 `<非负整数><单位>`，单位支持 `s`、`m`、`h`、`d`。
///
/// # 参数
/// * `input` - 时间间隔字符串，例如 `"30s"`
///
/// # 返回
/// * `Result<u64, ConfigError>` - 秒数，格式错误时返回 `InvalidFormat`
pub fn parse_duration(input: &str) -> Result<u64, ConfigError> {
    let unit = input
        .chars()
        .last()
        .ok_or_else(|| invalid(input, "字符串为空"))?;

    let factor =
        unit_factor(unit).ok_or_else(|| invalid(input, format!("不支持的单位 '{}'", unit)))?;

    let literal = &input[..input.len() - unit.len_utf8()];
    if literal.is_empty() || !literal.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(input, format!("'{}' 不是有效的整数", literal)));
    }

    let value: u64 = literal
        .parse()
        .map_err(|e| invalid(input, format!("整数解析失败: {}", e)))?;

    value
        .checked_mul(factor)
        .ok_or_else(|| invalid(input, "数值溢出"))
}

/// 解析时间间隔字符串并转换为 [`Duration`]
pub fn parse_timeout(input: &str) -> Result<Duration, ConfigError> {
    parse_duration(input).map(Duration::from_secs)
}
