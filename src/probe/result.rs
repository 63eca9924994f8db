//! 检测结果数据结构
//!
//! 定义单次检测的结果类型和整轮检测的结果集合

use crate::config::Link;
use chrono::{DateTime, SubsecRound, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 超时在 `statusCode` 字段中的兼容取值
pub const TIMEOUT_STATUS_CODE: u16 = 400;
/// 传输层错误在 `statusCode` 字段中的兼容取值
pub const TRANSPORT_ERROR_STATUS_CODE: u16 = 500;

/// 一轮检测的结果集合，以链接ID为键，保持配置中的链接顺序
pub type ResultSet = IndexMap<String, PingResult>;

/// 单次检测的结局
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// 收到了HTTP响应
    Responded { status_code: u16 },
    /// 请求超时
    TimedOut,
    /// DNS、连接、TLS等传输层错误
    TransportError { message: String },
}

impl ProbeOutcome {
    /// 对外展示的状态码，非HTTP结局使用兼容取值
    pub fn status_code(&self) -> u16 {
        match self {
            ProbeOutcome::Responded { status_code } => *status_code,
            ProbeOutcome::TimedOut => TIMEOUT_STATUS_CODE,
            ProbeOutcome::TransportError { .. } => TRANSPORT_ERROR_STATUS_CODE,
        }
    }

    /// 判断目标是否可用
    ///
    /// 只有收到响应才可能可用，5xx 一律视为不可用
    pub fn is_up(&self) -> bool {
        match self {
            ProbeOutcome::Responded { status_code } => !(500..600).contains(status_code),
            ProbeOutcome::TimedOut | ProbeOutcome::TransportError { .. } => false,
        }
    }
}

/// 单个链接的检测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingResult {
    id: String,
    is_up: bool,
    #[serde(rename = "responseTime_ms")]
    response_time_ms: u64,
    status_code: u16,
    outcome: ProbeOutcome,
    #[serde(rename = "time", with = "epoch_seconds")]
    timestamp: DateTime<Utc>,
    description: String,
    url: String,
}

impl PingResult {
    /// 根据检测结局创建结果，时间戳取当前时间
    ///
    /// # 参数
    /// * `link` - 被检测的链接
    /// * `outcome` - 检测结局
    /// * `elapsed` - 从发起请求到完成或失败的耗时
    pub fn from_outcome(link: &Link, outcome: ProbeOutcome, elapsed: Duration) -> Self {
        Self::from_outcome_at(link, outcome, elapsed, Utc::now())
    }

    /// 使用指定时间戳创建结果
    pub fn from_outcome_at(
        link: &Link,
        outcome: ProbeOutcome,
        elapsed: Duration,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: link.id.clone(),
            is_up: outcome.is_up(),
            response_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            status_code: outcome.status_code(),
            outcome,
            // 快照只保留微秒精度
            timestamp: timestamp.trunc_subsecs(6),
            description: link.description.clone(),
            url: link.url.clone(),
        }
    }

    pub fn link_id(&self) -> &str {
        &self.id
    }

    pub fn is_up(&self) -> bool {
        self.is_up
    }

    pub fn response_time_ms(&self) -> u64 {
        self.response_time_ms
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn outcome(&self) -> &ProbeOutcome {
        &self.outcome
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// 以浮点秒数序列化时间戳
mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (timestamp.timestamp_micros() as f64 / 1_000_000.0).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = f64::deserialize(deserializer)?;
        let micros = (seconds * 1_000_000.0).round() as i64;
        DateTime::from_timestamp_micros(micros)
            .ok_or_else(|| de::Error::custom(format!("时间戳超出范围: {}", seconds)))
    }
}
