//! 配置数据结构定义
//!
//! 定义监控配置、链接和通知配置，以及验证逻辑

use crate::config::duration::parse_timeout;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 单次检测超时，例如 "2s"
    pub timeout: String,
    /// 需要检测的链接列表
    pub links: Vec<Link>,
    /// 通知配置
    #[serde(default)]
    pub notification: NotificationConfig,
}

impl Config {
    /// 解析后的超时时间
    pub fn timeout_duration(&self) -> Result<Duration, crate::error::ConfigError> {
        parse_timeout(&self.timeout)
    }
}

/// 监控目标
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// 链接标识，配置内唯一
    #[serde(deserialize_with = "deserialize_link_id")]
    pub id: String,
    /// 检测地址
    pub url: String,
    /// 描述
    #[serde(default)]
    pub description: String,
}

impl Link {
    /// 创建新的链接
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            description: description.into(),
        }
    }
}

/// 旧版配置中ID可能是整数，这里统一转换为字符串
fn deserialize_link_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// 通知配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationConfig {
    /// 机器人显示名称
    pub username: Option<String>,
    /// 机器人头像URL
    pub avatar_url: Option<String>,
    /// 纯文本消息内容
    pub content: Option<String>,
    /// 消息标题
    #[serde(default = "default_title")]
    pub title: String,
    /// 固定的embed颜色，未设置时按检测结果选择
    pub color: Option<u32>,
    /// 时间显示使用的UTC偏移（小时）
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// 自定义字段模板（handlebars语法）
    pub field_template: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            username: None,
            avatar_url: None,
            content: None,
            title: default_title(),
            color: None,
            utc_offset_hours: default_utc_offset_hours(),
            field_template: None,
        }
    }
}

// 默认值函数
fn default_title() -> String {
    "Uptime Monitoring Results".to_string()
}
fn default_utc_offset_hours() -> i32 {
    7
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    let timeout = config.timeout_duration().map_err(|e| e.to_string())?;
    if timeout.is_zero() {
        return Err("超时时间不能为0".to_string());
    }

    let mut seen = HashSet::new();
    for link in &config.links {
        if link.id.trim().is_empty() {
            return Err("链接ID不能为空".to_string());
        }

        if !seen.insert(link.id.as_str()) {
            return Err(format!("链接ID重复: {}", link.id));
        }

        if !link.url.starts_with("http://") && !link.url.starts_with("https://") {
            return Err(format!("链接 {} 的URL格式无效", link.id));
        }
    }

    if !(-23..=23).contains(&config.notification.utc_offset_hours) {
        return Err(format!(
            "无效的UTC偏移: {}，范围为 -23 到 23",
            config.notification.utc_offset_hours
        ));
    }

    Ok(())
}
