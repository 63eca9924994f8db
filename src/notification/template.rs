//! 消息模板模块
//!
//! 将一轮检测结果渲染为webhook消息

use crate::config::NotificationConfig;
use crate::error::NotificationError;
use crate::notification::webhook::WebhookMessage;
use crate::probe::{PingResult, ResultSet};
use chrono::{DateTime, FixedOffset, Utc};
use handlebars::Handlebars;
use serde::Serialize;

/// 全部可用时的embed颜色
pub const COLOR_ALL_UP: u32 = 0x2ECC71;
/// 存在不可用链接时的embed颜色
pub const COLOR_SOME_DOWN: u32 = 0xE74C3C;

const FIELD_TEMPLATE_NAME: &str = "field";

/// 默认的字段模板
pub fn default_field_template() -> String {
    "📜 Status: {{status}}\n\
     📡 Response Time: {{response_time_ms}} ms\n\
     🔊 Status Code: {{status_code}}\n\
     🕛 Time: {{time}}\n\
     📋Description: {{description}}\n\
     📎 URL: {{url}}"
        .to_string()
}

/// 模板上下文数据
#[derive(Debug, Clone, Serialize)]
pub struct FieldContext<'a> {
    pub link_id: &'a str,
    pub status: &'static str,
    pub is_up: bool,
    pub response_time_ms: u64,
    pub status_code: u16,
    pub time: String,
    pub description: &'a str,
    pub url: &'a str,
}

impl<'a> FieldContext<'a> {
    /// 从检测结果构建上下文
    pub fn from_result(result: &'a PingResult, offset: FixedOffset) -> Self {
        Self {
            link_id: result.link_id(),
            status: if result.is_up() { "**Alive**" } else { "**Dead**" },
            is_up: result.is_up(),
            response_time_ms: result.response_time_ms(),
            status_code: result.status_code(),
            time: format_local_time(result.timestamp(), offset),
            description: result.description(),
            url: result.url(),
        }
    }
}

/// 按固定时区偏移格式化时间，格式为 `YYYY-MM-DD HH:MM:SS`
pub fn format_local_time(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// 字段值模板（handlebars语法）
pub struct FieldTemplate {
    registry: Handlebars<'static>,
}

impl FieldTemplate {
    /// 编译模板
    ///
    /// # 参数
    /// * `template` - 模板字符串
    ///
    /// # 返回
    /// * `Result<Self, NotificationError>` - 模板语法错误时返回 `Template`
    pub fn new(template: &str) -> Result<Self, NotificationError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        // 消息是markdown，不需要HTML转义
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(FIELD_TEMPLATE_NAME, template)
            .map_err(|e| NotificationError::Template(e.to_string()))?;

        Ok(Self { registry })
    }

    /// 渲染单个检测结果
    pub fn render(&self, context: &FieldContext<'_>) -> Result<String, NotificationError> {
        self.registry
            .render(FIELD_TEMPLATE_NAME, context)
            .map_err(|e| NotificationError::Template(e.to_string()))
    }
}

/// 将检测结果构建为webhook消息
///
/// 每个链接对应一个字段，字段名为 `Service {id}`。
///
/// # 参数
/// * `results` - 结果集合
/// * `config` - 通知配置
pub fn build_summary(
    results: &ResultSet,
    config: &NotificationConfig,
) -> Result<WebhookMessage, NotificationError> {
    let template = match &config.field_template {
        Some(custom) => FieldTemplate::new(custom)?,
        None => FieldTemplate::new(&default_field_template())?,
    };

    let offset = FixedOffset::east_opt(config.utc_offset_hours * 3_600).ok_or_else(|| {
        NotificationError::Template(format!("无效的UTC偏移: {}", config.utc_offset_hours))
    })?;

    let up = results.values().filter(|r| r.is_up()).count();
    let color = config.color.unwrap_or(if up == results.len() {
        COLOR_ALL_UP
    } else {
        COLOR_SOME_DOWN
    });

    let mut message = WebhookMessage::new()
        .with_title(config.title.clone())
        .with_description(format!("{}/{} services alive", up, results.len()))
        .with_color(color);

    if let Some(username) = &config.username {
        message = message.with_username(username.clone());
    }
    if let Some(avatar_url) = &config.avatar_url {
        message = message.with_avatar_url(avatar_url.clone());
    }
    if let Some(content) = &config.content {
        message = message.with_content(content.clone());
    }

    for (id, result) in results {
        let value = template.render(&FieldContext::from_result(result, offset))?;
        message = message.add_field(format!("Service {}", id), value, false);
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Link;
    use crate::probe::ProbeOutcome;
    use std::time::Duration;

    fn result_at(id: &str, outcome: ProbeOutcome, millis: u64) -> PingResult {
        // 2023-11-14 22:13:20 UTC
        let timestamp = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let url = format!("https://{}.example", id);
        let link = Link::new(id, url, format!("{} service", id));
        PingResult::from_outcome_at(&link, outcome, Duration::from_millis(millis), timestamp)
    }

    fn sample_results() -> ResultSet {
        let mut results = ResultSet::new();
        results.insert(
            "a".to_string(),
            result_at("a", ProbeOutcome::Responded { status_code: 200 }, 50),
        );
        results.insert(
            "b".to_string(),
            result_at("b", ProbeOutcome::Responded { status_code: 503 }, 80),
        );
        results
    }

    #[test]
    fn test_format_local_time_utc_plus_7() {
        let timestamp = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let offset = FixedOffset::east_opt(7 * 3_600).unwrap();

        assert_eq!(format_local_time(timestamp, offset), "2023-11-15 05:13:20");
    }

    #[test]
    fn test_default_field_value() {
        let result = result_at("a", ProbeOutcome::Responded { status_code: 200 }, 50);
        let offset = FixedOffset::east_opt(7 * 3_600).unwrap();
        let value = FieldTemplate::new(&default_field_template())
            .unwrap()
            .render(&FieldContext::from_result(&result, offset))
            .unwrap();

        assert_eq!(
            value,
            "📜 Status: **Alive**\n\
             📡 Response Time: 50 ms\n\
             🔊 Status Code: 200\n\
             🕛 Time: 2023-11-15 05:13:20\n\
             📋Description: a service\n\
             📎 URL: https://a.example"
        );
    }

    #[test]
    fn test_dead_status_label() {
        let result = result_at("b", ProbeOutcome::TimedOut, 2_000);
        let offset = FixedOffset::east_opt(0).unwrap();
        let value = FieldTemplate::new(&default_field_template())
            .unwrap()
            .render(&FieldContext::from_result(&result, offset))
            .unwrap();

        assert!(value.starts_with("📜 Status: **Dead**\n"));
        assert!(value.contains("🔊 Status Code: 400"));
        assert!(value.contains("🕛 Time: 2023-11-14 22:13:20"));
    }

    #[test]
    fn test_build_summary_one_field_per_link() {
        let message = build_summary(&sample_results(), &NotificationConfig::default()).unwrap();
        let embed = message.embed();

        assert_eq!(embed.title.as_deref(), Some("Uptime Monitoring Results"));
        assert_eq!(embed.description.as_deref(), Some("1/2 services alive"));
        assert_eq!(embed.color, Some(COLOR_SOME_DOWN));

        let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Service a", "Service b"]);
        assert!(embed.fields.iter().all(|f| !f.inline));
        assert!(embed.fields[1].value.contains("**Dead**"));
        assert!(embed.fields[1].value.contains("Status Code: 503"));
    }

    #[test]
    fn test_build_summary_fields_follow_result_order() {
        let mut results = ResultSet::new();
        for id in ["1", "2", "10", "11"] {
            results.insert(
                id.to_string(),
                result_at(id, ProbeOutcome::Responded { status_code: 200 }, 10),
            );
        }

        let message = build_summary(&results, &NotificationConfig::default()).unwrap();
        let names: Vec<&str> = message
            .embed()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();

        assert_eq!(names, vec!["Service 1", "Service 2", "Service 10", "Service 11"]);
    }

    #[test]
    fn test_build_summary_all_up_is_green() {
        let mut results = sample_results();
        results.shift_remove("b");

        let message = build_summary(&results, &NotificationConfig::default()).unwrap();
        assert_eq!(message.embed().color, Some(COLOR_ALL_UP));
    }

    #[test]
    fn test_build_summary_uses_config() {
        let config = NotificationConfig {
            username: Some("uptime-bot".to_string()),
            avatar_url: Some("https://cdn.example/bot.png".to_string()),
            content: Some("daily check".to_string()),
            title: "Status".to_string(),
            color: Some(0x123456),
            utc_offset_hours: 0,
            field_template: Some("{{link_id}} {{status_code}} <{{url}}>".to_string()),
        };

        let message = build_summary(&sample_results(), &config).unwrap();

        assert_eq!(message.username(), Some("uptime-bot"));
        assert_eq!(message.avatar_url(), Some("https://cdn.example/bot.png"));
        assert_eq!(message.content(), Some("daily check"));
        assert_eq!(message.embed().title.as_deref(), Some("Status"));
        assert_eq!(message.embed().color, Some(0x123456));
        assert_eq!(message.embed().fields[0].value, "a 200 <https://a.example>");
    }

    #[test]
    fn test_invalid_custom_template() {
        let config = NotificationConfig {
            field_template: Some("{{#if status}}unclosed".to_string()),
            ..NotificationConfig::default()
        };

        let result = build_summary(&sample_results(), &config);
        assert!(matches!(result, Err(NotificationError::Template(_))));
    }

    #[test]
    fn test_unknown_variable_in_custom_template() {
        let config = NotificationConfig {
            field_template: Some("{{no_such_field}}".to_string()),
            ..NotificationConfig::default()
        };

        let result = build_summary(&sample_results(), &config);
        assert!(matches!(result, Err(NotificationError::Template(_))));
    }
}
