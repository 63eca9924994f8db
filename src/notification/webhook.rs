//! Webhook通知模块
//!
//! 构建带embed的聊天消息，并通过webhook一次性发送

use crate::error::NotificationError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// embed中的单个字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// 消息中的结构化部分
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

/// 完整的webhook消息
///
/// 通过 `with_*` 和 `add_field` 逐步构建，构建完成后交给发送器发送。
/// 未设置的 `username`、`avatar_url`、`content` 序列化为 `null`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookMessage {
    username: Option<String>,
    avatar_url: Option<String>,
    content: Option<String>,
    embeds: Vec<Embed>,
}

impl WebhookMessage {
    /// 创建只包含一个空embed的消息
    pub fn new() -> Self {
        Self {
            username: None,
            avatar_url: None,
            content: None,
            embeds: vec![Embed::default()],
        }
    }

    /// 设置显示名称
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// 设置头像URL
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// 设置纯文本内容
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// 设置embed标题
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.embed_mut().title = Some(title.into());
        self
    }

    /// 设置embed描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.embed_mut().description = Some(description.into());
        self
    }

    /// 设置embed颜色
    pub fn with_color(mut self, color: u32) -> Self {
        self.embed_mut().color = Some(color);
        self
    }

    /// 追加一个字段，字段顺序即调用顺序
    pub fn add_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.embed_mut().fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// 消息中的embed
    pub fn embed(&self) -> &Embed {
        &self.embeds[0]
    }

    fn embed_mut(&mut self) -> &mut Embed {
        &mut self.embeds[0]
    }
}

impl Default for WebhookMessage {
    fn default() -> Self {
        Self::new()
    }
}

/// 通知发送器trait
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 发送消息
    ///
    /// # 参数
    /// * `message` - 构建好的消息
    async fn send_message(&self, message: &WebhookMessage) -> Result<(), NotificationError>;
}

/// Webhook通知发送器
pub struct WebhookSender {
    /// HTTP客户端
    client: Client,
    /// webhook地址
    webhook_url: String,
}

impl WebhookSender {
    /// 创建新的webhook发送器
    ///
    /// # 参数
    /// * `webhook_url` - webhook地址
    /// * `timeout` - 请求超时时间
    pub fn new(
        webhook_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(NotificationError::ClientBuild)?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }
}

#[async_trait]
impl NotificationSender for WebhookSender {
    async fn send_message(&self, message: &WebhookMessage) -> Result<(), NotificationError> {
        debug!("发送消息到webhook: {}", self.webhook_url);

        let response = self
            .client
            .post(&self.webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("webhook消息发送成功");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            error!("webhook消息发送失败: {} - {}", status, body);
            Err(NotificationError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// 空的通知发送器实现（用于演练模式）
pub struct NoOpSender;

#[async_trait]
impl NotificationSender for NoOpSender {
    async fn send_message(&self, message: &WebhookMessage) -> Result<(), NotificationError> {
        info!(
            "演练模式，跳过webhook发送（{} 个字段）",
            message.embed().fields.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn sample_message() -> WebhookMessage {
        WebhookMessage::new()
            .with_username("uptime-bot")
            .with_title("Uptime Monitoring Results")
            .add_field("Service a", "alive", false)
            .add_field("Service b", "dead", true)
    }

    #[test]
    fn test_fields_keep_call_order() {
        let message = sample_message().add_field("Service c", "alive", false);
        let names: Vec<&str> = message
            .embed()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();

        assert_eq!(names, vec!["Service a", "Service b", "Service c"]);
        assert!(message.embed().fields[1].inline);
        assert!(!message.embed().fields[0].inline);
    }

    #[test]
    fn test_payload_shape() {
        let payload = serde_json::to_value(sample_message().with_color(0x2ECC71)).unwrap();

        assert_eq!(
            payload,
            json!({
                "username": "uptime-bot",
                "avatar_url": null,
                "content": null,
                "embeds": [{
                    "title": "Uptime Monitoring Results",
                    "color": 0x2ECC71,
                    "fields": [
                        {"name": "Service a", "value": "alive", "inline": false},
                        {"name": "Service b", "value": "dead", "inline": true}
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_empty_message_has_one_embed() {
        let payload = serde_json::to_value(WebhookMessage::new()).unwrap();

        assert_eq!(payload["embeds"], json!([{}]));
        assert!(payload["username"].is_null());
    }

    #[test]
    fn test_optional_fields() {
        let message = WebhookMessage::new()
            .with_avatar_url("https://cdn.example/avatar.png")
            .with_content("hello")
            .with_description("2/3 services alive");

        assert_eq!(message.avatar_url(), Some("https://cdn.example/avatar.png"));
        assert_eq!(message.content(), Some("hello"));
        assert_eq!(
            message.embed().description.as_deref(),
            Some("2/3 services alive")
        );
        assert!(message.username().is_none());
    }

    #[tokio::test]
    async fn test_send_posts_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/webhook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "username": "uptime-bot",
                "embeds": [{"title": "Uptime Monitoring Results"}]
            })))
            .with_status(204)
            .create_async()
            .await;

        let webhook_url = format!("{}/webhook", server.url());
        let sender = WebhookSender::new(webhook_url, Duration::from_secs(2)).unwrap();
        sender.send_message(&sample_message()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_non_2xx_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/webhook")
            .with_status(400)
            .with_body("invalid form body")
            .create_async()
            .await;

        let webhook_url = format!("{}/webhook", server.url());
        let sender = WebhookSender::new(webhook_url, Duration::from_secs(2)).unwrap();
        let result = sender.send_message(&sample_message()).await;

        match result {
            Err(NotificationError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "invalid form body");
            }
            other => panic!("期望状态码错误，实际: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_unreachable_is_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let webhook_url = format!("http://{}/webhook", addr);
        let sender = WebhookSender::new(webhook_url, Duration::from_secs(1)).unwrap();
        let result = sender.send_message(&sample_message()).await;

        assert!(matches!(result, Err(NotificationError::Request(_))));
    }

    #[tokio::test]
    async fn test_noop_sender() {
        assert!(NoOpSender.send_message(&sample_message()).await.is_ok());
    }
}
