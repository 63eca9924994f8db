//! 通知模块
//!
//! 提供webhook消息构建、消息模板和发送功能

pub mod template;
pub mod webhook;

// 重新导出主要类型
pub use template::{build_summary, FieldTemplate};
pub use webhook::{Embed, EmbedField, NoOpSender, NotificationSender, WebhookMessage, WebhookSender};
