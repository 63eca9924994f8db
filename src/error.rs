//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use std::path::PathBuf;
use thiserror::Error;

/// uptime-ping 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum UptimeError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 快照持久化错误
    #[error("持久化错误: {0}")]
    Persist(#[from] PersistError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotificationError),

    /// 创建检测用HTTP客户端失败
    #[error("创建HTTP客户端失败: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },

    /// 时间间隔字符串格式错误
    #[error("无效的时间间隔 '{input}': {reason}")]
    InvalidFormat { input: String, reason: String },

    /// 链接ID重复
    #[error("链接ID重复: {id}")]
    DuplicateLinkId { id: String },
}

/// 快照持久化错误类型
#[derive(Error, Debug)]
pub enum PersistError {
    /// 序列化失败
    #[error("序列化检测结果失败: {0}")]
    Serialize(#[source] serde_json::Error),

    /// 写入文件失败
    #[error("写入快照文件失败: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 读取文件失败
    #[error("读取快照文件失败: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 反序列化失败
    #[error("解析快照文件失败: {path}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 创建HTTP客户端失败
    #[error("创建HTTP客户端失败: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// 请求发送失败（连接、超时等）
    #[error("webhook请求失败: {0}")]
    Request(#[from] reqwest::Error),

    /// webhook返回非2xx状态码
    #[error("webhook返回错误状态 {status}: {body}")]
    Status { status: u16, body: String },

    /// 模板渲染错误
    #[error("模板渲染失败: {0}")]
    Template(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, UptimeError>;
