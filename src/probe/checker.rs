//! HTTP链接检测器实现
//!
//! 对单个链接发起一次限时GET请求，并将结局归类为检测结果

use crate::config::Link;
use crate::error::{Result, UptimeError};
use crate::probe::result::{PingResult, ProbeOutcome};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// 链接检测器trait，定义检测接口
#[async_trait]
pub trait LinkProber: Send + Sync {
    /// 对链接执行一次检测
    ///
    /// 检测失败不会返回错误，而是记录为不可用的结果。
    ///
    /// # 参数
    /// * `link` - 被检测的链接
    /// * `timeout_duration` - 本次检测的超时时间
    async fn probe(&self, link: &Link, timeout_duration: Duration) -> PingResult;
}

/// 请求内部的失败分类
enum RequestFailure {
    Timeout,
    Transport(String),
}

/// HTTP链接检测器实现
pub struct HttpLinkProber {
    /// HTTP客户端
    client: Client,
}

impl HttpLinkProber {
    /// 创建新的HTTP链接检测器
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(UptimeError::HttpClient)?;

        Ok(Self { client })
    }

    /// 发送请求并读完响应体
    async fn fetch(
        &self,
        url: &str,
        timeout_duration: Duration,
    ) -> std::result::Result<StatusCode, RequestFailure> {
        let request = async {
            let response = self
                .client
                .get(url)
                .timeout(timeout_duration)
                .send()
                .await?;
            let status = response.status();
            response.bytes().await?;
            Ok::<_, reqwest::Error>(status)
        };

        match timeout(timeout_duration, request).await {
            Ok(Ok(status)) => Ok(status),
            Ok(Err(e)) if e.is_timeout() => Err(RequestFailure::Timeout),
            Ok(Err(e)) => Err(RequestFailure::Transport(format_request_error(&e))),
            Err(_) => Err(RequestFailure::Timeout),
        }
    }
}

#[async_trait]
impl LinkProber for HttpLinkProber {
    async fn probe(&self, link: &Link, timeout_duration: Duration) -> PingResult {
        debug!("开始检测链接 {}: {}", link.id, link.url);

        let start_time = Instant::now();
        let fetched = self.fetch(&link.url, timeout_duration).await;
        let response_time = start_time.elapsed();

        let outcome = match fetched {
            Ok(status) => ProbeOutcome::Responded {
                status_code: status.as_u16(),
            },
            Err(RequestFailure::Timeout) => ProbeOutcome::TimedOut,
            Err(RequestFailure::Transport(message)) => ProbeOutcome::TransportError { message },
        };

        let result = PingResult::from_outcome(link, outcome, response_time);

        if result.is_up() {
            info!(
                link_id = %link.id,
                status_code = result.status_code(),
                response_time_ms = result.response_time_ms(),
                "链接可用"
            );
        } else {
            warn!(
                link_id = %link.id,
                status_code = result.status_code(),
                response_time_ms = result.response_time_ms(),
                outcome = ?result.outcome(),
                "链接不可用"
            );
        }

        result
    }
}

/// 格式化请求错误信息，使其更加清晰易读
fn format_request_error(error: &reqwest::Error) -> String {
    if error.is_connect() {
        "Connection refused".to_string()
    } else if error.is_builder() {
        "Invalid request".to_string()
    } else if error.is_decode() || error.is_body() {
        "Response body error".to_string()
    } else {
        let error_str = error.to_string();
        let lowered = error_str.to_lowercase();
        if lowered.contains("dns") {
            "DNS resolution failed".to_string()
        } else if lowered.contains("certificate") || lowered.contains("tls") {
            "SSL/TLS certificate error".to_string()
        } else {
            format!("Request failed: {}", error_str)
        }
    }
}
