//! 单轮检测流程
//!
//! 加载配置 → 顺序检测 → 保存快照 → 发送报告

use crate::cli::Args;
use crate::config::{Config, ConfigLoader, FileConfigLoader};
use crate::error::Result;
use crate::notification::{build_summary, NoOpSender, NotificationSender, WebhookSender};
use crate::probe::{run_all, HttpLinkProber, LinkProber, ResultSet};
use crate::storage::save_results;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// 一次完整的检测运行
pub struct MonitorApp {
    config: Config,
    timeout: Duration,
    output_path: PathBuf,
    prober: Box<dyn LinkProber>,
    sender: Box<dyn NotificationSender>,
}

impl MonitorApp {
    /// 使用已加载的配置和组件创建运行实例
    pub fn new(
        config: Config,
        output_path: PathBuf,
        prober: Box<dyn LinkProber>,
        sender: Box<dyn NotificationSender>,
    ) -> Result<Self> {
        let timeout = config.timeout_duration()?;
        Ok(Self {
            config,
            timeout,
            output_path,
            prober,
            sender,
        })
    }

    /// 根据命令行参数加载配置并组装默认组件
    pub async fn from_args(args: &Args) -> Result<Self> {
        let config = FileConfigLoader::default()
            .load_from_file(&args.config)
            .await?;
        let timeout = config.timeout_duration()?;

        info!(
            "配置加载完成，链接数量: {}，超时: {}s",
            config.links.len(),
            timeout.as_secs()
        );

        let prober = Box::new(HttpLinkProber::new()?);
        let sender: Box<dyn NotificationSender> = if args.dry_run {
            Box::new(NoOpSender)
        } else {
            Box::new(WebhookSender::new(args.webhook_url.clone(), timeout)?)
        };

        Self::new(config, args.output.clone(), prober, sender)
    }

    /// 执行一轮检测
    ///
    /// 快照写入失败时直接返回错误，不会发送报告。
    pub async fn run_once(&self) -> Result<ResultSet> {
        let results = run_all(self.prober.as_ref(), &self.config.links, self.timeout).await?;
        debug!("检测结果: {:?}", results);

        save_results(&results, &self.output_path).await?;

        let message = build_summary(&results, &self.config.notification)?;
        self.sender.send_message(&message).await?;

        Ok(results)
    }
}
