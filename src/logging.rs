//! 日志系统模块
//!
//! 基于 tracing 的结构化日志配置，`log` crate 的日志经 LogTracer 桥接

use log::LevelFilter;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 日志配置结构
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 日志文件路径（可选，仅在关闭控制台输出时使用）
    pub file_path: Option<PathBuf>,
    /// 是否输出到控制台
    pub console: bool,
    /// 是否使用JSON格式
    pub json_format: bool,
    /// 模块级别日志控制
    pub module_levels: HashMap<String, LevelFilter>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file_path: None,
            console: true,
            json_format: false,
            module_levels: HashMap::new(),
        }
    }
}

impl LogConfig {
    /// 依赖库的默认日志级别，避免HTTP栈的调试输出淹没检测日志
    pub fn with_quiet_dependencies(mut self) -> Self {
        for module in ["reqwest", "hyper", "hyper_util", "rustls", "handlebars"] {
            self.module_levels
                .entry(module.to_string())
                .or_insert(LevelFilter::Warn);
        }
        self
    }
}

/// 全局日志是否已初始化
static LOGGING_INITIALIZED: OnceLock<Mutex<bool>> = OnceLock::new();

fn initialized_flag() -> &'static Mutex<bool> {
    LOGGING_INITIALIZED.get_or_init(|| Mutex::new(false))
}

/// 日志系统管理器
#[derive(Debug)]
pub struct LoggingSystem;

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// 重复调用是安全的：全局订阅器只会安装一次，之后的调用直接返回。
    ///
    /// # 参数
    /// * `config` - 日志配置
    pub fn setup_logging(config: &LogConfig) -> anyhow::Result<Self> {
        let mut initialized = initialized_flag()
            .lock()
            .map_err(|_| anyhow::anyhow!("日志状态锁已损坏"))?;

        if !*initialized {
            Self::init_log_tracer()?;
            Self::init_tracing_subscriber(config)?;
            *initialized = true;
        }

        Ok(Self)
    }

    /// 初始化 LogTracer（log crate 到 tracing 的桥接）
    fn init_log_tracer() -> anyhow::Result<()> {
        use tracing_log::LogTracer;

        match LogTracer::init() {
            Ok(()) => Ok(()),
            // 测试中可能已有其他logger
            Err(e) if e.to_string().contains("already") => Ok(()),
            Err(e) => Err(anyhow::anyhow!("LogTracer初始化失败: {}", e)),
        }
    }

    /// 将 log::LevelFilter 转换为 tracing 的指令
    fn level_directive(level: LevelFilter) -> anyhow::Result<Directive> {
        Ok(match level {
            LevelFilter::Off => "off"
                .parse()
                .map_err(|e| anyhow::anyhow!("无效的日志级别: {}", e))?,
            LevelFilter::Error => Directive::from(tracing::Level::ERROR),
            LevelFilter::Warn => Directive::from(tracing::Level::WARN),
            LevelFilter::Info => Directive::from(tracing::Level::INFO),
            LevelFilter::Debug => Directive::from(tracing::Level::DEBUG),
            LevelFilter::Trace => Directive::from(tracing::Level::TRACE),
        })
    }

    /// 初始化 tracing subscriber
    fn init_tracing_subscriber(config: &LogConfig) -> anyhow::Result<()> {
        let mut env_filter =
            EnvFilter::from_default_env().add_directive(Self::level_directive(config.level)?);

        for (module, level) in &config.module_levels {
            let directive = format!("{}={}", module, level.as_str().to_lowercase())
                .parse()
                .map_err(|e| anyhow::anyhow!("无效的模块日志级别 {}: {}", module, e))?;
            env_filter = env_filter.add_directive(directive);
        }

        let output_layer = match (&config.file_path, config.console) {
            (Some(file_path), false) => {
                if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| anyhow::anyhow!("创建日志目录失败: {}", e))?;
                }
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(file_path)
                    .map_err(|e| anyhow::anyhow!("创建日志文件失败: {}", e))?;
                let file_layer = fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_timer(fmt::time::ChronoUtc::rfc_3339());
                if config.json_format {
                    file_layer.json().boxed()
                } else {
                    file_layer.boxed()
                }
            }
            _ if config.json_format => fmt::layer()
                .json()
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_target(true)
                .boxed(),
            _ => fmt::layer()
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_target(false)
                .boxed(),
        };

        let result = registry().with(env_filter).with(output_layer).try_init();

        match result {
            Ok(()) => {
                tracing::debug!("日志配置: {:?}", config);
                Ok(())
            }
            // 全局订阅器已被设置（例如测试框架）
            Err(e) if e.to_string().contains("already") => Ok(()),
            Err(e) => Err(anyhow::anyhow!("tracing subscriber初始化失败: {}", e)),
        }
    }
}
