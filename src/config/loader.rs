//! 配置加载器实现
//!
//! 提供JSON/TOML配置文件解析、环境变量替换和错误处理功能

use crate::config::types::{validate_config, Config};
use crate::error::ConfigError;
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON格式（默认）
    Json,
    /// TOML格式
    Toml,
}

impl ConfigFormat {
    /// 根据文件扩展名判断格式，无法识别时按JSON处理
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config, ConfigError>;

    /// 从字符串加载配置
    fn load_from_string(&self, content: &str, format: ConfigFormat) -> Result<Config, ConfigError>;

    /// 验证配置
    fn validate(&self, config: &Config) -> Result<(), ConfigError>;
}

/// 基于文件的配置加载器
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl FileConfigLoader {
    /// 创建新的配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用 `${VAR}` 环境变量替换
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的环境变量
    ///
    /// `${VAR}` 替换为环境变量的值，`$${VAR}` 保留为字面量 `${VAR}`。
    /// 替换是纯文本的，变量值需要在所在的JSON/TOML字符串中合法。
    fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let env_var_regex = Regex::new(r"\$(\$)?\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut result = String::with_capacity(content.len());
        let mut last_end = 0;

        for captures in env_var_regex.captures_iter(content) {
            let (Some(full_match), Some(var_name)) = (captures.get(0), captures.get(2)) else {
                continue;
            };
            result.push_str(&content[last_end..full_match.start()]);

            if captures.get(1).is_some() {
                result.push_str(&full_match.as_str()[1..]);
            } else {
                let value =
                    std::env::var(var_name.as_str()).map_err(|_| ConfigError::EnvVarError {
                        var: var_name.as_str().to_string(),
                    })?;
                result.push_str(&value);
            }
            last_end = full_match.end();
        }
        result.push_str(&content[last_end..]);

        Ok(result)
    }

    fn parse(&self, content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
        let processed_content = self.substitute_env_vars(content)?;

        match format {
            ConfigFormat::Json => serde_json::from_str(&processed_content)
                .map_err(|e| ConfigError::ParseError(format!("JSON解析失败: {}", e))),
            ConfigFormat::Toml => toml::from_str(&processed_content)
                .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {}", e))),
        }
    }
}

impl Default for FileConfigLoader {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl ConfigLoader for FileConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        let config = self.load_from_string(&content, ConfigFormat::from_path(path))?;

        log::info!("成功加载配置文件: {}", path.display());
        log::debug!("配置内容: {:?}", config);

        Ok(config)
    }

    fn load_from_string(&self, content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
        let config = self.parse(content, format)?;
        self.validate(&config)?;
        Ok(config)
    }

    fn validate(&self, config: &Config) -> Result<(), ConfigError> {
        validate_config(config).map_err(ConfigError::ValidationError)
    }
}
