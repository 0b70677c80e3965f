//! 配置管理模块
//!
//! 翻译器的配置作为显式对象传入，不在调用时读取全局环境。
//! 支持从环境变量或 YAML 文件加载，构造翻译器前统一校验。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_API_URL: &str = "TRANSLATOR_API_URL";
pub const ENV_API_KEY: &str = "TRANSLATOR_API_KEY";
pub const ENV_MODEL: &str = "TRANSLATOR_MODEL";
pub const ENV_LOG_LEVEL: &str = "TRANSLATOR_LOG_LEVEL";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const CONFIG_DIR_NAME: &str = "stream-translator";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少必需配置项
    #[error("缺少必需配置项: {0}")]
    MissingField(&'static str),

    /// 配置项取值无效
    #[error("配置项 {field} 无效: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// 读取配置文件失败
    #[error("读取配置文件失败 {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML 解析失败
    #[error("YAML 解析失败: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace / debug / info / warn / error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// 翻译器配置
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// chat/completions 端点（或其 base URL）
    #[serde(default)]
    pub api_url: Option<String>,

    /// Bearer 凭证
    #[serde(default)]
    pub api_key: Option<String>,

    /// 模型 ID
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            model: default_model(),
            logging: LoggingConfig::default(),
        }
    }
}

impl fmt::Debug for TranslatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("logging", &self.logging)
            .finish()
    }
}

impl TranslatorConfig {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: Some(api_url.into()),
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// 从进程环境变量加载
    ///
    /// 不做校验，缺失项留给 `validate` 报告。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载，空白值视为未设置
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self {
            api_url: get(ENV_API_URL),
            api_key: get(ENV_API_KEY),
            ..Self::default()
        };
        if let Some(model) = get(ENV_MODEL) {
            config.model = model;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }
        config
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// 从 YAML 文件加载，支持 `~/` 开头的路径
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = expand_tilde(path.as_ref());
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("[CONFIG] 已加载配置文件: {}", path.display());
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// 校验配置
    ///
    /// endpoint 与 API key 必须存在且非空，endpoint 必须是 http(s) URL。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let api_url = non_blank(self.api_url.as_deref()).ok_or(ConfigError::MissingField("api_url"))?;
        non_blank(self.api_key.as_deref()).ok_or(ConfigError::MissingField("api_key"))?;

        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api_url",
                reason: format!("必须以 http:// 或 https:// 开头: {}", api_url),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "model",
                reason: "模型 ID 不能为空".to_string(),
            });
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 默认配置文件路径：`<config_dir>/stream-translator/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// 展开 `~` / `~/path`，其他形式原样返回
fn expand_tilde(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let Some(home) = dirs::home_dir() else {
        return path.to_path_buf();
    };
    if raw == "~" {
        home
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests;
