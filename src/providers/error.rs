//! 统一的 Provider 错误类型
//!
//! 区分配置、认证、限流、普通请求失败以及结果格式错误，
//! 调用方据此决定是否重试或提示用户。取消不属于错误，见 `JsonTranslator::translate`。

use crate::config::ConfigError;
use crate::streaming::StreamError;
use thiserror::Error;

/// Provider 统一错误类型
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// 配置错误（缺少 endpoint / API key 等），在发起网络请求前返回
    #[error("配置错误: {0}")]
    ConfigurationError(String),

    /// 认证错误（HTTP 401）
    #[error("认证失败: {0}")]
    AuthenticationError(String),

    /// 限流错误（HTTP 429）
    #[error("请求过于频繁: {0}")]
    RateLimitError(String),

    /// 其他非 2xx 状态码
    #[error("请求失败 (HTTP {status}): {message}")]
    RequestFailed { status: u16, message: String },

    /// 响应没有可读取的 body 流
    #[error("响应不支持流式读取: {0}")]
    StreamUnsupported(String),

    /// 最终内容不是合法 JSON
    #[error("翻译结果格式无效: {0}")]
    InvalidResultFormat(String),

    /// 输入无效
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 网络错误（连接失败、读取中断、超时）
    #[error("网络连接失败: {0}")]
    NetworkError(String),

    /// 未知错误
    #[error("未知错误: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// 判断错误是否可重试
    ///
    /// 只作为调用方的参考，翻译器内部不做重试。
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::NetworkError(_) | ProviderError::RateLimitError(_) => true,
            ProviderError::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ProviderError::ConfigurationError(_) => "ConfigurationError",
            ProviderError::AuthenticationError(_) => "AuthenticationError",
            ProviderError::RateLimitError(_) => "RateLimitError",
            ProviderError::RequestFailed { .. } => "RequestFailedError",
            ProviderError::StreamUnsupported(_) => "StreamUnsupportedError",
            ProviderError::InvalidResultFormat(_) => "InvalidResultFormatError",
            ProviderError::InvalidInput(_) => "InvalidInputError",
            ProviderError::NetworkError(_) => "NetworkError",
            ProviderError::Unknown(_) => "UnknownError",
        }
    }

    /// 获取 HTTP 状态码（如果适用）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::AuthenticationError(_) => Some(401),
            ProviderError::RateLimitError(_) => Some(429),
            ProviderError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 从 HTTP 状态码创建错误
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 => ProviderError::AuthenticationError(format!(
                "HTTP {} - {}",
                status,
                truncate_message(body, 200)
            )),
            429 => ProviderError::RateLimitError(format!(
                "HTTP {} - {}",
                status,
                truncate_message(body, 200)
            )),
            _ => ProviderError::RequestFailed {
                status,
                message: truncate_message(body, 200),
            },
        }
    }

    /// 从 reqwest 错误创建
    pub fn from_reqwest_error(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::NetworkError("请求超时".to_string())
        } else if err.is_connect() {
            ProviderError::NetworkError(format!("无法连接到服务器: {}", err))
        } else if let Some(status) = err.status() {
            ProviderError::from_http_status(status.as_u16(), &err.to_string())
        } else if err.is_builder() {
            ProviderError::ConfigurationError(err.to_string())
        } else {
            ProviderError::NetworkError(err.to_string())
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::from_reqwest_error(&err)
    }
}

impl From<ConfigError> for ProviderError {
    fn from(err: ConfigError) -> Self {
        ProviderError::ConfigurationError(err.to_string())
    }
}

/// 最终输出无法解析为 JSON
impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::InvalidResultFormat(err.to_string())
    }
}

impl From<StreamError> for ProviderError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Network(msg) => ProviderError::NetworkError(msg),
            StreamError::Timeout => ProviderError::NetworkError("流式响应超时".to_string()),
            StreamError::Decode(msg) => ProviderError::Unknown(msg),
        }
    }
}

/// 截断消息到指定字符数
fn truncate_message(msg: &str, max_chars: usize) -> String {
    match msg.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &msg[..idx]),
        None => msg.to_string(),
    }
}
