//! 流式传输错误类型
//!
//! 定义读取响应字节流过程中可能发生的错误。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 流式传输错误类型
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum StreamError {
    /// 网络错误
    ///
    /// 连接被重置、读取 body 失败等。
    Network(String),

    /// 超时错误
    Timeout,

    /// 解码错误
    ///
    /// 响应体无法按预期格式解码时发生。
    Decode(String),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Network(msg) => write!(f, "网络错误: {}", msg),
            StreamError::Timeout => write!(f, "流式响应超时"),
            StreamError::Decode(msg) => write!(f, "解码错误: {}", msg),
        }
    }
}

impl std::error::Error for StreamError {}

impl From<reqwest::Error> for StreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StreamError::Timeout
        } else if err.is_decode() {
            StreamError::Decode(err.to_string())
        } else if err.is_connect() {
            StreamError::Network(format!("连接失败: {}", err))
        } else {
            StreamError::Network(err.to_string())
        }
    }
}

impl StreamError {
    pub fn network(msg: impl Into<String>) -> Self {
        StreamError::Network(msg.into())
    }

    /// 获取错误类型字符串
    pub fn error_type(&self) -> &'static str {
        match self {
            StreamError::Network(_) => "network_error",
            StreamError::Timeout => "timeout",
            StreamError::Decode(_) => "decode_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            StreamError::network("reset").to_string(),
            "网络错误: reset"
        );
        assert_eq!(StreamError::Timeout.to_string(), "流式响应超时");
    }

    #[test]
    fn test_error_type() {
        assert_eq!(StreamError::network("peer reset").error_type(), "network_error");
        assert_eq!(StreamError::Timeout.error_type(), "timeout");
        assert_eq!(StreamError::Decode("x".into()).error_type(), "decode_error");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(StreamError::Decode("bad".into())).unwrap();
        assert_eq!(json["type"], "Decode");
        assert_eq!(json["details"], "bad");
    }
}
