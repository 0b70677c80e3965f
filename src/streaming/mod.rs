//! 流式传输核心模块
//!
//! # 主要组件
//!
//! - `error`: 流式错误类型定义
//! - `decoder`: 跨 chunk 的增量 UTF-8 解码
//! - `sse`: OpenAI SSE 事件行解析与增量内容提取
//! - `metrics`: 流式指标
//! - `traits`: StreamingProvider trait 定义

pub mod decoder;
pub mod error;
pub mod metrics;
pub mod sse;
pub mod traits;

pub use decoder::Utf8StreamDecoder;
pub use error::StreamError;
pub use metrics::StreamMetrics;
pub use sse::{SseDeltaParser, SSE_DATA_PREFIX, SSE_DONE_SENTINEL};
pub use traits::{reqwest_stream_to_stream_response, StreamResponse, StreamingProvider};
