//! Provider 模块
//!
//! - `error`: 统一错误类型
//! - `openai_custom`: OpenAI 兼容 chat/completions 流式调用

pub mod error;
pub mod openai_custom;

pub use error::ProviderError;
pub use openai_custom::{OpenAICustomConfig, OpenAICustomProvider};
