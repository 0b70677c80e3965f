//! stream-translator
//!
//! 通过 OpenAI 兼容的 chat/completions 流式接口翻译 JSON 文档的值，
//! 在接收过程中实时回报进度与部分输出，结束后校验并重新格式化 JSON。
//!
//! ```ignore
//! use stream_translator::{CallbackObserver, JsonTranslator, TranslationRequest, TranslatorConfig};
//!
//! let translator = JsonTranslator::new(TranslatorConfig::from_env())?;
//! let mut observer = CallbackObserver::new().with_progress(|p| println!("{p}%"));
//! let request = TranslationRequest::new(r#"{"greeting":"Hello"}"#, "French");
//! let translated = translator.translate(request, &mut observer).await?;
//! ```

pub mod config;
pub mod models;
pub mod providers;
pub mod streaming;
pub mod telemetry;
pub mod translator;

pub use config::{ConfigError, LoggingConfig, TranslatorConfig};
pub use providers::{OpenAICustomProvider, ProviderError};
pub use translator::{
    CallbackObserver, JsonTranslator, TranslationObserver, TranslationRequest, TranslationState,
};
