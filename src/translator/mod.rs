//! JSON 流式翻译
//!
//! - `service`: 请求编排、取消与结果校验
//! - `types`: 请求、状态与观察者回调
//! - `prompt`: 提示词
//! - `progress`: 进度估算
//! - `cleanup`: 代码块标记清理与 JSON 重新格式化

pub mod cleanup;
pub mod progress;
pub mod prompt;
mod service;
mod types;

pub use cleanup::{finalize_output, normalize_json, strip_code_fences};
pub use progress::{estimate_progress, ProgressEstimator};
pub use service::{JsonTranslator, TRANSLATION_TEMPERATURE};
pub use types::{
    CallbackObserver, TranslationObserver, TranslationReport, TranslationRequest,
    TranslationState,
};
