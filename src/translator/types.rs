//! 翻译请求、状态与回调端口

use crate::streaming::StreamMetrics;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// 单次翻译请求
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// 待翻译的 JSON 文本
    pub source_text: String,
    /// 目标语言（名称或代码，原样写入提示词）
    pub target_language: String,
    /// 协作式取消令牌
    pub cancel_token: Option<CancellationToken>,
}

impl TranslationRequest {
    pub fn new(source_text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            target_language: target_language.into(),
            cancel_token: None,
        }
    }

    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// 单次调用的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationState {
    Idle,
    RequestSent,
    Streaming,
    Validating,
    Completed,
    Cancelled,
    Failed,
}

impl fmt::Display for TranslationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TranslationState::Idle => "idle",
            TranslationState::RequestSent => "request_sent",
            TranslationState::Streaming => "streaming",
            TranslationState::Validating => "validating",
            TranslationState::Completed => "completed",
            TranslationState::Cancelled => "cancelled",
            TranslationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// 一次调用的完整结果
///
/// `state` 只会是 `Completed` 或 `Cancelled`，失败通过 `Err` 返回。
#[derive(Debug, Clone)]
pub struct TranslationReport {
    /// 2 空格缩进的 JSON；取消时为空字符串
    pub output: String,
    pub state: TranslationState,
    pub metrics: StreamMetrics,
}

/// 翻译过程观察者
///
/// 两个回调都在处理 chunk 的同一任务中同步调用，顺序与 chunk 到达顺序一致。
pub trait TranslationObserver {
    /// 进度百分比（0-100）
    fn on_progress(&mut self, _percent: u8) {}

    /// 目前为止累积的全部输出
    fn on_chunk(&mut self, _accumulated: &str) {}
}

/// 不关心进度时使用
impl TranslationObserver for () {}

type ProgressFn<'a> = Box<dyn FnMut(u8) + Send + 'a>;
type ChunkFn<'a> = Box<dyn FnMut(&str) + Send + 'a>;

/// 基于闭包的观察者，两个回调都可省略
#[derive(Default)]
pub struct CallbackObserver<'a> {
    progress: Option<ProgressFn<'a>>,
    chunk: Option<ChunkFn<'a>>,
}

impl<'a> CallbackObserver<'a> {
    pub fn new() -> Self {
        Self {
            progress: None,
            chunk: None,
        }
    }

    pub fn with_progress<F>(mut self, f: F) -> Self
    where
        F: FnMut(u8) + Send + 'a,
    {
        self.progress = Some(Box::new(f));
        self
    }

    pub fn with_chunk<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str) + Send + 'a,
    {
        self.chunk = Some(Box::new(f));
        self
    }
}

impl TranslationObserver for CallbackObserver<'_> {
    fn on_progress(&mut self, percent: u8) {
        if let Some(f) = self.progress.as_mut() {
            f(percent);
        }
    }

    fn on_chunk(&mut self, accumulated: &str) {
        if let Some(f) = self.chunk.as_mut() {
            f(accumulated);
        }
    }
}
