//! 翻译服务
//!
//! 一次调用只发一个流式请求：逐 chunk 解码、提取增量、回报进度，
//! 流结束后清理并校验 JSON。取消以空字符串结果表示，不作为错误返回。

use super::cleanup::finalize_output;
use super::progress::ProgressEstimator;
use super::prompt::build_messages;
use super::types::{TranslationObserver, TranslationReport, TranslationRequest, TranslationState};
use crate::config::TranslatorConfig;
use crate::models::openai::ChatCompletionRequest;
use crate::providers::{OpenAICustomProvider, ProviderError};
use crate::streaming::{SseDeltaParser, StreamMetrics, StreamingProvider, Utf8StreamDecoder};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 固定的低温度，尽量让输出稳定
pub const TRANSLATION_TEMPERATURE: f32 = 0.3;

/// 流式阶段的结束方式
enum StreamEnd {
    /// 流正常读完，携带累积的原始输出
    Exhausted(String),
    Cancelled,
}

/// JSON 翻译器
pub struct JsonTranslator<P = OpenAICustomProvider> {
    provider: P,
    model: String,
}

impl JsonTranslator<OpenAICustomProvider> {
    /// 校验配置并创建翻译器
    ///
    /// endpoint 或 API key 缺失时返回 `ConfigurationError`，不会发出任何请求。
    pub fn new(config: TranslatorConfig) -> Result<Self, ProviderError> {
        let provider = OpenAICustomProvider::from_config(&config)?;
        Ok(Self {
            provider,
            model: config.model,
        })
    }
}

impl<P: StreamingProvider> JsonTranslator<P> {
    pub fn with_provider(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// 构建请求体
    pub fn build_request(&self, request: &TranslationRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(&request.source_text, &request.target_language),
            temperature: Some(TRANSLATION_TEMPERATURE),
            stream: true,
        }
    }

    /// 翻译 JSON 文档
    ///
    /// 成功时返回 2 空格缩进的 JSON；被取消时返回空字符串。
    pub async fn translate<O>(
        &self,
        request: TranslationRequest,
        observer: &mut O,
    ) -> Result<String, ProviderError>
    where
        O: TranslationObserver + Send + ?Sized,
    {
        self.translate_detailed(request, observer)
            .await
            .map(|report| report.output)
    }

    /// 与 `translate` 相同，额外返回终态和流式指标
    pub async fn translate_detailed<O>(
        &self,
        request: TranslationRequest,
        observer: &mut O,
    ) -> Result<TranslationReport, ProviderError>
    where
        O: TranslationObserver + Send + ?Sized,
    {
        if request.source_text.trim().is_empty() {
            return Err(ProviderError::InvalidInput("待翻译内容为空".to_string()));
        }

        let cancel = request
            .cancel_token
            .clone()
            .unwrap_or_else(CancellationToken::new);
        let mut metrics = StreamMetrics::new();

        if cancel.is_cancelled() {
            info!("[TRANSLATE] 请求开始前已取消");
            return Ok(self.cancelled_report(metrics));
        }

        info!(
            "[TRANSLATE] 开始翻译: target={} model={} source_chars={}",
            request.target_language,
            self.model,
            request.source_text.chars().count()
        );

        let mut state = TranslationState::Idle;
        let result = self
            .run(&request, &cancel, observer, &mut metrics, &mut state)
            .await;
        metrics.finish();
        metrics.log_summary(&self.model);

        match result {
            Ok(report_state) => match report_state {
                StreamEnd::Cancelled => Ok(self.cancelled_report(metrics)),
                StreamEnd::Exhausted(raw) => self.validate(raw, &cancel, metrics),
            },
            // 取消导致的请求中断不算失败
            Err(_) if cancel.is_cancelled() => Ok(self.cancelled_report(metrics)),
            Err(e) => {
                warn!(
                    "[TRANSLATE] 状态 {} -> {}: {}",
                    state,
                    TranslationState::Failed,
                    e
                );
                Err(e)
            }
        }
    }

    /// 发请求并消费整个流
    ///
    /// `state` 记录当前所处阶段，出错时即为失败前的状态。
    async fn run<O>(
        &self,
        request: &TranslationRequest,
        cancel: &CancellationToken,
        observer: &mut O,
        metrics: &mut StreamMetrics,
        state: &mut TranslationState,
    ) -> Result<StreamEnd, ProviderError>
    where
        O: TranslationObserver + Send + ?Sized,
    {
        if !self.provider.supports_streaming() {
            return Err(ProviderError::StreamUnsupported(format!(
                "{} 未启用流式传输",
                self.provider.provider_name()
            )));
        }

        let chat_request = self.build_request(request);
        transition(state, TranslationState::RequestSent);

        let mut stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("[TRANSLATE] 请求过程中被取消");
                return Ok(StreamEnd::Cancelled);
            }
            result = self.provider.call_api_stream(&chat_request) => result?,
        };

        transition(state, TranslationState::Streaming);

        let mut decoder = Utf8StreamDecoder::new();
        let mut parser = SseDeltaParser::new();
        let mut progress = ProgressEstimator::new(&request.source_text);
        let mut buffer = String::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(
                        "[TRANSLATE] 流式传输中被取消: 已接收 {} 个字符",
                        progress.output_chars()
                    );
                    metrics.set_parse_error_count(parser.parse_error_count());
                    return Ok(StreamEnd::Cancelled);
                }
                next = stream.next() => next,
            };

            let Some(chunk) = next else {
                break;
            };
            let bytes = chunk?;
            metrics.record_chunk(bytes.len());

            let text = decoder.decode(&bytes);
            let delta = parser.feed(&text);
            debug!(
                "[TRANSLATE] chunk: bytes={} delta_chars={}",
                bytes.len(),
                delta.chars().count()
            );
            Self::apply_delta(&delta, &mut buffer, &mut progress, observer, metrics);
        }

        // 流结束：处理解码器和解析器里残留的内容
        let mut tail = parser.feed(&decoder.finish());
        tail.push_str(&parser.finish());
        if !tail.is_empty() {
            Self::apply_delta(&tail, &mut buffer, &mut progress, observer, metrics);
        }

        metrics.set_parse_error_count(parser.parse_error_count());
        if !parser.is_done() {
            debug!("[TRANSLATE] 流结束但未收到 [DONE]");
        }
        if parser.finish_reason() == Some("length") {
            warn!("[TRANSLATE] 模型输出达到长度上限被截断 (finish_reason=length)");
        }

        Ok(StreamEnd::Exhausted(buffer))
    }

    /// 追加增量并依次回报进度和累积内容
    fn apply_delta<O>(
        delta: &str,
        buffer: &mut String,
        progress: &mut ProgressEstimator,
        observer: &mut O,
        metrics: &mut StreamMetrics,
    ) where
        O: TranslationObserver + ?Sized,
    {
        buffer.push_str(delta);
        metrics.record_output(delta.chars().count());
        let percent = progress.advance(delta);
        observer.on_progress(percent);
        observer.on_chunk(buffer);
    }

    fn validate(
        &self,
        raw: String,
        cancel: &CancellationToken,
        metrics: StreamMetrics,
    ) -> Result<TranslationReport, ProviderError> {
        debug!(
            "[TRANSLATE] 状态 {} -> {}",
            TranslationState::Streaming,
            TranslationState::Validating
        );

        match finalize_output(&raw) {
            Ok(output) => {
                info!("[TRANSLATE] 翻译完成: output_chars={}", output.chars().count());
                Ok(TranslationReport {
                    output,
                    state: TranslationState::Completed,
                    metrics,
                })
            }
            Err(_) if cancel.is_cancelled() => Ok(self.cancelled_report(metrics)),
            Err(e) => {
                warn!(
                    "[TRANSLATE] 翻译结果不是有效 JSON: {} (raw_chars={})",
                    e,
                    raw.chars().count()
                );
                Err(e.into())
            }
        }
    }

    fn cancelled_report(&self, metrics: StreamMetrics) -> TranslationReport {
        debug!("[TRANSLATE] 状态 -> {}", TranslationState::Cancelled);
        TranslationReport {
            output: String::new(),
            state: TranslationState::Cancelled,
            metrics,
        }
    }
}

fn transition(state: &mut TranslationState, next: TranslationState) {
    debug!("[TRANSLATE] 状态 {} -> {}", state, next);
    *state = next;
}
