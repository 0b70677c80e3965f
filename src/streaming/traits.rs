//! StreamingProvider Trait 定义
//!
//! 翻译器只依赖这个 trait，HTTP 实现见 `providers::openai_custom`。

use crate::models::openai::ChatCompletionRequest;
use crate::providers::ProviderError;
use crate::streaming::StreamError;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// 流式响应类型别名
///
/// 有限、不可重放的字节 chunk 序列。
pub type StreamResponse = Pin<Box<dyn Stream<Item = Result<Bytes, StreamError>> + Send>>;

/// 流式 Provider Trait
#[async_trait]
pub trait StreamingProvider: Send + Sync {
    /// 发起流式 API 调用
    ///
    /// 非 2xx 状态码在这里就转换为 `ProviderError`，
    /// 成功时返回响应 body 的字节流。
    ///
    /// ```ignore
    /// use futures::StreamExt;
    ///
    /// let mut stream = provider.call_api_stream(&request).await?;
    /// while let Some(chunk) = stream.next().await {
    ///     let bytes = chunk?;
    /// }
    /// ```
    async fn call_api_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<StreamResponse, ProviderError>;

    /// 检查是否支持流式传输
    fn supports_streaming(&self) -> bool {
        true
    }

    /// 获取 Provider 名称，用于日志和错误消息
    fn provider_name(&self) -> &'static str;
}

/// 将 reqwest 的 bytes_stream 转换为 StreamResponse
pub fn reqwest_stream_to_stream_response(response: reqwest::Response) -> StreamResponse {
    use futures::StreamExt;

    let stream = response.bytes_stream().map(|result| result.map_err(StreamError::from));

    Box::pin(stream)
}
