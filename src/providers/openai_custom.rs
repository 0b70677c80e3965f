//! OpenAI Custom Provider (自定义 OpenAI 兼容 API)
use crate::config::TranslatorConfig;
use crate::models::openai::ChatCompletionRequest;
use crate::providers::ProviderError;
use crate::streaming::traits::{
    reqwest_stream_to_stream_response, StreamResponse, StreamingProvider,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpenAICustomConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

pub struct OpenAICustomProvider {
    pub config: OpenAICustomConfig,
    pub client: Client,
}

impl OpenAICustomProvider {
    /// 使用 API key 和 base_url 创建 Provider
    pub fn with_config(api_key: String, base_url: String) -> Self {
        Self {
            config: OpenAICustomConfig {
                api_key: Some(api_key),
                base_url: Some(base_url),
            },
            client: Client::new(),
        }
    }

    /// 从翻译器配置创建，endpoint 或 API key 缺失时返回配置错误
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        let api_url = config
            .api_url
            .clone()
            .ok_or_else(|| ProviderError::ConfigurationError("缺少必需配置项: api_url".into()))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::ConfigurationError("缺少必需配置项: api_key".into()))?;

        let client = Client::builder()
            .user_agent(concat!("stream-translator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::ConfigurationError(e.to_string()))?;

        Ok(Self {
            config: OpenAICustomConfig {
                api_key: Some(api_key.trim().to_string()),
                base_url: Some(api_url.trim().to_string()),
            },
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some() && self.config.base_url.is_some()
    }

    /// 构建 chat/completions URL
    ///
    /// 已经是完整端点时直接使用；以 /v1 结尾时拼接 endpoint；否则拼接 /v1/endpoint。
    pub fn build_url(&self) -> Result<String, ProviderError> {
        let base = self
            .config
            .base_url
            .as_deref()
            .ok_or_else(|| ProviderError::ConfigurationError("缺少必需配置项: api_url".into()))?;
        let base = base.trim_end_matches('/');

        if base.ends_with(CHAT_COMPLETIONS_PATH) {
            Ok(base.to_string())
        } else if base.ends_with("/v1") {
            Ok(format!("{}/{}", base, CHAT_COMPLETIONS_PATH))
        } else {
            Ok(format!("{}/v1/{}", base, CHAT_COMPLETIONS_PATH))
        }
    }
}

/// 没有可读取 body 的响应：204 或显式 Content-Length: 0
fn has_readable_body(resp: &reqwest::Response) -> bool {
    resp.status() != StatusCode::NO_CONTENT && resp.content_length() != Some(0)
}

#[async_trait]
impl StreamingProvider for OpenAICustomProvider {
    async fn call_api_stream(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<StreamResponse, ProviderError> {
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            ProviderError::ConfigurationError("缺少必需配置项: api_key".to_string())
        })?;

        let mut stream_request = request.clone();
        stream_request.stream = true;

        let url = self.build_url()?;

        tracing::info!(
            "[OPENAI_STREAM] 发起流式请求: url={} model={}",
            url,
            request.model
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&stream_request)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest_error(&e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("[OPENAI_STREAM] 请求失败: {} - {}", status, body);
            return Err(ProviderError::from_http_status(status.as_u16(), &body));
        }

        if !has_readable_body(&resp) {
            tracing::error!("[OPENAI_STREAM] 响应没有可读取的 body: status={}", status);
            return Err(ProviderError::StreamUnsupported(format!(
                "HTTP {} 响应没有 body",
                status.as_u16()
            )));
        }

        tracing::info!("[OPENAI_STREAM] 流式响应开始: status={}", status);

        Ok(reqwest_stream_to_stream_response(resp))
    }

    fn supports_streaming(&self) -> bool {
        self.is_configured()
    }

    fn provider_name(&self) -> &'static str {
        "OpenAICustomProvider"
    }
}
