use async_trait::async_trait;
use chat_core::{ChatMessage, Config, LlmConfig};
use reqwest::{Client, Response};

use crate::error::{LLMError, Result};
use crate::provider::{ChatProvider, DeltaStream};
use crate::sse::delta_stream;
use crate::types::{
    ChatOptions, ChatResponse, CompletionBody, ProxyChatRequest, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};

/// Sends chats through the proxy's `/api/chat`, using the active LLM
/// configuration for provider, credentials and model.
pub struct ProxyChatClient {
    client: Client,
    endpoint: String,
    config: Option<LlmConfig>,
}

impl ProxyChatClient {
    pub fn new(endpoint: impl Into<String>, config: Option<LlmConfig>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            config,
        }
    }

    /// Client for the proxy named in `config`.
    pub fn from_config(config: &Config, llm_config: Option<LlmConfig>) -> Self {
        Self::new(config.proxy_url.clone(), llm_config)
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn config(&self) -> Option<&LlmConfig> {
        self.config.as_ref()
    }

    pub fn set_config(&mut self, config: Option<LlmConfig>) {
        self.config = config;
    }

    fn active_config(&self) -> Result<&LlmConfig> {
        let config = self.config.as_ref().ok_or_else(|| {
            LLMError::Config("未配置 LLM，请先在设置中添加 API 配置".to_string())
        })?;
        if !config.has_api_key() {
            return Err(LLMError::Config("API Key 未设置，请先在设置中配置".to_string()));
        }
        Ok(config)
    }

    fn build_request(
        config: &LlmConfig,
        messages: &[ChatMessage],
        options: &ChatOptions,
        stream: bool,
    ) -> ProxyChatRequest {
        ProxyChatRequest {
            provider: config.provider.as_str().to_string(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: options.model.clone().unwrap_or_else(|| config.model.clone()),
            messages: messages.to_vec(),
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            stream,
        }
    }

    async fn post(&self, request: &ProxyChatRequest) -> Result<Response> {
        let url = format!("{}/api/chat", self.endpoint);
        log::debug!(
            "POST {} (model: {}, messages: {}, stream: {})",
            url,
            request.model,
            request.messages.len(),
            request.stream
        );

        let response = self.client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            log::error!("Chat proxy returned {}: {}", status, body);
            return Err(LLMError::Api { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatProvider for ProxyChatClient {
    async fn chat(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<ChatResponse> {
        let config = self.active_config()?;
        let request = Self::build_request(config, messages, options, false);

        let response = self.post(&request).await?;
        let text = response.text().await?;
        let body: CompletionBody = serde_json::from_str(&text)?;

        Ok(body.into_response(&request.model))
    }

    async fn chat_stream(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<DeltaStream> {
        let config = self.active_config()?;
        let request = Self::build_request(config, messages, options, true);

        let response = self.post(&request).await?;
        Ok(delta_stream(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let client = ProxyChatClient::new("http://localhost:3000/", None);
        assert_eq!(client.endpoint(), "http://localhost:3000");
    }

    #[test]
    fn missing_config_is_a_config_error() {
        let client = ProxyChatClient::new("http://localhost:3000", None);
        assert!(matches!(client.active_config(), Err(LLMError::Config(_))));
    }

    #[test]
    fn blank_api_key_is_a_config_error() {
        let client = ProxyChatClient::new("http://localhost:3000", Some(LlmConfig::default()));
        assert!(matches!(client.active_config(), Err(LLMError::Config(_))));
    }

    #[test]
    fn request_applies_defaults_and_overrides() {
        let config = configured();
        let messages = [ChatMessage::user("hi")];

        let request = ProxyChatClient::build_request(&config, &messages, &ChatOptions::default(), true);
        assert_eq!(request.provider, "deepseek");
        assert_eq!(request.model, "deepseek-chat");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 4096);
        assert!(request.stream);

        let options = ChatOptions::default()
            .with_model("deepseek-reasoner")
            .with_temperature(0.3)
            .with_max_tokens(300);
        let request = ProxyChatClient::build_request(&config, &messages, &options, false);
        assert_eq!(request.model, "deepseek-reasoner");
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, 300);
        assert!(!request.stream);
    }
}
