use chat_core::ChatMessage;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Per-request overrides. Unset fields fall back to the active configuration
/// (model) or the transport defaults (temperature 0.7, 4096 tokens).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl ChatOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Body posted to the proxy's `/api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyChatRequest {
    pub provider: String,
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<Usage>,
}

// --- OpenAI-compatible completion bodies ---

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionBody {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    pub model: Option<String>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionMessage {
    pub content: Option<String>,
}

impl CompletionBody {
    /// `choices[0].message.content`, empty when absent.
    pub fn into_response(self, fallback_model: &str) -> ChatResponse {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        ChatResponse {
            content,
            model: self.model.unwrap_or_else(|| fallback_model.to_string()),
            usage: self.usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_proxy_field_names() {
        let request = ProxyChatRequest {
            provider: "deepseek".into(),
            base_url: "https://api.deepseek.com".into(),
            api_key: "sk-test".into(),
            model: "deepseek-chat".into(),
            messages: vec![ChatMessage::user("hi")],
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            stream: true,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["baseUrl"], "https://api.deepseek.com");
        assert_eq!(value["apiKey"], "sk-test");
        assert_eq!(value["max_tokens"], 4096);
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn completion_body_extracts_first_choice() {
        let body: CompletionBody = serde_json::from_str(
            r#"{"model":"deepseek-chat","choices":[{"message":{"role":"assistant","content":"hello"}}],
                "usage":{"prompt_tokens":3,"completion_tokens":1,"total_tokens":4}}"#,
        )
        .unwrap();

        let response = body.into_response("fallback");
        assert_eq!(response.content, "hello");
        assert_eq!(response.model, "deepseek-chat");
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(4));
    }

    #[test]
    fn completion_body_without_choices_is_empty() {
        let body: CompletionBody = serde_json::from_str("{}").unwrap();
        let response = body.into_response("fallback");
        assert_eq!(response.content, "");
        assert_eq!(response.model, "fallback");
        assert!(response.usage.is_none());
    }
}
