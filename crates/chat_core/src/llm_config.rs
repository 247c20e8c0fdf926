//! Connection settings for one LLM endpoint.

use serde::{Deserialize, Serialize};

use crate::provider::{ProviderKind, DEEPSEEK_BASE_URL};

pub const DEFAULT_LLM_CONFIG_ID: &str = "default-deepseek";
pub const DEFAULT_LLM_CONFIG_NAME: &str = "DeepSeek-V3";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// A named provider/credential/model triple the client can talk through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    pub id: String,
    pub name: String,
    pub provider: ProviderKind,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Default for LlmConfig {
    /// The built-in DeepSeek entry, without an API key.
    fn default() -> Self {
        Self {
            id: DEFAULT_LLM_CONFIG_ID.to_string(),
            name: DEFAULT_LLM_CONFIG_NAME.to_string(),
            provider: ProviderKind::DeepSeek,
            api_key: String::new(),
            base_url: DEEPSEEK_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            is_default: true,
        }
    }
}

impl LlmConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
