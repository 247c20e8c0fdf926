//! Known LLM providers and their chat-completions base URLs.

use serde::{Deserialize, Serialize};

pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Providers the proxy knows how to reach without an explicit base URL.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    DeepSeek,
    OpenAI,
    /// Caller-supplied base URL.
    Custom,
}

impl ProviderKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "deepseek" => Some(Self::DeepSeek),
            "openai" => Some(Self::OpenAI),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::OpenAI => "openai",
            Self::Custom => "custom",
        }
    }

    /// Base URL from the provider table. Empty for `Custom`.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::DeepSeek => DEEPSEEK_BASE_URL,
            Self::OpenAI => OPENAI_BASE_URL,
            Self::Custom => "",
        }
    }
}

/// Pick the base URL for a proxied request.
///
/// An explicit non-empty `base_url` wins, then the provider table, then the
/// DeepSeek default (also used for unknown providers and for `custom` without
/// a URL). A trailing slash is stripped so `{base}/chat/completions` stays clean.
pub fn resolve_base_url(provider: Option<&str>, base_url: Option<&str>) -> String {
    let explicit = base_url.map(str::trim).filter(|url| !url.is_empty());
    let from_table = provider
        .and_then(ProviderKind::from_name)
        .map(|kind| kind.default_base_url())
        .filter(|url| !url.is_empty());

    explicit
        .or(from_table)
        .unwrap_or(DEEPSEEK_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_base_url_wins() {
        assert_eq!(
            resolve_base_url(Some("openai"), Some("https://llm.internal/v1/")),
            "https://llm.internal/v1"
        );
    }

    #[test]
    fn provider_table_lookup() {
        assert_eq!(resolve_base_url(Some("openai"), None), OPENAI_BASE_URL);
        assert_eq!(resolve_base_url(Some("deepseek"), Some("  ")), DEEPSEEK_BASE_URL);
    }

    #[test]
    fn custom_without_url_and_unknown_fall_back_to_deepseek() {
        assert_eq!(resolve_base_url(Some("custom"), None), DEEPSEEK_BASE_URL);
        assert_eq!(resolve_base_url(Some("mystery"), None), DEEPSEEK_BASE_URL);
        assert_eq!(resolve_base_url(None, None), DEEPSEEK_BASE_URL);
    }

    #[test]
    fn provider_names_round_trip_through_serde() {
        let json = serde_json::to_string(&ProviderKind::OpenAI).unwrap();
        assert_eq!(json, "\"openai\"");
        assert_eq!(ProviderKind::from_name("DeepSeek"), Some(ProviderKind::DeepSeek));
    }
}
