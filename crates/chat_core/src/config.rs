use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths;

pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000";
pub const DEFAULT_SYSTEM_PROMPT: &str = "你是一个有帮助的 AI 助手。请用中文回答用户的问题。";

/// Client-side configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Origin of the proxy service that owns `/api/chat`.
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    /// Where persisted state lives. Defaults to `~/.erdtree`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// System prompt prepended to every chat request.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Recency window for context pruning. `None` sends the full chain.
    #[serde(default)]
    pub context_window: Option<usize>,
}

const CONFIG_FILE_PATH: &str = "config.toml";

fn default_proxy_url() -> String {
    DEFAULT_PROXY_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            data_dir: None,
            system_prompt: None,
            context_window: None,
        }
    }
}

impl Config {
    /// Load `~/.erdtree/config.json`, falling back to `./config.toml`, then
    /// apply environment overrides.
    pub fn new() -> Self {
        let mut config = Config::default();

        let mut loaded = false;
        let json_path = paths::config_json_path();
        if json_path.exists() {
            match paths::load_config_json::<Config>(&json_path) {
                Ok(file_config) => {
                    config = file_config;
                    loaded = true;
                }
                Err(e) => log::warn!("Ignoring {}: {}", json_path.display(), e),
            }
        }

        if !loaded && std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                match toml::from_str::<Config>(&content) {
                    Ok(file_config) => config = file_config,
                    Err(e) => log::warn!("Ignoring {}: {}", CONFIG_FILE_PATH, e),
                }
            }
        }

        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(proxy_url) = std::env::var("ERDTREE_PROXY_URL") {
            self.proxy_url = proxy_url;
        }
        if let Ok(data_dir) = std::env::var("ERDTREE_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(data_dir));
        }
        if let Ok(window) = std::env::var("ERDTREE_CONTEXT_WINDOW") {
            self.context_window = parse_window(&window);
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::erdtree_dir)
    }

    pub fn system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }
}

/// `0`, empty or garbage disables pruning.
fn parse_window(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|k| *k > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_window_values() {
        assert_eq!(parse_window("5"), Some(5));
        assert_eq!(parse_window(" 12 "), Some(12));
        for value in ["0", "", "  ", "five", "-1"] {
            assert_eq!(parse_window(value), None, "value {value:?} should disable pruning");
        }
    }

    #[test]
    fn toml_fields_are_optional() {
        let config: Config = toml::from_str("proxy_url = \"http://127.0.0.1:9000\"").unwrap();
        assert_eq!(config.proxy_url, "http://127.0.0.1:9000");
        assert!(config.data_dir.is_none());
        assert!(config.context_window.is_none());
    }

    #[test]
    fn blank_system_prompt_uses_default() {
        let config = Config {
            system_prompt: Some("   ".to_string()),
            ..Config::default()
        };
        assert_eq!(config.system_prompt(), DEFAULT_SYSTEM_PROMPT);
    }
}
