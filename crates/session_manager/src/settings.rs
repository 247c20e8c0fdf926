//! LLM configurations and application preferences

use chat_core::{LlmConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// UI theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Persist the conversation after every change.
    pub auto_save: bool,
    pub theme: Theme,
    pub language: Language,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            auto_save: true,
            theme: Theme::System,
            language: Language::Zh,
        }
    }
}

/// Partial update for [`AppSettings`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSettingsPatch {
    pub auto_save: Option<bool>,
    pub theme: Option<Theme>,
    pub language: Option<Language>,
}

/// Partial update for an [`LlmConfig`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmConfigPatch {
    pub name: Option<String>,
    pub provider: Option<ProviderKind>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub is_default: Option<bool>,
}

/// Persisted settings state: the configured endpoints, which one is active,
/// and the application preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsStore {
    pub llm_configs: Vec<LlmConfig>,
    pub active_config_id: Option<String>,
    pub settings: AppSettings,
}

impl Default for SettingsStore {
    fn default() -> Self {
        let config = LlmConfig::default();
        Self {
            active_config_id: Some(config.id.clone()),
            llm_configs: vec![config],
            settings: AppSettings::default(),
        }
    }
}

impl SettingsStore {
    /// Store `config` under a fresh id and return that id. The first config
    /// becomes the default, and it becomes active when nothing is.
    pub fn add_llm_config(&mut self, mut config: LlmConfig) -> String {
        let id = Uuid::new_v4().simple().to_string();
        config.id = id.clone();
        if self.llm_configs.is_empty() {
            config.is_default = true;
        }

        tracing::info!(config_id = %id, name = %config.name, provider = config.provider.as_str(), "Settings: Added LLM config");

        self.llm_configs.push(config);
        if self.active_config_id.is_none() {
            self.active_config_id = Some(id.clone());
        }
        id
    }

    /// Returns `false` for an unknown id.
    pub fn update_llm_config(&mut self, id: &str, patch: LlmConfigPatch) -> bool {
        let Some(config) = self.llm_configs.iter_mut().find(|c| c.id == id) else {
            return false;
        };

        if let Some(name) = patch.name {
            config.name = name;
        }
        if let Some(provider) = patch.provider {
            config.provider = provider;
        }
        if let Some(api_key) = patch.api_key {
            config.api_key = api_key;
        }
        if let Some(base_url) = patch.base_url {
            config.base_url = base_url;
        }
        if let Some(model) = patch.model {
            config.model = model;
        }
        if let Some(is_default) = patch.is_default {
            config.is_default = is_default;
        }

        tracing::debug!(config_id = %id, "Settings: Updated LLM config");
        true
    }

    /// Remove a config. When it was active, the default config takes over,
    /// else the first remaining one, else nothing is active.
    pub fn delete_llm_config(&mut self, id: &str) -> bool {
        let before = self.llm_configs.len();
        self.llm_configs.retain(|c| c.id != id);
        if self.llm_configs.len() == before {
            return false;
        }

        if self.active_config_id.as_deref() == Some(id) {
            self.active_config_id = self
                .llm_configs
                .iter()
                .find(|c| c.is_default)
                .or_else(|| self.llm_configs.first())
                .map(|c| c.id.clone());
        }

        tracing::info!(config_id = %id, active = ?self.active_config_id, "Settings: Deleted LLM config");
        true
    }

    /// Activates `id` as given; an unknown id leaves no active config.
    pub fn set_active_config(&mut self, id: &str) {
        self.active_config_id = Some(id.to_string());
    }

    pub fn get_active_config(&self) -> Option<&LlmConfig> {
        let active = self.active_config_id.as_deref()?;
        self.llm_configs.iter().find(|c| c.id == active)
    }

    /// Mark exactly `id` as the default.
    pub fn set_default_config(&mut self, id: &str) {
        for config in &mut self.llm_configs {
            config.is_default = config.id == id;
        }
    }

    pub fn update_settings(&mut self, patch: AppSettingsPatch) {
        if let Some(auto_save) = patch.auto_save {
            self.settings.auto_save = auto_save;
        }
        if let Some(theme) = patch.theme {
            self.settings.theme = theme;
        }
        if let Some(language) = patch.language {
            self.settings.language = language;
        }
    }
}
