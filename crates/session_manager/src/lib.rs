//! # Session Manager
//!
//! Owns the persisted client state (the conversation tree and the settings)
//! and the chat session that drives a conversation against a model.

pub mod chat_session;
pub mod error;
pub mod manager;
pub mod settings;
pub mod storage;

// Re-exports
pub use chat_session::{ChatSession, Exchange};
pub use error::{SessionError, Unsaved};
pub use manager::SessionManager;
pub use settings::{AppSettings, AppSettingsPatch, Language, LlmConfigPatch, SettingsStore, Theme};
pub use storage::{
    FileKeyValueStorage, KeyValueStorage, VersionedBlob, CONVERSATION_KEY, SETTINGS_KEY,
    STORAGE_VERSION,
};

pub use chat_core::LlmConfig;
