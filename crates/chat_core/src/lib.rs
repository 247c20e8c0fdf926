//! chat_core - Shared types for the ErdTree workspace
//!
//! This crate provides the foundational pieces used by every other crate:
//! - `message` - Role and the role/content pair sent to a model
//! - `provider` - Known LLM providers and base URL resolution
//! - `llm_config` - Connection settings for one LLM endpoint
//! - `config` - Client configuration (file + environment)
//! - `paths` - Locations of the local data directory

pub mod config;
pub mod llm_config;
pub mod message;
pub mod paths;
pub mod provider;

// Re-export commonly used types
pub use config::Config;
pub use llm_config::LlmConfig;
pub use message::{ChatMessage, Role};
pub use provider::{resolve_base_url, ProviderKind};
