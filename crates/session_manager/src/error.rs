//! Session manager error types

use context_manager::ContextError;
use llm_client::LLMError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The blob was written by a newer client.
    #[error("Unsupported version {found} for '{key}' (supported up to {supported})")]
    UnsupportedVersion { key: String, found: u32, supported: u32 },

    #[error("Conversation error: {0}")]
    Context(#[from] ContextError),

    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// A conversation change that was applied in memory but could not be
/// written. `value` is what the update returned; the conversation stays
/// marked unsaved until a later write succeeds.
#[derive(Error, Debug)]
#[error("Change applied but not saved: {error}")]
pub struct Unsaved<R: std::fmt::Debug> {
    pub value: R,
    #[source]
    pub error: SessionError,
}

impl<R: std::fmt::Debug> From<Unsaved<R>> for SessionError {
    fn from(unsaved: Unsaved<R>) -> Self {
        unsaved.error
    }
}
