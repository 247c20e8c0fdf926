use std::pin::Pin;

use async_trait::async_trait;
use chat_core::ChatMessage;
use futures::Stream;

use crate::error::Result;
use crate::types::{ChatOptions, ChatResponse};

/// Content deltas of a streamed reply, in arrival order.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Single-shot completion.
    async fn chat(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<ChatResponse>;

    /// Streamed completion. The stream ends at the end-of-stream sentinel or
    /// when the body closes.
    async fn chat_stream(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<DeltaStream>;
}
