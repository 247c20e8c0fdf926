//! llm_client - Talks to the chat proxy
//!
//! - `client` - [`ProxyChatClient`], the reqwest implementation of [`ChatProvider`]
//! - `sse` - Pull-based decoding of OpenAI-compatible SSE bodies into content deltas
//! - `tasks` - Title, summary and branch-merge requests built on any provider

pub mod client;
pub mod error;
pub mod provider;
pub mod sse;
pub mod tasks;
pub mod types;

pub use client::ProxyChatClient;
pub use error::{LLMError, Result};
pub use provider::{ChatProvider, DeltaStream};
pub use sse::{delta_stream, SseDeltaDecoder, SseDeltas};
pub use tasks::{generate_summary, generate_title, perform_semantic_merge, MergeOutcome};
pub use types::{ChatOptions, ChatResponse, ProxyChatRequest, Usage};
