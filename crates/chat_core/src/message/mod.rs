//! Message module - Wire-level message types
//!
//! Shared message types used across the system.

mod chat;

pub use chat::{ChatMessage, Role};
