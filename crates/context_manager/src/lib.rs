//! `context_manager` models a conversation as a branching tree of messages
//! and reconstructs the linear context sent to a language model from any
//! point in that tree.

// Declare the modules
pub mod context_assembler;
pub mod error;
pub mod merge;
pub mod structs;
pub mod tokens;

// Re-export the public API
pub use chat_core::{ChatMessage, Role};
pub use context_assembler::{
    assemble_context, dynamic_pruning, get_path_from_root, search_relevant_nodes,
    ContextAssembler, ContextNode, Embedder, NodeRole, RandomEmbedder,
};
pub use error::ContextError;
pub use merge::{generate_merge_prompt, get_branch_nodes, get_branch_root};
pub use structs::branch::{Branch, BRANCH_COLORS, MAIN_BRANCH_NAME};
pub use structs::conversation::Conversation;
pub use structs::message::Message;
pub use structs::tree_view::ConversationNode;
pub use tokens::{calculate_tokens, estimate_tokens, should_generate_summary};
