pub mod branch;
pub mod conversation;
pub mod conversation_branches;
pub mod message;
pub mod tree_view;
