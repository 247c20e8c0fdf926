use std::collections::HashMap;

use chat_core::Role;
use serde::{Deserialize, Serialize};

use crate::structs::conversation::Conversation;
use crate::structs::message::Message;

/// Role of a context node. System prompts are stored as notes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    User,
    Assistant,
    SystemNote,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::User => "user",
            NodeRole::Assistant => "assistant",
            NodeRole::SystemNote => "system_note",
        }
    }

    /// Role used when the node is sent to a model.
    pub fn chat_role(&self) -> Role {
        match self {
            NodeRole::User => Role::User,
            NodeRole::Assistant => Role::Assistant,
            NodeRole::SystemNote => Role::System,
        }
    }
}

impl From<Role> for NodeRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => NodeRole::User,
            Role::Assistant => NodeRole::Assistant,
            Role::System => NodeRole::SystemNote,
        }
    }
}

/// A node as seen by the context assembler.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContextNode {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub parent_id: Option<String>,
    pub role: NodeRole,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tokens_count: Option<u32>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub is_checkpoint: bool,
    #[serde(default)]
    pub branch_name: Option<String>,
}

impl ContextNode {
    pub fn new(id: impl Into<String>, parent_id: Option<String>, role: NodeRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            project_id: None,
            parent_id,
            role,
            content: content.into(),
            summary: None,
            tokens_count: None,
            embedding: None,
            is_checkpoint: false,
            branch_name: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

impl From<&Message> for ContextNode {
    fn from(message: &Message) -> Self {
        ContextNode::new(
            message.id.to_string(),
            message.parent_id.map(|id| id.to_string()),
            message.role.into(),
            message.content.clone(),
        )
    }
}

impl Conversation {
    /// Export every message as a context node keyed by id, tagged with the
    /// name of its branch.
    pub fn context_nodes(&self) -> HashMap<String, ContextNode> {
        self.messages
            .values()
            .map(|message| {
                let mut node = ContextNode::from(message);
                node.branch_name = self.branches.get(&message.branch_id).map(|b| b.name.clone());
                (node.id.clone(), node)
            })
            .collect()
    }
}
