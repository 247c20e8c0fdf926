use chat_core::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A node of the conversation tree.
///
/// Parent links are ids into the owning `Conversation`, never pointers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// `None` only for the synthetic root message.
    pub parent_id: Option<Uuid>,
    /// Branch that was active when the message was created.
    pub branch_id: Uuid,
}

impl Message {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
