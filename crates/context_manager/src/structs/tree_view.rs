use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::structs::conversation::Conversation;
use crate::structs::message::Message;

/// Projection of one message for tree/graph rendering.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationNode {
    pub id: Uuid,
    pub message: Message,
    /// Direct children, oldest first.
    pub children: Vec<Uuid>,
    /// Number of parent hops to the root.
    pub depth: usize,
    pub branch_id: Uuid,
}

impl Conversation {
    /// Direct children of a message, oldest first.
    pub fn get_node_children(&self, message_id: Uuid) -> Vec<Uuid> {
        let mut children: Vec<&Message> = self
            .messages
            .values()
            .filter(|m| m.parent_id == Some(message_id))
            .collect();
        children.sort_by_key(|m| m.timestamp);
        children.into_iter().map(|m| m.id).collect()
    }

    /// Every message with its depth and children, sorted by timestamp.
    pub fn get_all_nodes(&self) -> Vec<ConversationNode> {
        let mut ordered: Vec<&Message> = self.messages.values().collect();
        ordered.sort_by_key(|m| m.timestamp);

        let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for message in &ordered {
            if let Some(parent_id) = message.parent_id {
                children.entry(parent_id).or_default().push(message.id);
            }
        }

        ordered
            .into_iter()
            .map(|message| ConversationNode {
                id: message.id,
                message: message.clone(),
                children: children.remove(&message.id).unwrap_or_default(),
                depth: self.depth_of(message.id),
                branch_id: message.branch_id,
            })
            .collect()
    }

    /// Number of parent links followed to the root. A dangling or repeated
    /// parent still counts as one hop, then the walk stops.
    fn depth_of(&self, message_id: Uuid) -> usize {
        let mut depth = 0;
        let mut visited = HashSet::from([message_id]);
        let mut current = self.messages.get(&message_id).and_then(|m| m.parent_id);

        while let Some(parent_id) = current {
            depth += 1;
            if !visited.insert(parent_id) {
                break;
            }
            let Some(parent) = self.messages.get(&parent_id) else {
                break;
            };
            current = parent.parent_id;
        }

        depth
    }
}
