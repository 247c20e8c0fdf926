use std::collections::{HashMap, HashSet};

use chat_core::{ChatMessage, Role};

use super::node::{ContextNode, NodeRole};

/// Number of trailing path entries kept verbatim.
pub const DEFAULT_RECENT_WINDOW: usize = 5;

pub const SUMMARY_PREFIX: &str = "[摘要] ";

/// Walk from `node_id` to the root of `nodes`, returned root first.
///
/// An unknown id yields an empty path; a dangling or repeated parent ends it.
pub fn get_path_from_root<'a>(node_id: &str, nodes: &'a HashMap<String, ContextNode>) -> Vec<&'a ContextNode> {
    let mut path = Vec::new();
    let mut visited = HashSet::new();
    let mut current = nodes.get(node_id);

    while let Some(node) = current {
        if !visited.insert(node.id.as_str()) {
            break;
        }
        path.push(node);
        current = node.parent_id.as_deref().and_then(|parent| nodes.get(parent));
    }

    path.reverse();
    path
}

/// Bound the size of a path before it is sent to a model.
///
/// The first system note goes out first as a system message. Every other
/// non-system node is kept verbatim when it sits in the last `k` entries of
/// the path, replaced by its summary when it has one, and dropped otherwise.
pub fn dynamic_pruning(path: &[&ContextNode], k: usize) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(path.len());

    if let Some(system) = path.iter().find(|node| node.role == NodeRole::SystemNote) {
        messages.push(ChatMessage::system(system.content.clone()));
    }

    let recent_from = path.len().saturating_sub(k);
    for (index, node) in path.iter().enumerate() {
        if node.role == NodeRole::SystemNote {
            continue;
        }

        if index >= recent_from {
            messages.push(ChatMessage::new(node.role.chat_role(), node.content.clone()));
        } else if let Some(summary) = &node.summary {
            messages.push(ChatMessage::new(Role::Assistant, format!("{SUMMARY_PREFIX}{summary}")));
        }
    }

    messages
}
