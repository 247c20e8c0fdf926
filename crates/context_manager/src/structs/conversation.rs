use std::collections::{HashMap, HashSet};

use chat_core::Role;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::structs::branch::{Branch, BRANCH_COLORS, MAIN_BRANCH_NAME};
use crate::structs::message::Message;

/// The message/branch store of one conversation.
///
/// Messages live in a flat pool keyed by id; the tree is expressed through
/// `parent_id` links. `current_message_chain` is a view (root first) that is
/// recomputed whenever the active branch or the selection changes.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub(crate) messages: HashMap<Uuid, Message>,
    pub(crate) branches: HashMap<Uuid, Branch>,
    pub(crate) active_branch_id: Option<Uuid>,
    pub(crate) selected_node_id: Option<Uuid>,
    pub(crate) root_message_id: Option<Uuid>,
    pub(crate) current_message_chain: Vec<Uuid>,

    /// Last timestamp handed out; keeps timestamp ordering strict.
    #[serde(skip)]
    pub(crate) last_timestamp: Option<DateTime<Utc>>,

    /// Runtime flag to track if the conversation needs persistence (not serialized).
    #[serde(skip)]
    pub(crate) dirty: bool,
}

impl Conversation {
    /// A conversation holding a `main` branch and its empty system root.
    pub fn new() -> Self {
        let mut conversation = Self::default();
        conversation.init_conversation();
        conversation
    }

    /// Reset to one root branch named `main` with one empty system message.
    ///
    /// Every call allocates fresh identifiers.
    pub fn init_conversation(&mut self) {
        self.reset();
    }

    fn reset(&mut self) -> Uuid {
        let root_branch_id = Uuid::new_v4();
        let root_message_id = Uuid::new_v4();
        let now = self.next_timestamp();

        let root_message = Message {
            id: root_message_id,
            role: Role::System,
            content: String::new(),
            timestamp: now,
            parent_id: None,
            branch_id: root_branch_id,
        };

        let root_branch = Branch {
            id: root_branch_id,
            name: MAIN_BRANCH_NAME.to_string(),
            parent_branch_id: None,
            parent_message_id: None,
            created_at: now,
            color: BRANCH_COLORS[0].to_string(),
        };

        self.messages = HashMap::from([(root_message_id, root_message)]);
        self.branches = HashMap::from([(root_branch_id, root_branch)]);
        self.active_branch_id = Some(root_branch_id);
        self.selected_node_id = None;
        self.root_message_id = Some(root_message_id);
        self.current_message_chain = vec![root_message_id];

        tracing::info!(
            root_branch_id = %root_branch_id,
            root_message_id = %root_message_id,
            "Conversation: Initialized"
        );

        self.mark_dirty();

        root_branch_id
    }

    /// Append a message after the last entry of the current chain, owned by
    /// the active branch. Content is not validated.
    pub fn add_message(&mut self, content: impl Into<String>, role: Role) -> Uuid {
        let active_branch_id = match self.active_branch_id {
            Some(id) => id,
            None => {
                tracing::warn!("Conversation: add_message before initialization, initializing");
                self.reset()
            }
        };

        let content = content.into();
        let message_id = Uuid::new_v4();
        let parent_id = self.current_message_chain.last().copied();

        tracing::info!(
            message_id = %message_id,
            parent_id = ?parent_id,
            branch_id = %active_branch_id,
            role = %role,
            content_len = content.len(),
            "Conversation: Adding message"
        );

        let message = Message {
            id: message_id,
            role,
            content,
            timestamp: self.next_timestamp(),
            parent_id,
            branch_id: active_branch_id,
        };
        self.messages.insert(message_id, message);
        self.current_message_chain.push(message_id);

        self.mark_dirty();

        message_id
    }

    /// Walk parent links from `message_id` up to the root, returned root first.
    ///
    /// Unknown ids yield an empty chain; a dangling parent ends the walk
    /// silently, as does a revisited id.
    pub fn get_message_chain(&self, message_id: Uuid) -> Vec<&Message> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(message_id);

        while let Some(id) = current {
            if !visited.insert(id) {
                tracing::warn!(message_id = %id, "Conversation: Cycle detected in parent links");
                break;
            }
            let Some(message) = self.messages.get(&id) else {
                break;
            };
            chain.push(message);
            current = message.parent_id;
        }

        chain.reverse();
        chain
    }

    pub(crate) fn chain_ids(&self, message_id: Uuid) -> Vec<Uuid> {
        self.get_message_chain(message_id)
            .into_iter()
            .map(|message| message.id)
            .collect()
    }

    /// Jump to a message: activate its branch if needed, then truncate the
    /// chain view so it ends at that message. Stored messages are untouched.
    pub fn select_node(&mut self, message_id: Uuid) {
        let Some(branch_id) = self.messages.get(&message_id).map(|m| m.branch_id) else {
            tracing::debug!(message_id = %message_id, "Conversation: select_node on unknown message");
            return;
        };

        if Some(branch_id) != self.active_branch_id {
            self.switch_branch(branch_id);
        }

        self.current_message_chain = self.chain_ids(message_id);
        self.selected_node_id = Some(message_id);

        tracing::debug!(
            message_id = %message_id,
            chain_len = self.current_message_chain.len(),
            "Conversation: Node selected"
        );

        self.mark_dirty();
    }

    pub fn message(&self, message_id: Uuid) -> Option<&Message> {
        self.messages.get(&message_id)
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn branch(&self, branch_id: Uuid) -> Option<&Branch> {
        self.branches.get(&branch_id)
    }

    pub fn active_branch_id(&self) -> Option<Uuid> {
        self.active_branch_id
    }

    pub fn active_branch(&self) -> Option<&Branch> {
        self.active_branch_id.and_then(|id| self.branches.get(&id))
    }

    pub fn selected_node_id(&self) -> Option<Uuid> {
        self.selected_node_id
    }

    pub fn root_message_id(&self) -> Option<Uuid> {
        self.root_message_id
    }

    pub fn root_branch_id(&self) -> Option<Uuid> {
        self.branches
            .values()
            .find(|branch| branch.is_root())
            .map(|branch| branch.id)
    }

    /// The current context, root first.
    pub fn current_message_chain(&self) -> &[Uuid] {
        &self.current_message_chain
    }

    /// The current chain resolved to messages, skipping ids that no longer resolve.
    pub fn current_messages(&self) -> Vec<&Message> {
        self.current_message_chain
            .iter()
            .filter_map(|id| self.messages.get(id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// `Utc::now()`, nudged forward so it is strictly later than anything
    /// already stamped in this conversation.
    pub(crate) fn next_timestamp(&mut self) -> DateTime<Utc> {
        let floor = self.last_timestamp.or_else(|| {
            self.messages
                .values()
                .map(|m| m.timestamp)
                .chain(self.branches.values().map(|b| b.created_at))
                .max()
        });

        let now = Utc::now();
        let stamp = match floor {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(stamp);
        stamp
    }
}
