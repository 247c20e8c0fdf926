use std::collections::HashSet;

use uuid::Uuid;

use crate::error::ContextError;
use crate::structs::branch::{pick_branch_color, Branch, MAIN_BRANCH_NAME};
use crate::structs::conversation::Conversation;
use crate::structs::message::Message;

impl Conversation {
    /// Fork a new branch at `from_message_id` and make it active.
    ///
    /// Returns `None` when the source message does not exist. The new branch
    /// starts without messages of its own, so the chain becomes the ancestor
    /// chain ending at the fork point.
    pub fn create_branch(&mut self, from_message_id: Uuid, name: Option<&str>) -> Option<Uuid> {
        let Some(parent_branch_id) = self.messages.get(&from_message_id).map(|m| m.branch_id)
        else {
            tracing::debug!(
                from_message_id = %from_message_id,
                "Conversation: create_branch from unknown message"
            );
            return None;
        };

        let existing = self.branches.len();
        let color = pick_branch_color(self.branches.values().map(|b| b.color.as_str()), existing);
        let name = name
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("branch-{existing}"));

        let branch_id = Uuid::new_v4();
        let branch = Branch {
            id: branch_id,
            name,
            parent_branch_id: Some(parent_branch_id),
            parent_message_id: Some(from_message_id),
            created_at: self.next_timestamp(),
            color: color.to_string(),
        };

        tracing::info!(
            branch_id = %branch_id,
            name = %branch.name,
            parent_branch_id = %parent_branch_id,
            fork_point = %from_message_id,
            color = %branch.color,
            "Conversation: Creating branch"
        );

        self.branches.insert(branch_id, branch);
        self.active_branch_id = Some(branch_id);
        self.current_message_chain = self.chain_ids(from_message_id);

        self.mark_dirty();

        Some(branch_id)
    }

    /// Activate a branch and rebuild the chain: the ancestor chain up to the
    /// branch's fork point, followed by the branch's own messages by time.
    ///
    /// Returns `false` (and changes nothing) for an unknown branch.
    pub fn switch_branch(&mut self, branch_id: Uuid) -> bool {
        let Some(fork_point) = self.branches.get(&branch_id).map(|b| b.parent_message_id) else {
            tracing::debug!(branch_id = %branch_id, "Conversation: switch_branch to unknown branch");
            return false;
        };

        let mut chain = fork_point
            .map(|message_id| self.chain_ids(message_id))
            .unwrap_or_default();
        chain.extend(self.get_branch_messages(branch_id).iter().map(|m| m.id));

        tracing::info!(
            branch_id = %branch_id,
            chain_len = chain.len(),
            "Conversation: Switched branch"
        );

        self.active_branch_id = Some(branch_id);
        self.current_message_chain = chain;

        self.mark_dirty();

        true
    }

    /// Messages owned by a branch, oldest first.
    pub fn get_branch_messages(&self, branch_id: Uuid) -> Vec<&Message> {
        let mut messages: Vec<&Message> = self
            .messages
            .values()
            .filter(|m| m.branch_id == branch_id)
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        messages
    }

    /// All branches, oldest first.
    pub fn get_all_branches(&self) -> Vec<&Branch> {
        let mut branches: Vec<&Branch> = self.branches.values().collect();
        branches.sort_by_key(|b| b.created_at);
        branches
    }

    /// Returns `false` for an unknown branch.
    pub fn rename_branch(&mut self, branch_id: Uuid, new_name: impl Into<String>) -> bool {
        let Some(branch) = self.branches.get_mut(&branch_id) else {
            return false;
        };
        branch.name = new_name.into();

        tracing::info!(branch_id = %branch_id, name = %branch.name, "Conversation: Renamed branch");

        self.mark_dirty();
        true
    }

    /// Delete a branch, every branch forked (directly or transitively) from
    /// it, and all messages those branches own.
    ///
    /// If the active branch is among them, `main` is activated first. The
    /// root branch cannot be deleted. Unknown ids delete nothing. Returns the
    /// ids of the removed branches.
    pub fn delete_branch(&mut self, branch_id: Uuid) -> Result<Vec<Uuid>, ContextError> {
        let Some(branch) = self.branches.get(&branch_id) else {
            return Ok(Vec::new());
        };
        if branch.is_root() {
            tracing::warn!(branch_id = %branch_id, "Conversation: Refusing to delete root branch");
            return Err(ContextError::CannotDeleteRootBranch(branch_id));
        }

        let doomed = self.branch_with_descendants(branch_id);

        if self
            .active_branch_id
            .is_some_and(|active| doomed.contains(&active))
        {
            if let Some(fallback) = self.fallback_branch(&doomed) {
                self.switch_branch(fallback);
            }
        }

        let before = self.messages.len();
        self.messages.retain(|_, m| !doomed.contains(&m.branch_id));
        self.branches.retain(|id, _| !doomed.contains(id));

        let messages = &self.messages;
        self.current_message_chain.retain(|id| messages.contains_key(id));
        if self
            .selected_node_id
            .is_some_and(|id| !messages.contains_key(&id))
        {
            self.selected_node_id = None;
        }

        tracing::info!(
            branch_id = %branch_id,
            branches_removed = doomed.len(),
            messages_removed = before - self.messages.len(),
            "Conversation: Deleted branch"
        );

        self.mark_dirty();

        Ok(doomed.into_iter().collect())
    }

    fn branch_with_descendants(&self, branch_id: Uuid) -> HashSet<Uuid> {
        let mut doomed = HashSet::from([branch_id]);
        loop {
            let before = doomed.len();
            for branch in self.branches.values() {
                if branch
                    .parent_branch_id
                    .is_some_and(|parent| doomed.contains(&parent))
                {
                    doomed.insert(branch.id);
                }
            }
            if doomed.len() == before {
                return doomed;
            }
        }
    }

    /// A surviving branch named `main`, else the root branch.
    fn fallback_branch(&self, doomed: &HashSet<Uuid>) -> Option<Uuid> {
        self.get_all_branches()
            .into_iter()
            .find(|b| b.name == MAIN_BRANCH_NAME && !doomed.contains(&b.id))
            .map(|b| b.id)
            .or_else(|| self.root_branch_id())
    }
}
