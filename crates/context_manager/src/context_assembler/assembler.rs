use std::collections::HashMap;

use chat_core::ChatMessage;

use super::embedding::{Embedder, RandomEmbedder};
use super::node::ContextNode;
use super::pruning::{dynamic_pruning, get_path_from_root, DEFAULT_RECENT_WINDOW};
use super::search::{search_relevant_nodes_with, DEFAULT_TOP_K};

pub const RELEVANT_SNIPPETS_HEADER: &str = "以下是相关的历史对话片段，仅供参考：\n";

/// Path pruning plus relevant-snippet search, with a pluggable embedder.
pub struct ContextAssembler {
    embedder: Box<dyn Embedder>,
    recent_window: usize,
    top_k: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self {
            embedder: Box::new(RandomEmbedder::default()),
            recent_window: DEFAULT_RECENT_WINDOW,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl ContextAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embedder(mut self, embedder: impl Embedder + 'static) -> Self {
        self.embedder = Box::new(embedder);
        self
    }

    pub fn with_recent_window(mut self, k: usize) -> Self {
        self.recent_window = k;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Pruned path to `current_node_id`, followed by one system message that
    /// lists the relevant snippets when the search finds any.
    pub fn assemble(
        &self,
        current_node_id: &str,
        nodes: &HashMap<String, ContextNode>,
        query: &str,
    ) -> Vec<ChatMessage> {
        let path = get_path_from_root(current_node_id, nodes);
        let mut context = dynamic_pruning(&path, self.recent_window);

        // Sorted so the candidate order does not depend on hash order.
        let mut candidates: Vec<&ContextNode> = nodes.values().collect();
        candidates.sort_by(|a, b| a.id.cmp(&b.id));

        let relevant = search_relevant_nodes_with(self.embedder.as_ref(), query, &candidates, self.top_k);
        if !relevant.is_empty() {
            let snippets = relevant
                .iter()
                .map(|node| format!("[{}] {}", node.role.as_str(), node.content))
                .collect::<Vec<_>>()
                .join("\n");
            context.push(ChatMessage::system(format!("{RELEVANT_SNIPPETS_HEADER}{snippets}")));
        }

        tracing::debug!(
            current_node_id,
            path_len = path.len(),
            context_len = context.len(),
            relevant = relevant.len(),
            "ContextAssembler: Assembled context"
        );

        context
    }
}

/// [`ContextAssembler::assemble`] with the default window, top-K and stub embedder.
pub fn assemble_context(
    current_node_id: &str,
    nodes: &HashMap<String, ContextNode>,
    query: &str,
) -> Vec<ChatMessage> {
    ContextAssembler::default().assemble(current_node_id, nodes, query)
}
