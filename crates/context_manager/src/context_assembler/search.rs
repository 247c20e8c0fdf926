use std::cmp::Ordering;

use super::embedding::{cosine_similarity, Embedder, RandomEmbedder};
use super::node::ContextNode;

pub const DEFAULT_TOP_K: usize = 3;

/// Rank `nodes` against `query` with the random stub embedder.
pub fn search_relevant_nodes<'a>(query: &str, nodes: &[&'a ContextNode], top_k: usize) -> Vec<&'a ContextNode> {
    search_relevant_nodes_with(&RandomEmbedder::default(), query, nodes, top_k)
}

/// Top `top_k` nodes by cosine similarity between the query vector and each
/// node's stored embedding. Nodes without an embedding score zero; ties keep
/// input order.
pub fn search_relevant_nodes_with<'a>(
    embedder: &dyn Embedder,
    query: &str,
    nodes: &[&'a ContextNode],
    top_k: usize,
) -> Vec<&'a ContextNode> {
    if top_k == 0 || nodes.is_empty() {
        return Vec::new();
    }

    let query_vector = embedder.embed(query);
    let mut scored: Vec<(f32, &ContextNode)> = nodes
        .iter()
        .map(|node| {
            let score = node
                .embedding
                .as_deref()
                .map(|embedding| cosine_similarity(&query_vector, embedding))
                .unwrap_or(0.0);
            (score, *node)
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.into_iter().take(top_k).map(|(_, node)| node).collect()
}
