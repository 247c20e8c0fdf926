//! Context assembly
//!
//! Turns a node map (for example the export of a `Conversation`) into the
//! message list submitted to a model: walk the path to the root, prune older
//! entries down to summaries, and optionally append "relevant" snippets found
//! by similarity search.

mod assembler;
mod embedding;
mod node;
mod pruning;
mod search;

pub use assembler::{assemble_context, ContextAssembler, RELEVANT_SNIPPETS_HEADER};
pub use embedding::{cosine_similarity, Embedder, RandomEmbedder, EMBEDDING_DIMENSION};
pub use node::{ContextNode, NodeRole};
pub use pruning::{dynamic_pruning, get_path_from_root, DEFAULT_RECENT_WINDOW, SUMMARY_PREFIX};
pub use search::{search_relevant_nodes, search_relevant_nodes_with, DEFAULT_TOP_K};
