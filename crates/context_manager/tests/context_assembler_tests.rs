//! Tests for context assembly over a conversation export

use std::collections::HashMap;

use context_manager::{
    assemble_context, dynamic_pruning, get_path_from_root, ContextAssembler, ContextNode, Conversation, Embedder,
    NodeRole, Role,
};

struct KeywordEmbedder;

impl Embedder for KeywordEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        vec![
            if text.contains("rust") { 1.0 } else { 0.0 },
            if text.contains("tea") { 1.0 } else { 0.0 },
        ]
    }
}

fn seven_entry_path() -> HashMap<String, ContextNode> {
    let mut nodes = HashMap::new();
    nodes.insert("n0".to_string(), ContextNode::new("n0", None, NodeRole::SystemNote, "be brief"));
    let mut parent = "n0".to_string();
    for i in 1..7 {
        let id = format!("n{i}");
        let role = if i % 2 == 1 { NodeRole::User } else { NodeRole::Assistant };
        let mut node = ContextNode::new(id.clone(), Some(parent.clone()), role, format!("content {i}"));
        if i == 1 {
            node = node.with_summary("first question");
        }
        nodes.insert(id.clone(), node);
        parent = id;
    }
    nodes
}

#[test]
fn test_pruning_seven_entries_with_window_five() {
    let mut nodes = seven_entry_path();
    nodes.get_mut("n1").unwrap().summary = None;
    let path = get_path_from_root("n6", &nodes);
    assert_eq!(path.len(), 7);

    let messages = dynamic_pruning(&path, 5);
    let rendered: Vec<(Role, &str)> = messages.iter().map(|m| (m.role, m.content.as_str())).collect();

    assert_eq!(
        rendered,
        vec![
            (Role::System, "be brief"),
            (Role::Assistant, "content 2"),
            (Role::User, "content 3"),
            (Role::Assistant, "content 4"),
            (Role::User, "content 5"),
            (Role::Assistant, "content 6"),
        ]
    );
}

#[test]
fn test_pruning_summarizes_older_entries() {
    let nodes = seven_entry_path();
    let path = get_path_from_root("n6", &nodes);

    let messages = dynamic_pruning(&path, 3);
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();

    assert_eq!(
        contents,
        vec!["be brief", "[摘要] first question", "content 4", "content 5", "content 6"]
    );
}

#[test]
fn test_assembler_appends_relevant_snippets() {
    let mut nodes = seven_entry_path();
    nodes.insert(
        "side".to_string(),
        ContextNode::new("side", None, NodeRole::User, "what about rust lifetimes")
            .with_embedding(vec![1.0, 0.0]),
    );

    let assembler = ContextAssembler::new()
        .with_embedder(KeywordEmbedder)
        .with_top_k(1);
    let messages = assembler.assemble("n6", &nodes, "rust");

    let last = messages.last().unwrap();
    assert_eq!(last.role, Role::System);
    assert_eq!(
        last.content,
        "以下是相关的历史对话片段，仅供参考：\n[user] what about rust lifetimes"
    );
}

#[test]
fn test_assembler_without_matches_only_prunes() {
    let nodes = seven_entry_path();
    let assembler = ContextAssembler::new()
        .with_embedder(KeywordEmbedder)
        .with_top_k(0);

    let messages = assembler.assemble("n6", &nodes, "rust");
    assert_eq!(messages.len(), 7);
    assert_eq!(messages[1].content, "[摘要] first question");
    assert_eq!(messages[1].role, Role::Assistant);
}

#[test]
fn test_assemble_from_conversation_export() {
    let mut conversation = Conversation::new();
    conversation.add_message("hi", Role::User);
    let reply = conversation.add_message("hello", Role::Assistant);

    let nodes = conversation.context_nodes();
    let messages = ContextAssembler::new()
        .with_top_k(0)
        .assemble(&reply.to_string(), &nodes, "hi");

    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["", "hi", "hello"]);
}

#[test]
fn test_assemble_context_defaults() {
    let nodes = seven_entry_path();
    let messages = assemble_context("n6", &nodes, "anything");

    // Window of 5, and the stub embedder scores every node without an
    // embedding as zero, so the first three ids win.
    assert_eq!(messages.len(), 8);
    assert_eq!(messages[1].content, "[摘要] first question");
    assert_eq!(messages[6].content, "content 6");

    let snippet = messages.last().unwrap();
    assert_eq!(snippet.role, Role::System);
    assert_eq!(
        snippet.content,
        "以下是相关的历史对话片段，仅供参考：\n[system_note] be brief\n[user] content 1\n[assistant] content 2"
    );
}
