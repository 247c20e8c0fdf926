//! Tests for the tree projection used by graph views

use context_manager::{Conversation, Role};

#[test]
fn test_all_nodes_report_depth_and_children() {
    let mut conversation = Conversation::new();
    let root = conversation.root_message_id().unwrap();
    let q = conversation.add_message("q", Role::User);
    let a1 = conversation.add_message("a1", Role::Assistant);
    conversation.create_branch(q, Some("alt")).unwrap();
    let a2 = conversation.add_message("a2", Role::Assistant);

    let nodes = conversation.get_all_nodes();
    assert_eq!(nodes.len(), 4);

    let ids: Vec<_> = nodes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![root, q, a1, a2]);

    let depths: Vec<usize> = nodes.iter().map(|n| n.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 2]);

    assert_eq!(nodes[0].children, vec![q]);
    assert_eq!(nodes[1].children, vec![a1, a2]);
    assert!(nodes[3].children.is_empty());
    assert_eq!(nodes[3].branch_id, conversation.active_branch_id().unwrap());
}

#[test]
fn test_node_children_of_leaf_and_unknown() {
    let mut conversation = Conversation::new();
    let leaf = conversation.add_message("leaf", Role::User);

    assert!(conversation.get_node_children(leaf).is_empty());
    assert!(conversation.get_node_children(uuid::Uuid::new_v4()).is_empty());
}

#[test]
fn test_context_nodes_carry_branch_names() {
    let mut conversation = Conversation::new();
    let q = conversation.add_message("q", Role::User);
    conversation.create_branch(q, Some("alt")).unwrap();
    let a = conversation.add_message("a", Role::Assistant);

    let nodes = conversation.context_nodes();
    let node = &nodes[&a.to_string()];

    assert_eq!(node.branch_name.as_deref(), Some("alt"));
    assert_eq!(node.parent_id, Some(q.to_string()));
    assert_eq!(nodes[&q.to_string()].branch_name.as_deref(), Some("main"));
}
