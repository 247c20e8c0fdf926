//! Tests for the message store: initialization, appending and chains

use context_manager::{Conversation, Role, MAIN_BRANCH_NAME};

#[test]
fn test_init_creates_main_branch_with_empty_root() {
    let conversation = Conversation::new();

    let branch = conversation.active_branch().unwrap();
    assert_eq!(branch.name, MAIN_BRANCH_NAME);
    assert!(branch.is_root());
    assert_eq!(conversation.get_all_branches().len(), 1);

    let root_id = conversation.root_message_id().unwrap();
    let root = conversation.message(root_id).unwrap();
    assert_eq!(root.role, Role::System);
    assert!(root.content.is_empty());
    assert!(root.parent_id.is_none());
    assert_eq!(conversation.current_message_chain(), &[root_id]);
}

#[test]
fn test_init_is_a_full_reset() {
    let mut conversation = Conversation::new();
    let first_root = conversation.root_message_id().unwrap();
    conversation.add_message("hi", Role::User);

    conversation.init_conversation();

    assert_eq!(conversation.message_count(), 1);
    assert_ne!(conversation.root_message_id(), Some(first_root));
}

#[test]
fn test_add_message_extends_chain_by_one() {
    let mut conversation = Conversation::new();
    let before = conversation.current_message_chain().to_vec();

    let id = conversation.add_message("hi", Role::User);

    let after = conversation.current_message_chain();
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(after.last(), Some(&id));

    let message = conversation.message(id).unwrap();
    assert_eq!(message.parent_id, before.last().copied());
    assert_eq!(Some(message.branch_id), conversation.active_branch_id());
}

#[test]
fn test_add_message_accepts_empty_content() {
    let mut conversation = Conversation::new();
    let id = conversation.add_message("", Role::Assistant);
    assert_eq!(conversation.message(id).unwrap().content, "");
}

#[test]
fn test_message_chain_links_parents() {
    let mut conversation = Conversation::new();
    let ids: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|content| conversation.add_message(*content, Role::User))
        .collect();

    let chain = conversation.get_message_chain(ids[2]);
    assert_eq!(chain.first().map(|m| m.id), conversation.root_message_id());
    assert_eq!(chain.last().map(|m| m.id), Some(ids[2]));
    for pair in chain.windows(2) {
        assert_eq!(pair[1].parent_id, Some(pair[0].id));
    }
}

#[test]
fn test_message_chain_of_unknown_id_is_empty() {
    let conversation = Conversation::new();
    assert!(conversation.get_message_chain(uuid::Uuid::new_v4()).is_empty());
}

#[test]
fn test_select_node_truncates_view_only() {
    let mut conversation = Conversation::new();
    let a = conversation.add_message("a", Role::User);
    conversation.add_message("b", Role::Assistant);
    conversation.add_message("c", Role::User);

    conversation.select_node(a);

    let root = conversation.root_message_id().unwrap();
    assert_eq!(conversation.current_message_chain(), &[root, a]);
    assert_eq!(conversation.selected_node_id(), Some(a));
    assert_eq!(conversation.message_count(), 4);
}

#[test]
fn test_add_after_select_forks_in_place() {
    let mut conversation = Conversation::new();
    let a = conversation.add_message("a", Role::User);
    let b = conversation.add_message("b", Role::Assistant);

    conversation.select_node(a);
    let c = conversation.add_message("c", Role::Assistant);

    assert_eq!(conversation.message(c).unwrap().parent_id, Some(a));
    assert_eq!(conversation.get_node_children(a), vec![b, c]);
}

#[test]
fn test_select_unknown_node_is_noop() {
    let mut conversation = Conversation::new();
    conversation.add_message("a", Role::User);
    let chain = conversation.current_message_chain().to_vec();

    conversation.select_node(uuid::Uuid::new_v4());

    assert_eq!(conversation.current_message_chain(), chain.as_slice());
    assert!(conversation.selected_node_id().is_none());
}
