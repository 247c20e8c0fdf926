//! Tests for the persisted shape of a conversation

use context_manager::{Conversation, Role};
use serde_json::Value;

#[test]
fn test_conversation_roundtrip_preserves_tree() {
    let mut conversation = Conversation::new();
    let q = conversation.add_message("q", Role::User);
    let alt = conversation.create_branch(q, Some("alt")).unwrap();
    conversation.add_message("a", Role::Assistant);

    let json = serde_json::to_string(&conversation).unwrap();
    let restored: Conversation = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.message_count(), 3);
    assert_eq!(restored.active_branch_id(), Some(alt));
    assert_eq!(restored.current_message_chain(), conversation.current_message_chain());
    assert_eq!(restored.branch(alt), conversation.branch(alt));
    assert!(!restored.is_dirty());
}

#[test]
fn test_persisted_fields_are_camel_case() {
    let mut conversation = Conversation::new();
    let q = conversation.add_message("q", Role::User);

    let value = serde_json::to_value(&conversation).unwrap();

    for key in ["messages", "branches", "activeBranchId", "selectedNodeId", "rootMessageId", "currentMessageChain"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert!(value.get("dirty").is_none());

    let message = &value["messages"][q.to_string()];
    assert_eq!(message["role"], Value::from("user"));
    assert_eq!(message["parentId"], Value::from(conversation.root_message_id().unwrap().to_string()));
    assert!(message.get("branchId").is_some());
    assert!(message.get("timestamp").is_some());

    let branch = &value["branches"][conversation.active_branch_id().unwrap().to_string()];
    assert_eq!(branch["name"], Value::from("main"));
    assert_eq!(branch["parentMessageId"], Value::Null);
    assert_eq!(branch["color"], Value::from("#3b82f6"));
}
