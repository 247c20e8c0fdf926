//! Helpers for folding a branch's conclusions back into another line of the
//! conversation.

use std::collections::{HashMap, HashSet};

use crate::context_assembler::ContextNode;

/// Instruction asking a model to restate a branch's conclusions as a fact for
/// the main line. Each node contributes its summary when present, else its
/// content.
pub fn generate_merge_prompt(branch_nodes: &[&ContextNode]) -> String {
    let branch_content = branch_nodes
        .iter()
        .map(|node| {
            let text = node.summary.as_deref().unwrap_or(&node.content);
            format!("[{}] {}", node.role.as_str(), text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "用户在分支中探索了以下内容：\n\n{branch_content}\n\n请将此分支的核心结论作为一个事实陈述，整合进主干的当前上下文中。保持语言简洁明了，只包含最重要的信息。"
    )
}

pub fn get_branch_root<'a>(branch_id: &str, nodes: &'a HashMap<String, ContextNode>) -> Option<&'a ContextNode> {
    nodes.get(branch_id)
}

/// `branch_root_id` and all of its descendants, depth first. Siblings are
/// visited in id order.
pub fn get_branch_nodes<'a>(branch_root_id: &str, nodes: &'a HashMap<String, ContextNode>) -> Vec<&'a ContextNode> {
    let mut children: HashMap<&str, Vec<&ContextNode>> = HashMap::new();
    for node in nodes.values() {
        if let Some(parent) = node.parent_id.as_deref() {
            children.entry(parent).or_default().push(node);
        }
    }
    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| a.id.cmp(&b.id));
    }

    let mut collected = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<&ContextNode> = nodes.get(branch_root_id).into_iter().collect();

    while let Some(node) = stack.pop() {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        collected.push(node);
        if let Some(kids) = children.get(node.id.as_str()) {
            stack.extend(kids.iter().rev());
        }
    }

    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context_assembler::NodeRole;

    fn nodes() -> HashMap<String, ContextNode> {
        [
            ContextNode::new("r", None, NodeRole::User, "root question"),
            ContextNode::new("a", Some("r".into()), NodeRole::Assistant, "answer a"),
            ContextNode::new("b", Some("r".into()), NodeRole::Assistant, "answer b").with_summary("short b"),
            ContextNode::new("a1", Some("a".into()), NodeRole::User, "follow up"),
            ContextNode::new("x", None, NodeRole::User, "unrelated"),
        ]
        .into_iter()
        .map(|n| (n.id.clone(), n))
        .collect()
    }

    #[test]
    fn branch_nodes_are_depth_first() {
        let nodes = nodes();
        let ids: Vec<&str> = get_branch_nodes("r", &nodes).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["r", "a", "a1", "b"]);
    }

    #[test]
    fn unknown_root_yields_nothing() {
        let nodes = nodes();
        assert!(get_branch_nodes("missing", &nodes).is_empty());
        assert!(get_branch_root("missing", &nodes).is_none());
        assert_eq!(get_branch_root("x", &nodes).map(|n| n.content.as_str()), Some("unrelated"));
    }

    #[test]
    fn merge_prompt_prefers_summaries() {
        let nodes = nodes();
        let branch = get_branch_nodes("r", &nodes);
        let prompt = generate_merge_prompt(&branch);

        assert!(prompt.starts_with("用户在分支中探索了以下内容：\n\n[user] root question\n"));
        assert!(prompt.contains("[assistant] short b"));
        assert!(!prompt.contains("answer b"));
    }
}
