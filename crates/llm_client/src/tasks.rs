//! Auxiliary requests: titles, summaries and semantic merges.
//!
//! These never fail. Errors are logged and replaced with fixed fallbacks so
//! callers can use the result directly in the UI.

use chat_core::ChatMessage;
use context_manager::{generate_merge_prompt, ContextNode};
use serde::{Deserialize, Serialize};

use crate::provider::ChatProvider;
use crate::types::ChatOptions;

pub const TITLE_FALLBACK: &str = "新对话";
pub const SUMMARY_FALLBACK: &str = "[摘要生成失败]";
pub const MERGE_FAILURE: &str = "合并失败，请稍后重试";

const TITLE_SOURCE_CHARS: usize = 200;

const TITLE_SYSTEM_PROMPT: &str = "你是一个对话标题生成助手。请根据用户的输入生成一个简短的标题（不超过20个字），直接返回标题文本，不要添加任何解释。";
const SUMMARY_SYSTEM_PROMPT: &str = "你是一个对话摘要助手。请将以下对话内容总结为简洁的摘要，保留关键信息和决策点。摘要长度控制在200字以内。";

/// Short title for a conversation, from the first 200 characters of `content`.
pub async fn generate_title<P: ChatProvider + ?Sized>(provider: &P, content: &str) -> String {
    let excerpt: String = content.chars().take(TITLE_SOURCE_CHARS).collect();
    let messages = [
        ChatMessage::system(TITLE_SYSTEM_PROMPT),
        ChatMessage::user(format!("请为以下对话内容生成标题：\n\n{excerpt}")),
    ];
    let options = ChatOptions::default().with_temperature(0.5).with_max_tokens(50);

    match provider.chat(&messages, &options).await {
        Ok(response) => {
            let title = response.content.trim();
            if title.is_empty() {
                TITLE_FALLBACK.to_string()
            } else {
                title.to_string()
            }
        }
        Err(e) => {
            log::warn!("Title generation failed: {}", e);
            TITLE_FALLBACK.to_string()
        }
    }
}

/// Condensed summary of `messages`, used to prune long contexts.
pub async fn generate_summary<P: ChatProvider + ?Sized>(provider: &P, messages: &[ChatMessage]) -> String {
    let transcript = messages
        .iter()
        .map(|message| format!("{}: {}", message.role, message.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    let request = [
        ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(transcript),
    ];
    let options = ChatOptions::default().with_temperature(0.3).with_max_tokens(300);

    match provider.chat(&request, &options).await {
        Ok(response) => response.content.trim().to_string(),
        Err(e) => {
            log::warn!("Summary generation failed: {}", e);
            SUMMARY_FALLBACK.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MergeOutcome {
    fn merged(content: String) -> Self {
        Self {
            success: true,
            merged_content: Some(content),
            error: None,
        }
    }

    fn failed() -> Self {
        Self {
            success: false,
            merged_content: None,
            error: Some(MERGE_FAILURE.to_string()),
        }
    }
}

/// Ask the model to restate a branch's conclusions as a fact that can be
/// attached at `target_node_id` on another line of the conversation.
pub async fn perform_semantic_merge<P: ChatProvider + ?Sized>(
    provider: &P,
    branch_id: &str,
    target_node_id: &str,
    branch_nodes: &[&ContextNode],
) -> MergeOutcome {
    let prompt = generate_merge_prompt(branch_nodes);
    log::debug!(
        "Merging branch {} ({} nodes) into {}",
        branch_id,
        branch_nodes.len(),
        target_node_id
    );

    match provider.chat(&[ChatMessage::user(prompt)], &ChatOptions::default()).await {
        Ok(response) => {
            let content = response.content.trim();
            if content.is_empty() {
                log::warn!("Merge of branch {} returned no content", branch_id);
                MergeOutcome::failed()
            } else {
                MergeOutcome::merged(content.to_string())
            }
        }
        Err(e) => {
            log::warn!("Merge of branch {} failed: {}", branch_id, e);
            MergeOutcome::failed()
        }
    }
}
