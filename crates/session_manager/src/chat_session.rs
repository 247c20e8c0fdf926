//! Driving one conversation against a chat provider

use crate::error::Result;
use chat_core::config::DEFAULT_SYSTEM_PROMPT;
use chat_core::{ChatMessage, Config, Role};
use context_manager::{dynamic_pruning, ContextNode, Conversation};
use futures::StreamExt;
use llm_client::{ChatOptions, ChatProvider};
use uuid::Uuid;

/// Ids of one completed user/assistant turn, plus the reply text.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub user_message_id: Uuid,
    pub assistant_message_id: Uuid,
    pub reply: String,
}

/// A conversation plus the provider its replies come from.
pub struct ChatSession<P: ChatProvider> {
    provider: P,
    conversation: Conversation,
    system_prompt: String,
    context_window: Option<usize>,
    options: ChatOptions,
}

impl<P: ChatProvider> ChatSession<P> {
    pub fn new(provider: P, conversation: Conversation) -> Self {
        Self {
            provider,
            conversation,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            context_window: None,
            options: ChatOptions::default(),
        }
    }

    /// System prompt and pruning window taken from `config`.
    pub fn from_config(provider: P, conversation: Conversation, config: &Config) -> Self {
        Self::new(provider, conversation)
            .with_system_prompt(config.system_prompt())
            .with_context_window(config.context_window)
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// `None` sends the whole chain; `Some(k)` prunes it to the last `k` entries.
    pub fn with_context_window(mut self, window: Option<usize>) -> Self {
        self.context_window = window;
        self
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn into_conversation(self) -> Conversation {
        self.conversation
    }

    /// The system prompt followed by the current chain without its system
    /// entries, pruned when a window is set.
    pub fn request_messages(&self) -> Vec<ChatMessage> {
        let chain = self.conversation.current_messages();

        let history: Vec<ChatMessage> = match self.context_window {
            None => chain
                .iter()
                .filter(|message| message.role != Role::System)
                .map(|message| ChatMessage::new(message.role, message.content.clone()))
                .collect(),
            Some(window) => {
                let nodes: Vec<ContextNode> = chain.iter().map(|message| ContextNode::from(*message)).collect();
                let path: Vec<&ContextNode> = nodes.iter().collect();
                dynamic_pruning(&path, window)
                    .into_iter()
                    .filter(|message| message.role != Role::System)
                    .collect()
            }
        };

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(self.system_prompt.clone()));
        messages.extend(history);
        messages
    }

    /// Add `content` as a user message, stream the reply and append it.
    ///
    /// Blank input does nothing and yields `None`. `on_delta` receives the
    /// accumulated reply after every delta. On failure the user message
    /// stays and no assistant message is added.
    pub async fn send_message<F>(&mut self, content: &str, mut on_delta: F) -> Result<Option<Exchange>>
    where
        F: FnMut(&str),
    {
        if content.trim().is_empty() {
            return Ok(None);
        }

        let user_message_id = self.conversation.add_message(content, Role::User);
        let messages = self.request_messages();

        tracing::info!(
            user_message_id = %user_message_id,
            request_messages = messages.len(),
            "ChatSession: Sending message"
        );

        let mut stream = self.provider.chat_stream(&messages, &self.options).await.map_err(|e| {
            tracing::error!(error = %e, "ChatSession: Request failed");
            e
        })?;

        let mut reply = String::new();
        while let Some(delta) = stream.next().await {
            let delta = delta.map_err(|e| {
                tracing::error!(error = %e, received = reply.len(), "ChatSession: Stream failed");
                e
            })?;
            reply.push_str(&delta);
            on_delta(&reply);
        }

        let assistant_message_id = self.conversation.add_message(reply.clone(), Role::Assistant);

        tracing::info!(
            assistant_message_id = %assistant_message_id,
            reply_len = reply.len(),
            "ChatSession: Reply stored"
        );

        Ok(Some(Exchange {
            user_message_id,
            assistant_message_id,
            reply,
        }))
    }
}
