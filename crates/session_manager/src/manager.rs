//! Session Manager service

use crate::error::{Result, Unsaved};
use crate::settings::SettingsStore;
use crate::storage::{load_blob, save_blob, KeyValueStorage, CONVERSATION_KEY, SETTINGS_KEY};
use chat_core::LlmConfig;
use context_manager::Conversation;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds the conversation and the settings behind locks and keeps their
/// persisted copies current.
///
/// Every operation takes its lock once, so a single update is atomic; nothing
/// spans several calls.
pub struct SessionManager<S: KeyValueStorage> {
    storage: Arc<S>,
    conversation: Arc<RwLock<Conversation>>,
    settings: Arc<RwLock<SettingsStore>>,
}

impl<S: KeyValueStorage> SessionManager<S> {
    /// Load persisted state, initializing (and saving) whatever is missing.
    pub async fn new(storage: S) -> Result<Self> {
        let storage = Arc::new(storage);

        let settings = match load_blob::<_, SettingsStore>(storage.as_ref(), SETTINGS_KEY).await? {
            Some(settings) => settings,
            None => {
                let settings = SettingsStore::default();
                save_blob(storage.as_ref(), SETTINGS_KEY, &settings).await?;
                settings
            }
        };

        let conversation = match load_blob::<_, Conversation>(storage.as_ref(), CONVERSATION_KEY).await? {
            Some(conversation) if !conversation.is_empty() => conversation,
            _ => {
                let mut conversation = Conversation::new();
                save_blob(storage.as_ref(), CONVERSATION_KEY, &conversation).await?;
                conversation.clear_dirty();
                conversation
            }
        };

        tracing::info!(
            messages = conversation.message_count(),
            configs = settings.llm_configs.len(),
            "SessionManager: Loaded state"
        );

        Ok(Self {
            storage,
            conversation: Arc::new(RwLock::new(conversation)),
            settings: Arc::new(RwLock::new(settings)),
        })
    }

    /// Snapshot of the conversation.
    pub async fn conversation(&self) -> Conversation {
        self.conversation.read().await.clone()
    }

    /// Snapshot of the settings.
    pub async fn settings(&self) -> SettingsStore {
        self.settings.read().await.clone()
    }

    pub async fn active_llm_config(&self) -> Option<LlmConfig> {
        self.settings.read().await.get_active_config().cloned()
    }

    /// Apply `f` to the conversation under the write lock. A resulting change
    /// is persisted when auto-save is on.
    ///
    /// The change is never rolled back. When the write fails, the error comes
    /// back as [`Unsaved`] together with `f`'s result, and the conversation
    /// stays dirty so the next save retries.
    pub async fn update_conversation<F, R>(&self, f: F) -> std::result::Result<R, Unsaved<R>>
    where
        F: FnOnce(&mut Conversation) -> R,
        R: std::fmt::Debug,
    {
        let auto_save = self.settings.read().await.settings.auto_save;
        let mut conversation = self.conversation.write().await;
        let value = f(&mut *conversation);

        if auto_save && conversation.is_dirty() {
            if let Err(error) = save_blob(self.storage.as_ref(), CONVERSATION_KEY, &*conversation).await {
                tracing::error!(error = %error, "SessionManager: Failed to save conversation");
                return Err(Unsaved { value, error });
            }
            conversation.clear_dirty();
        }

        Ok(value)
    }

    /// Swap in a conversation driven elsewhere (for example by a chat session).
    pub async fn replace_conversation(&self, conversation: Conversation) -> Result<()> {
        self.update_conversation(|current| {
            *current = conversation;
            current.mark_dirty();
        })
        .await?;
        Ok(())
    }

    /// Apply `f` to the settings under the write lock and persist them.
    pub async fn update_settings<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut SettingsStore) -> R,
    {
        let mut settings = self.settings.write().await;
        let result = f(&mut *settings);
        save_blob(self.storage.as_ref(), SETTINGS_KEY, &*settings).await?;
        Ok(result)
    }

    /// Write both blobs regardless of auto-save.
    pub async fn save(&self) -> Result<()> {
        {
            let settings = self.settings.read().await;
            save_blob(self.storage.as_ref(), SETTINGS_KEY, &*settings).await?;
        }

        let mut conversation = self.conversation.write().await;
        save_blob(self.storage.as_ref(), CONVERSATION_KEY, &*conversation).await?;
        conversation.clear_dirty();

        tracing::debug!("SessionManager: Saved state");
        Ok(())
    }

    /// True when the conversation has changes that were not written.
    pub async fn has_unsaved_changes(&self) -> bool {
        self.conversation.read().await.is_dirty()
    }
}
