//! Conversation records and their index.
//!
//! Layout on the key-value backend:
//! - `conversations`: JSON array of [`ConversationSummary`]
//! - `chat_<id>`: JSON [`Conversation`]
//! - `global_instructions`: raw string

use std::sync::Arc;

use parley_common::{now_millis, ConversationId, StorageError};
use tracing::{debug, warn};

use crate::kv::KeyValueStore;
use crate::model::{Conversation, ConversationSummary};

pub const CONVERSATIONS_KEY: &str = "conversations";
pub const RECORD_KEY_PREFIX: &str = "chat_";
pub const GLOBAL_INSTRUCTIONS_KEY: &str = "global_instructions";
pub const DEFAULT_MAX_MESSAGES: usize = 100;

/// Outcome of a best-effort write.
#[derive(Debug)]
pub enum StoreStatus {
    Persisted,
    Failed(StorageError),
}

impl StoreStatus {
    fn from_result(what: &str, result: Result<(), StorageError>) -> Self {
        match result {
            Ok(()) => StoreStatus::Persisted,
            Err(e) => {
                warn!(error = %e, "Failed to {}", what);
                StoreStatus::Failed(e)
            }
        }
    }
}

/// Title and greeting used for new conversations.
#[derive(Debug, Clone)]
pub struct ConversationDefaults {
    pub title: String,
    pub greeting: String,
}

impl Default for ConversationDefaults {
    fn default() -> Self {
        Self {
            title: "Nueva conversación".into(),
            greeting: "¡Hola! Soy un asistente de IA. ¿En qué puedo ayudarte hoy?".into(),
        }
    }
}

fn record_key(id: &ConversationId) -> String {
    format!("{RECORD_KEY_PREFIX}{id}")
}

/// Best-effort conversation persistence over a [`KeyValueStore`].
///
/// Reads never fail: missing or undecodable data comes back empty.
/// Writes report a [`StoreStatus`] and log failures at `warn`.
#[derive(Clone)]
pub struct ConversationStore {
    backend: Arc<dyn KeyValueStore>,
    max_messages: usize,
    defaults: ConversationDefaults,
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore")
            .field("max_messages", &self.max_messages)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl ConversationStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            max_messages: DEFAULT_MAX_MESSAGES,
            defaults: ConversationDefaults::default(),
        }
    }

    /// Cap on messages kept per record. Zero is treated as one.
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages.max(1);
        self
    }

    pub fn with_defaults(mut self, defaults: ConversationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    // -- index ---------------------------------------------------------------

    fn read_index(&self) -> Result<Vec<ConversationSummary>, StorageError> {
        let Some(raw) = self.backend.get(CONVERSATIONS_KEY)? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
            key: CONVERSATIONS_KEY.into(),
            reason: e.to_string(),
        })
    }

    fn write_index(&self, index: &[ConversationSummary]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(index).map_err(|e| StorageError::Encode {
            key: CONVERSATIONS_KEY.into(),
            reason: e.to_string(),
        })?;
        self.backend.set(CONVERSATIONS_KEY, &raw)
    }

    /// All index entries, in stored order. A corrupt index reads as empty.
    pub fn list_conversations(&self) -> Vec<ConversationSummary> {
        self.read_index().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read conversation index");
            Vec::new()
        })
    }

    /// Index entries, most recently modified first.
    pub fn list_recent(&self) -> Vec<ConversationSummary> {
        let mut list = self.list_conversations();
        list.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        list
    }

    // -- records -------------------------------------------------------------

    fn try_save(&self, conversation: &Conversation) -> Result<(), StorageError> {
        let record = conversation.truncated(self.max_messages);
        let key = record_key(&record.id);
        let raw = serde_json::to_string(&record).map_err(|e| StorageError::Encode {
            key: key.clone(),
            reason: e.to_string(),
        })?;

        // An unreadable index is rebuilt from this entry rather than blocking the save.
        let mut index = self.list_conversations();
        let entry = ConversationSummary {
            id: record.id.clone(),
            title: record.title.clone(),
            last_modified: now_millis(),
        };
        match index.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => index.push(entry),
        }

        self.write_index(&index)?;
        self.backend.set(&key, &raw)
    }

    /// Upsert a conversation and its index entry.
    ///
    /// Only the most recent `max_messages` messages are written. The index
    /// entry's `last_modified` is refreshed to now; the caller's copy is
    /// left untouched.
    pub fn save_conversation(&self, conversation: &Conversation) -> StoreStatus {
        debug!(
            id = %conversation.id,
            messages = conversation.messages.len(),
            "Saving conversation"
        );
        StoreStatus::from_result("save conversation", self.try_save(conversation))
    }

    /// Load a full record. Missing or corrupt records are `None`.
    pub fn get_conversation(&self, id: &ConversationId) -> Option<Conversation> {
        let key = record_key(id);
        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read conversation");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(conv) => Some(conv),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding corrupt conversation record");
                None
            }
        }
    }

    fn try_delete(&self, id: &ConversationId) -> Result<(), StorageError> {
        let mut index = self.list_conversations();
        let before = index.len();
        index.retain(|e| &e.id != id);
        if index.len() != before {
            self.write_index(&index)?;
        }
        self.backend.remove(&record_key(id))
    }

    /// Remove a conversation and its index entry. Deleting twice is fine.
    pub fn delete_conversation(&self, id: &ConversationId) -> StoreStatus {
        debug!(%id, "Deleting conversation");
        StoreStatus::from_result("delete conversation", self.try_delete(id))
    }

    /// Create, persist and return a new greeting-seeded conversation.
    pub fn create_new_conversation(&self) -> Conversation {
        let conversation = Conversation::new(&self.defaults.title, &self.defaults.greeting);
        let _ = self.save_conversation(&conversation);
        conversation
    }

    /// Retitle a stored conversation. Unknown ids are a no-op.
    pub fn rename_conversation(&self, id: &ConversationId, title: &str) -> StoreStatus {
        let Some(mut conversation) = self.get_conversation(id) else {
            debug!(%id, "Rename of unknown conversation ignored");
            return StoreStatus::Persisted;
        };
        conversation.title = title.to_string();
        self.save_conversation(&conversation)
    }

    // -- global instructions -------------------------------------------------

    pub fn save_global_instructions(&self, text: &str) -> StoreStatus {
        StoreStatus::from_result(
            "save global instructions",
            self.backend.set(GLOBAL_INSTRUCTIONS_KEY, text),
        )
    }

    /// Stored global instructions, or an empty string.
    pub fn global_instructions(&self) -> String {
        match self.backend.get(GLOBAL_INSTRUCTIONS_KEY) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to read global instructions");
                String::new()
            }
        }
    }
}
