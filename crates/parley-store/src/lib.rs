//! Local persistence for Parley conversations.
//!
//! A small key-value layer ([`KeyValueStore`]) with a file-per-key
//! backend and an in-memory backend, and the [`ConversationStore`] that
//! keeps full conversation records plus a lightweight index on top of it.
//!
//! Persistence is best effort: failures are logged and reported as a
//! [`StoreStatus`], never raised, so the chat keeps working when the
//! disk does not.

pub mod conversations;
pub mod kv;
pub mod model;

pub use conversations::{
    ConversationDefaults, ConversationStore, StoreStatus, CONVERSATIONS_KEY,
    DEFAULT_MAX_MESSAGES, GLOBAL_INSTRUCTIONS_KEY, RECORD_KEY_PREFIX,
};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use model::{ChatMessage, Conversation, ConversationSummary};
