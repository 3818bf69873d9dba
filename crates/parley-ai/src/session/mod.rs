//! Per-conversation provider sessions.
//!
//! A `ProviderSession` holds the model, the system instruction and the
//! role-tagged history sent to one vendor on behalf of one conversation.
//! The history is the vendor's view and is independent of the stored
//! transcript.

mod chat;
mod manager;

pub use manager::{ProviderSession, SharedSession};

#[cfg(test)]
mod tests;
