//! ProviderSession struct and history management.

use std::sync::Arc;

use parley_common::Provider;
use tracing::debug;

use crate::{ChatBackend, Connector, Message};

/// A session shared between the controller and an in-flight turn.
pub type SharedSession = Arc<tokio::sync::Mutex<ProviderSession>>;

/// One conversation's connection to one vendor.
pub struct ProviderSession {
    pub(super) provider: Provider,
    pub(super) model: String,
    /// Empty means no instruction.
    pub(super) system_instructions: String,
    pub(super) history: Vec<Message>,
    pub(super) connector: Arc<dyn Connector>,
    /// Resolved on first chat.
    pub(super) backend: Option<Arc<dyn ChatBackend>>,
}

impl ProviderSession {
    pub fn new(provider: Provider, model: impl Into<String>, connector: Arc<dyn Connector>) -> Self {
        Self {
            provider,
            model: model.into(),
            system_instructions: String::new(),
            history: Vec::new(),
            connector,
            backend: None,
        }
    }

    /// Start with an instruction already applied.
    pub fn with_system_instructions(mut self, text: impl Into<String>) -> Self {
        self.set_system_instructions(text);
        self
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    /// Switch model. History is reset.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
        debug!(provider = %self.provider, model = %self.model, "Model set");
        self.reset_chat();
    }

    /// Replace the system instruction. History is reset.
    pub fn set_system_instructions(&mut self, text: impl Into<String>) {
        self.system_instructions = text.into();
        self.reset_chat();
    }

    /// Clear history, keeping only the system instruction if one is set.
    pub fn reset_chat(&mut self) {
        self.history.clear();
        if !self.system_instructions.trim().is_empty() {
            self.history
                .push(Message::system(self.system_instructions.clone()));
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instructions(&self) -> &str {
        &self.system_instructions
    }

    /// Messages sent to the vendor on the next call, in order.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub(super) fn backend(&mut self) -> Result<Arc<dyn ChatBackend>, crate::ChatError> {
        if let Some(ref backend) = self.backend {
            return Ok(backend.clone());
        }
        let backend = self.connector.connect(self.provider)?;
        self.backend = Some(backend.clone());
        Ok(backend)
    }
}

impl std::fmt::Debug for ProviderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSession")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("system_instructions", &self.system_instructions)
            .field("history", &self.history.len())
            .field("connected", &self.backend.is_some())
            .finish()
    }
}
