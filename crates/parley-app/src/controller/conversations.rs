//! Conversation management, provider switching and system instructions.

use parley_common::{ConversationId, Provider};
use tracing::{debug, info};

use super::types::CommandError;
use super::Controller;

impl Controller {
    /// Start a fresh conversation and make it active.
    pub fn new_conversation(&mut self) {
        let conversation = self.store.create_new_conversation();
        info!(conversation = %conversation.id, "New conversation");
        self.activate(conversation);
    }

    /// Make a stored conversation active. Unknown ids change nothing.
    pub fn select_conversation(&mut self, id: &ConversationId) -> bool {
        if *id == self.active.id {
            return true;
        }
        match self.store.get_conversation(id) {
            Some(conversation) => {
                self.activate(conversation);
                true
            }
            None => {
                debug!(%id, "Cannot open unknown conversation");
                false
            }
        }
    }

    /// Delete a conversation. Deleting the active one opens a new one.
    pub fn delete_conversation(&mut self, id: &ConversationId) {
        let status = self.store.delete_conversation(id);
        self.record(status);
        if *id == self.active.id {
            self.new_conversation();
        }
    }

    /// Retitle a conversation. Blank titles are ignored.
    pub fn rename_conversation(&mut self, id: &ConversationId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        if *id == self.active.id {
            self.active.title = title.to_string();
            self.persist_active();
            return true;
        }
        if self.store.get_conversation(id).is_none() {
            return false;
        }
        let status = self.store.rename_conversation(id, title);
        self.record(status);
        true
    }

    /// Switch vendor, optionally with a model. No history carries over
    /// and any pending image is dropped.
    pub fn switch_provider(
        &mut self,
        provider: Provider,
        model: Option<&str>,
    ) -> Result<(), CommandError> {
        let model = match model {
            Some(m) => {
                self.check_model(provider, m)?;
                m.to_string()
            }
            None => self.model_for(provider).to_string(),
        };

        info!(%provider, %model, "Switching provider");
        self.provider = provider;
        self.models.insert(provider, model.clone());
        self.pending_image = None;
        self.update_session(provider, |s| s.set_model(model));
        Ok(())
    }

    /// Change the model of the active provider.
    pub fn set_model(&mut self, model: &str) -> Result<(), CommandError> {
        self.switch_provider(self.provider, Some(model))
    }

    fn check_model(&self, provider: Provider, model: &str) -> Result<(), CommandError> {
        if self.available_models(provider).iter().any(|m| m == model) {
            Ok(())
        } else {
            Err(CommandError::UnknownModel {
                provider,
                model: model.to_string(),
            })
        }
    }

    /// Set the active conversation's instruction, and optionally the
    /// global default, then push the effective instruction into the live
    /// sessions. Clearing only the conversation's own instruction leaves
    /// the global one in force.
    pub fn set_system_instructions(&mut self, text: &str, also_global: bool) {
        let text = text.trim();
        if also_global {
            self.global_instructions = text.to_string();
            let status = self.store.save_global_instructions(text);
            self.record(status);
        }

        self.active.system_instructions = (!text.is_empty()).then(|| text.to_string());
        self.persist_active();

        let effective = self.effective_instructions().to_string();
        let providers: Vec<Provider> = self.sessions.keys().copied().collect();
        for provider in providers {
            let effective = effective.clone();
            self.update_session(provider, |s| s.set_system_instructions(effective));
        }
    }
}
