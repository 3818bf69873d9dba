//! Async chat method for ProviderSession.

use tracing::{debug, error};

use crate::{ChatError, Message};

use super::manager::ProviderSession;

impl ProviderSession {
    /// Send one user turn and return the reply.
    ///
    /// On a vendor failure the user entry stays in the history and no
    /// reply entry is added.
    pub async fn chat(&mut self, text: &str, image: Option<&str>) -> Result<String, ChatError> {
        if image.is_some() && !self.provider.supports_images() {
            return Err(ChatError::images_unsupported());
        }

        let backend = self.backend()?;

        self.history
            .push(Message::user(text, image.map(str::to_string)));

        debug!(
            provider = %self.provider,
            model = %self.model,
            history = self.history.len(),
            with_image = image.is_some(),
            "Sending chat turn"
        );

        match backend.complete(&self.model, &self.history).await {
            Ok(reply) => {
                self.history.push(Message::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                error!(provider = %self.provider, model = %self.model, error = %e, "Chat request failed");
                Err(ChatError::ProviderRequestFailed(self.provider))
            }
        }
    }
}
