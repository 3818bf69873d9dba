//! ChatBackend trait implementation for OpenAiCompatClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{check_status, AiError, ChatBackend, Message};

use super::client::OpenAiCompatClient;

#[async_trait]
impl ChatBackend for OpenAiCompatClient {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, AiError> {
        let body = self.build_request_body(model, messages);

        debug!(vendor = %self.config.vendor, model, messages = messages.len(), "Chat completions request");

        let response = self
            .http
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        let json: serde_json::Value = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_response(json)
    }
}
