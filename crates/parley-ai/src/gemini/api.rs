//! ChatBackend trait implementation for GeminiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{check_status, AiError, ChatBackend, Message};

use super::client::GeminiClient;

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, AiError> {
        let body = self.build_request_body(messages)?;
        let url = self.api_url(model);

        debug!(model, messages = messages.len(), "Gemini API request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
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
