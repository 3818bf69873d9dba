//! AI engine for Parley.
//!
//! Provides chat clients for the supported vendors:
//! - Gemini (Generative Language API, accepts images)
//! - Mistral and GROQ (OpenAI-compatible chat completions)
//!
//! plus per-conversation [`ProviderSession`]s that own the role-tagged
//! history sent to them, and a Whisper client for voice dictation.

pub mod connector;
pub mod gemini;
pub mod openai_compat;
pub mod session;
pub mod whisper;

use std::time::Duration;

use async_trait::async_trait;
use parley_common::Provider;

pub use connector::{Connector, EnvConnector};
pub use gemini::{GeminiClient, GeminiConfig};
pub use openai_compat::{OpenAiCompatClient, OpenAiCompatConfig};
pub use session::{ProviderSession, SharedSession};
pub use whisper::{Transcriber, WhisperClient, WhisperConfig};

/// A vendor endpoint that turns a history into one reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, model: &str, messages: &[Message]) -> Result<String, AiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Data URI of an attached image. Only user messages carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            image: None,
        }
    }

    pub fn user(content: impl Into<String>, image: Option<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            image,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            image: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// Transport-level failure talking to a vendor. Logged, never shown.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else {
            AiError::NetworkError(e.to_string())
        }
    }
}

/// User-facing chat failure. The `Display` text is what the banner shows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("Please configure your {} API key in the .env file", .0.display_name())]
    ProviderUnavailable(Provider),
    #[error("Failed to get response from {}", .0.display_name())]
    ProviderRequestFailed(Provider),
    #[error("{0}")]
    UnsupportedCapability(String),
}

impl ChatError {
    pub fn images_unsupported() -> Self {
        ChatError::UnsupportedCapability("Solo Gemini AI soporta el análisis de imágenes".into())
    }
}

/// HTTP client with the timeouts every vendor client uses.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, AiError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()
        .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))
}

/// Map a non-success status to an error, or hand the response back.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(AiError::RateLimited);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_error_messages_name_vendor() {
        assert_eq!(
            ChatError::ProviderUnavailable(Provider::Mistral).to_string(),
            "Please configure your Mistral API key in the .env file"
        );
        assert_eq!(
            ChatError::ProviderRequestFailed(Provider::Groq).to_string(),
            "Failed to get response from GROQ"
        );
        assert_eq!(
            ChatError::images_unsupported().to_string(),
            "Solo Gemini AI soporta el análisis de imágenes"
        );
    }

    #[test]
    fn message_serializes_without_empty_image() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "hi"}));

        let json = serde_json::to_value(Message::user("look", Some("data:x".into()))).unwrap();
        assert_eq!(json["image"], "data:x");
    }
}
