//! Conversation and session-controller configuration types.

use parley_common::Provider;
use serde::{Deserialize, Serialize};

/// What happens to a reply that arrives after the user switched to a
/// different conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum StaleReply {
    /// Write the reply into the conversation the request came from.
    #[default]
    DeliverToOrigin,
    /// Drop the reply.
    Discard,
}

/// Chat behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub default_provider: Provider,
    /// Model to start with; `None` uses the provider's default.
    pub default_model: Option<String>,
    /// Title given to freshly created conversations.
    pub conversation_title: String,
    /// Bot message seeded into every new conversation.
    pub greeting: String,
    /// Text sent to the provider when only an image is submitted.
    pub image_prompt: String,
    /// Text shown as the user message when only an image is submitted.
    pub image_caption: String,
    pub stale_reply: StaleReply,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_provider: Provider::Gemini,
            default_model: None,
            conversation_title: "Nueva conversación".into(),
            greeting: "¡Hola! Soy un asistente de IA. ¿En qué puedo ayudarte hoy?".into(),
            image_prompt: "Describe esta imagen en detalle".into(),
            image_caption: "Analiza esta imagen por favor".into(),
            stale_reply: StaleReply::DeliverToOrigin,
        }
    }
}
