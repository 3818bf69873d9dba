//! Persisted record shapes.
//!
//! Field names serialize in camelCase so existing browser exports
//! (`lastModified`, `isBot`, `imageData`, ...) load unchanged.

use parley_common::{now_millis, ConversationId};
use serde::{Deserialize, Serialize};

/// One entry in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub text: String,
    pub is_bot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    /// The request a bot reply answered. Only set on bot messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_image_data: Option<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, image_data: Option<String>) -> Self {
        Self {
            text: text.into(),
            is_bot: false,
            image_data,
            user_message: None,
            user_image_data: None,
        }
    }

    /// A bot message with no originating request (the greeting).
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bot: true,
            image_data: None,
            user_message: None,
            user_image_data: None,
        }
    }

    /// A bot reply that remembers what it answered, so it can be regenerated.
    pub fn reply(
        text: impl Into<String>,
        user_message: impl Into<String>,
        user_image_data: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            is_bot: true,
            image_data: None,
            user_message: Some(user_message.into()),
            user_image_data,
        }
    }

    pub fn can_regenerate(&self) -> bool {
        self.is_bot && self.user_message.is_some()
    }
}

/// A full conversation record, stored under `chat_<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    /// Unix epoch milliseconds.
    pub last_modified: i64,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instructions: Option<String>,
}

impl Conversation {
    /// A fresh conversation seeded with a single bot greeting.
    pub fn new(title: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            id: ConversationId::new(),
            title: title.into(),
            last_modified: now_millis(),
            messages: vec![ChatMessage::bot(greeting)],
            system_instructions: None,
        }
    }

    /// The instruction to apply, treating an empty string as unset.
    pub fn instructions(&self) -> Option<&str> {
        self.system_instructions
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            last_modified: self.last_modified,
        }
    }

    /// Copy keeping only the most recent `max_messages` messages.
    pub fn truncated(&self, max_messages: usize) -> Self {
        let mut copy = self.clone();
        let excess = copy.messages.len().saturating_sub(max_messages);
        if excess > 0 {
            copy.messages.drain(..excess);
        }
        copy
    }
}

/// Index entry kept under the `conversations` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    pub last_modified: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversation_has_greeting() {
        let conv = Conversation::new("Nueva conversación", "¡Hola!");
        assert_eq!(conv.messages.len(), 1);
        assert!(conv.messages[0].is_bot);
        assert_eq!(conv.messages[0].text, "¡Hola!");
        assert!(!conv.messages[0].can_regenerate());
        assert!(conv.instructions().is_none());
    }

    #[test]
    fn ids_are_unique() {
        let a = Conversation::new("a", "hi");
        let b = Conversation::new("b", "hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_camel_case() {
        let mut conv = Conversation::new("t", "hi");
        conv.messages.push(ChatMessage::reply("4", "2+2?", None));
        conv.system_instructions = Some("Be brief.".into());

        let json = serde_json::to_string(&conv).unwrap();
        assert!(json.contains("\"lastModified\""));
        assert!(json.contains("\"isBot\":true"));
        assert!(json.contains("\"userMessage\":\"2+2?\""));
        assert!(json.contains("\"systemInstructions\":\"Be brief.\""));
        assert!(!json.contains("imageData"));
    }

    #[test]
    fn parses_browser_record() {
        let json = r#"{
            "id": "1700000000000",
            "title": "Old chat",
            "lastModified": 1700000000000,
            "messages": [
                {"text": "¡Hola!", "isBot": true},
                {"text": "Hi", "isBot": false, "imageData": "data:image/png;base64,AAAA"}
            ]
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conv.id.as_str(), "1700000000000");
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(
            conv.messages[1].image_data.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert!(conv.system_instructions.is_none());
    }

    #[test]
    fn blank_instructions_read_as_unset() {
        let mut conv = Conversation::new("t", "hi");
        conv.system_instructions = Some("   ".into());
        assert!(conv.instructions().is_none());
        conv.system_instructions = Some("Answer in French.".into());
        assert_eq!(conv.instructions(), Some("Answer in French."));
    }

    #[test]
    fn truncated_keeps_most_recent() {
        let mut conv = Conversation::new("t", "greeting");
        for i in 0..10 {
            conv.messages.push(ChatMessage::user(format!("m{i}"), None));
        }
        let cut = conv.truncated(3);
        let texts: Vec<_> = cut.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["m7", "m8", "m9"]);

        assert_eq!(conv.truncated(100).messages.len(), 11);
    }
}
