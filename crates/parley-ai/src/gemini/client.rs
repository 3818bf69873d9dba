//! Gemini API client struct, request building, and response parsing.

use std::time::Duration;

use parley_platform::DataUri;

use crate::{http_client, AiError, Message, Role};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        Ok(Self {
            config,
            http: http_client(Duration::from_secs(120))?,
        })
    }

    pub(crate) fn api_url(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(
        &self,
        messages: &[Message],
    ) -> Result<serde_json::Value, AiError> {
        let mut contents = Vec::new();

        for msg in messages {
            let role = match msg.role {
                Role::User => "user",
                Role::Assistant => "model",
                Role::System => continue, // handled via systemInstruction
            };
            let mut parts = vec![serde_json::json!({ "text": msg.content })];
            if let Some(ref image) = msg.image {
                let uri = DataUri::parse(image).ok_or_else(|| {
                    AiError::ParseError("image attachment is not a base64 data URI".into())
                })?;
                parts.push(serde_json::json!({
                    "inline_data": {
                        "mime_type": uri.mime_type,
                        "data": uri.data,
                    }
                }));
            }
            contents.push(serde_json::json!({
                "role": role,
                "parts": parts
            }));
        }

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        });

        if let Some(system) = messages.iter().find(|m| m.role == Role::System) {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": system.content }]
            });
        }

        Ok(body)
    }

    /// Parse a Gemini response into the reply text.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<String, AiError> {
        let candidates = json["candidates"]
            .as_array()
            .ok_or_else(|| AiError::ParseError("no candidates in response".to_string()))?;

        let first = candidates
            .first()
            .ok_or_else(|| AiError::ParseError("empty candidates".to_string()))?;

        let parts = first["content"]["parts"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        Ok(parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::new(GeminiConfig::new("test-key")).unwrap()
    }

    #[test]
    fn api_url_includes_model() {
        let url = client().api_url("gemini-1.5-flash");
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn system_message_becomes_system_instruction() {
        let messages = vec![
            Message::system("Answer in French."),
            Message::user("Hello", None),
            Message::assistant("Bonjour"),
        ];
        let body = client().build_request_body(&messages).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Answer in French.");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Bonjour");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
    }

    #[test]
    fn no_system_instruction_without_system_message() {
        let body = client()
            .build_request_body(&[Message::user("hi", None)])
            .unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn image_becomes_inline_data() {
        let messages = vec![Message::user(
            "Describe esta imagen en detalle",
            Some("data:image/png;base64,iVBORw==".into()),
        )];
        let body = client().build_request_body(&messages).unwrap();

        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["text"], "Describe esta imagen en detalle");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "iVBORw==");
    }

    #[test]
    fn malformed_image_is_rejected() {
        let messages = vec![Message::user("x", Some("https://example.com/a.png".into()))];
        assert!(matches!(
            client().build_request_body(&messages),
            Err(AiError::ParseError(_))
        ));
    }

    #[test]
    fn parse_response_joins_text_parts() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello, " }, { "text": "world" }] }
            }]
        });
        assert_eq!(client().parse_response(json).unwrap(), "Hello, world");
    }

    #[test]
    fn parse_response_without_candidates_fails() {
        let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(client().parse_response(json).is_err());
        assert!(client()
            .parse_response(serde_json::json!({ "candidates": [] }))
            .is_err());
    }
}
