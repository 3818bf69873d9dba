use std::time::Duration;

use crate::{http_client, AiError, Message};

use super::config::OpenAiCompatConfig;

/// Client for vendors speaking the OpenAI chat completions protocol.
pub struct OpenAiCompatClient {
    pub(crate) config: OpenAiCompatConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, AiError> {
        Ok(Self {
            config,
            http: http_client(Duration::from_secs(120))?,
        })
    }

    pub fn vendor(&self) -> &str {
        &self.config.vendor
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Images are not part of this protocol's text chat and are dropped.
    pub(crate) fn build_request_body(&self, model: &str, messages: &[Message]) -> serde_json::Value {
        let messages: Vec<_> = messages
            .iter()
            .map(|m| serde_json::json!({ "role": m.role, "content": m.content }))
            .collect();

        serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "top_p": self.config.top_p,
            "stream": false,
        })
    }

    /// Reply text from `choices[0].message.content`; a null content is "".
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<String, AiError> {
        let first = json["choices"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| AiError::ParseError("no choices in response".to_string()))?;

        Ok(first["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string())
    }
}
