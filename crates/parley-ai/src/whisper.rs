//! Dictation through the OpenAI transcription endpoint.
//!
//! `/voice <file>` uploads the recording and the returned text is
//! appended to the draft.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use parley_config::schema::VoiceConfig;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::{check_status, http_client, AiError, ChatError};

const TRANSCRIPTIONS_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Uploads are slow on poor links; chat requests use a shorter limit.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Turns recorded audio into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_data: Vec<u8>, filename: &str) -> Result<String, AiError>;
}

/// Resolved `[voice]` settings plus the key read from the environment.
#[derive(Clone)]
pub struct WhisperConfig {
    pub api_key: String,
    pub model: String,
    pub language: Option<String>,
}

impl fmt::Debug for WhisperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WhisperConfig {{ model: {:?}, language: {:?}, api_key: <hidden> }}",
            self.model, self.language
        )
    }
}

impl WhisperConfig {
    /// Dictation is unavailable when `[voice]` turns it off or the key
    /// variable it names is unset.
    pub fn from_env(voice: &VoiceConfig) -> Result<Self, ChatError> {
        if !voice.enabled {
            return Err(ChatError::UnsupportedCapability(
                "Voice dictation is disabled in the config".into(),
            ));
        }
        match std::env::var(&voice.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self {
                api_key: key,
                model: voice.model.clone(),
                language: voice.language.clone(),
            }),
            _ => Err(ChatError::UnsupportedCapability(format!(
                "Voice dictation needs {} to be set",
                voice.api_key_env
            ))),
        }
    }
}

pub struct WhisperClient {
    config: WhisperConfig,
    http: reqwest::Client,
}

impl WhisperClient {
    pub fn new(config: WhisperConfig) -> Result<Self, AiError> {
        let http = http_client(UPLOAD_TIMEOUT)?;
        Ok(Self { config, http })
    }

    fn form(&self, audio_data: Vec<u8>, filename: &str) -> Result<Form, AiError> {
        let audio = Part::bytes(audio_data)
            .file_name(filename.to_owned())
            .mime_str(audio_mime_type(filename))
            .map_err(|e| AiError::ApiError(format!("bad audio part: {e}")))?;

        let form = Form::new()
            .text("model", self.config.model.clone())
            .part("file", audio);
        Ok(match &self.config.language {
            Some(language) => form.text("language", language.clone()),
            None => form,
        })
    }
}

#[derive(Deserialize)]
struct Transcription {
    text: String,
}

/// Content type for the upload, guessed from the file extension.
pub(crate) fn audio_mime_type(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp3" | "mpeg" | "mpga" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "webm" => "audio/webm",
        "ogg" => "audio/ogg",
        _ => "audio/wav",
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio_data: Vec<u8>, filename: &str) -> Result<String, AiError> {
        debug!(file = filename, bytes = audio_data.len(), "Uploading for transcription");
        let form = self.form(audio_data, filename)?;

        let response = self
            .http
            .post(TRANSCRIPTIONS_URL)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let body: Transcription = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AiError::ParseError(format!("transcription response: {e}")))?;
        Ok(body.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_filename() {
        assert_eq!(audio_mime_type("note.MP3"), "audio/mpeg");
        assert_eq!(audio_mime_type("memo.m4a"), "audio/mp4");
        assert_eq!(audio_mime_type("clip.webm"), "audio/webm");
        assert_eq!(audio_mime_type("raw"), "audio/wav");
    }

    #[test]
    fn disabled_voice_is_unsupported() {
        let voice = VoiceConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(matches!(
            WhisperConfig::from_env(&voice),
            Err(ChatError::UnsupportedCapability(_))
        ));
    }

    #[test]
    fn missing_key_names_the_variable() {
        let voice = VoiceConfig {
            api_key_env: "PARLEY_TEST_UNSET_WHISPER_KEY".into(),
            ..Default::default()
        };
        let err = WhisperConfig::from_env(&voice).unwrap_err();
        assert!(err.to_string().contains("PARLEY_TEST_UNSET_WHISPER_KEY"));
    }

    #[test]
    fn key_is_hidden_from_debug() {
        std::env::set_var("PARLEY_TEST_WHISPER_KEY", "sk-test");
        let voice = VoiceConfig {
            api_key_env: "PARLEY_TEST_WHISPER_KEY".into(),
            ..Default::default()
        };
        let config = WhisperConfig::from_env(&voice).unwrap();
        assert_eq!(config.model, "whisper-1");
        assert_eq!(config.language.as_deref(), Some("es"));
        assert!(!format!("{config:?}").contains("sk-test"));
    }

    #[test]
    fn transcription_body_parses() {
        let body: Transcription = serde_json::from_str(r#"{"text":"hola mundo"}"#).unwrap();
        assert_eq!(body.text, "hola mundo");
    }
}
