//! Voice dictation configuration types.

use serde::{Deserialize, Serialize};

/// Dictation via the Whisper transcription API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub enabled: bool,
    pub model: String,
    /// ISO-639-1 language hint; `None` lets the service detect it.
    pub language: Option<String>,
    pub api_key_env: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "whisper-1".into(),
            language: Some("es".into()),
            api_key_env: "OPENAI_API_KEY".into(),
        }
    }
}
