//! The hosted model vendors Parley can talk to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A hosted completion vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Provider {
    #[default]
    Gemini,
    Mistral,
    Groq,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Gemini, Provider::Mistral, Provider::Groq];

    /// Lowercase identifier used in config files and commands.
    pub fn id(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Mistral => "mistral",
            Provider::Groq => "groq",
        }
    }

    /// Vendor name as shown to the user.
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::Mistral => "Mistral",
            Provider::Groq => "GROQ",
        }
    }

    /// Only Gemini accepts image attachments.
    pub fn supports_images(self) -> bool {
        matches!(self, Provider::Gemini)
    }

    /// Environment variable holding this vendor's API key.
    pub fn api_key_env(self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::Mistral => "MISTRAL_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-1.5-pro",
            Provider::Mistral => "mistral-small",
            Provider::Groq => "mixtral-8x7b-32768",
        }
    }

    pub fn builtin_models(self) -> &'static [&'static str] {
        match self {
            Provider::Gemini => &["gemini-1.5-pro", "gemini-1.5-flash"],
            Provider::Mistral => &["mistral-tiny", "mistral-small", "mistral-medium"],
            Provider::Groq => &["mixtral-8x7b-32768", "gemma-7b-it", "llama2-70b-4096"],
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/models",
            Provider::Mistral => "https://api.mistral.ai/v1",
            Provider::Groq => "https://api.groq.com/openai/v1",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "mistral" => Ok(Provider::Mistral),
            "groq" => Ok(Provider::Groq),
            other => Err(format!(
                "unknown provider '{other}' (expected gemini, mistral or groq)"
            )),
        }
    }
}
