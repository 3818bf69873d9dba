//! Per-vendor request settings.

use parley_common::Provider;
use serde::{Deserialize, Serialize};

/// Settings for one completion vendor.
///
/// Empty or absent fields fall back to the built-in catalogue for the
/// vendor (see [`Provider`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Override the API base URL (useful for proxies).
    pub base_url: Option<String>,
    /// Override the environment variable the API key is read from.
    pub api_key_env: Option<String>,
    /// Models offered in the picker; empty means the built-in list.
    pub models: Vec<String>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key_env: None,
            models: Vec::new(),
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 1.0,
        }
    }
}

impl ProviderSettings {
    /// Models offered for `provider`, configured list first.
    pub fn model_list(&self, provider: Provider) -> Vec<String> {
        if self.models.is_empty() {
            provider
                .builtin_models()
                .iter()
                .map(|m| m.to_string())
                .collect()
        } else {
            self.models.clone()
        }
    }

    pub fn base_url_for(&self, provider: Provider) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string())
    }

    pub fn api_key_env_for(&self, provider: Provider) -> String {
        self.api_key_env
            .clone()
            .unwrap_or_else(|| provider.api_key_env().to_string())
    }
}

/// Settings for all vendors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ProvidersConfig {
    pub gemini: ProviderSettings,
    pub mistral: ProviderSettings,
    pub groq: ProviderSettings,
}

impl ProvidersConfig {
    pub fn get(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::Gemini => &self.gemini,
            Provider::Mistral => &self.mistral,
            Provider::Groq => &self.groq,
        }
    }
}
