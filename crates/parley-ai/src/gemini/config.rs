//! Gemini API client configuration.

use parley_common::Provider;
use parley_config::schema::ProviderSettings;

/// Gemini API client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Provider::Gemini.default_base_url().to_string(),
            max_tokens: 2048,
            temperature: 0.7,
        }
    }

    /// Build from the `[providers.gemini]` config section.
    pub fn from_settings(api_key: impl Into<String>, settings: &ProviderSettings) -> Self {
        Self::new(api_key)
            .with_base_url(settings.base_url_for(Provider::Gemini))
            .with_max_tokens(settings.max_tokens)
            .with_temperature(settings.temperature)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}
