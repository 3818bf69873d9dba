//! OpenAI-compatible client configuration.

use parley_common::Provider;
use parley_config::schema::ProviderSettings;

#[derive(Clone)]
pub struct OpenAiCompatConfig {
    /// Vendor name used in logs.
    pub vendor: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl std::fmt::Debug for OpenAiCompatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatConfig")
            .field("vendor", &self.vendor)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("top_p", &self.top_p)
            .finish()
    }
}

impl OpenAiCompatConfig {
    pub fn new(
        vendor: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 1.0,
        }
    }

    /// Build from a `[providers.<vendor>]` config section.
    pub fn from_settings(
        provider: Provider,
        api_key: impl Into<String>,
        settings: &ProviderSettings,
    ) -> Self {
        Self {
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            top_p: settings.top_p,
            ..Self::new(
                provider.display_name(),
                api_key,
                settings.base_url_for(provider),
            )
        }
    }
}
