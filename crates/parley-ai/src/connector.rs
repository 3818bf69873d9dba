//! Credential lookup and backend construction.
//!
//! Sessions ask their [`Connector`] for a backend the first time they
//! need one, so a missing key only matters once the user actually talks
//! to that vendor.

use std::sync::Arc;

use parley_common::Provider;
use parley_config::schema::ProvidersConfig;
use tracing::{debug, error};

use crate::{
    ChatBackend, ChatError, GeminiClient, GeminiConfig, OpenAiCompatClient, OpenAiCompatConfig,
};

pub trait Connector: Send + Sync {
    /// Build a backend for `provider`, or explain why it is unavailable.
    fn connect(&self, provider: Provider) -> Result<Arc<dyn ChatBackend>, ChatError>;

    /// Whether a credential for `provider` is present, without connecting.
    fn has_credentials(&self, provider: Provider) -> bool;
}

/// Reads API keys from the environment (`GEMINI_API_KEY`, ...).
#[derive(Debug, Clone, Default)]
pub struct EnvConnector {
    providers: ProvidersConfig,
}

impl EnvConnector {
    pub fn new(providers: ProvidersConfig) -> Self {
        Self { providers }
    }

    fn api_key(&self, provider: Provider) -> Option<String> {
        let var = self.providers.get(provider).api_key_env_for(provider);
        std::env::var(&var).ok().filter(|k| !k.trim().is_empty())
    }
}

impl Connector for EnvConnector {
    fn connect(&self, provider: Provider) -> Result<Arc<dyn ChatBackend>, ChatError> {
        let api_key = self
            .api_key(provider)
            .ok_or(ChatError::ProviderUnavailable(provider))?;
        let settings = self.providers.get(provider);

        let backend: Result<Arc<dyn ChatBackend>, _> = match provider {
            Provider::Gemini => GeminiClient::new(GeminiConfig::from_settings(api_key, settings))
                .map(|c| Arc::new(c) as Arc<dyn ChatBackend>),
            Provider::Mistral | Provider::Groq => OpenAiCompatClient::new(
                OpenAiCompatConfig::from_settings(provider, api_key, settings),
            )
            .map(|c| Arc::new(c) as Arc<dyn ChatBackend>),
        };

        match backend {
            Ok(backend) => {
                debug!(%provider, "Connected chat backend");
                Ok(backend)
            }
            Err(e) => {
                error!(%provider, error = %e, "Failed to build chat backend");
                Err(ChatError::ProviderRequestFailed(provider))
            }
        }
    }

    fn has_credentials(&self, provider: Provider) -> bool {
        self.api_key(provider).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_config::schema::ProviderSettings;

    // Each test points at its own variable so parallel tests never race.
    fn connector_with_env(provider: Provider, var: &str) -> EnvConnector {
        let settings = ProviderSettings {
            api_key_env: Some(var.into()),
            ..Default::default()
        };
        let mut providers = ProvidersConfig::default();
        match provider {
            Provider::Gemini => providers.gemini = settings,
            Provider::Mistral => providers.mistral = settings,
            Provider::Groq => providers.groq = settings,
        }
        EnvConnector::new(providers)
    }

    #[test]
    fn missing_key_is_unavailable() {
        let connector = connector_with_env(Provider::Mistral, "PARLEY_TEST_UNSET_MISTRAL_KEY");
        assert!(!connector.has_credentials(Provider::Mistral));
        assert_eq!(
            connector.connect(Provider::Mistral).err(),
            Some(ChatError::ProviderUnavailable(Provider::Mistral))
        );
    }

    #[test]
    fn blank_key_is_unavailable() {
        std::env::set_var("PARLEY_TEST_BLANK_GROQ_KEY", "  ");
        let connector = connector_with_env(Provider::Groq, "PARLEY_TEST_BLANK_GROQ_KEY");
        assert!(!connector.has_credentials(Provider::Groq));
    }

    #[test]
    fn present_key_connects() {
        std::env::set_var("PARLEY_TEST_GEMINI_KEY", "abc123");
        let connector = connector_with_env(Provider::Gemini, "PARLEY_TEST_GEMINI_KEY");
        assert!(connector.has_credentials(Provider::Gemini));
        assert!(connector.connect(Provider::Gemini).is_ok());
    }
}
