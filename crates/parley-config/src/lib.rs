//! Parley configuration.
//!
//! `config.toml` is optional in every detail: each section falls back to
//! its defaults, so a file holding only `[chat]` is a complete config.
//!
//! ```rust,no_run
//! let config = parley_config::load_config()?;
//! println!("{}", config.chat.default_provider);
//! # Ok::<(), parley_common::ConfigError>(())
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ParleyConfig, CONFIG_SCHEMA_VERSION};

use parley_common::ConfigError;
use std::path::Path;

/// Load and validate `config.toml` from the OS config directory, creating
/// it from the template on first run.
pub fn load_config() -> Result<ParleyConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path (the `--config` flag).
pub fn load_config_from(path: &Path) -> Result<ParleyConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StaleReply;
    use parley_common::Provider;

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nmax_messages = 0\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn load_config_from_accepts_serialized_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = ParleyConfig::default();
        config.chat.default_provider = Provider::Groq;
        config.chat.stale_reply = StaleReply::Discard;
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.chat.default_provider, Provider::Groq);
        assert_eq!(loaded.chat.stale_reply, StaleReply::Discard);
        assert_eq!(loaded.voice.model, "whisper-1");
    }
}
