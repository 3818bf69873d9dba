//! Full configuration validation.
//!
//! Validates numeric ranges and required strings. Each domain has its
//! own submodule; this orchestrator calls them all and collects errors
//! into a single `ConfigError`.

mod chat;
mod helpers;
mod providers;


use crate::schema::ParleyConfig;
use parley_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ParleyConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    providers::validate_providers(&mut errors, config);
    chat::validate_chat(&mut errors, config);
    chat::validate_storage(&mut errors, config);
    chat::validate_voice(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
