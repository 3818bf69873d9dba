//! Reading `config.toml`.

use std::path::Path;

use parley_common::ConfigError;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};
use crate::schema::ParleyConfig;
use crate::validation;

/// Parse the file at `path`. Absent sections and fields take their
/// defaults. Out-of-range values are logged but still returned; callers
/// that need a valid config run [`validation::validate`] themselves.
pub fn load_from_path(path: &Path) -> Result<ParleyConfig, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };

    let config = toml::from_str::<ParleyConfig>(&text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "Config has invalid values: {e}");
    }
    info!(path = %path.display(), "Config loaded");
    Ok(config)
}

/// Load from [`default_config_path`], seeding the file from the template on
/// first run.
pub fn load_default() -> Result<ParleyConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "No config yet");
            create_default_config(&path)?;
            Ok(ParleyConfig::default())
        }
        other => other,
    }
}
