//! Where `config.toml` lives, and seeding it from the template.

use std::io::Write;
use std::path::{Path, PathBuf};

use parley_common::ConfigError;
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "parley";
const FILE_NAME: &str = "config.toml";

/// `<os config dir>/parley/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    match dirs::config_dir() {
        Some(base) => Ok(base.join(APP_DIR).join(FILE_NAME)),
        None => Err(ConfigError::ParseError(
            "this platform has no config directory".into(),
        )),
    }
}

/// Write the commented template to `path`.
///
/// The template goes to a sibling `.tmp` file first and is renamed into
/// place, so an interrupted first run leaves no half-written config.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io = |action: &str, at: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("cannot {action} {}: {e}", at.display()))
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io("create", dir, e))?;
    }

    let staging = path.with_extension("toml.tmp");
    let mut file = std::fs::File::create(&staging).map_err(|e| io("create", &staging, e))?;
    file.write_all(default_config_toml().as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| io("write", &staging, e))?;
    drop(file);

    if let Err(e) = std::fs::rename(&staging, path) {
        let _ = std::fs::remove_file(&staging);
        return Err(io("install", path, e));
    }

    info!(path = %path.display(), "Created default config");
    Ok(())
}
