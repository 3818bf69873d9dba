use std::path::PathBuf;

use parley_common::PlatformError;

const APP_DIR: &str = "parley";

fn app_dir(base: Option<PathBuf>, kind: &str) -> Result<PathBuf, PlatformError> {
    base.map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| PlatformError::PathError(format!("this platform has no {kind} directory")))
}

/// Per-user config directory, e.g. `~/.config/parley` on Linux. Holds
/// `config.toml` and an optional `.env`.
pub fn config_dir() -> Result<PathBuf, PlatformError> {
    app_dir(dirs::config_dir(), "config")
}

/// Per-user data directory, e.g. `~/.local/share/parley` on Linux.
pub fn data_dir() -> Result<PathBuf, PlatformError> {
    app_dir(dirs::data_dir(), "data")
}

/// Saved conversations, one file per store key.
pub fn store_dir() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("store"))
}

/// Line history for the prompt.
pub fn history_file() -> Result<PathBuf, PlatformError> {
    Ok(data_dir()?.join("history.txt"))
}
