use parley_common::PlatformError;
use tracing::debug;

use super::resolve::{config_dir, store_dir};

/// Create the config and store directories. The store lives inside the
/// data directory, so that one is created along the way.
pub fn ensure_dirs() -> Result<(), PlatformError> {
    for dir in [config_dir()?, store_dir()?] {
        std::fs::create_dir_all(&dir).map_err(|e| {
            PlatformError::PathError(format!("cannot create {}: {e}", dir.display()))
        })?;
        debug!(dir = %dir.display(), "Directory ready");
    }
    Ok(())
}
