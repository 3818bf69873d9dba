//! Local persistence configuration types.

use serde::{Deserialize, Serialize};

/// Conversation storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Messages kept per stored conversation; older ones are dropped first.
    pub max_messages: usize,
    /// Override the store directory (default: `<data_dir>/parley/store`).
    pub directory: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_messages: 100,
            directory: None,
        }
    }
}
