//! Configuration schema types for Parley.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults.

mod chat;
mod providers;
mod storage;
mod system;
mod voice;

pub use chat::*;
pub use providers::*;
pub use storage::*;
pub use system::*;
pub use voice::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Parley.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct ParleyConfig {
    pub chat: ChatConfig,
    pub providers: ProvidersConfig,
    pub storage: StorageConfig,
    pub voice: VoiceConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================
