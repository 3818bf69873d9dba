//! Key-value backends.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use parley_common::StorageError;

/// Synchronous string key-value storage.
///
/// Mirrors the browser `localStorage` contract: string keys, string
/// values, no transactions across keys.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
