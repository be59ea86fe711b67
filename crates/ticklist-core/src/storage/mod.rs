//! Storage layer
//!
//! Persistence providers are asynchronous string key-value stores. The
//! engine keeps the whole working set under a single key, so providers only
//! need whole-value `get` and `set`.
//!
//! ## Providers
//!
//! - **FileStore**: one JSON file per key in the data directory, atomic writes
//! - **MemoryStore**: shared in-process map with a write log, used by tests

use std::future::Future;

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::{FileStore, StorageStats};
pub use memory::MemoryStore;

/// Suffix of the key an unreadable stored value is copied to
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Asynchronous key-value persistence provider
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> impl Future<Output = StorageResult<Option<String>>> + Send;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: String) -> impl Future<Output = StorageResult<()>> + Send;
}

/// Check that a key can be used as a storage location
///
/// Keys become file names in [`FileStore`], so they are restricted to a
/// portable character set.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let invalid = |reason| {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    };

    if key.is_empty() {
        return invalid("key is empty");
    }
    if key.starts_with('.') {
        return invalid("key starts with '.'");
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return invalid("key contains characters other than letters, digits, '-', '_' or '.'");
    }
    Ok(())
}
