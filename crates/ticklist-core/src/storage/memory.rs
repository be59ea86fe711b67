//! In-memory persistence provider
//!
//! Values live in a map shared between clones, so a test can hand one clone
//! to a store and inspect the other. Reads and writes can be made to fail to
//! exercise the engine's error policy.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use super::error::{StorageError, StorageResult};
use super::KeyValueStore;

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, String>,
    history: Vec<(String, String)>,
}

/// Persistence provider backed by a shared in-process map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider pre-populated with one value
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut inner = Inner::default();
        inner.values.insert(key.into(), value.into());
        Self {
            inner: Arc::new(Mutex::new(inner)),
            ..Self::default()
        }
    }

    /// Make every subsequent read fail
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every successful write, oldest first, as `(key, value)`
    pub async fn history(&self) -> Vec<(String, String)> {
        self.inner.lock().await.history.clone()
    }

    /// Current value without going through the provider interface
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.inner.lock().await.values.get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("read of '{}' refused", key)));
        }
        Ok(self.inner.lock().await.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("write of '{}' refused", key)));
        }
        let mut inner = self.inner.lock().await;
        inner.history.push((key.to_string(), value.clone()));
        inner.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_values() {
        let store = MemoryStore::new();
        let observer = store.clone();

        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(observer.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(observer.history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_with_value() {
        let store = MemoryStore::with_value("ToDoApp", "[]");
        assert_eq!(store.peek("ToDoApp").await.as_deref(), Some("[]"));
        assert!(store.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::with_value("k", "old");

        store.set_fail_writes(true);
        assert!(store.set("k", "new".to_string()).await.is_err());
        assert_eq!(store.peek("k").await.as_deref(), Some("old"));

        store.set_fail_reads(true);
        assert!(matches!(
            store.get("k").await,
            Err(StorageError::Unavailable(_))
        ));

        store.set_fail_reads(false);
        store.set_fail_writes(false);
        store.set("k", "new".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
    }
}
