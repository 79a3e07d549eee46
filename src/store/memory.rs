//! In-process store.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::store::{Store, StoreError};

/// A thread-safe map standing in for the key-value store.
///
/// Cloning shares the same data. `set_unavailable(true)` makes every read fail
/// as if the store were unreachable.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, String>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    /// Store a value serialized as JSON.
    pub fn insert_json<T: serde::Serialize>(&self, key: impl Into<String>, value: &T) -> Result<(), serde_json::Error> {
        let raw = serde_json::to_string(value)?;
        self.insert(key, raw);
        Ok(())
    }

    pub fn remove(&self, key: &str) {
        self.inner.remove(key);
    }

    /// Simulate an outage (or recovery).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(self.inner.get(key).map(|entry| entry.value().clone()))
    }
}
