//! In-process store used by tests and `--dry-run`

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::ArticleStore;
use crate::utils::error::StoreError;
use crate::utils::glob_match;

/// A command recorded by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Ping,
    Exists(String),
    Get(String),
    Set(String),
    Delete(String),
    DeletePattern(String),
}

#[derive(Default)]
struct Inner {
    data: BTreeMap<String, String>,
    operations: Vec<StoreOp>,
}

/// Map-backed [`ArticleStore`] that also records every command issued
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means a test panicked mid-command; the map is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.lock().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.lock().data.keys().cloned().collect()
    }

    /// Commands issued so far, oldest first
    pub fn operations(&self) -> Vec<StoreOp> {
        self.lock().operations.clone()
    }

    /// Number of `set` commands issued so far
    pub fn write_count(&self) -> usize {
        self.lock()
            .operations
            .iter()
            .filter(|op| matches!(op, StoreOp::Set(_)))
            .count()
    }

    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().operations.push(StoreOp::Ping);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        inner.operations.push(StoreOp::Exists(key.to_string()));
        Ok(inner.data.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut inner = self.lock();
        inner.operations.push(StoreOp::Get(key.to_string()));
        Ok(inner.data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.operations.push(StoreOp::Set(key.to_string()));
        inner.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.operations.push(StoreOp::Delete(key.to_string()));
        inner.data.remove(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        inner
            .operations
            .push(StoreOp::DeletePattern(pattern.to_string()));

        let before = inner.data.len();
        inner.data.retain(|key, _| !glob_match(pattern, key));
        Ok((before - inner.data.len()) as u64)
    }
}
