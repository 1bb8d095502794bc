//! Key-value persistence for harvested articles
//!
//! [`ArticleStore`] is the narrow set of commands the harvester needs.
//! [`RedisStore`] talks to a Redis-protocol server (a managed instance over
//! TLS in production); [`MemoryStore`] keeps everything in process for tests
//! and dry runs.
//!
//! Every record lives under `<prefix>:<title>`, see [`article_key`].

pub mod memory;
pub mod redis_store;

use async_trait::async_trait;

use crate::utils::error::StoreError;

pub use memory::{MemoryStore, StoreOp};
pub use redis_store::RedisStore;

/// Commands the harvester issues against the key-value store
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Check connectivity
    async fn ping(&self) -> Result<(), StoreError>;

    /// Whether `key` holds a value
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Read the value under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Unconditionally write `value` under `key`
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`; no-op when absent
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Remove every key matching a glob `pattern`, returning how many were removed
    async fn delete_pattern(&self, pattern: &str) -> Result<u64, StoreError>;
}

/// What a write did to the key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Key did not exist before
    Created,
    /// Key existed; the old value was deleted and replaced
    Replaced,
}

/// Build the store key for an article title
///
/// The title is used verbatim: no normalization or escaping.
pub fn article_key(prefix: &str, title: &str) -> String {
    format!("{prefix}:{title}")
}

/// Glob pattern matching every article under `prefix`
pub fn prefix_pattern(prefix: &str) -> String {
    format!("{prefix}:*")
}

/// Write `value` under `key`, replacing any earlier record
///
/// Existing keys are deleted before the new value is set, so the stored
/// value is always exactly `value` and never a merge. The two commands are
/// not atomic; a crash between them leaves the key absent.
pub async fn store_article<S>(store: &S, key: &str, value: &str) -> Result<WriteOutcome, StoreError>
where
    S: ArticleStore + ?Sized,
{
    let outcome = if store.exists(key).await? {
        store.delete(key).await?;
        WriteOutcome::Replaced
    } else {
        WriteOutcome::Created
    };

    store.set(key, value).await?;

    Ok(outcome)
}
