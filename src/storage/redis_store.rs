//! Redis-backed article store
//!
//! One multiplexed connection is opened at startup and shared by every
//! command; failing to open it is fatal for the caller.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use super::ArticleStore;
use crate::config::StoreConfig;
use crate::utils::error::StoreError;

/// Redis client over a single multiplexed connection
pub struct RedisStore {
    conn: MultiplexedConnection,
    address: String,
}

impl RedisStore {
    /// Connect to the store described by `config` and verify it answers `PING`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connection` if the URL is invalid, the server is
    /// unreachable, the TLS handshake or authentication fails
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let address = config.address();
        let url = config.connection_url().map_err(|e| StoreError::Connection {
            address: address.clone(),
            source: redis::RedisError::from((
                redis::ErrorKind::InvalidClientConfig,
                "invalid store URL",
                e.to_string(),
            )),
        })?;

        Self::connect_url(&url, address).await
    }

    /// Connect to an explicit `redis://` or `rediss://` URL
    ///
    /// `address` is only used for log lines and error messages.
    pub async fn connect_url(url: &str, address: String) -> Result<Self, StoreError> {
        let connection_error = |source| StoreError::Connection {
            address: address.clone(),
            source,
        };

        let client = redis::Client::open(url).map_err(connection_error)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(connection_error)?;

        let store = Self { conn, address };
        store.ping().await?;

        tracing::info!(address = %store.address, "Connected to store");

        Ok(store)
    }

    /// `host:port` of the connected server
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl ArticleStore for RedisStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(StoreError::command("PING"))?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        conn.exists(key).await.map_err(StoreError::command("EXISTS"))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(StoreError::command("GET"))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(StoreError::command("SET"))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(StoreError::command("DEL"))
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();

        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut conn)
            .await
            .map_err(StoreError::command("KEYS"))?;

        if keys.is_empty() {
            return Ok(0);
        }

        let count: u64 = conn
            .del(&keys)
            .await
            .map_err(StoreError::command("DEL"))?;

        tracing::info!(pattern = %pattern, count = count, "Deleted keys matching pattern");

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{article_key, store_article, WriteOutcome};

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let result = RedisStore::connect_url("redis://127.0.0.1:1", "127.0.0.1:1".to_string()).await;
        assert!(matches!(result, Err(StoreError::Connection { .. })));
    }

    #[tokio::test]
    async fn test_invalid_url_is_connection_error() {
        let result = RedisStore::connect_url("not-a-url", "nowhere".to_string()).await;
        assert!(matches!(result, Err(StoreError::Connection { .. })));
    }

    // Integration tests require running Redis
    #[tokio::test]
    #[ignore = "Requires running Redis"]
    async fn test_overwrite_roundtrip() {
        let store = RedisStore::connect_url("redis://127.0.0.1:6379", "127.0.0.1:6379".to_string())
            .await
            .unwrap();
        let key = article_key("wikiharvestTest:wikipedia", "Overwrite");

        store.delete(&key).await.unwrap();
        assert_eq!(
            store_article(&store, &key, "A").await.unwrap(),
            WriteOutcome::Created
        );
        assert_eq!(
            store_article(&store, &key, "B").await.unwrap(),
            WriteOutcome::Replaced
        );
        assert_eq!(store.get(&key).await.unwrap().as_deref(), Some("B"));

        let removed = store
            .delete_pattern("wikiharvestTest:wikipedia:*")
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }
}
