//! Redis-backed cache shared by every instance of the service.

use super::{CacheError, CacheStore};
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client, RedisError};
use std::time::Duration;
use tokio::sync::OnceCell;

/// Connects lazily, so the service starts even while Redis is down; a failed
/// first connect is retried on the next cache call. Once connected, the
/// connection manager reconnects on its own after Redis restarts or drops
/// the connection.
pub struct RedisCache {
    client: Client,
    conn: OnceCell<ConnectionManager>,
    key_prefix: String,
}

impl RedisCache {
    /// Only validates the URL; no connection is made here.
    pub fn new(url: &str, key_prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(CacheError::from)?;
        Ok(Self {
            client,
            conn: OnceCell::new(),
            key_prefix: key_prefix.into(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .conn
            .get_or_try_init(|| {
                self.client
                    .get_connection_manager_with_config(connection_config())
            })
            .await?;
        Ok(conn.clone())
    }

    fn key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

/// A cache call never waits long on a dead server; it degrades to a miss.
fn connection_config() -> ConnectionManagerConfig {
    ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_secs(2))
        .set_response_timeout(Duration::from_secs(2))
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(self.key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        // SET EX rejects 0
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(self.key(key), value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(self.key(key)).await?;
        Ok(())
    }
}

impl From<RedisError> for CacheError {
    fn from(e: RedisError) -> Self {
        if e.is_io_error() || e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout()
        {
            CacheError::Connection(e.to_string())
        } else {
            CacheError::Backend(e.to_string())
        }
    }
}
