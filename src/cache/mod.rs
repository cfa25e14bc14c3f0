//! Key-value cache with per-entry TTL.
//!
//! Every cache in the service (translation cache, per-field read cache,
//! listing cache) goes through a [`CacheStore`]. Backends report failures as
//! [`CacheError`]; the `*_or_*` helpers below are where callers turn those
//! failures into a miss or a no-op, so a broken cache only costs latency.

mod memory;
mod redis_cache;

pub use self::memory::MemoryCache;
pub use self::redis_cache::RedisCache;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend unreachable: {0}")]
    Connection(String),

    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache value could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

/// String-keyed, string-valued store with TTL eviction.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Typed read. Backend errors and undecodable values both count as a miss.
pub async fn get_or_miss<T: DeserializeOwned>(cache: &dyn CacheStore, key: &str) -> Option<T> {
    let raw = match cache.get(key).await {
        Ok(raw) => raw?,
        Err(e) => {
            warn!("Cache read for {} failed, treating as miss: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Discarding undecodable cache entry {}: {}", key, e);
            delete_or_skip(cache, key).await;
            None
        }
    }
}

/// Typed write. Failures are logged and dropped.
pub async fn set_or_skip<T: Serialize + ?Sized>(
    cache: &dyn CacheStore,
    key: &str,
    value: &T,
    ttl: Duration,
) {
    let result = match serde_json::to_string(value) {
        Ok(raw) => cache.set(key, raw, ttl).await,
        Err(e) => Err(CacheError::from(e)),
    };

    if let Err(e) = result {
        warn!("Cache write for {} skipped: {}", key, e);
    }
}

/// Delete. Failures are logged and dropped.
pub async fn delete_or_skip(cache: &dyn CacheStore, key: &str) {
    if let Err(e) = cache.delete(key).await {
        warn!("Cache delete for {} skipped: {}", key, e);
    }
}
