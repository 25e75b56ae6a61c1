//! Keyed, expiring cache used for ephemeral protocol state.
//!
//! Two backends implement [`TtlCache`]:
//!
//! - [`MemoryCache`]: a process-local map with manual expiry. Counters and
//!   flags are not shared between processes.
//! - [`RedisCache`]: a shared Redis instance, used whenever `REDIS_URL` is set.
//!
//! Every operation on a single key is atomic in both backends.

mod memory;
mod redis_store;

pub use memory::MemoryCache;
pub use redis_store::RedisCache;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Backend(String),
}

/// Result of counting one hit against a fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHit {
    /// Hits recorded in the current window, including this one.
    pub count: u64,
    /// Time left until the window resets.
    pub resets_in: Duration,
}

#[async_trait]
pub trait TtlCache: Send + Sync {
    /// Stores a presence flag under `key` that expires after `ttl`.
    async fn put(&self, key: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key` and reports whether it was present and unexpired.
    ///
    /// The entry is gone afterwards even when it had already expired.
    async fn take(&self, key: &str) -> Result<bool, CacheError>;

    /// Increments the counter under `key`. The first hit opens a window of
    /// length `window`; the counter restarts once that window has elapsed.
    async fn hit(&self, key: &str, window: Duration) -> Result<WindowHit, CacheError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

pub type SharedCache = Arc<dyn TtlCache>;

/// Builds the cache selected by configuration.
///
/// With a Redis URL the shared backend is used; without one, or when Redis
/// cannot be reached at start-up, the in-process map is used instead.
pub async fn from_url(redis_url: Option<&str>) -> SharedCache {
    match redis_url {
        Some(url) => match RedisCache::connect(url).await {
            Ok(cache) => {
                tracing::info!("Using Redis cache backend");
                Arc::new(cache)
            }
            Err(e) => {
                tracing::error!(error = %e, "Redis unreachable, falling back to in-memory cache");
                Arc::new(MemoryCache::with_sweeper(Duration::from_secs(60)))
            }
        },
        None => {
            tracing::warn!(
                "REDIS_URL not set; nonces and rate limits are tracked per process"
            );
            Arc::new(MemoryCache::with_sweeper(Duration::from_secs(60)))
        }
    }
}
