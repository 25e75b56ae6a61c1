use super::{CacheError, TtlCache, WindowHit};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy)]
struct Counter {
    count: u64,
    resets_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    flags: HashMap<String, Instant>,
    counters: HashMap<String, Counter>,
}

/// In-process [`TtlCache`] backed by a single mutex-guarded map.
///
/// Expired entries are dropped lazily on access and by [`MemoryCache::sweep`].
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache and spawns a background task sweeping expired entries
    /// every `interval`. Must be called inside a tokio runtime.
    pub fn with_sweeper(interval: Duration) -> Self {
        let cache = Self::new();
        let weak = Arc::downgrade(&cache.inner);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                MemoryCache { inner }.sweep().await;
            }
        });

        cache
    }

    /// Drops every expired flag and counter.
    pub async fn sweep(&self) {
        let now = Instant::now();
        let mut inner = self.inner.lock().await;
        inner.flags.retain(|_, expires_at| *expires_at >= now);
        inner.counters.retain(|_, c| c.resets_at >= now);
    }

    /// Number of live entries, expired or not.
    pub async fn len(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.flags.len() + inner.counters.len()
    }
}

#[async_trait]
impl TtlCache for MemoryCache {
    async fn put(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = Instant::now() + ttl;
        self.inner.lock().await.flags.insert(key.to_owned(), expires_at);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<bool, CacheError> {
        let removed = self.inner.lock().await.flags.remove(key);
        Ok(matches!(removed, Some(expires_at) if Instant::now() <= expires_at))
    }

    async fn hit(&self, key: &str, window: Duration) -> Result<WindowHit, CacheError> {
        let now = Instant::now();
        let mut inner = self.inner.lock().await;

        let counter = inner
            .counters
            .entry(key.to_owned())
            .and_modify(|c| {
                if now > c.resets_at {
                    *c = Counter {
                        count: 1,
                        resets_at: now + window,
                    };
                } else {
                    c.count = c.count.saturating_add(1);
                }
            })
            .or_insert(Counter {
                count: 1,
                resets_at: now + window,
            });

        Ok(WindowHit {
            count: counter.count,
            resets_in: counter.resets_at.saturating_duration_since(now),
        })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
