//! # Redis
//!
//! Shared cache backend for multi-process deployments.
//!
//! - Flags are plain string keys written with `SET .. PX`; consumption uses
//!   `GETDEL`, so check-and-delete is a single server-side step.
//! - Window counters use a small Lua script so increment and first-hit expiry
//!   happen atomically. The script also returns the remaining TTL for
//!   `Retry-After` hints.

use super::{CacheError, TtlCache, WindowHit};
use async_trait::async_trait;
use redis::{
    Client, RedisError, Script,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use std::time::Duration;

const WINDOW_HIT_SCRIPT: &str = r"
local count = redis.call('INCR', KEYS[1])
if count == 1 then
  redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
return { count, redis.call('PTTL', KEYS[1]) }
";

impl From<RedisError> for CacheError {
    fn from(e: RedisError) -> Self {
        CacheError::Backend(e.to_string())
    }
}

/// [`TtlCache`] backed by a Redis connection manager.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    window_hit: Script,
}

impl RedisCache {
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let config = ConnectionManagerConfig::new().set_number_of_retries(1);

        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager_with_config(config).await?;

        Ok(Self {
            connection,
            window_hit: Script::new(WINDOW_HIT_SCRIPT),
        })
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl TtlCache for RedisCache {
    async fn put(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        redis::cmd("SET")
            .arg(key)
            .arg("1")
            .arg("PX")
            .arg(millis(ttl))
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = redis::cmd("GETDEL").arg(key).query_async(&mut conn).await?;
        Ok(value.is_some())
    }

    async fn hit(&self, key: &str, window: Duration) -> Result<WindowHit, CacheError> {
        let mut conn = self.connection.clone();
        let (count, pttl): (i64, i64) = self
            .window_hit
            .key(key)
            .arg(millis(window))
            .invoke_async(&mut conn)
            .await?;

        // PTTL is negative when the key has no expiry; treat as a fresh window.
        let resets_in = if pttl > 0 {
            Duration::from_millis(pttl as u64)
        } else {
            window
        };

        Ok(WindowHit {
            count: count.max(0) as u64,
            resets_in,
        })
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
