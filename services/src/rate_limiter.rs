//! Fixed-window request limiting keyed by action, caller and client address.

use std::time::Duration;
use util::cache::SharedCache;

use crate::error::ServiceError;

/// A per-action budget of `max` requests per `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub scope: &'static str,
    pub max: u64,
    pub window: Duration,
}

const MINUTE: Duration = Duration::from_secs(60);

pub const NONCE_LIMIT: Limit = Limit {
    scope: "attendance-checkin-nonce",
    max: 30,
    window: MINUTE,
};

pub const CHECKIN_LIMIT: Limit = Limit {
    scope: "attendance-checkin",
    max: 10,
    window: MINUTE,
};

pub const BULK_LIMIT: Limit = Limit {
    scope: "attendance-bulk",
    max: 15,
    window: MINUTE,
};

pub const SESSION_CREATE_LIMIT: Limit = Limit {
    scope: "attendance-sessions-create",
    max: 10,
    window: MINUTE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Whole seconds until the window resets. Zero when allowed.
    pub retry_after_seconds: u64,
}

/// Joins the non-empty parts as `scope:identifier:ip`.
pub fn rate_limit_key(scope: &str, identifier: Option<&str>, ip: Option<&str>) -> String {
    [Some(scope), identifier, ip]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(":")
}

#[derive(Clone)]
pub struct RateLimiter {
    cache: SharedCache,
}

impl RateLimiter {
    pub fn new(cache: SharedCache) -> Self {
        Self { cache }
    }

    /// Counts one hit against `key`. Hits past `max` inside the window are denied.
    pub async fn check(
        &self,
        key: &str,
        window: Duration,
        max: u64,
    ) -> Result<RateLimitDecision, ServiceError> {
        let hit = self.cache.hit(key, window).await.map_err(|e| {
            tracing::error!(
                error = %e,
                backend = self.cache.backend(),
                key,
                "Rate limiter unavailable"
            );
            ServiceError::from(e)
        })?;

        if hit.count <= max {
            return Ok(RateLimitDecision {
                allowed: true,
                retry_after_seconds: 0,
            });
        }

        let remaining_ms = hit.resets_in.as_millis() as u64;
        let retry = remaining_ms.div_ceil(1000).clamp(1, window.as_secs().max(1));

        Ok(RateLimitDecision {
            allowed: false,
            retry_after_seconds: retry,
        })
    }

    /// Applies `limit` to the caller, failing with [`ServiceError::RateLimited`].
    pub async fn enforce(
        &self,
        limit: Limit,
        identifier: Option<&str>,
        ip: Option<&str>,
    ) -> Result<(), ServiceError> {
        let key = rate_limit_key(limit.scope, identifier, ip);
        let decision = self.check(&key, limit.window, limit.max).await?;

        if decision.allowed {
            Ok(())
        } else {
            tracing::warn!(
                key = %key,
                retry_after = decision.retry_after_seconds,
                "Rate limit exceeded"
            );
            Err(ServiceError::RateLimited {
                retry_after: decision.retry_after_seconds,
            })
        }
    }
}
