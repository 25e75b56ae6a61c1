//! Single-use check-in tokens.
//!
//! A nonce is bound to one `(user, session)` pair through its cache key, so a
//! token issued to one student cannot be replayed by another or against a
//! different session.

use std::time::Duration;
use util::cache::SharedCache;
use uuid::Uuid;

use crate::error::ServiceError;

pub const DEFAULT_NONCE_TTL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct NonceStore {
    cache: SharedCache,
    ttl: Duration,
}

fn nonce_key(user_id: i64, session_id: i64, nonce: &str) -> String {
    format!("checkin:nonce:{user_id}:{session_id}:{nonce}")
}

impl NonceStore {
    pub fn new(cache: SharedCache) -> Self {
        Self::with_ttl(cache, DEFAULT_NONCE_TTL)
    }

    pub fn with_ttl(cache: SharedCache, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Stores and returns a fresh random token for the pair.
    pub async fn issue(&self, user_id: i64, session_id: i64) -> Result<String, ServiceError> {
        let nonce = Uuid::new_v4().to_string();
        self.cache
            .put(&nonce_key(user_id, session_id, &nonce), self.ttl)
            .await?;
        Ok(nonce)
    }

    /// Deletes the token and reports whether it was still valid.
    ///
    /// Backend failures count as an invalid token.
    pub async fn consume(&self, user_id: i64, session_id: i64, nonce: &str) -> bool {
        let nonce = nonce.trim();
        if nonce.is_empty() {
            return false;
        }

        match self.cache.take(&nonce_key(user_id, session_id, nonce)).await {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    backend = self.cache.backend(),
                    user_id,
                    session_id,
                    "Nonce lookup failed; rejecting check-in"
                );
                false
            }
        }
    }
}
