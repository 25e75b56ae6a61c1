//! Application state container shared across Axum route handlers and services.
//!
//! This struct holds shared resources such as the database connection and the
//! keyed TTL cache backing check-in nonces and rate-limit counters.

use crate::cache::{MemoryCache, SharedCache};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The cache selected at start-up (Redis or in-process).
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    cache: SharedCache,
}

impl AppState {
    /// Creates a new `AppState` with the given database connection and cache.
    pub fn new(db: DatabaseConnection, cache: SharedCache) -> Self {
        Self { db, cache }
    }

    /// State with a fresh in-process cache. Used by tests and local tooling.
    pub fn with_memory_cache(db: DatabaseConnection) -> Self {
        Self::new(db, Arc::new(MemoryCache::new()))
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns a handle to the shared cache.
    pub fn cache(&self) -> SharedCache {
        Arc::clone(&self.cache)
    }
}
