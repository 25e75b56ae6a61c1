use sea_orm::DbErr;
use thiserror::Error;
use util::cache::CacheError;

/// Failure outcomes of the attendance operations.
///
/// Each variant maps to exactly one HTTP status in the api crate.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Attendance session has not started or has already ended")]
    SessionNotActive,

    #[error("Check-in token is invalid or expired")]
    InvalidOrExpiredToken,

    #[error("Outside the attendance area ({distance} m away)")]
    OutOfGeofence { distance: i64 },

    #[error("Attendance already recorded for this session")]
    AlreadyCheckedIn,

    #[error("Too many requests, retry in {retry_after} s")]
    RateLimited { retry_after: u64 },

    #[error("Service temporarily unavailable")]
    UpstreamUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<CacheError> for ServiceError {
    fn from(err: CacheError) -> Self {
        Self::UpstreamUnavailable(err.to_string())
    }
}
