pub mod attendance_bulk_service;
pub mod attendance_session_service;
pub mod checkin_service;
pub mod error;
pub mod geo;
pub mod identity;
pub mod nim;
pub mod nonce_store;
pub mod rate_limiter;
pub mod time;
pub mod user_service;

pub use error::ServiceError;
pub use identity::Identity;
