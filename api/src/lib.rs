pub mod auth;
pub mod cors;
pub mod error;
pub mod rate_limit;
pub mod response;
pub mod routes;
