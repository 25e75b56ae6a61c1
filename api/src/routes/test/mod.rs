//! Test-only routes (mounted under `/api/test` in non-production envs).
//!
//! # Endpoints
//! - POST `/api/test/login` – Sign in by email and receive a bearer token.

use axum::{Router, routing::post};
use util::state::AppState;

mod common;

pub use common::{TestLoginRequest, TestLoginResponse};
pub use post::test_login;

pub fn test_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(test_login))
        .with_state(app_state)
}
