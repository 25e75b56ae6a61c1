//! `/api/attendance` routes.
//!
//! - GET  `/checkin/nonce?sessionId=`   – issue a single-use check-in nonce (student)
//! - POST `/checkin`                    – geofenced self check-in (student)
//! - POST `/bulk`                       – set one status for many NIMs (admin)
//! - GET  `/sessions`                   – list sessions (any signed-in user)
//! - POST `/sessions`                   – create a one-hour session (admin)
//! - GET  `/sessions/{session_id}/records` – records of one session (admin)

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

mod common;
mod get;
mod post;

pub use get::{get_checkin_nonce, list_session_records, list_sessions};
pub use post::{bulk_update, check_in, create_session};

use crate::auth::guards::{allow_admin, allow_authenticated, allow_student};

pub fn attendance_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/checkin/nonce", get(get_checkin_nonce).route_layer(from_fn(allow_student)))
        .route("/checkin", post(check_in).route_layer(from_fn(allow_student)))
        .route("/bulk", post(bulk_update).route_layer(from_fn(allow_admin)))
        .route("/sessions", get(list_sessions).route_layer(from_fn(allow_authenticated)))
        .route("/sessions", post(create_session).route_layer(from_fn(allow_admin)))
        .route(
            "/sessions/{session_id}/records",
            get(list_session_records).route_layer(from_fn(allow_admin)),
        )
        .with_state(app_state)
}
