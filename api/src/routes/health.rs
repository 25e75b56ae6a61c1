use crate::response::ApiResponse;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use util::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// `200` with `"OK"` while the database answers, `503` otherwise.
async fn health_check(
    State(app): State<AppState>,
) -> (StatusCode, Json<ApiResponse<&'static str>>) {
    match app.db().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success("OK", "Health check passed")),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::error("Database unreachable")),
            )
        }
    }
}
