use axum::{
    Extension, Json,
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use services::{
    attendance_session_service::{self, RecordRow, SessionView},
    checkin_service,
    nonce_store::NonceStore,
    rate_limiter::NONCE_LIMIT,
};
use std::net::SocketAddr;
use std::time::Duration;
use util::{config, state::AppState};

use super::common::{NonceQuery, NonceResponse, SessionIdParam, resolve_session_id};
use crate::{auth::AuthUser, error::ApiError, rate_limit, response::ApiResponse};

/// GET /api/attendance/checkin/nonce?sessionId={id}
///
/// Issues a single-use token the student must send back with their check-in.
/// The token is bound to the caller and the session and expires after
/// `CHECKIN_NONCE_TTL_SECONDS` (60 by default).
///
/// ### Responses
/// - `200 OK` with `{ "nonce": "…" }` and `Cache-Control: no-store`
/// - `400` missing session id, or session not open
/// - `403` not a student, or not on the active roster
/// - `404` unknown session
/// - `429` rate limited (30/min), with `Retry-After`
pub async fn get_checkin_nonce(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(query): Query<NonceQuery>,
) -> Result<Response, ApiError> {
    let identity = user.identity();
    rate_limit::enforce(&state, NONCE_LIMIT, identity.email(), &headers, addr).await?;

    let session_id = resolve_session_id(query.session_id.map(SessionIdParam::Text))?;

    let nonces = NonceStore::with_ttl(
        state.cache(),
        Duration::from_secs(config::checkin_nonce_ttl_seconds()),
    );
    let nonce =
        checkin_service::request_nonce(state.db(), &nonces, &identity, session_id, Utc::now())
            .await?;

    let mut response = (
        StatusCode::OK,
        Json(ApiResponse::success(NonceResponse { nonce }, "Nonce issued")),
    )
        .into_response();
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

/// GET /api/attendance/sessions
///
/// Newest first. Admins receive full rows; students only
/// `{id, title, startTime, endTime, radius}`.
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<SessionView>>>), ApiError> {
    let sessions = attendance_session_service::list_sessions(state.db(), &user.identity()).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(sessions, "Attendance sessions retrieved")),
    ))
}

/// GET /api/attendance/sessions/{session_id}/records
///
/// Every record of the session with the student's NIM and name, ordered by NIM.
pub async fn list_session_records(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<RecordRow>>>), ApiError> {
    let rows = attendance_session_service::list_session_records(state.db(), session_id).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(rows, "Attendance records retrieved")),
    ))
}
