use axum::{
    Extension, Json,
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use services::{
    ServiceError,
    attendance_bulk_service::{self, parse_status},
    attendance_session_service::{self, NewSession, SessionDetail},
    checkin_service::{self, CheckInRequest},
    nonce_store::NonceStore,
    rate_limiter::{BULK_LIMIT, CHECKIN_LIMIT, SESSION_CREATE_LIMIT},
};
use std::net::SocketAddr;
use std::time::Duration;
use util::{config, state::AppState};

use super::common::{
    BulkReq, BulkResponse, CheckInReq, CheckInResponse, CreateSessionReq, MAX_BULK_BODY_BYTES,
    MAX_CHECKIN_BODY_BYTES, MAX_SESSION_BODY_BYTES, parse_json_body, resolve_session_id,
};
use crate::{auth::AuthUser, error::ApiError, rate_limit, response::ApiResponse};

/// POST /api/attendance/checkin
///
/// ### Request body
/// ```json
/// { "sessionId": 3, "nonce": "…", "latitude": -5.3582, "longitude": 105.3148 }
/// ```
///
/// `sessionId` may also be sent as a decimal string, as in the nonce query.
///
/// ### Responses
/// - `200 OK` with `{ "ok": true, "distance": 12 }`
/// - `400` missing fields, invalid coordinates, or session not open
/// - `403` invalid/expired nonce, or outside the radius (`data.distance` is set)
/// - `409` already checked in
/// - `429` rate limited (10/min)
pub async fn check_in(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<CheckInResponse>>), ApiError> {
    let identity = user.identity();
    rate_limit::enforce(&state, CHECKIN_LIMIT, identity.email(), &headers, addr).await?;

    let req: CheckInReq = parse_json_body(&body, MAX_CHECKIN_BODY_BYTES)?;
    let session_id = resolve_session_id(req.session_id)?;
    let nonce = req.nonce.as_deref().map(str::trim).unwrap_or_default();
    if nonce.is_empty() {
        return Err(ServiceError::invalid("Session ID and nonce are required").into());
    }

    let nonces = NonceStore::with_ttl(
        state.cache(),
        Duration::from_secs(config::checkin_nonce_ttl_seconds()),
    );
    let request = CheckInRequest {
        session_id,
        nonce: nonce.to_owned(),
        latitude: req.latitude.unwrap_or(f64::NAN),
        longitude: req.longitude.unwrap_or(f64::NAN),
    };

    let outcome =
        checkin_service::check_in(state.db(), &nonces, &identity, &request, Utc::now()).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            CheckInResponse {
                ok: true,
                distance: outcome.distance,
            },
            "Attendance recorded",
        )),
    ))
}

/// POST /api/attendance/bulk
///
/// ### Request body
/// ```json
/// { "sessionId": 3, "status": "IZIN", "nims": ["122140001", "122140002"] }
/// ```
///
/// Status is matched case-insensitively. NIMs are trimmed and de-duplicated.
///
/// ### Responses
/// - `200 OK` with `{ "ok": true, "updated": 2, "missing": [] }`
/// - `400` missing session id, empty NIM list, or unknown status
/// - `404` unknown session, or none of the NIMs match a user
/// - `413` body over 64 KiB or more than 1000 NIMs
/// - `500` a batch failed; `data` reports what was written and what was not
pub async fn bulk_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<BulkResponse>>), ApiError> {
    let identity = user.identity();
    rate_limit::enforce(&state, BULK_LIMIT, identity.email(), &headers, addr).await?;

    let req: BulkReq = parse_json_body(&body, MAX_BULK_BODY_BYTES)?;
    let session_id = resolve_session_id(req.session_id)?;
    let status = parse_status(&req.status)?;

    let outcome = attendance_bulk_service::apply_status(
        state.db(),
        identity.user_id(),
        session_id,
        status,
        &req.nims,
        Utc::now(),
    )
    .await?;

    let complete = outcome.is_complete();
    let data = BulkResponse {
        ok: complete,
        updated: outcome.updated,
        missing: outcome.missing,
        failed: outcome.failed,
    };

    if complete {
        Ok((
            StatusCode::OK,
            Json(ApiResponse::success(data, "Attendance updated")),
        ))
    } else {
        Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(
                data,
                "Attendance was only partially updated",
            )),
        ))
    }
}

/// POST /api/attendance/sessions
///
/// ### Request body
/// ```json
/// {
///   "title": "Kuliah 1",
///   "startTime": "2025-09-08T10:00",
///   "latitude": -5.3582,
///   "longitude": 105.3148,
///   "radius": 50
/// }
/// ```
///
/// `startTime` is WIB wall-clock time. The session always lasts one hour.
///
/// ### Responses
/// - `201 Created` with the full session
/// - `400` missing or invalid fields
/// - `413` body over 20 000 bytes
/// - `429` rate limited (10/min)
pub async fn create_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<SessionDetail>>), ApiError> {
    let identity = user.identity();
    rate_limit::enforce(&state, SESSION_CREATE_LIMIT, identity.email(), &headers, addr).await?;

    let req: CreateSessionReq = parse_json_body(&body, MAX_SESSION_BODY_BYTES)?;
    let new = NewSession {
        title: req.title,
        start_time_wib: req.start_time,
        latitude: req.latitude.unwrap_or(f64::NAN),
        longitude: req.longitude.unwrap_or(f64::NAN),
        radius: req.radius.unwrap_or(f64::NAN),
    };

    let created = attendance_session_service::create_session(state.db(), &identity, &new).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(created, "Attendance session created")),
    ))
}
