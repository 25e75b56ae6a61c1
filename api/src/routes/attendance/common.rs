use axum::body::Bytes;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use services::ServiceError;

use crate::error::ApiError;

pub const MAX_CHECKIN_BODY_BYTES: usize = 4 * 1024;
pub const MAX_BULK_BODY_BYTES: usize = 64 * 1024;
pub const MAX_SESSION_BODY_BYTES: usize = 20_000;

/// Parses a JSON body after enforcing a byte ceiling.
pub fn parse_json_body<T: DeserializeOwned>(body: &Bytes, max: usize) -> Result<T, ApiError> {
    if body.len() > max {
        return Err(ServiceError::PayloadTooLarge("Payload too large".into()).into());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed JSON body");
        ServiceError::invalid("Invalid payload").into()
    })
}

/// A session id as clients send it: a JSON number or its decimal string.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SessionIdParam {
    Number(i64),
    Text(String),
}

/// Resolves a session id the same way for query strings and JSON bodies.
///
/// Missing or blank → `400`. Text that is not an integer cannot name a session,
/// so it is reported as `404`.
pub fn resolve_session_id(raw: Option<SessionIdParam>) -> Result<i64, ApiError> {
    let text = match raw {
        Some(SessionIdParam::Number(id)) => return Ok(id),
        Some(SessionIdParam::Text(text)) => text,
        None => String::new(),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(ServiceError::invalid("Session ID is required").into());
    }
    text.parse()
        .map_err(|_| ServiceError::not_found("Attendance session not found").into())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceQuery {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NonceResponse {
    pub nonce: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInReq {
    pub session_id: Option<SessionIdParam>,
    pub nonce: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub ok: bool,
    pub distance: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkReq {
    pub session_id: Option<SessionIdParam>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub nims: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub ok: bool,
    pub updated: usize,
    pub missing: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionReq {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_time: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
}
