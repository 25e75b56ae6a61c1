use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use services::ServiceError;

use crate::response::ApiResponse;

/// Handler error carrying a [`ServiceError`] to the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::SessionNotActive => StatusCode::BAD_REQUEST,
            ServiceError::InvalidOrExpiredToken => StatusCode::FORBIDDEN,
            ServiceError::OutOfGeofence { .. } => StatusCode::FORBIDDEN,
            ServiceError::AlreadyCheckedIn => StatusCode::CONFLICT,
            ServiceError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, data) = match &self.0 {
            ServiceError::Database(e) => {
                tracing::error!(error = %e, "Database error while handling request");
                ("Internal server error".to_owned(), Value::Null)
            }
            ServiceError::UpstreamUnavailable(detail) => {
                tracing::error!(detail = %detail, "Upstream dependency unavailable");
                (self.0.to_string(), Value::Null)
            }
            ServiceError::OutOfGeofence { distance } => {
                (self.0.to_string(), json!({ "distance": distance }))
            }
            other => (other.to_string(), Value::Null),
        };

        let mut response = (status, Json(ApiResponse::failure(data, message))).into_response();

        if let ServiceError::RateLimited { retry_after } = self.0 {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_after));
        }

        response
    }
}
