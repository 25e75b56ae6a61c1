//! Double-submit CSRF protection.
//!
//! `GET /api/csrf` hands out a token and mirrors it in a readable cookie. Every
//! state-changing request must echo the cookie value in `X-CSRF-Token`.

use axum::{
    Json,
    body::Body,
    extract::OriginalUri,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{auth::guards::Empty, response::ApiResponse};

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Path prefixes (below `/api`) that never need a token.
const EXEMPT_PREFIXES: [&str; 3] = ["/csrf", "/auth", "/test"];

fn is_exempt(path: &str) -> bool {
    let path = path.strip_prefix("/api").unwrap_or(path);
    EXEMPT_PREFIXES
        .iter()
        .any(|p| path == *p || path.starts_with(&format!("{p}/")))
}

fn tokens_match(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub async fn csrf_protect(
    jar: CookieJar,
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    if matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(next.run(req).await);
    }

    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.path().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    if is_exempt(&path) {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let cookie = jar.get(CSRF_COOKIE).map(|c| c.value().to_owned());

    match cookie {
        Some(cookie) if !header.is_empty() && tokens_match(header, &cookie) => {
            Ok(next.run(req).await)
        }
        _ => {
            tracing::warn!(path = %path, "CSRF token missing or mismatched");
            Err((
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("Invalid CSRF token")),
            ))
        }
    }
}
