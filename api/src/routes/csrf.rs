use axum::{
    Json, Router,
    http::{HeaderValue, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Serialize;
use util::{config, state::AppState};
use uuid::Uuid;

use crate::{auth::csrf::CSRF_COOKIE, response::ApiResponse};

#[derive(Serialize)]
pub struct CsrfToken {
    pub token: String,
}

pub fn csrf_routes() -> Router<AppState> {
    Router::new().route("/", get(get_csrf_token))
}

/// GET /csrf
///
/// Returns the caller's CSRF token, minting one and setting the `csrf_token`
/// cookie when none is present. The cookie is readable by scripts so the
/// client can echo it in `X-CSRF-Token`.
pub async fn get_csrf_token(jar: CookieJar) -> Response {
    let existing = jar
        .get(CSRF_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty());

    let (jar, token) = match existing {
        Some(token) => (jar, token),
        None => {
            let token = Uuid::new_v4().simple().to_string();
            let cookie = Cookie::build((CSRF_COOKIE, token.clone()))
                .path("/")
                .same_site(SameSite::Lax)
                .http_only(false)
                .secure(config::is_production())
                .build();
            (jar.add(cookie), token)
        }
    };

    let mut response = (
        jar,
        Json(ApiResponse::success(CsrfToken { token }, "CSRF token issued")),
    )
        .into_response();
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
