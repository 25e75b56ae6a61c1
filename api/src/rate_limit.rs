use axum::http::HeaderMap;
use services::rate_limiter::{Limit, RateLimiter};
use std::net::SocketAddr;
use util::{config, state::AppState};

use crate::error::ApiError;

/// Best-effort client address for rate-limit keys.
///
/// `X-Forwarded-For` is only honoured when `TRUST_PROXY=true`, and then only its
/// first hop. Otherwise `X-Real-IP` is used, falling back to the socket peer.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy: bool,
) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let forwarded = trust_proxy
        .then(|| header("x-forwarded-for"))
        .flatten()
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or_else(|| header("x-real-ip"))
        .map(str::to_owned)
        .or_else(|| peer.map(|p| p.ip().to_string()))
}

/// Applies `limit` to the caller identified by `identifier` and their address.
pub async fn enforce(
    state: &AppState,
    limit: Limit,
    identifier: &str,
    headers: &HeaderMap,
    peer: SocketAddr,
) -> Result<(), ApiError> {
    let ip = client_ip(headers, Some(peer), config::trust_proxy());
    RateLimiter::new(state.cache())
        .enforce(limit, Some(identifier), ip.as_deref())
        .await
        .map_err(ApiError::from)
}
