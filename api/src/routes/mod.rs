//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check (public)
//! - `/csrf` → CSRF token issuance (public)
//! - `/attendance` → Check-in, bulk status updates and session administration
//! - `/test` → Development/test-only sign-in (mounted only if `env != production`)

use crate::auth::{csrf::csrf_protect, middleware::log_request};
use crate::routes::{
    attendance::attendance_routes, csrf::csrf_routes, health::health_routes, test::test_routes,
};
use axum::{Router, middleware::from_fn};
use util::{config, state::AppState};

pub mod attendance;
pub mod csrf;
pub mod health;
pub mod test;

/// Builds the router for every endpoint below `/api`.
///
/// The `/test` group is mounted here rather than in `main` so that all route
/// registration lives in one place and the router type never changes after
/// construction.
pub fn routes(app_state: AppState) -> Router<AppState> {
    let mut router: Router<AppState> = Router::new()
        .nest("/health", health_routes())
        .nest("/csrf", csrf_routes())
        .nest("/attendance", attendance_routes(app_state.clone()))
        .with_state(app_state.clone());

    if !config::is_production() {
        router = router.nest("/test", test_routes(app_state.clone()));
        tracing::info!("[dev/test] Mounted /test routes (env = {})", config::env());
    } else {
        tracing::info!("[prod] Skipping /test routes");
    }

    router
}

/// Full application: `/api` routes behind CSRF checks, wrapped in request logging.
///
/// Requires `ConnectInfo<SocketAddr>`; serve with
/// `into_make_service_with_connect_info`.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            routes(app_state.clone()).layer(from_fn(csrf_protect)),
        )
        .layer(from_fn(log_request))
        .with_state(app_state)
}
