use api::{auth::generate_jwt, cors::cors_layer, routes::app};
use axum::{
    Router,
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, Response, header},
};
use chrono::{Duration, Utc};
use db::{
    models::{
        attendance_session,
        student_roster,
        user::{self, Role},
    },
    test_utils::setup_test_db,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::net::SocketAddr;
use tower::ServiceExt;
use util::{
    config::{self, AppConfig},
    state::AppState,
};

pub const CSRF: &str = "test-csrf-token";
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn db(&self) -> &DatabaseConnection {
        self.state.db()
    }

    /// Runs one request through a clone of the router.
    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }
}

/// Fresh in-memory database and cache behind the full `/api` router.
pub async fn make_test_app() -> TestApp {
    AppConfig::set_env("test");
    AppConfig::set_jwt_secret("integration-test-secret");
    AppConfig::set_jwt_duration_minutes(60u64);
    AppConfig::set_trust_proxy(false);
    AppConfig::set_checkin_nonce_ttl_seconds(60);
    AppConfig::set_cors_origins(vec![FRONTEND_ORIGIN.to_owned()]);

    let db = setup_test_db().await;
    let state = AppState::with_memory_cache(db);
    let peer = SocketAddr::from(([127, 0, 0, 1], 40000));
    let router = app(state.clone())
        .layer(cors_layer(&config::cors_origins()))
        .layer(MockConnectInfo(peer));

    TestApp { router, state }
}

pub async fn seed_admin(db: &DatabaseConnection) -> (user::Model, String) {
    let admin = user::Model::create(db, "dosen@itera.ac.id", Some("Dosen"), None, Role::Admin)
        .await
        .unwrap();
    let (token, _) = generate_jwt(&admin).unwrap();
    (admin, token)
}

/// Student on the active roster with a matching account.
pub async fn seed_student(db: &DatabaseConnection, nim: &str) -> (user::Model, String) {
    student_roster::Model::upsert(db, nim, None).await.unwrap();
    let student = user::Model::create(
        db,
        &format!("mhs.{nim}@student.itera.ac.id"),
        None,
        Some(nim),
        Role::Student,
    )
    .await
    .unwrap();
    let (token, _) = generate_jwt(&student).unwrap();
    (student, token)
}

/// Session at `(0, 0)` that opened ten minutes ago.
pub async fn open_session(
    db: &DatabaseConnection,
    admin_id: i64,
    radius: f64,
) -> attendance_session::Model {
    attendance_session::Model::create(
        db,
        admin_id,
        "Kuliah Umum",
        Utc::now() - Duration::minutes(10),
        0.0,
        0.0,
        radius,
    )
    .await
    .unwrap()
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    post_raw(uri, token, body.to_string(), true)
}

pub fn post_json_without_csrf(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    post_raw(uri, token, body.to_string(), false)
}

pub fn post_raw(uri: &str, token: Option<&str>, body: String, csrf: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    if csrf {
        builder = builder
            .header("x-csrf-token", CSRF)
            .header(header::COOKIE, format!("csrf_token={CSRF}"));
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
