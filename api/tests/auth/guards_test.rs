#[cfg(test)]
mod tests {
    use crate::helpers::{body_json, get, make_test_app, seed_admin, seed_student};
    use api::auth::Claims;
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serial_test::serial;

    fn token_with(exp_offset: Duration, secret: &str) -> String {
        let claims = Claims {
            sub: 1,
            exp: (Utc::now() + exp_offset).timestamp() as usize,
            admin: true,
            email: "dosen@itera.ac.id".into(),
            nim: None,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn missing_token_is_unauthorized() {
        let app = make_test_app().await;

        let response = app.send(get("/api/attendance/sessions", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Authentication required");
    }

    #[tokio::test]
    #[serial]
    async fn expired_or_foreign_token_is_unauthorized() {
        let app = make_test_app().await;

        let expired = token_with(Duration::hours(-2), "integration-test-secret");
        let response = app.send(get("/api/attendance/sessions", Some(&expired))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let forged = token_with(Duration::hours(1), "some-other-secret");
        let response = app.send(get("/api/attendance/sessions", Some(&forged))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn admin_routes_reject_students() {
        let app = make_test_app().await;
        let (_, student_token) = seed_student(app.db(), "122140001").await;

        let req = get("/api/attendance/sessions/1/records", Some(&student_token));
        let response = app.send(req).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Admin access required");
    }

    #[tokio::test]
    #[serial]
    async fn student_routes_reject_admins() {
        let app = make_test_app().await;
        let (_, admin_token) = seed_admin(app.db()).await;

        let req = get("/api/attendance/checkin/nonce?sessionId=1", Some(&admin_token));
        let response = app.send(req).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = body_json(response).await;
        assert_eq!(json["message"], "Student access required");
    }
}
