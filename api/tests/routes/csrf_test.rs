#[cfg(test)]
mod tests {
    use crate::helpers::{body_json, get, make_test_app};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn issues_token_and_cookie() {
        let app = make_test_app().await;

        let response = app.send(get("/api/csrf", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_owned();
        assert!(cookie.starts_with("csrf_token="));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("HttpOnly"));

        let json = body_json(response).await;
        let token = json["data"]["token"].as_str().unwrap();
        assert!(cookie.starts_with(&format!("csrf_token={token}")));
    }

    #[tokio::test]
    #[serial]
    async fn reuses_existing_cookie() {
        let app = make_test_app().await;

        let req = Request::builder()
            .uri("/api/csrf")
            .header(header::COOKIE, "csrf_token=already-set")
            .body(Body::empty())
            .unwrap();
        let response = app.send(req).await;

        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let json = body_json(response).await;
        assert_eq!(json["data"]["token"], "already-set");
    }
}
