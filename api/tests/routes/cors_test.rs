#[cfg(test)]
mod tests {
    use crate::helpers::{FRONTEND_ORIGIN, get, make_test_app};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serial_test::serial;

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/attendance/checkin")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(
                header::ACCESS_CONTROL_REQUEST_HEADERS,
                "content-type,x-csrf-token",
            )
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn listed_origin_may_send_credentials() {
        let app = make_test_app().await;

        let response = app.send(preflight(FRONTEND_ORIGIN)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], FRONTEND_ORIGIN);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("x-csrf-token"));
        assert!(allowed.contains("content-type"));
    }

    #[tokio::test]
    #[serial]
    async fn unlisted_origin_gets_no_cors_headers() {
        let app = make_test_app().await;

        let response = app.send(preflight("https://evil.example")).await;
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );

        let mut req = get("/api/health", None);
        req.headers_mut()
            .insert(header::ORIGIN, "https://evil.example".parse().unwrap());
        let response = app.send(req).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test]
    #[serial]
    async fn same_origin_requests_are_untouched() {
        let app = make_test_app().await;

        let response = app.send(get("/api/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
