#[cfg(test)]
mod tests {
    use crate::helpers::{
        body_json, make_test_app, open_session, post_json, post_raw, seed_admin, seed_student,
    };
    use axum::http::StatusCode;
    use db::models::attendance_record::{self, AttendanceStatus};
    use sea_orm::ConnectionTrait;
    use serde_json::{Value, json};
    use serial_test::serial;

    const BULK: &str = "/api/attendance/bulk";

    fn bulk_body(session_id: Value, status: &str, nims: &[&str]) -> Value {
        json!({ "sessionId": session_id, "status": status, "nims": nims })
    }

    #[tokio::test]
    #[serial]
    async fn updates_known_students_and_reports_missing() {
        let app = make_test_app().await;
        let (admin, token) = seed_admin(app.db()).await;
        let (first, _) = seed_student(app.db(), "122140001").await;
        let (second, _) = seed_student(app.db(), "122140002").await;
        let session = open_session(app.db(), admin.id, 50.0).await;

        let body = bulk_body(
            json!(session.id),
            "izin",
            &["122140001", " 122140002 ", "122140001", "122149999"],
        );
        let response = app.send(post_json(BULK, Some(&token), &body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["ok"], true);
        assert_eq!(json["data"]["updated"], 2);
        assert_eq!(json["data"]["missing"], json!(["122149999"]));
        assert!(json["data"].get("failed").is_none());

        for student in [first, second] {
            let record = attendance_record::Model::find_for(app.db(), student.id, session.id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(record.status, AttendanceStatus::Izin);
        }
    }

    #[tokio::test]
    #[serial]
    async fn accepts_session_id_as_string() {
        let app = make_test_app().await;
        let (admin, token) = seed_admin(app.db()).await;
        seed_student(app.db(), "122140001").await;
        let session = open_session(app.db(), admin.id, 50.0).await;

        let body = bulk_body(json!(session.id.to_string()), "HADIR", &["122140001"]);
        let response = app.send(post_json(BULK, Some(&token), &body)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    #[serial]
    async fn overrides_existing_check_in() {
        let app = make_test_app().await;
        let (admin, token) = seed_admin(app.db()).await;
        let (student, _) = seed_student(app.db(), "122140001").await;
        let session = open_session(app.db(), admin.id, 50.0).await;
        attendance_record::Model::insert_if_absent(
            app.db(),
            student.id,
            session.id,
            AttendanceStatus::Hadir,
            chrono::Utc::now(),
        )
        .await
        .unwrap();

        let body = bulk_body(json!(session.id), "TIDAK_HADIR", &["122140001"]);
        let response = app.send(post_json(BULK, Some(&token), &body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let record = attendance_record::Model::find_for(app.db(), student.id, session.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::TidakHadir);
    }

    #[tokio::test]
    #[serial]
    async fn partial_failure_returns_what_was_applied() {
        let app = make_test_app().await;
        let (admin, token) = seed_admin(app.db()).await;
        let nims: Vec<String> = (1..=22).map(|i| format!("1221400{i:02}")).collect();
        for nim in &nims {
            seed_student(app.db(), nim).await;
        }
        let session = open_session(app.db(), admin.id, 50.0).await;

        // The last student lands in the second batch of twenty.
        app.db()
            .execute_unprepared(
                "CREATE TRIGGER reject_one_student BEFORE INSERT ON attendance_records \
                 WHEN NEW.user_id = (SELECT id FROM users WHERE nim = '122140022') \
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .await
            .unwrap();

        let refs: Vec<&str> = nims.iter().map(String::as_str).collect();
        let body = bulk_body(json!(session.id), "IZIN", &refs);
        let response = app.send(post_json(BULK, Some(&token), &body)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["ok"], false);
        assert_eq!(json["data"]["updated"], 20);
        assert_eq!(json["data"]["failed"], json!(["122140021", "122140022"]));
        assert_eq!(json["data"]["missing"], json!([]));

        let rows = attendance_record::Model::list_for_session(app.db(), session.id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 20);
    }

    #[tokio::test]
    #[serial]
    async fn rejects_bad_requests() {
        let app = make_test_app().await;
        let (admin, token) = seed_admin(app.db()).await;
        let session = open_session(app.db(), admin.id, 50.0).await;
        let id = json!(session.id);

        let cases = [
            (bulk_body(id.clone(), "ALPHA", &["122140001"]), StatusCode::BAD_REQUEST),
            (bulk_body(id.clone(), "IZIN", &[]), StatusCode::BAD_REQUEST),
            (json!({ "status": "IZIN", "nims": ["122140001"] }), StatusCode::BAD_REQUEST),
            (bulk_body(id.clone(), "IZIN", &["122149999"]), StatusCode::NOT_FOUND),
            (bulk_body(json!(9999), "IZIN", &["122140001"]), StatusCode::NOT_FOUND),
        ];

        for (body, expected) in cases {
            let response = app.send(post_json(BULK, Some(&token), &body)).await;
            assert_eq!(response.status(), expected, "body: {body}");
        }
    }

    #[tokio::test]
    #[serial]
    async fn rejects_oversized_payloads() {
        let app = make_test_app().await;
        let (admin, token) = seed_admin(app.db()).await;
        let session = open_session(app.db(), admin.id, 50.0).await;

        let nims: Vec<String> = (0..1001).map(|i| format!("1221{i:05}")).collect();
        let body = json!({ "sessionId": session.id, "status": "IZIN", "nims": nims });
        let response = app.send(post_json(BULK, Some(&token), &body)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let padded = format!(
            r#"{{"sessionId":{},"status":"IZIN","nims":["{}"]}}"#,
            session.id,
            "1".repeat(70_000)
        );
        let response = app.send(post_raw(BULK, Some(&token), padded, true)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    #[serial]
    async fn students_cannot_bulk_update() {
        let app = make_test_app().await;
        let (_, token) = seed_student(app.db(), "122140001").await;

        let body = bulk_body(json!(1), "HADIR", &["122140001"]);
        let response = app.send(post_json(BULK, Some(&token), &body)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
