#[cfg(test)]
mod tests {
    use crate::helpers::{
        body_json, get, make_test_app, open_session, post_json, seed_admin, seed_student,
    };
    use axum::http::StatusCode;
    use chrono::{DateTime, Utc};
    use db::models::attendance_record::{self, AttendanceStatus};
    use serde_json::{Value, json};
    use serial_test::serial;

    const SESSIONS: &str = "/api/attendance/sessions";

    fn instant(v: &Value) -> DateTime<Utc> {
        v.as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    #[serial]
    async fn create_converts_wib_to_utc() {
        let app = make_test_app().await;
        let (admin, token) = seed_admin(app.db()).await;

        let body = json!({
            "title": "Kuliah 1",
            "startTime": "2025-09-08T10:00",
            "latitude": -5.3582,
            "longitude": 105.3148,
            "radius": 50
        });
        let response = app.send(post_json(SESSIONS, Some(&token), &body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        let data = &json["data"];
        assert_eq!(data["title"], "Kuliah 1");
        assert_eq!(data["createdBy"], admin.id);
        assert_eq!(
            instant(&data["startTime"]),
            "2025-09-08T03:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(
            instant(&data["endTime"]),
            "2025-09-08T04:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[tokio::test]
    #[serial]
    async fn create_rejects_invalid_fields() {
        let app = make_test_app().await;
        let (_, token) = seed_admin(app.db()).await;

        let base = json!({
            "title": "Kuliah 1",
            "startTime": "2025-09-08T10:00",
            "latitude": -5.3582,
            "longitude": 105.3148,
            "radius": 50
        });
        let broken = [
            ("startTime", json!("2025-02-30T10:00")),
            ("startTime", json!("08/09/2025 10:00")),
            ("title", json!("   ")),
            ("radius", json!(0)),
            ("latitude", json!(91.0)),
        ];

        for (field, value) in broken {
            let mut body = base.clone();
            body[field] = value;
            let response = app.send(post_json(SESSIONS, Some(&token), &body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }

        let mut huge = base.clone();
        huge["title"] = json!("x".repeat(20_001));
        let response = app.send(post_json(SESSIONS, Some(&token), &huge)).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    #[serial]
    async fn students_see_reduced_session_view() {
        let app = make_test_app().await;
        let (admin, admin_token) = seed_admin(app.db()).await;
        let (_, student_token) = seed_student(app.db(), "122140001").await;
        open_session(app.db(), admin.id, 50.0).await;
        let newest = open_session(app.db(), admin.id, 25.0).await;

        let response = app.send(get(SESSIONS, Some(&student_token))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], newest.id);
        assert!(rows[0].get("latitude").is_none());
        assert!(rows[0].get("createdBy").is_none());

        let response = app.send(get(SESSIONS, Some(&admin_token))).await;
        let json = body_json(response).await;
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows[0]["latitude"], 0.0);
        assert_eq!(rows[0]["createdBy"], admin.id);
    }

    #[tokio::test]
    #[serial]
    async fn students_cannot_create_sessions() {
        let app = make_test_app().await;
        let (_, token) = seed_student(app.db(), "122140001").await;

        let body = json!({
            "title": "x",
            "startTime": "2025-09-08T10:00",
            "latitude": 0,
            "longitude": 0,
            "radius": 5
        });
        let response = app.send(post_json(SESSIONS, Some(&token), &body)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn records_list_student_details() {
        let app = make_test_app().await;
        let (admin, token) = seed_admin(app.db()).await;
        let (late, _) = seed_student(app.db(), "122140009").await;
        let (early, _) = seed_student(app.db(), "122140001").await;
        let session = open_session(app.db(), admin.id, 50.0).await;

        let marks = [
            (&late, AttendanceStatus::Hadir),
            (&early, AttendanceStatus::Izin),
        ];
        for (student, status) in marks {
            attendance_record::Model::insert_or_update(
                app.db(),
                student.id,
                session.id,
                status,
                Utc::now(),
            )
            .await
            .unwrap();
        }

        let uri = format!("/api/attendance/sessions/{}/records", session.id);
        let response = app.send(get(&uri, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let rows = json["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["nim"], "122140001");
        assert_eq!(rows[0]["status"], "IZIN");
        assert_eq!(rows[1]["nim"], "122140009");
        assert_eq!(rows[1]["status"], "HADIR");

        let response = app.send(get("/api/attendance/sessions/9999/records", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
