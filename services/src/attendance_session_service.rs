use chrono::{DateTime, Utc};
use db::models::{attendance_record, attendance_session};
use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::{error::ServiceError, identity::Identity, time::parse_wib_datetime};

pub const MAX_TITLE_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct NewSession {
    pub title: String,
    /// Wall-clock start in WIB, `YYYY-MM-DDTHH:MM`.
    pub start_time_wib: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
}

/// What a student is allowed to see of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub radius: f64,
}

/// Full session row, admin view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    pub id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SessionView {
    Summary(SessionSummary),
    Detail(SessionDetail),
}

impl From<attendance_session::Model> for SessionSummary {
    fn from(m: attendance_session::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            start_time: m.start_time,
            end_time: m.end_time,
            radius: m.radius_meters,
        }
    }
}

impl From<attendance_session::Model> for SessionDetail {
    fn from(m: attendance_session::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            start_time: m.start_time,
            end_time: m.end_time,
            latitude: m.latitude,
            longitude: m.longitude,
            radius: m.radius_meters,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRow {
    pub id: i64,
    pub user_id: i64,
    pub nim: Option<String>,
    pub name: Option<String>,
    pub status: attendance_record::AttendanceStatus,
    pub attended_at: DateTime<Utc>,
}

fn validate(new: &NewSession) -> Result<(String, DateTime<Utc>), ServiceError> {
    let title = new.title.trim();
    let start = new.start_time_wib.trim();
    if title.is_empty() || start.is_empty() {
        return Err(ServiceError::invalid("Title and start time are required"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ServiceError::invalid(format!(
            "Title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }

    let start_utc =
        parse_wib_datetime(start).ok_or_else(|| ServiceError::invalid("Invalid start time"))?;

    if !(new.latitude.is_finite() && new.longitude.is_finite() && new.radius.is_finite()) {
        return Err(ServiceError::invalid("Invalid coordinates or radius"));
    }
    if !(-90.0..=90.0).contains(&new.latitude) || !(-180.0..=180.0).contains(&new.longitude) {
        return Err(ServiceError::invalid("Coordinates out of range"));
    }
    if new.radius <= 0.0 {
        return Err(ServiceError::invalid("Radius must be greater than 0"));
    }

    Ok((title.to_owned(), start_utc))
}

/// Creates a one-hour session starting at the given WIB time.
pub async fn create_session<C>(
    db: &C,
    admin: &Identity,
    new: &NewSession,
) -> Result<SessionDetail, ServiceError>
where
    C: ConnectionTrait,
{
    if !admin.is_admin() {
        return Err(ServiceError::forbidden("Admin access required"));
    }
    let (title, start) = validate(new)?;

    let created = attendance_session::Model::create(
        db,
        admin.user_id(),
        &title,
        start,
        new.latitude,
        new.longitude,
        new.radius,
    )
    .await?;

    tracing::info!(
        target: "audit",
        event = "attendance.session.create",
        admin_id = admin.user_id(),
        session_id = created.id,
        title = %created.title,
    );

    Ok(created.into())
}

/// Newest sessions first. Students only see the summary fields.
pub async fn list_sessions<C>(db: &C, viewer: &Identity) -> Result<Vec<SessionView>, ServiceError>
where
    C: ConnectionTrait,
{
    let rows = attendance_session::Model::list_newest_first(db).await?;
    let admin = viewer.is_admin();

    Ok(rows
        .into_iter()
        .map(|m| {
            if admin {
                SessionView::Detail(m.into())
            } else {
                SessionView::Summary(m.into())
            }
        })
        .collect())
}

/// Every record of one session with the student's NIM and name, ordered by NIM.
pub async fn list_session_records<C>(
    db: &C,
    session_id: i64,
) -> Result<Vec<RecordRow>, ServiceError>
where
    C: ConnectionTrait,
{
    attendance_session::Model::find_by_id(db, session_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Attendance session not found"))?;

    let mut rows: Vec<RecordRow> = attendance_record::Model::list_for_session(db, session_id)
        .await?
        .into_iter()
        .map(|(rec, owner)| RecordRow {
            id: rec.id,
            user_id: rec.user_id,
            nim: owner.as_ref().and_then(|u| u.nim.clone()),
            name: owner.and_then(|u| u.name),
            status: rec.status,
            attended_at: rec.attended_at,
        })
        .collect();

    rows.sort_by(|a, b| a.nim.cmp(&b.nim).then(a.id.cmp(&b.id)));
    Ok(rows)
}
