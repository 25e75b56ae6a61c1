//! Student self check-in.
//!
//! A check-in is a two-step exchange. The student first asks for a nonce while
//! the session is open, then submits it together with their position. The
//! nonce is consumed before the geofence is evaluated, so every submission
//! needs a fresh one.

use chrono::{DateTime, Utc};
use db::models::{
    attendance_record::{self, AttendanceStatus, InsertOutcome},
    attendance_session, student_roster,
};
use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::{error::ServiceError, geo, identity::Identity, nonce_store::NonceStore};

#[derive(Debug, Clone)]
pub struct CheckInRequest {
    pub session_id: i64,
    pub nonce: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckInOutcome {
    /// Distance from the session point, rounded to the nearest metre.
    pub distance: i64,
}

/// Returns `(user_id, nim)` for a student whose NIM is on the active roster.
async fn eligible_student<C>(db: &C, identity: &Identity) -> Result<(i64, String), ServiceError>
where
    C: ConnectionTrait,
{
    let (user_id, nim) = match identity {
        Identity::Admin { .. } => {
            return Err(ServiceError::forbidden("Only students can check in"));
        }
        Identity::Student { nim: None, .. } => {
            return Err(ServiceError::forbidden(
                "No student number could be derived from this account",
            ));
        }
        Identity::Student {
            user_id,
            nim: Some(nim),
            ..
        } => (*user_id, nim.clone()),
    };

    if !student_roster::Model::is_active_nim(db, &nim).await? {
        return Err(ServiceError::forbidden("Student is not on the active roster"));
    }

    Ok((user_id, nim))
}

async fn open_session<C>(
    db: &C,
    session_id: i64,
    now: DateTime<Utc>,
) -> Result<attendance_session::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let session = attendance_session::Model::find_by_id(db, session_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Attendance session not found"))?;

    if !session.is_open_at(now) {
        return Err(ServiceError::SessionNotActive);
    }
    Ok(session)
}

/// Issues a nonce for an eligible student while the session is open.
pub async fn request_nonce<C>(
    db: &C,
    nonces: &NonceStore,
    identity: &Identity,
    session_id: i64,
    now: DateTime<Utc>,
) -> Result<String, ServiceError>
where
    C: ConnectionTrait,
{
    let (user_id, _) = eligible_student(db, identity).await?;
    let session = open_session(db, session_id, now).await?;

    nonces.issue(user_id, session.id).await
}

/// Records a HADIR check-in if the nonce is valid and the student is inside
/// the session radius.
pub async fn check_in<C>(
    db: &C,
    nonces: &NonceStore,
    identity: &Identity,
    req: &CheckInRequest,
    now: DateTime<Utc>,
) -> Result<CheckInOutcome, ServiceError>
where
    C: ConnectionTrait,
{
    let (user_id, nim) = eligible_student(db, identity).await?;
    let session = open_session(db, req.session_id, now).await?;

    if !(req.latitude.is_finite() && req.longitude.is_finite()) {
        return Err(ServiceError::invalid("Invalid coordinates"));
    }

    if !nonces.consume(user_id, session.id, &req.nonce).await {
        return Err(ServiceError::InvalidOrExpiredToken);
    }

    let distance = geo::distance_meters(
        req.latitude,
        req.longitude,
        session.latitude,
        session.longitude,
    );
    let rounded = distance.round() as i64;

    if distance > session.radius_meters {
        tracing::info!(
            user_id,
            session_id = session.id,
            distance = rounded,
            "Check-in outside geofence"
        );
        return Err(ServiceError::OutOfGeofence { distance: rounded });
    }

    match attendance_record::Model::insert_if_absent(
        db,
        user_id,
        session.id,
        AttendanceStatus::Hadir,
        now,
    )
    .await?
    {
        InsertOutcome::Inserted => {
            tracing::info!(
                target: "audit",
                event = "attendance.checkin",
                user_id,
                nim = %nim,
                session_id = session.id,
                distance = rounded,
            );
            Ok(CheckInOutcome { distance: rounded })
        }
        InsertOutcome::AlreadyPresent => Err(ServiceError::AlreadyCheckedIn),
    }
}
