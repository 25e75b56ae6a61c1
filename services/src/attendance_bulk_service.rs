use chrono::{DateTime, Utc};
use db::models::{
    attendance_record::{self, AttendanceStatus},
    attendance_session, user,
};
use sea_orm::{ConnectionTrait, DbErr, TransactionTrait};
use serde::Serialize;
use std::collections::HashSet;

use crate::error::ServiceError;

pub const BATCH_SIZE: usize = 20;
pub const MAX_UNIQUE_NIMS: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub updated: usize,
    /// NIMs with no matching user, in request order.
    pub missing: Vec<String>,
    /// NIMs that matched a user but were not written because a batch failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn parse_status(raw: &str) -> Result<AttendanceStatus, ServiceError> {
    AttendanceStatus::parse_loose(raw).ok_or_else(|| ServiceError::invalid("Invalid status"))
}

/// Trims, drops blanks and removes duplicates while keeping first-seen order.
pub fn normalize_nims<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|nim| nim.as_ref().trim().to_owned())
        .filter(|nim| !nim.is_empty() && seen.insert(nim.clone()))
        .collect()
}

async fn write_batch<C>(
    db: &C,
    batch: &[user::Model],
    session_id: i64,
    status: AttendanceStatus,
    at: DateTime<Utc>,
) -> Result<(), DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    for u in batch {
        attendance_record::Model::insert_or_update(&txn, u.id, session_id, status, at).await?;
    }
    txn.commit().await
}

/// Sets `status` for every known NIM on one session.
///
/// All writes share the timestamp `now`. Writes go out in transactions of
/// [`BATCH_SIZE`]; if one fails, later batches are skipped and reported in
/// [`BulkOutcome::failed`]. Re-running the same request is harmless.
pub async fn apply_status<C>(
    db: &C,
    admin_id: i64,
    session_id: i64,
    status: AttendanceStatus,
    raw_nims: &[String],
    now: DateTime<Utc>,
) -> Result<BulkOutcome, ServiceError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let nims = normalize_nims(raw_nims);
    if nims.is_empty() {
        return Err(ServiceError::invalid("Session ID and NIM list are required"));
    }
    if nims.len() > MAX_UNIQUE_NIMS {
        return Err(ServiceError::PayloadTooLarge(format!(
            "At most {MAX_UNIQUE_NIMS} NIMs per request"
        )));
    }

    attendance_session::Model::find_by_id(db, session_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Attendance session not found"))?;

    let users = user::Model::find_by_nims(db, &nims).await?;
    if users.is_empty() {
        return Err(ServiceError::not_found("No users found for the given NIMs"));
    }

    let found: HashSet<&str> = users.iter().filter_map(|u| u.nim.as_deref()).collect();
    let missing: Vec<String> = nims
        .iter()
        .filter(|nim| !found.contains(nim.as_str()))
        .cloned()
        .collect();

    let mut outcome = BulkOutcome {
        missing,
        ..Default::default()
    };

    for (i, batch) in users.chunks(BATCH_SIZE).enumerate() {
        if let Err(e) = write_batch(db, batch, session_id, status, now).await {
            tracing::error!(error = %e, session_id, batch = i, "Bulk attendance batch failed");
            outcome.failed = users[i * BATCH_SIZE..]
                .iter()
                .filter_map(|u| u.nim.clone())
                .collect();
            break;
        }
        outcome.updated += batch.len();
    }

    tracing::info!(
        target: "audit",
        event = "attendance.bulk",
        admin_id,
        session_id,
        status = %status,
        updated = outcome.updated,
        missing = outcome.missing.len(),
        failed = outcome.failed.len(),
    );

    Ok(outcome)
}
