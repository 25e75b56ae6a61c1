use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One attendance outcome per (user, session).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub session_id: i64,
    pub status: AttendanceStatus,
    pub attended_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "HADIR")]
    Hadir,

    #[sea_orm(string_value = "IZIN")]
    Izin,

    #[sea_orm(string_value = "TIDAK_HADIR")]
    TidakHadir,
}

impl AttendanceStatus {
    /// Trims and upper-cases before matching, so `" hadir "` is accepted.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        raw.trim().to_uppercase().parse().ok()
    }
}

/// Result of [`Model::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_session::Entity",
        from = "Column::SessionId",
        to = "super::attendance_session::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn new_record(
    user_id: i64,
    session_id: i64,
    status: AttendanceStatus,
    at: DateTime<Utc>,
) -> ActiveModel {
    ActiveModel {
        user_id: Set(user_id),
        session_id: Set(session_id),
        status: Set(status),
        attended_at: Set(at),
        ..Default::default()
    }
}

impl Model {
    /// Atomic insert guarded by the (user_id, session_id) unique index.
    ///
    /// Concurrent callers for the same pair see exactly one `Inserted`.
    pub async fn insert_if_absent<C>(
        db: &C,
        user_id: i64,
        session_id: i64,
        status: AttendanceStatus,
        at: DateTime<Utc>,
    ) -> Result<InsertOutcome, DbErr>
    where
        C: ConnectionTrait,
    {
        let rows = Entity::insert(new_record(user_id, session_id, status, at))
            .on_conflict(
                OnConflict::columns([Column::UserId, Column::SessionId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(if rows == 0 {
            InsertOutcome::AlreadyPresent
        } else {
            InsertOutcome::Inserted
        })
    }

    /// Creates the record or overwrites its status and timestamp.
    pub async fn insert_or_update<C>(
        db: &C,
        user_id: i64,
        session_id: i64,
        status: AttendanceStatus,
        at: DateTime<Utc>,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::insert(new_record(user_id, session_id, status, at))
            .on_conflict(
                OnConflict::columns([Column::UserId, Column::SessionId])
                    .update_columns([Column::Status, Column::AttendedAt])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    pub async fn find_for<C>(db: &C, user_id: i64, session_id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::SessionId.eq(session_id))
            .one(db)
            .await
    }

    /// Records of a session paired with their owners, earliest first.
    pub async fn list_for_session<C>(
        db: &C,
        session_id: i64,
    ) -> Result<Vec<(Model, Option<super::user::Model>)>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .find_also_related(super::user::Entity)
            .order_by_asc(Column::AttendedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}
