use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents an account in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Institutional email address, unique.
    pub email: String,
    /// Display name from the identity provider.
    pub name: Option<String>,
    /// Student number derived from the email. `None` for admins.
    pub nim: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account-wide role. Backed by a `user_role_type` enum in the database.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role_type")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "ADMIN")]
    Admin,

    #[sea_orm(string_value = "STUDENT")]
    Student,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C>(
        db: &C,
        email: &str,
        name: Option<&str>,
        nim: Option<&str>,
        role: Role,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();

        ActiveModel {
            email: Set(email.trim().to_lowercase()),
            name: Set(name.map(str::to_owned)),
            nim: Set(nim.map(str::to_owned)),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_email<C>(db: &C, email: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await
    }

    pub async fn find_by_nim<C>(db: &C, nim: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find().filter(Column::Nim.eq(nim)).one(db).await
    }

    /// Every user whose NIM is in `nims`, ordered by NIM.
    pub async fn find_by_nims<C>(db: &C, nims: &[String]) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        if nims.is_empty() {
            return Ok(Vec::new());
        }

        Entity::find()
            .filter(Column::Nim.is_in(nims.iter().cloned()))
            .order_by_asc(Column::Nim)
            .all(db)
            .await
    }

    /// Backfills the NIM on an existing account.
    pub async fn set_nim<C>(self, db: &C, nim: &str) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active: ActiveModel = self.into();
        active.nim = Set(Some(nim.to_owned()));
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
