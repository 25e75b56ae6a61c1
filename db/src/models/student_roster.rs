use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;

/// Students allowed to sign in and check in, keyed by NIM.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "student_roster")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub nim: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn find_by_nim<C>(db: &C, nim: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id(nim.to_owned()).one(db).await
    }

    /// `true` only when the NIM has a roster entry that is currently active.
    pub async fn is_active_nim<C>(db: &C, nim: &str) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(Self::find_by_nim(db, nim)
            .await?
            .is_some_and(|entry| entry.is_active))
    }

    /// Inserts the NIM or refreshes its name, re-activating it either way.
    pub async fn upsert<C>(db: &C, nim: &str, full_name: Option<&str>) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let active = ActiveModel {
            nim: Set(nim.to_owned()),
            full_name: Set(full_name.map(str::to_owned)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Entity::insert(active)
            .on_conflict(
                OnConflict::column(Column::Nim)
                    .update_columns([Column::FullName, Column::IsActive, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
        Ok(())
    }

    pub async fn set_active<C>(db: &C, nim: &str, is_active: bool) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let entry = Self::find_by_nim(db, nim)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Roster entry {nim} not found")))?;

        let mut active: ActiveModel = entry.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub async fn list_active<C>(db: &C) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Nim)
            .all(db)
            .await
    }
}
