use chrono::{DateTime, Duration, Utc};
use sea_orm::EntityTrait;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, QueryOrder, Set};

/// Every session lasts exactly one hour from its start.
pub const SESSION_LENGTH_MINUTES: i64 = 60;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a session. `end_time` is always `start_time` plus one hour.
    pub async fn create<C>(
        db: &C,
        created_by: i64,
        title: &str,
        start_time: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        if !(radius_meters.is_finite() && radius_meters > 0.0) {
            return Err(DbErr::Custom("Radius must be greater than 0".into()));
        }

        ActiveModel {
            title: Set(title.to_owned()),
            start_time: Set(start_time),
            end_time: Set(start_time + Duration::minutes(SESSION_LENGTH_MINUTES)),
            latitude: Set(latitude),
            longitude: Set(longitude),
            radius_meters: Set(radius_meters),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_by_id<C>(db: &C, id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn list_newest_first<C>(db: &C) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Whether `now` lies inside `[start_time, end_time]`, both ends inclusive.
    #[inline]
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now && now <= self.end_time
    }
}
