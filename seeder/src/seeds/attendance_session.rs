use crate::seed::Seeder;
use chrono::{Duration, Utc};
use db::models::{
    attendance_session,
    user::{Model, Role, Column, Entity},
};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

/// Campus centre, used as the geofence of the demo sessions.
const CAMPUS_LAT: f64 = -5.3582;
const CAMPUS_LON: f64 = 105.3148;

/// One finished session and one that is open right now.
pub struct AttendanceSessionSeeder;

#[async_trait::async_trait]
impl Seeder for AttendanceSessionSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let admin: Model = Entity::find()
            .filter(Column::Role.eq(Role::Admin))
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("no admin account to own sessions".into()))?;

        let now = Utc::now();
        for (title, start, radius) in [
            ("Kuliah Umum Minggu Lalu", now - Duration::days(7), 100.0),
            ("Kuliah Umum", now - Duration::minutes(5), 75.0),
        ] {
            attendance_session::Model::create(
                db, admin.id, title, start, CAMPUS_LAT, CAMPUS_LON, radius,
            )
            .await?;
        }
        Ok(())
    }
}
