use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    admin::AdminSeeder, attendance_session::AttendanceSessionSeeder, roster::RosterSeeder,
};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = db::connect().await;
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    for (seeder, name) in [
        (Box::new(AdminSeeder) as Box<dyn Seeder + Send + Sync>, "Admin"),
        (Box::new(RosterSeeder), "StudentRoster"),
        (Box::new(AttendanceSessionSeeder), "AttendanceSession"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
