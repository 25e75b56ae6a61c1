use crate::seed::Seeder;
use db::models::{
    student_roster,
    user::{Model, Role},
};
use fake::{Fake, faker::name::en::Name};
use sea_orm::{DatabaseConnection, DbErr};

/// First NIM of the demo cohort.
const FIRST_NIM: u32 = 122_140_001;
const COHORT_SIZE: u32 = 40;

/// Demo cohort on the active roster. Every fifth student also gets an account.
pub struct RosterSeeder;

#[async_trait::async_trait]
impl Seeder for RosterSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        for nim in (FIRST_NIM..FIRST_NIM + COHORT_SIZE).map(|n| n.to_string()) {
            let full_name: String = Name().fake();
            student_roster::Model::upsert(db, &nim, Some(&full_name)).await?;

            if fastrand::u8(..5) == 0 && Model::find_by_nim(db, &nim).await?.is_none() {
                let local = full_name
                    .to_lowercase()
                    .replace(|c: char| !c.is_ascii_alphanumeric(), "");
                let email = format!("{local}.{nim}@student.itera.ac.id");
                Model::create(db, &email, Some(&full_name), Some(&nim), Role::Student).await?;
            }
        }
        Ok(())
    }
}
