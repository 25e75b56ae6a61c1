use crate::seed::Seeder;
use db::models::user::{Model, Role};
use sea_orm::{DatabaseConnection, DbErr};
use util::config;

const FALLBACK_ADMIN: &str = "admin@itera.ac.id";

/// Admin accounts for every address in `SUPERUSER_EMAILS`.
pub struct AdminSeeder;

#[async_trait::async_trait]
impl Seeder for AdminSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut emails = config::superuser_emails();
        if emails.is_empty() {
            emails.push(FALLBACK_ADMIN.to_owned());
        }

        for email in emails {
            if Model::find_by_email(db, &email).await?.is_none() {
                Model::create(db, &email, Some("Administrator"), None, Role::Admin).await?;
            }
        }
        Ok(())
    }
}
