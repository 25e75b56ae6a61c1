use db::models::{
    student_roster,
    user::{self, Role},
};
use sea_orm::ConnectionTrait;

use crate::{error::ServiceError, nim::extract_nim};

/// Resolves the account for a sign-in with `email`.
///
/// Existing admin accounts are returned as-is. Everyone else must carry a NIM
/// in their email that is active on the roster; a STUDENT account is created
/// on first sign-in and a missing NIM is backfilled on later ones.
pub async fn provision_student<C>(
    db: &C,
    email: &str,
    name: Option<&str>,
) -> Result<user::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ServiceError::invalid("A valid email is required"));
    }

    let existing = user::Model::find_by_email(db, &email).await?;
    if let Some(admin) = existing.as_ref().filter(|u| u.is_admin()) {
        return Ok(admin.clone());
    }

    let nim = extract_nim(&email)
        .ok_or_else(|| ServiceError::forbidden("No student number found in email"))?;

    if !student_roster::Model::is_active_nim(db, &nim).await? {
        tracing::warn!(email = %email, nim = %nim, "Sign-in rejected: not on active roster");
        return Err(ServiceError::forbidden("Student is not on the active roster"));
    }

    let account = match existing {
        Some(u) if u.nim.is_none() => u.set_nim(db, &nim).await?,
        Some(u) => u,
        None => {
            let created = user::Model::create(db, &email, name, Some(&nim), Role::Student).await?;
            tracing::info!(user_id = created.id, nim = %nim, "Provisioned student account");
            created
        }
    };

    Ok(account)
}
