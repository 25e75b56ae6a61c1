use db::models::user::{self, Role};
use validator::Validate;

/// Request body for POST `/api/test/login`.
///
/// Stands in for the identity provider callback: the email is trusted as-is.
#[derive(Debug, serde::Deserialize, Validate)]
pub struct TestLoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
}

#[derive(Debug, serde::Serialize)]
pub struct TestLoginResponse {
    pub id: i64,
    pub email: String,
    pub nim: Option<String>,
    pub role: Role,
    pub token: String,
    pub expires_at: String,
}

impl TestLoginResponse {
    pub fn new(u: user::Model, token: String, expires_at: String) -> Self {
        Self {
            id: u.id,
            email: u.email,
            nim: u.nim,
            role: u.role,
            token,
            expires_at,
        }
    }
}
