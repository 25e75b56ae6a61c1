use serde::{Deserialize, Serialize};
use services::Identity;

/// JWT payload issued at sign-in.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub admin: bool,
    pub email: String,
    #[serde(default)]
    pub nim: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Role-specific view of the caller.
    pub fn identity(&self) -> Identity {
        let c = &self.0;
        if c.admin {
            Identity::Admin {
                user_id: c.sub,
                email: c.email.clone(),
            }
        } else {
            Identity::Student {
                user_id: c.sub,
                email: c.email.clone(),
                nim: c.nim.clone(),
            }
        }
    }
}
