use db::models::user::{self, Role};

/// Caller identity resolved once per request from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Admin {
        user_id: i64,
        email: String,
    },
    Student {
        user_id: i64,
        email: String,
        nim: Option<String>,
    },
}

impl Identity {
    pub fn user_id(&self) -> i64 {
        match self {
            Identity::Admin { user_id, .. } | Identity::Student { user_id, .. } => *user_id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Identity::Admin { email, .. } | Identity::Student { email, .. } => email,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin { .. })
    }
}

impl From<user::Model> for Identity {
    fn from(u: user::Model) -> Self {
        match u.role {
            Role::Admin => Identity::Admin {
                user_id: u.id,
                email: u.email,
            },
            Role::Student => Identity::Student {
                user_id: u.id,
                email: u.email,
                nim: u.nim,
            },
        }
    }
}
