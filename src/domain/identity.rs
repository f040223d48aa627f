//! Identity domain entity and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ROLE_ADMIN, ROLE_USER};

/// Roles an identity can hold.
///
/// Stored and carried in tokens as `"Admin"` / `"User"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Parse a stored or claimed role; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_USER => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::User => ROLE_USER,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A login-capable record: credentials plus role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Raw stored role; unrecognized values grant nothing.
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Recognized role, if any.
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    /// Deactivated identities never authenticate.
    pub fn can_authenticate(&self) -> bool {
        self.is_active
    }
}

/// Data for inserting a new identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
