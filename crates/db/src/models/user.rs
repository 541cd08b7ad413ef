//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use tablebook_core::types::{DbId, Timestamp};

/// Stored user record.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    /// Names from `tablebook_core::roles`. Never empty.
    pub roles: Vec<String>,
    /// Disabled accounts cannot sign in or refresh their session.
    pub enabled: bool,
    pub created_at: Timestamp,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub enabled: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            enabled: user.enabled,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. New accounts start enabled with one role.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
