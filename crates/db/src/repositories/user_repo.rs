//! Repository for users.

use chrono::Utc;
use tablebook_core::types::DbId;

use crate::models::user::{CreateUser, User};
use crate::{DbError, DbPool};

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user. Emails are unique regardless of case.
    pub async fn create(pool: &DbPool, input: &CreateUser) -> Result<User, DbError> {
        let mut tables = pool.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(DbError::UniqueViolation {
                constraint: "uq_users_email",
            });
        }
        let user = User {
            id: tables.seq.next_user(),
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            roles: vec![input.role.clone()],
            enabled: true,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<User>, DbError> {
        let tables = pool.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, DbError> {
        let tables = pool.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &DbPool) -> Result<Vec<User>, DbError> {
        let tables = pool.read().await;
        let mut users = tables.users.clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    /// Run `change` against a copy of the user and store it only if it succeeds.
    ///
    /// Returns `Ok(None)` if no user has this id.
    pub async fn apply<E>(
        pool: &DbPool,
        id: DbId,
        change: impl FnOnce(&mut User) -> Result<(), E>,
    ) -> Result<Option<User>, E> {
        let mut tables = pool.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        let mut updated = user.clone();
        change(&mut updated)?;
        *user = updated.clone();
        Ok(Some(updated))
    }
}
