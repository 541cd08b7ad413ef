//! Repository for refresh-token sessions.

use chrono::Utc;
use tablebook_core::types::{DbId, Timestamp};

use crate::models::session::{CreateSession, UserSession};
use crate::{DbError, DbPool};

/// Provides CRUD operations for user sessions.
pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(pool: &DbPool, input: &CreateSession) -> Result<UserSession, DbError> {
        let mut tables = pool.write().await;
        if !tables.users.iter().any(|u| u.id == input.user_id) {
            return Err(DbError::ForeignKeyViolation {
                constraint: "fk_user_sessions_user",
            });
        }
        let session = UserSession {
            id: tables.seq.next_session(),
            user_id: input.user_id,
            refresh_token_hash: input.refresh_token_hash.clone(),
            expires_at: input.expires_at,
            is_revoked: false,
            created_at: Utc::now(),
        };
        tables.sessions.push(session.clone());
        Ok(session)
    }

    /// Find an active session by its refresh token hash.
    ///
    /// Only returns sessions that are not revoked and not expired at `now`.
    pub async fn find_by_refresh_token_hash(
        pool: &DbPool,
        hash: &str,
        now: Timestamp,
    ) -> Result<Option<UserSession>, DbError> {
        let tables = pool.read().await;
        Ok(tables
            .sessions
            .iter()
            .find(|s| s.refresh_token_hash == hash && !s.is_revoked && s.expires_at > now)
            .cloned())
    }

    /// Revoke a single session. Returns `true` if it was active.
    pub async fn revoke(pool: &DbPool, id: DbId) -> Result<bool, DbError> {
        let mut tables = pool.write().await;
        match tables
            .sessions
            .iter_mut()
            .find(|s| s.id == id && !s.is_revoked)
        {
            Some(session) => {
                session.is_revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Revoke all active sessions for a user. Returns the count of revoked sessions.
    pub async fn revoke_all_for_user(pool: &DbPool, user_id: DbId) -> Result<u64, DbError> {
        let mut tables = pool.write().await;
        let mut revoked = 0;
        for session in tables
            .sessions
            .iter_mut()
            .filter(|s| s.user_id == user_id && !s.is_revoked)
        {
            session.is_revoked = true;
            revoked += 1;
        }
        Ok(revoked)
    }

    /// Drop expired or revoked sessions. Returns the count removed.
    pub async fn cleanup_expired(pool: &DbPool, now: Timestamp) -> Result<u64, DbError> {
        let mut tables = pool.write().await;
        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|s| !s.is_revoked && s.expires_at >= now);
        Ok((before - tables.sessions.len()) as u64)
    }
}
