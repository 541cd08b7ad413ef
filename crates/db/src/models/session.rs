//! Refresh-token session model.

use tablebook_core::types::{DbId, Timestamp};

/// A refresh-token session. Only the SHA-256 hash of the token is kept.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
