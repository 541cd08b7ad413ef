//! Stored booking checkout flows.

use serde::Serialize;
use tablebook_core::booking::BookingFlow;
use tablebook_core::types::{DbId, Timestamp};

/// A booking flow owned by one user. Kept in memory only.
#[derive(Debug, Clone, Serialize)]
pub struct BookingFlowRecord {
    pub id: DbId,
    pub user_id: DbId,
    #[serde(flatten)]
    pub flow: BookingFlow,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
