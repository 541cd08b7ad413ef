//! Review DTOs. The entity lives in `tablebook_core::review`.

use chrono::NaiveDate;
use tablebook_core::types::DbId;

#[derive(Debug, Clone)]
pub struct CreateReview {
    pub restaurant_id: DbId,
    pub reservation_id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
}

/// Edit of an existing review. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}
