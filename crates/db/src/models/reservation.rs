//! Reservation DTOs. The entity lives in `tablebook_core::reservation`.

use chrono::{NaiveDate, NaiveTime};
use tablebook_core::reservation::Reservation;
use tablebook_core::types::DbId;

/// Everything needed to seat a new reservation. The table is picked by the store.
#[derive(Debug, Clone)]
pub struct CreateReservation {
    pub restaurant_id: DbId,
    pub user_id: DbId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: u32,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
    pub confirmation_code: String,
}

/// Result of trying to seat a reservation under the store lock.
#[derive(Debug, Clone)]
pub enum SeatingOutcome {
    Seated(Reservation),
    RestaurantNotFound,
    /// The listing is unapproved or inactive.
    NotBookable,
    /// Every suitable table is held within the seating window.
    NoTableAvailable,
}
