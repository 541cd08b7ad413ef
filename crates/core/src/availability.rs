//! Time-slot availability and table assignment.
//!
//! Every restaurant offers the same candidate grid of half-hour slots from
//! 17:00 to 21:00. Whether a slot is open is derived from the restaurant's
//! tables and the confirmed reservations already seated around that time.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::reservation::{Reservation, ReservationStatus};
use crate::restaurant::{Restaurant, Table};
use crate::types::wall_clock;

// ---------------------------------------------------------------------------
// Slot grid
// ---------------------------------------------------------------------------

/// First seating, minutes after midnight (17:00).
pub const FIRST_SLOT_MINUTES: u32 = 17 * 60;

/// Last seating, minutes after midnight (21:00).
pub const LAST_SLOT_MINUTES: u32 = 21 * 60;

/// Distance between consecutive slots.
pub const SLOT_INTERVAL_MINUTES: u32 = 30;

/// A table is held this long on either side of a seating start.
pub const DEFAULT_SEATING_WINDOW_MINS: i64 = 120;

/// Party size assumed when the caller does not say.
pub const DEFAULT_PARTY_SIZE: u32 = 2;

/// A bookable (time, availability) pair for one restaurant and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "wall_clock")]
    pub time: NaiveTime,
    pub available: bool,
}

/// Lazily yield the candidate slot times in increasing order.
pub fn candidate_times() -> impl Iterator<Item = NaiveTime> {
    (FIRST_SLOT_MINUTES..=LAST_SLOT_MINUTES)
        .step_by(SLOT_INTERVAL_MINUTES as usize)
        .filter_map(|m| NaiveTime::from_hms_opt(m / 60, m % 60, 0))
}

/// Whether `time` sits exactly on the slot grid.
pub fn is_candidate_time(time: NaiveTime) -> bool {
    candidate_times().any(|t| t == time)
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Inputs for an availability lookup beyond the restaurant itself.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub party_size: u32,
    /// Slots at or before this instant are reported unavailable.
    pub now: NaiveDateTime,
    pub seating_window_mins: i64,
}

impl AvailabilityQuery {
    pub fn new(date: NaiveDate, party_size: u32, now: NaiveDateTime) -> Self {
        Self {
            date,
            party_size,
            now,
            seating_window_mins: DEFAULT_SEATING_WINDOW_MINS,
        }
    }

    pub fn with_seating_window(mut self, minutes: i64) -> Self {
        self.seating_window_mins = minutes;
        self
    }
}

/// First in-service table that fits `party_size` and has no confirmed
/// reservation starting within the seating window of `starts_at`.
///
/// The window is exclusive: a seating exactly `window_mins` away does not
/// block the table.
pub fn find_available_table<'a>(
    tables: &'a [Table],
    reservations: &[Reservation],
    starts_at: NaiveDateTime,
    party_size: u32,
    window_mins: i64,
) -> Option<&'a Table> {
    tables
        .iter()
        .filter(|t| t.is_available && t.capacity >= party_size)
        .find(|t| {
            !reservations.iter().any(|r| {
                r.status == ReservationStatus::Confirmed
                    && r.table_id == t.id
                    && (r.starts_at() - starts_at).num_minutes().abs() < window_mins
            })
        })
}

/// Produce the full candidate grid for `restaurant` with per-slot availability.
///
/// `reservations` may contain anything for the restaurant; only confirmed
/// reservations on tables of this restaurant affect the result.
pub fn available_slots(
    restaurant: &Restaurant,
    reservations: &[Reservation],
    query: &AvailabilityQuery,
) -> Vec<TimeSlot> {
    let closed = restaurant.hours.is_closed_on(query.date.weekday());

    candidate_times()
        .map(|time| {
            let starts_at = query.date.and_time(time);
            let available = !closed
                && starts_at > query.now
                && find_available_table(
                    &restaurant.tables,
                    reservations,
                    starts_at,
                    query.party_size,
                    query.seating_window_mins,
                )
                .is_some();
            TimeSlot { time, available }
        })
        .collect()
}
