//! Reservation model and its status state machine.
//!
//! Status only ever moves forward: a confirmed reservation can be cancelled
//! by its owner or completed once its seating has passed. Cancelled and
//! completed are terminal.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::types::{wall_clock, DbId, Timestamp};

/// Smallest bookable party.
pub const MIN_PARTY_SIZE: u32 = 1;

/// Largest party accepted online. Bigger groups call the restaurant.
pub const MAX_PARTY_SIZE: u32 = 20;

/// Hours after the seating start before a confirmed reservation counts as completed.
pub const COMPLETION_GRACE_HOURS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

pub mod state_machine {
    use super::ReservationStatus::{self, *};

    /// Statuses reachable from `from`. Terminal states return an empty slice.
    pub fn valid_transitions(from: ReservationStatus) -> &'static [ReservationStatus] {
        match from {
            Confirmed => &[Cancelled, Completed],
            Cancelled | Completed => &[],
        }
    }

    pub fn can_transition(from: ReservationStatus, to: ReservationStatus) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a transition, returning a human-readable message for invalid ones.
    pub fn validate_transition(from: ReservationStatus, to: ReservationStatus) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!(
                "Invalid transition: {} -> {}",
                from.as_str(),
                to.as_str()
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Reservation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: DbId,
    pub restaurant_id: DbId,
    pub restaurant_name: String,
    pub user_id: DbId,
    pub table_id: DbId,
    pub date: NaiveDate,
    #[serde(with = "wall_clock")]
    pub time: NaiveTime,
    pub party_size: u32,
    pub status: ReservationStatus,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub special_requests: Option<String>,
    pub confirmation_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    /// Local wall-clock start of the seating.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Whether the seating has been over long enough to mark it completed.
    ///
    /// A seating so late in the calendar that the grace period cannot be
    /// added is never due.
    pub fn is_due_for_completion(&self, now: NaiveDateTime) -> bool {
        self.status == ReservationStatus::Confirmed
            && self
                .starts_at()
                .checked_add_signed(chrono::Duration::hours(COMPLETION_GRACE_HOURS))
                .is_some_and(|done| done < now)
    }
}

pub fn validate_party_size(party_size: u32) -> Result<(), String> {
    if (MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&party_size) {
        Ok(())
    } else {
        Err(format!(
            "Party size must be between {MIN_PARTY_SIZE} and {MAX_PARTY_SIZE}"
        ))
    }
}


#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::fixtures::reservation;
    use super::state_machine::*;
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    #[test]
    fn confirmed_can_be_cancelled_or_completed() {
        assert!(can_transition(ReservationStatus::Confirmed, ReservationStatus::Cancelled));
        assert!(can_transition(ReservationStatus::Confirmed, ReservationStatus::Completed));
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        assert!(valid_transitions(ReservationStatus::Cancelled).is_empty());
        assert!(valid_transitions(ReservationStatus::Completed).is_empty());
    }

    #[test]
    fn un_cancel_is_rejected() {
        let err =
            validate_transition(ReservationStatus::Cancelled, ReservationStatus::Confirmed)
                .unwrap_err();
        assert_eq!(err, "Invalid transition: cancelled -> confirmed");
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(ReservationStatus::Confirmed).unwrap();
        assert_eq!(json, "confirmed");
    }

    #[test]
    fn reservation_serializes_time_as_hh_mm() {
        let json = serde_json::to_value(reservation(1, 1, day(15), "19:00")).unwrap();
        assert_eq!(json["time"], "19:00");
        assert_eq!(json["date"], "2025-05-15");
        assert_eq!(json["status"], "confirmed");
    }

    #[test]
    fn completion_waits_for_grace_period() {
        let r = reservation(1, 1, day(15), "19:00");
        let at_ten = day(15).and_hms_opt(22, 0, 0).unwrap();
        let after = day(15).and_hms_opt(22, 1, 0).unwrap();
        assert!(!r.is_due_for_completion(at_ten));
        assert!(r.is_due_for_completion(after));
    }

    #[test]
    fn cancelled_reservation_is_never_due_for_completion() {
        let mut r = reservation(1, 1, day(1), "19:00");
        r.status = ReservationStatus::Cancelled;
        assert!(!r.is_due_for_completion(day(20).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn last_representable_day_is_never_due() {
        let last: NaiveDate = serde_json::from_str("\"+262142-12-31\"").unwrap();
        let r = reservation(1, 1, last, "21:00");
        assert!(!r.is_due_for_completion(NaiveDateTime::MAX));
        assert!(!r.is_due_for_completion(day(15).and_hms_opt(12, 0, 0).unwrap()));
    }

    #[test]
    fn party_size_bounds() {
        assert!(validate_party_size(0).is_err());
        assert!(validate_party_size(1).is_ok());
        assert!(validate_party_size(20).is_ok());
        assert!(validate_party_size(21).is_err());
    }
}
