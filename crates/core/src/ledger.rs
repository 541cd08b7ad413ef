//! A user's reservations split into upcoming and past, plus cancellation rules.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::reservation::{state_machine, Reservation, ReservationStatus};
use crate::types::DbId;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReservationLedger {
    pub upcoming: Vec<Reservation>,
    pub past: Vec<Reservation>,
}

/// Confirmed and dated today or later. Anything else is past.
pub fn is_upcoming(reservation: &Reservation, today: NaiveDate) -> bool {
    reservation.status == ReservationStatus::Confirmed && reservation.date >= today
}

/// Split `reservations` into the two partitions, each keeping input order.
pub fn partition(reservations: Vec<Reservation>, today: NaiveDate) -> ReservationLedger {
    let (upcoming, past) = reservations
        .into_iter()
        .partition(|r| is_upcoming(r, today));
    ReservationLedger { upcoming, past }
}

/// Check that `actor_id` may cancel `reservation` right now.
///
/// The caller must have explicitly confirmed; the reservation must be theirs
/// and still confirmed.
pub fn check_cancellable(
    reservation: &Reservation,
    actor_id: DbId,
    confirmed: bool,
) -> Result<(), CoreError> {
    if !confirmed {
        return Err(CoreError::Validation(
            "Cancellation must be explicitly confirmed".into(),
        ));
    }
    if reservation.user_id != actor_id {
        return Err(CoreError::Forbidden(
            "You can only cancel your own reservations".into(),
        ));
    }
    state_machine::validate_transition(reservation.status, ReservationStatus::Cancelled)
        .map_err(CoreError::Conflict)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::reservation::fixtures::reservation;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn with_status(id: DbId, date: NaiveDate, status: ReservationStatus) -> Reservation {
        let mut r = reservation(id, 1, date, "19:00");
        r.status = status;
        r
    }

    #[test]
    fn partition_is_total_and_ordered() {
        let today = day(15);
        let all = vec![
            with_status(1, day(10), ReservationStatus::Completed),
            with_status(2, day(14), ReservationStatus::Confirmed),
            with_status(3, day(15), ReservationStatus::Confirmed),
            with_status(4, day(20), ReservationStatus::Cancelled),
            with_status(5, day(21), ReservationStatus::Confirmed),
        ];
        let ledger = partition(all, today);

        let up: Vec<DbId> = ledger.upcoming.iter().map(|r| r.id).collect();
        let past: Vec<DbId> = ledger.past.iter().map(|r| r.id).collect();
        assert_eq!(up, vec![3, 5]);
        assert_eq!(past, vec![1, 2, 4]);
    }

    #[test]
    fn cancelled_future_reservation_is_past() {
        let r = with_status(1, day(30), ReservationStatus::Cancelled);
        assert!(!is_upcoming(&r, day(15)));
    }

    #[test]
    fn cancel_requires_confirmation() {
        let r = reservation(1, 1, day(20), "19:00");
        assert_matches!(check_cancellable(&r, 1, false), Err(CoreError::Validation(_)));
    }

    #[test]
    fn cancel_requires_ownership() {
        let r = reservation(1, 1, day(20), "19:00");
        assert_matches!(check_cancellable(&r, 99, true), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn cancelling_twice_is_conflict() {
        let r = with_status(1, day(20), ReservationStatus::Cancelled);
        assert_matches!(check_cancellable(&r, 1, true), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn owner_can_cancel_confirmed() {
        let r = reservation(1, 1, day(20), "19:00");
        assert!(check_cancellable(&r, 1, true).is_ok());
    }
}
