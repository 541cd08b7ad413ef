//! Repository for reservations.
//!
//! Reservations are never deleted; status changes happen in place.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use tablebook_core::availability::find_available_table;
use tablebook_core::reservation::{Reservation, ReservationStatus};
use tablebook_core::types::DbId;

use crate::models::reservation::{CreateReservation, SeatingOutcome};
use crate::{DbError, DbPool};

fn sort_by_start(reservations: &mut [Reservation]) {
    reservations.sort_by(|a, b| a.starts_at().cmp(&b.starts_at()).then(a.id.cmp(&b.id)));
}

/// Provides CRUD operations for reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Pick a table and insert the reservation under one write lock.
    ///
    /// When the reservation is for `today` the restaurant's `bookings_today`
    /// counter is bumped in the same step.
    pub async fn create_seated(
        pool: &DbPool,
        input: &CreateReservation,
        today: NaiveDate,
        seating_window_mins: i64,
    ) -> Result<SeatingOutcome, DbError> {
        let mut tables = pool.write().await;

        let Some(restaurant) = tables
            .restaurants
            .iter()
            .find(|r| r.id == input.restaurant_id)
        else {
            return Ok(SeatingOutcome::RestaurantNotFound);
        };
        if !restaurant.is_bookable() {
            return Ok(SeatingOutcome::NotBookable);
        }

        let booked: Vec<Reservation> = tables
            .reservations
            .iter()
            .filter(|r| r.restaurant_id == input.restaurant_id && r.date == input.date)
            .cloned()
            .collect();
        let Some(table) = find_available_table(
            &restaurant.tables,
            &booked,
            input.date.and_time(input.time),
            input.party_size,
            seating_window_mins,
        ) else {
            return Ok(SeatingOutcome::NoTableAvailable);
        };
        let table_id = table.id;
        let restaurant_name = restaurant.name.clone();

        let now = Utc::now();
        let reservation = Reservation {
            id: tables.seq.next_reservation(),
            restaurant_id: input.restaurant_id,
            restaurant_name,
            user_id: input.user_id,
            table_id,
            date: input.date,
            time: input.time,
            party_size: input.party_size,
            status: ReservationStatus::Confirmed,
            contact_email: input.contact_email.clone(),
            contact_phone: input.contact_phone.clone(),
            special_requests: input.special_requests.clone(),
            confirmation_code: input.confirmation_code.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.reservations.push(reservation.clone());

        if input.date == today {
            if let Some(r) = tables.restaurant_mut(input.restaurant_id) {
                r.bookings_today += 1;
            }
        }

        Ok(SeatingOutcome::Seated(reservation))
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Reservation>, DbError> {
        let tables = pool.read().await;
        Ok(tables.reservations.iter().find(|r| r.id == id).cloned())
    }

    /// A user's reservations ordered by seating start.
    pub async fn list_for_user(pool: &DbPool, user_id: DbId) -> Result<Vec<Reservation>, DbError> {
        let tables = pool.read().await;
        let mut out: Vec<Reservation> = tables
            .reservations
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        sort_by_start(&mut out);
        Ok(out)
    }

    /// A restaurant's reservations ordered by seating start.
    pub async fn list_for_restaurant(
        pool: &DbPool,
        restaurant_id: DbId,
    ) -> Result<Vec<Reservation>, DbError> {
        let tables = pool.read().await;
        let mut out: Vec<Reservation> = tables
            .reservations
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        sort_by_start(&mut out);
        Ok(out)
    }

    /// A restaurant's reservations on one date, in any status.
    pub async fn list_for_restaurant_on(
        pool: &DbPool,
        restaurant_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<Reservation>, DbError> {
        let tables = pool.read().await;
        Ok(tables
            .reservations
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id && r.date == date)
            .cloned()
            .collect())
    }

    /// Every reservation in insertion order.
    pub async fn list(pool: &DbPool) -> Result<Vec<Reservation>, DbError> {
        let tables = pool.read().await;
        Ok(tables.reservations.clone())
    }

    /// Move a reservation from `from` to `to`.
    ///
    /// Returns `None` if the reservation does not exist or is no longer in
    /// `from`, so concurrent transitions cannot both succeed.
    pub async fn transition_status(
        pool: &DbPool,
        id: DbId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<Option<Reservation>, DbError> {
        let mut tables = pool.write().await;
        Ok(tables
            .reservations
            .iter_mut()
            .find(|r| r.id == id && r.status == from)
            .map(|r| {
                r.status = to;
                r.updated_at = Utc::now();
                r.clone()
            }))
    }

    /// Mark every confirmed reservation whose seating ended long enough ago as completed.
    pub async fn complete_elapsed(
        pool: &DbPool,
        now: NaiveDateTime,
    ) -> Result<Vec<Reservation>, DbError> {
        let mut tables = pool.write().await;
        let stamp = Utc::now();
        Ok(tables
            .reservations
            .iter_mut()
            .filter(|r| r.is_due_for_completion(now))
            .map(|r| {
                r.status = ReservationStatus::Completed;
                r.updated_at = stamp;
                r.clone()
            })
            .collect())
    }
}
