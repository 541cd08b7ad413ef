//! In-memory tables behind a single async lock.
//!
//! Each repository call takes the lock for exactly one operation and never
//! holds it across an unrelated `.await`.

use std::collections::HashMap;

use chrono::NaiveDate;
use tablebook_core::reservation::Reservation;
use tablebook_core::restaurant::Restaurant;
use tablebook_core::review::Review;
use tablebook_core::types::DbId;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::booking::BookingFlowRecord;
use crate::models::session::UserSession;
use crate::models::user::User;

/// Per-table id sequences. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub(crate) struct Sequences {
    users: DbId,
    sessions: DbId,
    restaurants: DbId,
    tables: DbId,
    reservations: DbId,
    reviews: DbId,
    booking_flows: DbId,
}

fn bump(seq: &mut DbId) -> DbId {
    *seq += 1;
    *seq
}

impl Sequences {
    pub(crate) fn next_user(&mut self) -> DbId {
        bump(&mut self.users)
    }

    pub(crate) fn next_session(&mut self) -> DbId {
        bump(&mut self.sessions)
    }

    pub(crate) fn next_restaurant(&mut self) -> DbId {
        bump(&mut self.restaurants)
    }

    pub(crate) fn next_table(&mut self) -> DbId {
        bump(&mut self.tables)
    }

    pub(crate) fn next_reservation(&mut self) -> DbId {
        bump(&mut self.reservations)
    }

    pub(crate) fn next_review(&mut self) -> DbId {
        bump(&mut self.reviews)
    }

    pub(crate) fn next_booking_flow(&mut self) -> DbId {
        bump(&mut self.booking_flows)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: Vec<User>,
    pub(crate) sessions: Vec<UserSession>,
    pub(crate) restaurants: Vec<Restaurant>,
    pub(crate) reservations: Vec<Reservation>,
    pub(crate) reviews: Vec<Review>,
    pub(crate) booking_flows: HashMap<DbId, BookingFlowRecord>,
    /// Day the `bookings_today` counters were last zeroed.
    pub(crate) counters_day: Option<NaiveDate>,
    pub(crate) seq: Sequences,
}

impl Tables {
    pub(crate) fn restaurant_mut(&mut self, id: DbId) -> Option<&mut Restaurant> {
        self.restaurants.iter_mut().find(|r| r.id == id)
    }
}

/// The whole data set. Shared through [`crate::DbPool`].
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}
