//! Repository for restaurant listings and their tables.

use chrono::{NaiveDate, Utc};
use tablebook_core::reservation::{Reservation, ReservationStatus};
use tablebook_core::restaurant::{normalize_features, Restaurant, Table};
use tablebook_core::review::{fold_rating, remove_rating, replace_rating};
use tablebook_core::types::DbId;

use crate::models::restaurant::{CreateRestaurant, CreateTable, UpdateRestaurant};
use crate::store::{Sequences, Tables};
use crate::{DbError, DbPool};

fn assign_tables(seq: &mut Sequences, input: &[CreateTable]) -> Vec<Table> {
    input
        .iter()
        .map(|t| Table {
            id: seq.next_table(),
            name: t.name.clone(),
            capacity: t.capacity,
            is_available: t.is_available,
        })
        .collect()
}

/// Build a replacement floor plan that keeps the ids of tables it still contains.
///
/// A submitted table claims an existing one by `id`, or by name when it
/// carries no id. Anything left unmatched gets a fresh id.
fn rebuild_floor(seq: &mut Sequences, current: &[Table], input: &[CreateTable]) -> Vec<Table> {
    let mut unclaimed: Vec<DbId> = current.iter().map(|t| t.id).collect();
    input
        .iter()
        .map(|t| {
            let claimed = match t.id {
                Some(id) => unclaimed.iter().position(|&c| c == id),
                None => current
                    .iter()
                    .find(|c| c.name == t.name && unclaimed.contains(&c.id))
                    .and_then(|c| unclaimed.iter().position(|&u| u == c.id)),
            };
            let id = match claimed {
                Some(i) => unclaimed.remove(i),
                None => seq.next_table(),
            };
            Table {
                id,
                name: t.name.clone(),
                capacity: t.capacity,
                is_available: t.is_available,
            }
        })
        .collect()
}

/// Every confirmed reservation must still have its table, big enough for its party.
fn check_floor_keeps_bookings(
    reservations: &[Reservation],
    restaurant_id: DbId,
    floor: &[Table],
) -> Result<(), DbError> {
    let held = reservations
        .iter()
        .filter(|r| r.restaurant_id == restaurant_id && r.status == ReservationStatus::Confirmed);
    for reservation in held {
        match floor.iter().find(|t| t.id == reservation.table_id) {
            None => {
                return Err(DbError::StillReferenced {
                    constraint: "reservations_table_id_fkey",
                })
            }
            Some(t) if t.capacity < reservation.party_size => {
                return Err(DbError::StillReferenced {
                    constraint: "reservations_party_fits_table",
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Provides CRUD operations for restaurants.
pub struct RestaurantRepo;

impl RestaurantRepo {
    /// Insert a new listing. New listings start unapproved and active.
    pub async fn create(
        pool: &DbPool,
        input: &CreateRestaurant,
        manager_id: Option<DbId>,
    ) -> Result<Restaurant, DbError> {
        let mut tables = pool.write().await;
        let floor = assign_tables(&mut tables.seq, &input.tables);
        let restaurant = Restaurant {
            id: tables.seq.next_restaurant(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            cuisine: input.cuisine.trim().to_string(),
            price_range: input.price_range,
            rating: 0.0,
            review_count: 0,
            address: input.address.clone(),
            hours: input.hours.clone(),
            photos: input.photos.clone(),
            bookings_today: 0,
            phone_number: input.phone_number.clone(),
            website: input.website.clone(),
            features: normalize_features(input.features.clone()),
            tables: floor,
            manager_id,
            approved: false,
            active: true,
            created_at: Utc::now(),
        };
        tables.restaurants.push(restaurant.clone());
        Ok(restaurant)
    }

    /// Insert a fully formed listing as-is, assigning only ids. Used for seeding.
    pub async fn insert(pool: &DbPool, mut restaurant: Restaurant) -> Result<Restaurant, DbError> {
        let mut tables = pool.write().await;
        restaurant.id = tables.seq.next_restaurant();
        for table in &mut restaurant.tables {
            table.id = tables.seq.next_table();
        }
        tables.restaurants.push(restaurant.clone());
        Ok(restaurant)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Restaurant>, DbError> {
        let tables = pool.read().await;
        Ok(tables.restaurants.iter().find(|r| r.id == id).cloned())
    }

    /// Find a listing that is visible to the public (approved and active).
    pub async fn find_public(pool: &DbPool, id: DbId) -> Result<Option<Restaurant>, DbError> {
        let tables = pool.read().await;
        Ok(tables
            .restaurants
            .iter()
            .find(|r| r.id == id && r.is_bookable())
            .cloned())
    }

    /// Every listing in insertion order.
    pub async fn list(pool: &DbPool) -> Result<Vec<Restaurant>, DbError> {
        let tables = pool.read().await;
        Ok(tables.restaurants.clone())
    }

    /// Approved, active listings in insertion order.
    pub async fn list_public(pool: &DbPool) -> Result<Vec<Restaurant>, DbError> {
        let tables = pool.read().await;
        Ok(tables
            .restaurants
            .iter()
            .filter(|r| r.is_bookable())
            .cloned()
            .collect())
    }

    pub async fn list_by_manager(pool: &DbPool, manager_id: DbId) -> Result<Vec<Restaurant>, DbError> {
        let tables = pool.read().await;
        Ok(tables
            .restaurants
            .iter()
            .filter(|r| r.manager_id == Some(manager_id))
            .cloned()
            .collect())
    }

    /// Listings awaiting admin approval.
    pub async fn list_pending(pool: &DbPool) -> Result<Vec<Restaurant>, DbError> {
        let tables = pool.read().await;
        Ok(tables
            .restaurants
            .iter()
            .filter(|r| !r.approved)
            .cloned()
            .collect())
    }

    /// Apply a partial update. Returns `None` if no listing has this id.
    ///
    /// A new floor plan is refused with [`DbError::StillReferenced`] when it
    /// drops or shrinks a table that confirmed reservations are seated at.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateRestaurant,
    ) -> Result<Option<Restaurant>, DbError> {
        let mut tables = pool.write().await;
        let Some(current) = tables
            .restaurants
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.tables.clone())
        else {
            return Ok(None);
        };
        let floor = match input.tables.as_deref() {
            Some(submitted) => {
                let floor = rebuild_floor(&mut tables.seq, &current, submitted);
                check_floor_keeps_bookings(&tables.reservations, id, &floor)?;
                Some(floor)
            }
            None => None,
        };

        let Some(r) = tables.restaurant_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            r.name = name.trim().to_string();
        }
        if let Some(description) = &input.description {
            r.description = description.clone();
        }
        if let Some(cuisine) = &input.cuisine {
            r.cuisine = cuisine.trim().to_string();
        }
        if let Some(price_range) = input.price_range {
            r.price_range = price_range;
        }
        if let Some(address) = &input.address {
            r.address = address.clone();
        }
        if let Some(hours) = &input.hours {
            r.hours = hours.clone();
        }
        if let Some(photos) = &input.photos {
            r.photos = photos.clone();
        }
        if let Some(phone_number) = &input.phone_number {
            r.phone_number = phone_number.clone();
        }
        if let Some(website) = &input.website {
            r.website = website.clone();
        }
        if let Some(features) = &input.features {
            r.features = normalize_features(features.clone());
        }
        if let Some(floor) = floor {
            r.tables = floor;
        }
        if let Some(active) = input.active {
            r.active = active;
        }
        Ok(Some(r.clone()))
    }

    /// Mark a listing approved. Returns `None` if no listing has this id.
    pub async fn approve(pool: &DbPool, id: DbId) -> Result<Option<Restaurant>, DbError> {
        let mut tables = pool.write().await;
        Ok(tables.restaurant_mut(id).map(|r| {
            r.approved = true;
            r.clone()
        }))
    }

    /// Fold a new review rating into the listing's aggregate.
    pub(crate) fn apply_review(tables: &mut Tables, id: DbId, rating: u8) {
        if let Some(r) = tables.restaurant_mut(id) {
            r.rating = fold_rating(r.rating, r.review_count, rating);
            r.review_count += 1;
        }
    }

    /// Replace an edited review's rating in the listing's aggregate.
    pub(crate) fn revise_review(tables: &mut Tables, id: DbId, old: u8, new: u8) {
        if let Some(r) = tables.restaurant_mut(id) {
            r.rating = replace_rating(r.rating, r.review_count, old, new);
        }
    }

    /// Take a deleted review's rating out of the listing's aggregate.
    pub(crate) fn withdraw_review(tables: &mut Tables, id: DbId, rating: u8) {
        if let Some(r) = tables.restaurant_mut(id) {
            r.rating = remove_rating(r.rating, r.review_count, rating);
            r.review_count = r.review_count.saturating_sub(1);
        }
    }

    /// Zero every `bookings_today` counter once per calendar day.
    ///
    /// Returns `true` if the counters were reset by this call.
    pub async fn reset_daily_counters(pool: &DbPool, today: NaiveDate) -> Result<bool, DbError> {
        let mut tables = pool.write().await;
        match tables.counters_day {
            Some(day) if day >= today => Ok(false),
            Some(_) => {
                for r in &mut tables.restaurants {
                    r.bookings_today = 0;
                }
                tables.counters_day = Some(today);
                Ok(true)
            }
            // First sweep only records the day; seeded counters stand.
            None => {
                tables.counters_day = Some(today);
                Ok(false)
            }
        }
    }
}
