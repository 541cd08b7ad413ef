//! Reservation statistics for the admin dashboard.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::reservation::{Reservation, ReservationStatus};
use crate::types::{wall_clock, DbId};

/// How many entries the popularity rankings keep.
pub const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCount {
    #[serde(with = "wall_clock")]
    pub time: NaiveTime,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestaurantCount {
    pub restaurant_id: DbId,
    pub restaurant_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReservationAnalytics {
    pub total_reservations: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub completed: usize,
    pub by_day: Vec<DailyCount>,
    pub popular_times: Vec<SlotCount>,
    pub popular_restaurants: Vec<RestaurantCount>,
}

/// Aggregate every reservation in the store.
pub fn summarize(reservations: &[Reservation]) -> ReservationAnalytics {
    let mut out = ReservationAnalytics {
        total_reservations: reservations.len(),
        ..Default::default()
    };

    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut by_time: BTreeMap<NaiveTime, usize> = BTreeMap::new();
    let mut by_restaurant: HashMap<DbId, (String, usize)> = HashMap::new();

    for r in reservations {
        match r.status {
            ReservationStatus::Confirmed => out.confirmed += 1,
            ReservationStatus::Cancelled => out.cancelled += 1,
            ReservationStatus::Completed => out.completed += 1,
        }
        *by_day.entry(r.date).or_default() += 1;
        *by_time.entry(r.time).or_default() += 1;
        by_restaurant
            .entry(r.restaurant_id)
            .or_insert_with(|| (r.restaurant_name.clone(), 0))
            .1 += 1;
    }

    out.by_day = by_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect();

    // BTreeMap order is ascending time, and the sort is stable, so ties stay ascending.
    let mut times: Vec<SlotCount> = by_time
        .into_iter()
        .map(|(time, count)| SlotCount { time, count })
        .collect();
    times.sort_by(|a, b| b.count.cmp(&a.count));
    times.truncate(TOP_N);
    out.popular_times = times;

    let mut restaurants: Vec<RestaurantCount> = by_restaurant
        .into_iter()
        .map(|(restaurant_id, (restaurant_name, count))| RestaurantCount {
            restaurant_id,
            restaurant_name,
            count,
        })
        .collect();
    restaurants.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.restaurant_id.cmp(&b.restaurant_id))
    });
    restaurants.truncate(TOP_N);
    out.popular_restaurants = restaurants;

    out
}
