//! Handler for per-date slot availability.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use tablebook_core::availability::{
    available_slots, AvailabilityQuery, TimeSlot, DEFAULT_PARTY_SIZE,
};
use tablebook_core::error::CoreError;
use tablebook_core::reservation::validate_party_size;
use tablebook_core::types::DbId;
use tablebook_db::repositories::{ReservationRepo, RestaurantRepo};

use crate::clock;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    /// Defaults to a party of two.
    pub party_size: Option<u32>,
}

/// GET /api/v1/restaurants/public/{id}/availability?date=&party_size=
///
/// The full 17:00-21:00 half-hour grid with a per-slot flag. An unknown or
/// unlisted restaurant yields an empty list rather than an error.
pub async fn list_slots(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<DataResponse<Vec<TimeSlot>>>> {
    let party_size = params.party_size.unwrap_or(DEFAULT_PARTY_SIZE);
    validate_party_size(party_size).map_err(|msg| CoreError::field("party_size", msg))?;

    let Some(restaurant) = RestaurantRepo::find_public(&state.pool, id).await? else {
        tracing::debug!(restaurant_id = id, "Availability for unknown restaurant");
        return Ok(Json(DataResponse { data: Vec::new() }));
    };

    let date = params.date.unwrap_or_else(clock::today);
    let booked = ReservationRepo::list_for_restaurant_on(&state.pool, id, date).await?;
    let query = AvailabilityQuery::new(date, party_size, clock::now())
        .with_seating_window(state.config.booking.seating_window_mins);

    let slots = available_slots(&restaurant, &booked, &query);
    Ok(Json(DataResponse { data: slots }))
}
