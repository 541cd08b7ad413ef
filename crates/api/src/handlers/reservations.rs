//! Handlers for the reservation ledger: direct booking, the signed-in
//! user's upcoming/past split, cancellation, and restaurant-side listings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveTime;
use serde::Deserialize;
use tablebook_core::booking::{generate_confirmation_code, BookingSelection, ContactDetails};
use tablebook_core::error::CoreError;
use tablebook_core::ledger::{check_cancellable, partition, ReservationLedger};
use tablebook_core::reservation::{Reservation, ReservationStatus};
use tablebook_core::types::{wall_clock, DbId};
use tablebook_db::models::reservation::{CreateReservation, SeatingOutcome};
use tablebook_db::repositories::{ReservationRepo, RestaurantRepo};
use tablebook_events::bus::{RESERVATION_CANCELLED, RESERVATION_CREATED};
use tablebook_events::PlatformEvent;
use validator::Validate;

use crate::clock;
use crate::error::{AppError, AppResult};
use crate::handlers::restaurants::ensure_manages;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireCustomer};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /reservations`.
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub restaurant_id: DbId,
    pub date: chrono::NaiveDate,
    #[serde(with = "wall_clock")]
    pub time: NaiveTime,
    pub party_size: u32,
    pub contact: ContactDetails,
}

/// Request body for `POST /reservations/{id}/cancel`.
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub confirm: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/reservations
///
/// Book directly without going through a checkout flow.
pub async fn create(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Json(input): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Reservation>>)> {
    let contact = input.contact.normalized();
    contact.validate().map_err(CoreError::from)?;

    let selection = BookingSelection {
        restaurant_id: input.restaurant_id,
        date: input.date,
        time: input.time,
        party_size: input.party_size,
    };
    let reservation = place_reservation(&state, user.user_id, &selection, &contact).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: reservation })))
}

/// GET /api/v1/reservations
///
/// The caller's reservations split into upcoming and past.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<ReservationLedger>>> {
    let reservations = ReservationRepo::list_for_user(&state.pool, user.user_id).await?;
    let ledger = partition(reservations, clock::today());
    Ok(Json(DataResponse { data: ledger }))
}

/// GET /api/v1/reservations/{id}
///
/// Visible to the guest, the restaurant's manager, and admins.
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Reservation>>> {
    let reservation = find_reservation(&state, id).await?;
    if reservation.user_id != user.user_id && !user.is_admin() {
        let restaurant = RestaurantRepo::find_by_id(&state.pool, reservation.restaurant_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Restaurant",
                id: reservation.restaurant_id,
            })?;
        ensure_manages(&user, &restaurant).map_err(|_| {
            CoreError::Forbidden("You cannot view this reservation".into())
        })?;
    }
    Ok(Json(DataResponse { data: reservation }))
}

/// POST /api/v1/reservations/{id}/cancel
///
/// Cancel one of the caller's confirmed reservations. The body must carry
/// `{"confirm": true}`.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<CancelRequest>,
) -> AppResult<Json<DataResponse<Reservation>>> {
    let reservation = find_reservation(&state, id).await?;
    check_cancellable(&reservation, user.user_id, input.confirm)?;

    // Someone else may have moved it on since the read.
    let cancelled = ReservationRepo::transition_status(
        &state.pool,
        id,
        ReservationStatus::Confirmed,
        ReservationStatus::Cancelled,
    )
    .await?
    .ok_or_else(|| CoreError::Conflict("Reservation is no longer confirmed".into()))?;

    state.event_bus.publish(
        PlatformEvent::for_reservation(RESERVATION_CANCELLED, &cancelled).with_actor(user.user_id),
    );
    tracing::info!(reservation_id = id, user_id = user.user_id, "Reservation cancelled");

    Ok(Json(DataResponse { data: cancelled }))
}

/// GET /api/v1/reservations/restaurant/{id}
///
/// Every reservation for a restaurant, for its manager or an admin.
pub async fn list_for_restaurant(
    State(state): State<AppState>,
    user: AuthUser,
    Path(restaurant_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Reservation>>>> {
    let restaurant = RestaurantRepo::find_by_id(&state.pool, restaurant_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Restaurant",
            id: restaurant_id,
        })?;
    ensure_manages(&user, &restaurant)?;

    let reservations = ReservationRepo::list_for_restaurant(&state.pool, restaurant_id).await?;
    Ok(Json(DataResponse { data: reservations }))
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

async fn find_reservation(state: &AppState, id: DbId) -> AppResult<Reservation> {
    let reservation = ReservationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Reservation",
            id,
        })?;
    Ok(reservation)
}

/// Seat and store a confirmed reservation, then announce it.
///
/// Used by direct booking and by checkout completion. `contact` must
/// already be normalized and validated.
pub(crate) async fn place_reservation(
    state: &AppState,
    user_id: DbId,
    selection: &BookingSelection,
    contact: &ContactDetails,
) -> AppResult<Reservation> {
    selection.check(clock::now())?;

    let input = CreateReservation {
        restaurant_id: selection.restaurant_id,
        user_id,
        date: selection.date,
        time: selection.time,
        party_size: selection.party_size,
        contact_email: contact.email.clone(),
        contact_phone: contact.phone.clone(),
        special_requests: contact.special_requests.clone(),
        confirmation_code: generate_confirmation_code(),
    };

    let outcome = ReservationRepo::create_seated(
        &state.pool,
        &input,
        clock::today(),
        state.config.booking.seating_window_mins,
    )
    .await?;

    let reservation = match outcome {
        SeatingOutcome::Seated(reservation) => reservation,
        SeatingOutcome::RestaurantNotFound => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Restaurant",
                id: selection.restaurant_id,
            }))
        }
        SeatingOutcome::NotBookable => {
            return Err(AppError::Core(CoreError::Validation(
                "Restaurant is not accepting reservations".into(),
            )))
        }
        SeatingOutcome::NoTableAvailable => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "No table for {} is free at {} on {}",
                selection.party_size,
                wall_clock::format(&selection.time),
                selection.date
            ))))
        }
    };

    state.event_bus.publish(
        PlatformEvent::for_reservation(RESERVATION_CREATED, &reservation).with_actor(user_id),
    );
    tracing::info!(
        reservation_id = reservation.id,
        restaurant_id = reservation.restaurant_id,
        table_id = reservation.table_id,
        party_size = reservation.party_size,
        "Reservation confirmed"
    );

    Ok(reservation)
}
