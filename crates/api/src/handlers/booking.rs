//! Handlers for the booking checkout: contact step, simulated payment step,
//! and completion.
//!
//! Each flow belongs to the customer who started it. Step changes go
//! through [`BookingFlowRepo::apply`] so guards and writes happen together.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tablebook_core::booking::{
    BookingConfirmation, BookingFlow, BookingSelection, ContactDetails, PaymentDetails,
};
use tablebook_core::error::CoreError;
use tablebook_core::reservation::Reservation;
use tablebook_core::types::{wall_clock, DbId};
use tablebook_db::models::booking::BookingFlowRecord;
use tablebook_db::repositories::{BookingFlowRepo, UserRepo};

use crate::clock;
use crate::error::{AppError, AppResult};
use crate::handlers::reservations::place_reservation;
use crate::handlers::restaurants::find_public;
use crate::middleware::rbac::RequireCustomer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /bookings`. Omitted fields take today, 19:00 and 2.
#[derive(Debug, Deserialize)]
pub struct StartBookingRequest {
    pub restaurant_id: DbId,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "wall_clock::option")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub party_size: Option<u32>,
}

/// Returned when the payment step succeeds.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub booking: BookingFlowRecord,
    pub reservation: Reservation,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/bookings
///
/// Start a fresh checkout on the contact step with the caller's email prefilled.
pub async fn start(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Json(input): Json<StartBookingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BookingFlowRecord>>)> {
    let restaurant = find_public(&state, input.restaurant_id).await?;
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        })?;

    let selection = BookingSelection::with_defaults(
        restaurant.id,
        input.date,
        input.time,
        input.party_size,
        clock::today(),
    );
    let record =
        BookingFlowRepo::create(&state.pool, user.user_id, BookingFlow::new(selection, account.email))
            .await?;

    tracing::debug!(
        booking_id = record.id,
        restaurant_id = restaurant.id,
        user_id = user.user_id,
        "Booking started"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/bookings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BookingFlowRecord>>> {
    let record = find_owned(&state, id, user.user_id).await?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/bookings/{id}/contact
///
/// Store contact details and move on to payment.
pub async fn submit_contact(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<DbId>,
    Json(contact): Json<ContactDetails>,
) -> AppResult<Json<DataResponse<BookingFlowRecord>>> {
    find_owned(&state, id, user.user_id).await?;
    let record = BookingFlowRepo::apply(&state.pool, id, |flow| flow.submit_contact(contact))
        .await?
        .ok_or_else(|| flow_not_found(id))?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/bookings/{id}/back
///
/// Return from payment to the contact step, keeping what was entered.
pub async fn back(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BookingFlowRecord>>> {
    find_owned(&state, id, user.user_id).await?;
    let stale_after = state.config.booking.stale_after();
    let record = BookingFlowRepo::apply(&state.pool, id, |flow| flow.back(Utc::now(), stale_after))
        .await?
        .ok_or_else(|| flow_not_found(id))?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/bookings/{id}/payment
///
/// Check the card fields, simulate processing, then write the reservation.
/// On any failure the flow stays on the payment step and can be retried.
pub async fn submit_payment(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<DbId>,
    Json(payment): Json<PaymentDetails>,
) -> AppResult<Json<DataResponse<PaymentResponse>>> {
    find_owned(&state, id, user.user_id).await?;
    let booking = &state.config.booking;
    let stale_after = booking.stale_after();

    let record = BookingFlowRepo::apply(&state.pool, id, |flow| {
        flow.begin_payment(&payment, Utc::now(), stale_after)
    })
    .await?
    .ok_or_else(|| flow_not_found(id))?;

    let attempt = tokio::time::timeout(booking.processing_timeout(), async {
        tokio::time::sleep(booking.processing_delay()).await;
        place_reservation(&state, user.user_id, &record.flow.selection, &record.flow.contact).await
    })
    .await
    .unwrap_or_else(|_| {
        Err(AppError::Core(CoreError::Transport(
            "Payment processing timed out".into(),
        )))
    });

    let reservation = match attempt {
        Ok(reservation) => reservation,
        Err(err) => {
            BookingFlowRepo::apply(&state.pool, id, |flow| {
                flow.abort_payment();
                Ok::<(), CoreError>(())
            })
            .await?;
            tracing::warn!(booking_id = id, error = %err, "Booking payment failed");
            return Err(err);
        }
    };

    let confirmation = BookingConfirmation {
        reservation_id: reservation.id,
        confirmation_code: reservation.confirmation_code.clone(),
    };
    let completed = BookingFlowRepo::apply(&state.pool, id, |flow| flow.complete(confirmation))
        .await?
        .ok_or_else(|| flow_not_found(id))?;

    tracing::info!(
        booking_id = id,
        reservation_id = reservation.id,
        "Booking completed"
    );
    Ok(Json(DataResponse {
        data: PaymentResponse {
            booking: completed,
            reservation,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn flow_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Booking",
        id,
    }
}

/// Load a flow that belongs to `user_id`. Other users' flows read as missing.
async fn find_owned(state: &AppState, id: DbId, user_id: DbId) -> AppResult<BookingFlowRecord> {
    match BookingFlowRepo::find_by_id(&state.pool, id).await? {
        Some(record) if record.user_id == user_id => Ok(record),
        _ => Err(flow_not_found(id).into()),
    }
}
