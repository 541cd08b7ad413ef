//! Route definitions for the `/bookings` checkout resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// POST /                 -> start
/// GET  /{id}             -> get_by_id
/// POST /{id}/contact     -> submit_contact
/// POST /{id}/payment     -> submit_payment
/// POST /{id}/back        -> back
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(booking::start))
        .route("/{id}", get(booking::get_by_id))
        .route("/{id}/contact", post(booking::submit_contact))
        .route("/{id}/payment", post(booking::submit_payment))
        .route("/{id}/back", post(booking::back))
}
