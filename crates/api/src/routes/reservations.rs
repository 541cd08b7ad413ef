//! Route definitions for the `/reservations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reservations;
use crate::state::AppState;

/// Routes mounted at `/reservations`.
///
/// ```text
/// POST /                    -> create
/// GET  /                    -> list_mine
/// GET  /{id}                -> get_by_id
/// POST /{id}/cancel         -> cancel
/// GET  /restaurant/{id}     -> list_for_restaurant
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(reservations::create).get(reservations::list_mine))
        .route("/{id}", get(reservations::get_by_id))
        .route("/{id}/cancel", post(reservations::cancel))
        .route("/restaurant/{id}", get(reservations::list_for_restaurant))
}
