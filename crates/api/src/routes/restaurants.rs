//! Route definitions for the `/restaurants` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{availability, restaurants};
use crate::state::AppState;

/// Routes mounted at `/restaurants`.
///
/// ```text
/// GET  /public                       -> list_public
/// POST /public/search                -> search_public
/// GET  /public/{id}                  -> get_public
/// GET  /public/{id}/availability     -> list_slots
/// POST /                             -> create
/// PUT  /{id}                         -> update
/// GET  /manager                      -> list_mine
/// GET  /pending                      -> list_pending
/// POST /{id}/approve                 -> approve
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/public", get(restaurants::list_public))
        .route("/public/search", post(restaurants::search_public))
        .route("/public/{id}", get(restaurants::get_public))
        .route("/public/{id}/availability", get(availability::list_slots))
        .route("/", post(restaurants::create))
        .route("/{id}", put(restaurants::update))
        .route("/manager", get(restaurants::list_mine))
        .route("/pending", get(restaurants::list_pending))
        .route("/{id}/approve", post(restaurants::approve))
}
