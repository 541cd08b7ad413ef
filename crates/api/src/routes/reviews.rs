use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// POST   /                         -> create
/// PUT    /{id}                     -> update
/// DELETE /{id}                     -> delete
/// GET    /public/restaurant/{id}   -> list_for_restaurant
/// GET    /user                     -> list_mine
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(reviews::create))
        .route("/{id}", put(reviews::update).delete(reviews::delete))
        .route("/public/restaurant/{id}", get(reviews::list_for_restaurant))
        .route("/user", get(reviews::list_mine))
}
