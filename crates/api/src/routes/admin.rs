use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the admin role.
///
/// ```text
/// GET    /analytics/reservations   -> reservation_analytics
/// GET    /users                    -> list_users
/// POST   /users/{id}/role/{role}   -> add_role
/// DELETE /users/{id}/role/{role}   -> remove_role
/// PUT    /users/{id}/disable       -> disable_user
/// PUT    /users/{id}/enable        -> enable_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics/reservations", get(admin::reservation_analytics))
        .route("/users", get(admin::list_users))
        .route(
            "/users/{id}/role/{role}",
            post(admin::add_role).delete(admin::remove_role),
        )
        .route("/users/{id}/disable", put(admin::disable_user))
        .route("/users/{id}/enable", put(admin::enable_user))
}
