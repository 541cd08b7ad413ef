pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod reservations;
pub mod restaurants;
pub mod reviews;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register, /auth/login, /auth/refresh      public
/// /auth/logout                                    auth
///
/// /restaurants/public                             list (public)
/// /restaurants/public/search                      filter (public)
/// /restaurants/public/{id}                        detail (public)
/// /restaurants/public/{id}/availability           slots (public)
/// /restaurants                                    create (manager)
/// /restaurants/{id}                               update (manager, admin)
/// /restaurants/manager                            own listings (manager)
/// /restaurants/pending                            awaiting approval (admin)
/// /restaurants/{id}/approve                       approve (admin)
///
/// /reservations                                   create (customer), ledger (auth)
/// /reservations/{id}                              detail
/// /reservations/{id}/cancel                       cancel (owner)
/// /reservations/restaurant/{id}                   per restaurant (manager, admin)
///
/// /bookings                                       start checkout (customer)
/// /bookings/{id}                                  current state
/// /bookings/{id}/contact, /payment, /back         steps
///
/// /reviews                                        create (customer)
/// /reviews/{id}                                   edit (author), delete (author, admin)
/// /reviews/public/restaurant/{id}                 per restaurant (public)
/// /reviews/user                                   own reviews (auth)
///
/// /admin/analytics/reservations                   stats (admin)
/// /admin/users                                    users (admin)
/// /admin/users/{id}/role/{role}                   grant, revoke (admin)
/// /admin/users/{id}/disable, /enable              account switch (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/restaurants", restaurants::router())
        .nest("/reservations", reservations::router())
        .nest("/bookings", bookings::router())
        .nest("/reviews", reviews::router())
        .nest("/admin", admin::router())
}
