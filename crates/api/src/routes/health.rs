use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store cannot be read.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Listings currently in the store.
    pub restaurants: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (db_healthy, restaurants) = match tablebook_db::health_check(&state.pool).await {
        Ok(count) => (true, count),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            (false, 0)
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        restaurants,
    })
}

/// Mount health check routes (root level, not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
