//! Admin-only handlers: reservation analytics and user management.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tablebook_core::analytics::{summarize, ReservationAnalytics};
use tablebook_core::error::CoreError;
use tablebook_core::roles::{grant_role, revoke_role};
use tablebook_core::types::DbId;
use tablebook_db::models::user::{User, UserResponse};
use tablebook_db::repositories::{ReservationRepo, RestaurantRepo, SessionRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Reservation statistics plus catalogue counts.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    #[serde(flatten)]
    pub reservations: ReservationAnalytics,
    pub total_restaurants: usize,
    pub pending_approvals: usize,
}

/// GET /api/v1/admin/analytics/reservations
pub async fn reservation_analytics(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<AnalyticsResponse>>> {
    let reservations = ReservationRepo::list(&state.pool).await?;
    let restaurants = RestaurantRepo::list(&state.pool).await?;
    let pending_approvals = restaurants.iter().filter(|r| !r.approved).count();

    Ok(Json(DataResponse {
        data: AnalyticsResponse {
            reservations: summarize(&reservations),
            total_restaurants: restaurants.len(),
            pending_approvals,
        },
    }))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let data = users.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/admin/users/{id}/role/{role}
///
/// Role changes show up in the user's tokens from their next sign-in or refresh.
pub async fn add_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((id, role)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::apply(&state.pool, id, |u| grant_role(&mut u.roles, &role))
        .await?
        .ok_or_else(|| user_not_found(id))?;
    tracing::info!(user_id = id, admin_id = admin.user_id, role = %role, "Role granted");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// DELETE /api/v1/admin/users/{id}/role/{role}
pub async fn remove_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((id, role)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::apply(&state.pool, id, |u| revoke_role(&mut u.roles, &role))
        .await?
        .ok_or_else(|| user_not_found(id))?;
    tracing::info!(user_id = id, admin_id = admin.user_id, role = %role, "Role revoked");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/admin/users/{id}/disable
///
/// Blocks sign-in and refresh and revokes every open session. Access tokens
/// already issued lapse at their normal expiry.
pub async fn disable_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = set_enabled(&state, id, false).await?;
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    tracing::info!(user_id = id, admin_id = admin.user_id, revoked, "User disabled");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/admin/users/{id}/enable
pub async fn enable_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = set_enabled(&state, id, true).await?;
    tracing::info!(user_id = id, admin_id = admin.user_id, "User enabled");
    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

async fn set_enabled(state: &AppState, id: DbId, enabled: bool) -> AppResult<User> {
    let user = UserRepo::apply(&state.pool, id, |u| {
        u.enabled = enabled;
        Ok::<(), CoreError>(())
    })
    .await?
    .ok_or_else(|| user_not_found(id))?;
    Ok(user)
}

fn user_not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "User", id }
}
