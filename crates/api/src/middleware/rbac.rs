//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects with 403 unless the user
//! holds at least one qualifying role.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tablebook_core::error::CoreError;
use tablebook_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_RESTAURANT};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[&str],
    message: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !allowed.iter().any(|role| user.has_role(role)) {
        return Err(AppError::Core(CoreError::Forbidden(message.into())));
    }
    Ok(user)
}

/// Requires the `admin` role.
///
/// ```ignore
/// async fn pending(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> { .. }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, &[ROLE_ADMIN], "Admin role required")
            .await
            .map(RequireAdmin)
    }
}

/// Requires a restaurant manager or an admin.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(
            parts,
            state,
            &[ROLE_RESTAURANT, ROLE_ADMIN],
            "Restaurant or Admin role required",
        )
        .await
        .map(RequireManager)
    }
}

/// Requires the `customer` role. Only customers hold reservations.
pub struct RequireCustomer(pub AuthUser);

impl FromRequestParts<AppState> for RequireCustomer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_role(parts, state, &[ROLE_CUSTOMER], "Customer role required")
            .await
            .map(RequireCustomer)
    }
}

/// Any authenticated user. Same as [`AuthUser`], named for route readability.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        AuthUser::from_request_parts(parts, state)
            .await
            .map(RequireAuth)
    }
}
