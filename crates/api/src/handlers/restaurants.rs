//! Handlers for the restaurant catalogue: public browsing and search, plus
//! listing management for managers and approval for admins.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tablebook_core::error::CoreError;
use tablebook_core::restaurant::Restaurant;
use tablebook_core::search::{search, SearchCriteria};
use tablebook_core::types::DbId;
use tablebook_db::models::restaurant::{CreateRestaurant, UpdateRestaurant};
use tablebook_db::repositories::RestaurantRepo;
use tablebook_events::bus::RESTAURANT_APPROVED;
use tablebook_events::PlatformEvent;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/restaurants/public
pub async fn list_public(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Restaurant>>>> {
    let restaurants = RestaurantRepo::list_public(&state.pool).await?;
    Ok(Json(DataResponse { data: restaurants }))
}

/// GET /api/v1/restaurants/public/{id}
pub async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Restaurant>>> {
    let restaurant = find_public(&state, id).await?;
    Ok(Json(DataResponse { data: restaurant }))
}

/// POST /api/v1/restaurants/public/search
///
/// Filter the public catalogue. Every supplied criterion must match; the
/// result keeps catalogue order.
pub async fn search_public(
    State(state): State<AppState>,
    Json(criteria): Json<SearchCriteria>,
) -> AppResult<Json<DataResponse<Vec<Restaurant>>>> {
    let catalogue = RestaurantRepo::list_public(&state.pool).await?;
    let found: Vec<Restaurant> = search(&catalogue, &criteria).into_iter().cloned().collect();
    tracing::debug!(
        location = ?criteria.location,
        cuisine = ?criteria.cuisine,
        price_range = ?criteria.price_range,
        min_rating = ?criteria.min_rating,
        matches = found.len(),
        "Restaurant search"
    );
    Ok(Json(DataResponse { data: found }))
}

// ---------------------------------------------------------------------------
// Managers
// ---------------------------------------------------------------------------

/// POST /api/v1/restaurants
///
/// List a new restaurant. It stays hidden until an admin approves it.
pub async fn create(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Json(input): Json<CreateRestaurant>,
) -> AppResult<(StatusCode, Json<DataResponse<Restaurant>>)> {
    input.validate().map_err(CoreError::from)?;

    let restaurant = RestaurantRepo::create(&state.pool, &input, Some(user.user_id)).await?;
    tracing::info!(
        restaurant_id = restaurant.id,
        manager_id = user.user_id,
        "Restaurant listed, awaiting approval"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: restaurant })))
}

/// PUT /api/v1/restaurants/{id}
///
/// Partial update by the listing's manager or an admin.
pub async fn update(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRestaurant>,
) -> AppResult<Json<DataResponse<Restaurant>>> {
    let existing = RestaurantRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Restaurant",
            id,
        })?;
    ensure_manages(&user, &existing)?;

    input.validate().map_err(CoreError::from)?;

    let updated = RestaurantRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Restaurant",
            id,
        })?;
    tracing::info!(restaurant_id = id, user_id = user.user_id, "Restaurant updated");
    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/restaurants/manager
///
/// Listings managed by the caller, approved or not.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
) -> AppResult<Json<DataResponse<Vec<Restaurant>>>> {
    let restaurants = RestaurantRepo::list_by_manager(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: restaurants }))
}

// ---------------------------------------------------------------------------
// Admins
// ---------------------------------------------------------------------------

/// GET /api/v1/restaurants/pending
pub async fn list_pending(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Restaurant>>>> {
    let restaurants = RestaurantRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse { data: restaurants }))
}

/// POST /api/v1/restaurants/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Restaurant>>> {
    let restaurant = RestaurantRepo::approve(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Restaurant",
            id,
        })?;

    state.event_bus.publish(
        PlatformEvent::new(RESTAURANT_APPROVED)
            .with_source("restaurant", id)
            .with_actor(admin.user_id),
    );
    tracing::info!(restaurant_id = id, admin_id = admin.user_id, "Restaurant approved");
    Ok(Json(DataResponse { data: restaurant }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load an approved, active listing or fail with not-found.
pub(crate) async fn find_public(state: &AppState, id: DbId) -> AppResult<Restaurant> {
    let restaurant = RestaurantRepo::find_public(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Restaurant",
            id,
        })?;
    Ok(restaurant)
}

/// Admins manage everything; managers only their own listings.
pub(crate) fn ensure_manages(user: &AuthUser, restaurant: &Restaurant) -> Result<(), CoreError> {
    if user.is_admin() || restaurant.manager_id == Some(user.user_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "You do not manage this restaurant".into(),
        ))
    }
}
