//! Handlers for guest reviews.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tablebook_core::error::CoreError;
use tablebook_core::reservation::ReservationStatus;
use tablebook_core::review::{validate_rating, Review};
use tablebook_core::types::DbId;
use tablebook_db::models::review::{CreateReview, UpdateReview};
use tablebook_db::repositories::{ReservationRepo, ReviewRepo, UserRepo};

use crate::clock;
use crate::error::AppResult;
use crate::middleware::rbac::{RequireAuth, RequireCustomer};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /reviews`.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub restaurant_id: DbId,
    pub reservation_id: DbId,
    pub rating: u8,
    pub comment: String,
}

/// Request body for `PUT /reviews/{id}`. Omitted fields stay as they are.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

/// POST /api/v1/reviews
///
/// Review a restaurant for one of the caller's own reservations. A
/// reservation can be reviewed once.
pub async fn create(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Json(input): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Review>>)> {
    validate_rating(input.rating).map_err(|msg| CoreError::field("rating", msg))?;
    let comment = required_comment(&input.comment)?;

    let reservation = ReservationRepo::find_by_id(&state.pool, input.reservation_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Reservation",
            id: input.reservation_id,
        })?;
    if reservation.user_id != user.user_id {
        return Err(CoreError::Forbidden("You can only review your own reservations".into()).into());
    }
    if reservation.restaurant_id != input.restaurant_id {
        return Err(CoreError::Validation(
            "Reservation is not for the specified restaurant".into(),
        )
        .into());
    }
    if reservation.status == ReservationStatus::Cancelled {
        return Err(CoreError::Validation("Cancelled reservations cannot be reviewed".into()).into());
    }

    let author = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        })?;

    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            restaurant_id: input.restaurant_id,
            reservation_id: input.reservation_id,
            user_id: user.user_id,
            user_name: author.name,
            rating: input.rating,
            comment,
            date: clock::today(),
        },
    )
    .await?;

    tracing::info!(
        review_id = review.id,
        restaurant_id = review.restaurant_id,
        rating = review.rating,
        "Review posted"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// PUT /api/v1/reviews/{id}
///
/// Edit the caller's own review. A changed rating is re-weighed into the
/// restaurant's aggregate.
pub async fn update(
    State(state): State<AppState>,
    RequireCustomer(user): RequireCustomer,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReviewRequest>,
) -> AppResult<Json<DataResponse<Review>>> {
    if let Some(rating) = input.rating {
        validate_rating(rating).map_err(|msg| CoreError::field("rating", msg))?;
    }
    let comment = input.comment.as_deref().map(required_comment).transpose()?;

    let existing = find_review(&state, id).await?;
    if existing.user_id != user.user_id {
        return Err(CoreError::Forbidden("You can only edit your own reviews".into()).into());
    }

    let review = ReviewRepo::update(
        &state.pool,
        id,
        &UpdateReview {
            rating: input.rating,
            comment,
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Review",
        id,
    })?;
    tracing::info!(review_id = id, rating = review.rating, "Review edited");
    Ok(Json(DataResponse { data: review }))
}

/// DELETE /api/v1/reviews/{id}
///
/// Remove a review. Allowed for its author and for admins. Returns 204.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_review(&state, id).await?;
    if existing.user_id != user.user_id && !user.is_admin() {
        return Err(CoreError::Forbidden("You can only delete your own reviews".into()).into());
    }

    ReviewRepo::delete(&state.pool, id).await?;
    tracing::info!(
        review_id = id,
        restaurant_id = existing.restaurant_id,
        user_id = user.user_id,
        "Review deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/reviews/public/restaurant/{id}
pub async fn list_for_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let reviews = ReviewRepo::list_for_restaurant(&state.pool, restaurant_id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// GET /api/v1/reviews/user
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let reviews = ReviewRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

fn required_comment(comment: &str) -> Result<String, CoreError> {
    let comment = comment.trim();
    if comment.is_empty() {
        Err(CoreError::field("comment", "Comment is required"))
    } else {
        Ok(comment.to_string())
    }
}

async fn find_review(state: &AppState, id: DbId) -> AppResult<Review> {
    let review = ReviewRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Review",
            id,
        })?;
    Ok(review)
}
