//! Repository for reviews.

use tablebook_core::review::Review;
use tablebook_core::types::DbId;

use crate::models::review::{CreateReview, UpdateReview};
use crate::repositories::RestaurantRepo;
use crate::{DbError, DbPool};

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review and fold its rating into the restaurant aggregate.
    ///
    /// At most one review may exist per reservation.
    pub async fn create(pool: &DbPool, input: &CreateReview) -> Result<Review, DbError> {
        let mut tables = pool.write().await;
        if !tables
            .reservations
            .iter()
            .any(|r| r.id == input.reservation_id)
        {
            return Err(DbError::ForeignKeyViolation {
                constraint: "fk_reviews_reservation",
            });
        }
        if tables
            .reviews
            .iter()
            .any(|r| r.reservation_id == input.reservation_id)
        {
            return Err(DbError::UniqueViolation {
                constraint: "uq_reviews_reservation",
            });
        }
        let review = Review {
            id: tables.seq.next_review(),
            restaurant_id: input.restaurant_id,
            reservation_id: input.reservation_id,
            user_id: input.user_id,
            user_name: input.user_name.clone(),
            rating: input.rating,
            comment: input.comment.clone(),
            date: input.date,
        };
        tables.reviews.push(review.clone());
        RestaurantRepo::apply_review(&mut tables, input.restaurant_id, input.rating);
        Ok(review)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Review>, DbError> {
        let tables = pool.read().await;
        Ok(tables.reviews.iter().find(|r| r.id == id).cloned())
    }

    /// Apply an edit and re-weigh the restaurant rating. Returns `None` if no
    /// review has this id.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, DbError> {
        let mut tables = pool.write().await;
        let Some(review) = tables.reviews.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        let old_rating = review.rating;
        if let Some(rating) = input.rating {
            review.rating = rating;
        }
        if let Some(comment) = &input.comment {
            review.comment = comment.clone();
        }
        let review = review.clone();
        if review.rating != old_rating {
            RestaurantRepo::revise_review(&mut tables, review.restaurant_id, old_rating, review.rating);
        }
        Ok(Some(review))
    }

    /// Remove a review and take its rating out of the restaurant aggregate.
    /// Returns the removed review, or `None` if no review has this id.
    pub async fn delete(pool: &DbPool, id: DbId) -> Result<Option<Review>, DbError> {
        let mut tables = pool.write().await;
        let Some(index) = tables.reviews.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let review = tables.reviews.remove(index);
        RestaurantRepo::withdraw_review(&mut tables, review.restaurant_id, review.rating);
        Ok(Some(review))
    }

    /// Reviews for a restaurant, newest first.
    pub async fn list_for_restaurant(
        pool: &DbPool,
        restaurant_id: DbId,
    ) -> Result<Vec<Review>, DbError> {
        let tables = pool.read().await;
        let mut out: Vec<Review> = tables
            .reviews
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    /// Reviews written by a user, newest first.
    pub async fn list_for_user(pool: &DbPool, user_id: DbId) -> Result<Vec<Review>, DbError> {
        let tables = pool.read().await;
        let mut out: Vec<Review> = tables
            .reviews
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(out)
    }
}
