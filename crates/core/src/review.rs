//! Guest reviews and the restaurant rating aggregate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::DbId;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: DbId,
    pub restaurant_id: DbId,
    pub reservation_id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
}

pub fn validate_rating(rating: u8) -> Result<(), String> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(format!("Rating must be between {MIN_RATING} and {MAX_RATING}"))
    }
}

/// Fold one more rating into an aggregate of `count` earlier reviews.
///
/// Listings carry their historical aggregate, so the new mean is computed from
/// the stored rating and count rather than from the individual reviews kept here.
/// The result is rounded to one decimal.
pub fn fold_rating(current: f64, count: u32, rating: u8) -> f64 {
    let total = current * f64::from(count) + f64::from(rating);
    round_mean(total / f64::from(count + 1))
}

/// Swap one of the `count` ratings behind `current` from `old` to `new`.
pub fn replace_rating(current: f64, count: u32, old: u8, new: u8) -> f64 {
    if count == 0 {
        return f64::from(new);
    }
    let total = current * f64::from(count) - f64::from(old) + f64::from(new);
    round_mean(total / f64::from(count))
}

/// Take one rating out of an aggregate of `count` reviews. An empty
/// aggregate is 0.0.
pub fn remove_rating(current: f64, count: u32, rating: u8) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    let total = current * f64::from(count) - f64::from(rating);
    round_mean(total / f64::from(count - 1))
}

/// One decimal, kept inside the rating scale. The stored aggregate is
/// already rounded, so backing a rating out can drift slightly past it.
fn round_mean(mean: f64) -> f64 {
    let clamped = mean.clamp(f64::from(MIN_RATING), f64::from(MAX_RATING));
    (clamped * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn first_review_sets_the_rating() {
        assert_eq!(fold_rating(0.0, 0, 4), 4.0);
    }

    #[test]
    fn fold_rounds_to_one_decimal() {
        // (5 + 4) / 2 = 4.5, then (9 + 4) / 3 = 4.33
        assert_eq!(fold_rating(4.5, 2, 4), 4.3);
        assert_eq!(fold_rating(4.7, 324, 5), 4.7);
    }

    #[test]
    fn replacing_a_rating_keeps_the_count() {
        // 4 and 5 average 4.5; changing the 4 to a 2 gives 3.5.
        assert_eq!(replace_rating(4.5, 2, 4, 2), 3.5);
        assert_eq!(replace_rating(4.0, 1, 4, 1), 1.0);
    }

    #[test]
    fn removing_ratings_backs_out_of_the_mean() {
        assert_eq!(remove_rating(4.5, 2, 4), 5.0);
        assert_eq!(remove_rating(4.0, 1, 4), 0.0);
        assert_eq!(remove_rating(0.0, 0, 3), 0.0);
        // Rounded aggregates never leave the scale.
        assert_eq!(remove_rating(1.0, 2, 5), 1.0);
    }
}
