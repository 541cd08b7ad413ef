//! Conjunctive restaurant filtering.
//!
//! Every supplied criterion must match; blank or absent criteria match
//! everything. Results keep the input order and are never ranked.

use serde::Deserialize;

use crate::restaurant::Restaurant;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchCriteria {
    /// Matches city or state (case-insensitive substring) or zip code (exact substring).
    pub location: Option<String>,
    pub cuisine: Option<String>,
    /// A string of currency symbols; only its length is compared.
    pub price_range: Option<String>,
    pub min_rating: Option<f64>,
}

impl SearchCriteria {
    fn location(&self) -> Option<&str> {
        non_blank(self.location.as_deref())
    }

    fn cuisine(&self) -> Option<&str> {
        non_blank(self.cuisine.as_deref())
    }

    fn price_level(&self) -> Option<usize> {
        non_blank(self.price_range.as_deref()).map(|p| p.chars().count())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Whether a single restaurant satisfies every supplied criterion.
pub fn matches(restaurant: &Restaurant, criteria: &SearchCriteria) -> bool {
    if let Some(location) = criteria.location() {
        let needle = location.to_lowercase();
        let address = &restaurant.address;
        let hit = address.city.to_lowercase().contains(&needle)
            || address.state.to_lowercase().contains(&needle)
            || address.zip_code.contains(location);
        if !hit {
            return false;
        }
    }

    if let Some(cuisine) = criteria.cuisine() {
        if !restaurant.cuisine.eq_ignore_ascii_case(cuisine) {
            return false;
        }
    }

    if let Some(level) = criteria.price_level() {
        if restaurant.price_range.level() != level {
            return false;
        }
    }

    if let Some(min) = criteria.min_rating {
        if restaurant.rating < min {
            return false;
        }
    }

    true
}

/// Filter `restaurants` down to those matching `criteria`, in input order.
pub fn search<'a>(restaurants: &'a [Restaurant], criteria: &SearchCriteria) -> Vec<&'a Restaurant> {
    restaurants.iter().filter(|r| matches(r, criteria)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::restaurant::{Address, PriceTier, WeeklyHours};

    fn restaurant(id: i64, name: &str, cuisine: &str, tier: PriceTier, rating: f64, city: &str, zip: &str) -> Restaurant {
        Restaurant {
            id,
            name: name.into(),
            description: String::new(),
            cuisine: cuisine.into(),
            price_range: tier,
            rating,
            review_count: 0,
            address: Address {
                street: "1 Main St".into(),
                city: city.into(),
                state: "CA".into(),
                zip_code: zip.into(),
                country: "USA".into(),
            },
            hours: WeeklyHours::uniform("5:00 PM - 10:00 PM"),
            photos: vec![],
            bookings_today: 0,
            phone_number: String::new(),
            website: String::new(),
            features: vec![],
            tables: vec![],
            manager_id: None,
            approved: true,
            active: true,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn catalogue() -> Vec<Restaurant> {
        vec![
            restaurant(1, "Bella Italia", "Italian", PriceTier::Upscale, 4.7, "San Francisco", "94105"),
            restaurant(2, "Sakura Sushi", "Japanese", PriceTier::Luxury, 4.9, "San Francisco", "94108"),
            restaurant(3, "Spice Garden", "Indian", PriceTier::Moderate, 4.5, "San Francisco", "94110"),
            restaurant(4, "El Toro", "Mexican", PriceTier::Budget, 4.3, "San Francisco", "94105"),
            restaurant(5, "Oakland Grill", "American", PriceTier::Moderate, 3.9, "Oakland", "94612"),
        ]
    }

    fn ids(found: &[&Restaurant]) -> Vec<i64> {
        found.iter().map(|r| r.id).collect()
    }

    #[test]
    fn empty_criteria_returns_everything_in_order() {
        let all = catalogue();
        assert_eq!(ids(&search(&all, &SearchCriteria::default())), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn blank_strings_count_as_absent() {
        let all = catalogue();
        let criteria = SearchCriteria {
            location: Some("  ".into()),
            cuisine: Some(String::new()),
            price_range: Some(String::new()),
            min_rating: None,
        };
        assert_eq!(search(&all, &criteria).len(), 5);
    }

    #[test]
    fn zip_code_location_matches_substring() {
        let all = catalogue();
        let criteria = SearchCriteria {
            location: Some("94105".into()),
            ..Default::default()
        };
        assert_eq!(ids(&search(&all, &criteria)), vec![1, 4]);
    }

    #[test]
    fn city_location_is_case_insensitive() {
        let all = catalogue();
        let criteria = SearchCriteria {
            location: Some("oAkLaNd".into()),
            ..Default::default()
        };
        assert_eq!(ids(&search(&all, &criteria)), vec![5]);
    }

    #[test]
    fn cuisine_is_exact_but_case_insensitive() {
        let all = catalogue();
        let italian = SearchCriteria {
            cuisine: Some("italian".into()),
            ..Default::default()
        };
        assert_eq!(ids(&search(&all, &italian)), vec![1]);

        let partial = SearchCriteria {
            cuisine: Some("Ital".into()),
            ..Default::default()
        };
        assert!(search(&all, &partial).is_empty());
    }

    #[test]
    fn price_range_matches_only_same_symbol_count() {
        let all = catalogue();
        let criteria = SearchCriteria {
            price_range: Some("$$".into()),
            ..Default::default()
        };
        let found = search(&all, &criteria);
        assert_eq!(ids(&found), vec![3, 5]);
        assert!(found.iter().all(|r| r.price_range.level() == 2));
    }

    #[test]
    fn min_rating_is_inclusive() {
        let all = catalogue();
        let criteria = SearchCriteria {
            min_rating: Some(4.7),
            ..Default::default()
        };
        assert_eq!(ids(&search(&all, &criteria)), vec![1, 2]);
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let all = catalogue();
        let criteria = SearchCriteria {
            location: Some("94105".into()),
            price_range: Some("$".into()),
            ..Default::default()
        };
        assert_eq!(ids(&search(&all, &criteria)), vec![4]);
    }

    #[test]
    fn search_is_idempotent() {
        let all = catalogue();
        let combinations = [
            SearchCriteria::default(),
            SearchCriteria {
                location: Some("san".into()),
                min_rating: Some(4.4),
                ..Default::default()
            },
            SearchCriteria {
                cuisine: Some("ital".into()),
                price_range: Some("$$$".into()),
                ..Default::default()
            },
            SearchCriteria {
                location: Some("94105".into()),
                cuisine: Some("Japanese".into()),
                price_range: Some("$$".into()),
                min_rating: Some(4.0),
            },
        ];
        for criteria in &combinations {
            let first = ids(&search(&all, criteria));
            let second = ids(&search(&all, criteria));
            assert_eq!(first, second, "{criteria:?}");
        }
        // Narrowing the result again changes nothing either.
        let criteria = &combinations[1];
        let narrowed: Vec<Restaurant> = search(&all, criteria).into_iter().cloned().collect();
        assert_eq!(
            ids(&search(&narrowed, criteria)),
            ids(&search(&all, criteria))
        );
    }
}
