//! Restaurant listing DTOs. The entity itself lives in `tablebook_core::restaurant`.

use serde::Deserialize;
use tablebook_core::error::not_blank;
use tablebook_core::restaurant::{Address, PriceTier, WeeklyHours};
use tablebook_core::types::DbId;
use validator::Validate;

fn default_true() -> bool {
    true
}

/// A table as submitted by a manager.
///
/// `id` is ignored on create. On update it names the existing table this
/// entry replaces; without it the table is matched by name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTable {
    #[serde(default)]
    pub id: Option<DbId>,
    #[validate(custom(function = "not_blank", message = "Table name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: u32,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// DTO for listing a new restaurant.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRestaurant {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = "not_blank", message = "Cuisine is required"))]
    pub cuisine: String,
    pub price_range: PriceTier,
    pub address: Address,
    #[serde(default)]
    pub hours: WeeklyHours,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub tables: Vec<CreateTable>,
}

/// DTO for editing a listing. Only `Some` fields are applied.
///
/// `tables`, when given, replaces the whole floor plan. Tables that survive
/// the edit keep their ids, so existing reservations stay attached to them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRestaurant {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "not_blank", message = "Cuisine is required"))]
    pub cuisine: Option<String>,
    pub price_range: Option<PriceTier>,
    pub address: Option<Address>,
    pub hours: Option<WeeklyHours>,
    pub photos: Option<Vec<String>>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub features: Option<Vec<String>>,
    #[validate(nested)]
    pub tables: Option<Vec<CreateTable>>,
    pub active: Option<bool>,
}
