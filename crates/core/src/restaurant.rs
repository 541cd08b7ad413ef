//! Restaurant listing model: price tiers, weekly hours, and tables.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Marker used in [`WeeklyHours`] for a day the restaurant does not open.
pub const CLOSED_MARKER: &str = "Closed";

// ---------------------------------------------------------------------------
// Price tier
// ---------------------------------------------------------------------------

/// Four ordinal price tiers rendered as one to four currency symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PriceTier {
    Budget,
    Moderate,
    Upscale,
    Luxury,
}

impl PriceTier {
    /// Number of currency symbols for this tier (1-4).
    pub fn level(self) -> usize {
        match self {
            PriceTier::Budget => 1,
            PriceTier::Moderate => 2,
            PriceTier::Upscale => 3,
            PriceTier::Luxury => 4,
        }
    }

    pub fn from_level(level: usize) -> Option<Self> {
        match level {
            1 => Some(PriceTier::Budget),
            2 => Some(PriceTier::Moderate),
            3 => Some(PriceTier::Upscale),
            4 => Some(PriceTier::Luxury),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        &"$$$$"[..self.level()]
    }
}

impl TryFrom<String> for PriceTier {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() || !value.chars().all(|c| c == '$') {
            return Err(format!("Invalid price range '{value}', expected $ to $$$$"));
        }
        PriceTier::from_level(value.len())
            .ok_or_else(|| format!("Invalid price range '{value}', expected $ to $$$$"))
    }
}

impl From<PriceTier> for String {
    fn from(tier: PriceTier) -> Self {
        tier.symbol().to_string()
    }
}

// ---------------------------------------------------------------------------
// Address, hours, tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Free-text opening hours per weekday, e.g. `"11:00 AM - 10:00 PM"` or `"Closed"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyHours {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

impl WeeklyHours {
    /// The same hours text on every day.
    pub fn uniform(hours: &str) -> Self {
        Self {
            monday: hours.to_string(),
            tuesday: hours.to_string(),
            wednesday: hours.to_string(),
            thursday: hours.to_string(),
            friday: hours.to_string(),
            saturday: hours.to_string(),
            sunday: hours.to_string(),
        }
    }

    pub fn for_weekday(&self, day: Weekday) -> &str {
        match day {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    /// Blank hours text is treated as open; only an explicit `Closed` closes a day.
    pub fn is_closed_on(&self, day: Weekday) -> bool {
        self.for_weekday(day).trim().eq_ignore_ascii_case(CLOSED_MARKER)
    }
}

/// A physical table that reservations are seated at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: DbId,
    pub name: String,
    pub capacity: u32,
    pub is_available: bool,
}

// ---------------------------------------------------------------------------
// Restaurant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub cuisine: String,
    pub price_range: PriceTier,
    /// Aggregate review rating, 0-5 with one decimal.
    pub rating: f64,
    pub review_count: u32,
    pub address: Address,
    pub hours: WeeklyHours,
    pub photos: Vec<String>,
    pub bookings_today: u32,
    pub phone_number: String,
    pub website: String,
    pub features: Vec<String>,
    pub tables: Vec<Table>,
    pub manager_id: Option<DbId>,
    pub approved: bool,
    pub active: bool,
    pub created_at: Timestamp,
}

impl Restaurant {
    /// Only approved, active listings accept reservations or show up publicly.
    pub fn is_bookable(&self) -> bool {
        self.approved && self.active
    }
}

/// De-duplicate feature tags (case-insensitive), dropping blanks and keeping first-seen order.
pub fn normalize_features(features: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(features.len());
    let mut out = Vec::with_capacity(features.len());
    for feature in features {
        let trimmed = feature.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(trimmed.to_string());
        }
    }
    out
}
