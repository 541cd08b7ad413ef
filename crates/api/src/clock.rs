//! Service wall clock.
//!
//! Restaurant dates and times are naive; the service reads them against UTC.

use chrono::{NaiveDate, NaiveDateTime, Utc};

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
