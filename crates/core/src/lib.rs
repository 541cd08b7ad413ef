//! Tablebook domain core.
//!
//! Pure data model and business rules for the reservation service. This crate
//! has zero internal deps so the store, the event bus, and the HTTP layer can
//! all share it.

pub mod analytics;
pub mod availability;
pub mod booking;
pub mod error;
pub mod ledger;
pub mod reservation;
pub mod restaurant;
pub mod review;
pub mod roles;
pub mod search;
pub mod types;
