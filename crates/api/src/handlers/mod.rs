pub mod admin;
pub mod auth;
pub mod availability;
pub mod booking;
pub mod reservations;
pub mod restaurants;
pub mod reviews;
