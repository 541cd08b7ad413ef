pub mod booking;
pub mod reservation;
pub mod restaurant;
pub mod review;
pub mod session;
pub mod user;
