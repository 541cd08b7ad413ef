//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&DbPool` as the first argument.

pub mod booking_flow_repo;
pub mod reservation_repo;
pub mod restaurant_repo;
pub mod review_repo;
pub mod session_repo;
pub mod user_repo;

pub use booking_flow_repo::BookingFlowRepo;
pub use reservation_repo::ReservationRepo;
pub use restaurant_repo::RestaurantRepo;
pub use review_repo::ReviewRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
