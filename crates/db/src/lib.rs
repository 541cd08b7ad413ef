//! In-memory persistence for the reservation service.
//!
//! Repositories mirror a relational layout (one `Vec` per table, integer ids
//! from per-table sequences) so they can be swapped for a real database
//! without touching callers.

use std::sync::Arc;

pub mod error;
pub mod models;
pub mod repositories;
pub mod seed;
pub mod store;

pub use error::DbError;
pub use store::Store;

pub type DbPool = Arc<Store>;

/// Create an empty store.
pub fn create_pool() -> DbPool {
    Arc::new(Store::new())
}

/// Verify the store can be read, returning the number of listed restaurants.
pub async fn health_check(pool: &DbPool) -> Result<usize, DbError> {
    let tables = pool.read().await;
    Ok(tables.restaurants.len())
}
