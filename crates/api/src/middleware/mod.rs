//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the user behind a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireManager`] -- requires `restaurant` or `admin`.
//! - [`rbac::RequireCustomer`] -- requires `customer`.
//! - [`rbac::RequireAuth`] -- any signed-in user.

pub mod auth;
pub mod rbac;
