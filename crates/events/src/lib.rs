//! Tablebook event bus and reservation notifications.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`ReservationNotifier`]: background service that turns reservation
//!   events into guest messages and hands them to a [`NotificationSink`].

pub mod bus;
pub mod notifier;

pub use bus::{EventBus, PlatformEvent};
pub use notifier::{LogSink, Notification, NotificationSink, ReservationNotifier};
