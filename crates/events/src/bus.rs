//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tablebook_core::reservation::Reservation;
use tablebook_core::types::DbId;
use tokio::sync::broadcast;

/// A reservation was written and a table assigned.
pub const RESERVATION_CREATED: &str = "reservation.created";
/// The guest cancelled a reservation.
pub const RESERVATION_CANCELLED: &str = "reservation.cancelled";
/// The sweeper closed out a seating.
pub const RESERVATION_COMPLETED: &str = "reservation.completed";
/// An admin approved a restaurant listing.
pub const RESTAURANT_APPROVED: &str = "restaurant.approved";

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A domain event.
///
/// Constructed via [`PlatformEvent::new`] and enriched with
/// [`with_source`](PlatformEvent::with_source),
/// [`with_actor`](PlatformEvent::with_actor) and
/// [`with_payload`](PlatformEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"reservation.created"`.
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    /// The user that triggered the event, if any.
    pub actor_user_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// An event about `reservation`, carrying the whole record as payload.
    pub fn for_reservation(event_type: impl Into<String>, reservation: &Reservation) -> Self {
        let payload = serde_json::to_value(reservation).unwrap_or_default();
        Self::new(event_type)
            .with_source("reservation", reservation.id)
            .with_payload(payload)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use tablebook_events::bus::{EventBus, PlatformEvent, RESERVATION_CREATED};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new(RESERVATION_CREATED));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest messages are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped silently when nobody listens.
    pub fn publish(&self, event: PlatformEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            PlatformEvent::new(RESERVATION_CREATED)
                .with_source("reservation", 42)
                .with_actor(7)
                .with_payload(serde_json::json!({"party_size": 2})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "reservation.created");
        assert_eq!(received.source_entity_type.as_deref(), Some("reservation"));
        assert_eq!(received.source_entity_id, Some(42));
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.payload["party_size"], 2);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(PlatformEvent::new(RESERVATION_CANCELLED));

        assert_eq!(rx1.recv().await.unwrap().event_type, RESERVATION_CANCELLED);
        assert_eq!(rx2.recv().await.unwrap().event_type, RESERVATION_CANCELLED);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        EventBus::default().publish(PlatformEvent::new("orphan.event"));
    }
}
