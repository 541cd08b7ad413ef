//! Guest notifications for reservation events.
//!
//! [`ReservationNotifier`] subscribes to the [`EventBus`](crate::bus::EventBus),
//! renders a message for every created or cancelled reservation and hands it
//! to a [`NotificationSink`]. Delivery failures are logged and never reach the
//! request that caused the event.

use std::sync::Arc;

use tablebook_core::reservation::Reservation;
use tablebook_core::types::wall_clock;
use tokio::sync::broadcast;

use crate::bus::{PlatformEvent, RESERVATION_CANCELLED, RESERVATION_CREATED};

/// A rendered message addressed to one guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Where rendered notifications go.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Writes notifications to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            "Notification delivered"
        );
        Ok(())
    }
}

/// Render the guest message for `event`, if it is one guests hear about.
///
/// The event payload must be a serialized [`Reservation`].
pub fn render(event: &PlatformEvent) -> Option<Notification> {
    let reservation: Reservation = serde_json::from_value(event.payload.clone()).ok()?;
    let when = format!(
        "{} at {}",
        reservation.date.format("%A, %B %-d, %Y"),
        wall_clock::format(&reservation.time)
    );

    match event.event_type.as_str() {
        RESERVATION_CREATED => Some(Notification {
            to: reservation.contact_email.clone(),
            subject: format!("Reservation confirmed - {}", reservation.restaurant_name),
            body: format!(
                "Your table at {} is booked for {when}.\n\n\
                 Party size: {}\n\
                 Confirmation code: {}\n\n\
                 You can review or cancel this reservation from your account.",
                reservation.restaurant_name, reservation.party_size, reservation.confirmation_code,
            ),
        }),
        RESERVATION_CANCELLED => Some(Notification {
            to: reservation.contact_email.clone(),
            subject: format!("Reservation cancelled - {}", reservation.restaurant_name),
            body: format!(
                "Your reservation at {} for {when} (confirmation code {}) has been cancelled.\n\n\
                 If you did not request this, please contact the restaurant.",
                reservation.restaurant_name, reservation.confirmation_code,
            ),
        }),
        _ => None,
    }
}

/// Background service that turns reservation events into notifications.
pub struct ReservationNotifier;

impl ReservationNotifier {
    /// Run the notification loop until the bus is dropped.
    pub async fn run(
        sink: Arc<dyn NotificationSink>,
        mut receiver: broadcast::Receiver<PlatformEvent>,
    ) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let Some(notification) = render(&event) else {
                        continue;
                    };
                    if let Err(e) = sink.deliver(&notification) {
                        tracing::warn!(
                            error = %e,
                            event_type = %event.event_type,
                            reservation_id = ?event.source_entity_id,
                            "Failed to deliver notification"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notifier lagged, some notifications were not sent");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notifier shutting down");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use tablebook_core::reservation::ReservationStatus;

    use super::*;
    use crate::bus::EventBus;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<Notification>>,
    }

    impl NotificationSink for RecordingSink {
        fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn reservation() -> Reservation {
        let created = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
        Reservation {
            id: 101,
            restaurant_id: 1,
            restaurant_name: "Bella Italia".into(),
            user_id: 1,
            table_id: 3,
            date: NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            party_size: 2,
            status: ReservationStatus::Confirmed,
            contact_email: "a@b.com".into(),
            contact_phone: None,
            special_requests: None,
            confirmation_code: "K7Q2ZX9M".into(),
            created_at: created,
            updated_at: created,
        }
    }

    fn event(kind: &str) -> PlatformEvent {
        PlatformEvent::for_reservation(kind, &reservation())
    }

    #[test]
    fn confirmation_mentions_code_and_time() {
        let n = render(&event(RESERVATION_CREATED)).unwrap();
        assert_eq!(n.to, "a@b.com");
        assert_eq!(n.subject, "Reservation confirmed - Bella Italia");
        assert!(n.body.contains("K7Q2ZX9M"));
        assert!(n.body.contains("Thursday, May 15, 2025 at 19:00"));
    }

    #[test]
    fn reservation_events_carry_source_and_record() {
        let e = event(RESERVATION_CREATED);
        assert_eq!(e.source_entity_type.as_deref(), Some("reservation"));
        assert_eq!(e.source_entity_id, Some(101));
        assert_eq!(e.payload["time"], "19:00");
    }

    #[test]
    fn cancellation_is_rendered() {
        let n = render(&event(RESERVATION_CANCELLED)).unwrap();
        assert!(n.subject.starts_with("Reservation cancelled"));
    }

    #[test]
    fn unrelated_or_malformed_events_are_skipped() {
        assert!(render(&event("restaurant.approved")).is_none());
        assert!(render(&PlatformEvent::new(RESERVATION_CREATED)).is_none());
    }

    #[tokio::test]
    async fn notifier_delivers_until_bus_closes() {
        let bus = EventBus::default();
        let sink = Arc::new(RecordingSink::default());
        let handle = tokio::spawn(ReservationNotifier::run(sink.clone(), bus.subscribe()));

        bus.publish(event(RESERVATION_CREATED));
        bus.publish(event("restaurant.approved"));
        bus.publish(event(RESERVATION_CANCELLED));
        drop(bus);
        handle.await.unwrap();

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].subject.starts_with("Reservation confirmed"));
        assert!(sent[1].subject.starts_with("Reservation cancelled"));
    }
}
