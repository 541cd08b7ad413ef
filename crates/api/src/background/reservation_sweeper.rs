//! Periodic reservation upkeep.
//!
//! Marks confirmed reservations as completed once their seating is well
//! over, zeroes every restaurant's `bookings_today` counter when the
//! calendar day rolls over, and drops dead refresh sessions and abandoned
//! or finished booking checkouts.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, TimeZone, Utc};
use tablebook_db::repositories::{
    BookingFlowRepo, ReservationRepo, RestaurantRepo, SessionRepo,
};
use tablebook_db::{DbError, DbPool};
use tablebook_events::bus::RESERVATION_COMPLETED;
use tablebook_events::{EventBus, PlatformEvent};
use tokio_util::sync::CancellationToken;

use crate::clock;
use crate::config::BookingConfig;

/// What one pass changed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub completed: usize,
    pub counters_reset: bool,
    pub sessions_purged: u64,
    pub flows_purged: usize,
}

/// Run a single pass at `now`.
pub async fn sweep_once(
    pool: &DbPool,
    event_bus: &EventBus,
    booking: &BookingConfig,
    now: NaiveDateTime,
) -> Result<SweepReport, DbError> {
    let completed = ReservationRepo::complete_elapsed(pool, now).await?;
    for reservation in &completed {
        event_bus.publish(PlatformEvent::for_reservation(RESERVATION_COMPLETED, reservation));
    }
    let counters_reset = RestaurantRepo::reset_daily_counters(pool, now.date()).await?;
    let instant = Utc.from_utc_datetime(&now);
    let sessions_purged = SessionRepo::cleanup_expired(pool, instant).await?;
    let flows_purged = BookingFlowRepo::purge_older_than(
        pool,
        instant - booking.flow_idle_ttl(),
        instant - booking.completed_flow_ttl(),
    )
    .await?;

    Ok(SweepReport {
        completed: completed.len(),
        counters_reset,
        sessions_purged,
        flows_purged,
    })
}

/// Run the sweeper loop until `cancel` is triggered.
pub async fn run(
    pool: DbPool,
    event_bus: Arc<EventBus>,
    booking: BookingConfig,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = every.as_secs(), "Reservation sweeper started");

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reservation sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep_once(&pool, &event_bus, &booking, clock::now()).await {
                    Ok(report) if report != SweepReport::default() => {
                        tracing::info!(
                            completed = report.completed,
                            counters_reset = report.counters_reset,
                            sessions_purged = report.sessions_purged,
                            flows_purged = report.flows_purged,
                            "Reservation sweep applied changes"
                        );
                    }
                    Ok(_) => tracing::debug!("Reservation sweep: nothing to do"),
                    Err(e) => tracing::error!(error = %e, "Reservation sweep failed"),
                }
            }
        }
    }
}
