//! Repository for in-progress booking flows.

use chrono::Utc;
use tablebook_core::booking::{BookingFlow, BookingStep};
use tablebook_core::types::{DbId, Timestamp};

use crate::models::booking::BookingFlowRecord;
use crate::{DbError, DbPool};

/// Provides storage for booking flows.
pub struct BookingFlowRepo;

impl BookingFlowRepo {
    pub async fn create(
        pool: &DbPool,
        user_id: DbId,
        flow: BookingFlow,
    ) -> Result<BookingFlowRecord, DbError> {
        let mut tables = pool.write().await;
        let now = Utc::now();
        let record = BookingFlowRecord {
            id: tables.seq.next_booking_flow(),
            user_id,
            flow,
            created_at: now,
            updated_at: now,
        };
        tables.booking_flows.insert(record.id, record.clone());
        Ok(record)
    }

    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<BookingFlowRecord>, DbError> {
        let tables = pool.read().await;
        Ok(tables.booking_flows.get(&id).cloned())
    }

    /// Run `step` against a copy of the flow and store the copy only if it succeeds.
    ///
    /// The check and the write happen under one lock, so two concurrent
    /// submissions cannot both pass a guard such as the payment busy flag.
    /// Returns `Ok(None)` if no flow has this id.
    pub async fn apply<E>(
        pool: &DbPool,
        id: DbId,
        step: impl FnOnce(&mut BookingFlow) -> Result<(), E>,
    ) -> Result<Option<BookingFlowRecord>, E> {
        let mut tables = pool.write().await;
        let Some(record) = tables.booking_flows.get_mut(&id) else {
            return Ok(None);
        };
        let mut flow = record.flow.clone();
        step(&mut flow)?;
        record.flow = flow;
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    /// Drop flows nobody will come back to.
    ///
    /// Completed flows go once untouched since `completed_before`; any other
    /// flow goes once untouched since `idle_before`. Returns how many were
    /// removed.
    pub async fn purge_older_than(
        pool: &DbPool,
        idle_before: Timestamp,
        completed_before: Timestamp,
    ) -> Result<usize, DbError> {
        let mut tables = pool.write().await;
        let before = tables.booking_flows.len();
        tables.booking_flows.retain(|_, record| {
            let cutoff = if record.flow.step == BookingStep::Completed {
                completed_before
            } else {
                idle_before
            };
            record.updated_at >= cutoff
        });
        Ok(before - tables.booking_flows.len())
    }
}
