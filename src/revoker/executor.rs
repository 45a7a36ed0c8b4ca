//! Scheduling of batch submissions.
//!
//! [`SequentialExecutor`] keeps one request in flight and submits batches in
//! order. [`BoundedExecutor`] allows up to N concurrent requests. Both return
//! one outcome per batch, sorted by batch index, and never let a failed batch
//! cancel the others.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::logging::{log_seat_event, SeatEvent};

use super::batch::{RevocationBatch, RevocationOutcome};
use super::SeatRegistry;

#[async_trait]
pub trait BatchExecutor: Send + Sync {
    async fn execute(
        &self,
        registry: Arc<dyn SeatRegistry>,
        batches: Vec<RevocationBatch>,
    ) -> Vec<RevocationOutcome>;
}

/// Submit a single batch and translate the registry's answer into an outcome.
pub async fn submit_batch(registry: &dyn SeatRegistry, batch: &RevocationBatch) -> RevocationOutcome {
    debug!(
        batch_index = batch.batch_index,
        start_index = batch.start_index,
        size = batch.len(),
        "Submitting seat revocation batch"
    );

    match registry.disable_seats(&batch.requests).await {
        Ok(()) => {
            for request in &batch.requests {
                log_seat_event(SeatEvent::Revoked, &request.seat_uid, None);
            }
            RevocationOutcome::revoked(batch)
        }
        Err(e) => {
            let outcome = RevocationOutcome::failed(batch, e.detail());
            log_seat_event(
                SeatEvent::RevocationFailed,
                &format!("batch-{}", batch.batch_index),
                Some(&format!(
                    "Failed to delete batch starting at index {}: {}",
                    batch.start_index,
                    e.detail()
                )),
            );
            outcome
        }
    }
}

/// One request at a time, in batch order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

#[async_trait]
impl BatchExecutor for SequentialExecutor {
    async fn execute(
        &self,
        registry: Arc<dyn SeatRegistry>,
        batches: Vec<RevocationBatch>,
    ) -> Vec<RevocationOutcome> {
        let mut outcomes = Vec::with_capacity(batches.len());
        for batch in &batches {
            outcomes.push(submit_batch(registry.as_ref(), batch).await);
        }
        outcomes
    }
}

/// Up to `max_in_flight` concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct BoundedExecutor {
    max_in_flight: usize,
}

impl BoundedExecutor {
    /// A limit of 0 is raised to 1.
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }
}

#[async_trait]
impl BatchExecutor for BoundedExecutor {
    async fn execute(
        &self,
        registry: Arc<dyn SeatRegistry>,
        batches: Vec<RevocationBatch>,
    ) -> Vec<RevocationOutcome> {
        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks = JoinSet::new();

        for batch in batches.iter().cloned() {
            let registry = Arc::clone(&registry);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                // The semaphore is never closed.
                let _permit = permits.acquire_owned().await.ok();
                submit_batch(registry.as_ref(), &batch).await
            });
        }

        let mut outcomes = Vec::with_capacity(batches.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!("Seat revocation task did not complete: {}", e),
            }
        }

        // A task that panicked still has to be reported as a failed batch.
        for batch in &batches {
            if !outcomes.iter().any(|o| o.batch_index == batch.batch_index) {
                outcomes.push(RevocationOutcome::failed(
                    batch,
                    serde_json::Value::String("revocation task aborted".to_string()),
                ));
            }
        }

        outcomes.sort_by_key(|o| o.batch_index);
        outcomes
    }
}
