//! Batched seat revocation.
//!
//! The revoker partitions inactive candidates into contiguous batches and
//! submits each batch as one bulk update to the [`SeatRegistry`]. The
//! registry's success flag is authoritative for the whole batch. A failed
//! batch is logged and recorded, and the remaining batches still run.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::directory::InactiveCandidate;
use crate::errors::SweepResult;

mod batch;
mod executor;

pub use batch::{
    partition, BatchStatus, RevocationBatch, RevocationOutcome, SeatRevocation,
};
pub use executor::{submit_batch, BatchExecutor, BoundedExecutor, SequentialExecutor};

/// Remote store of seat entitlements.
#[async_trait]
pub trait SeatRegistry: Send + Sync {
    /// Disable every seat in `requests` with a single bulk call.
    ///
    /// `Ok(())` only when the registry reports success for the call.
    async fn disable_seats(&self, requests: &[SeatRevocation]) -> SweepResult<()>;
}

/// Drives the bulk revocation workflow for one run.
#[derive(Clone)]
pub struct SeatRevoker {
    registry: Arc<dyn SeatRegistry>,
    executor: Arc<dyn BatchExecutor>,
}

impl SeatRevoker {
    /// Revoker submitting batches sequentially.
    pub fn new(registry: Arc<dyn SeatRegistry>) -> Self {
        Self::with_executor(registry, Arc::new(SequentialExecutor))
    }

    pub fn with_executor(
        registry: Arc<dyn SeatRegistry>,
        executor: Arc<dyn BatchExecutor>,
    ) -> Self {
        Self { registry, executor }
    }

    /// Sequential for a limit of 1, bounded concurrency above that.
    pub fn with_concurrency(registry: Arc<dyn SeatRegistry>, max_in_flight: usize) -> Self {
        if max_in_flight <= 1 {
            Self::new(registry)
        } else {
            Self::with_executor(registry, Arc::new(BoundedExecutor::new(max_in_flight)))
        }
    }

    /// Revoke the seats of `candidates`, `batch_size` seats per request.
    ///
    /// Returns one outcome per batch in batch order. Only an invalid
    /// `batch_size` is an error; registry failures are reported per batch.
    pub async fn revoke(
        &self,
        candidates: &[InactiveCandidate],
        batch_size: usize,
    ) -> SweepResult<Vec<RevocationOutcome>> {
        let batches = partition(candidates, batch_size)?;

        if batches.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            candidates = candidates.len(),
            batches = batches.len(),
            batch_size,
            "Revoking seats"
        );

        let outcomes = self
            .executor
            .execute(Arc::clone(&self.registry), batches)
            .await;

        let failed = outcomes.iter().filter(|o| !o.is_revoked()).count();
        info!(
            revoked = outcomes.iter().map(RevocationOutcome::revoked_count).sum::<usize>(),
            failed_batches = failed,
            "Seat revocation finished"
        );

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SweepError;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRegistry {
        fail_call: Option<usize>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl SeatRegistry for RecordingRegistry {
        async fn disable_seats(&self, requests: &[SeatRevocation]) -> SweepResult<()> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push(requests.iter().map(|r| r.seat_uid.clone()).collect());
            if self.fail_call == Some(index) {
                return Err(SweepError::SeatUpdateRejected {
                    errors: json!([{ "message": "rejected" }]),
                });
            }
            Ok(())
        }
    }

    fn candidates(n: usize) -> Vec<InactiveCandidate> {
        (0..n)
            .map(|i| InactiveCandidate {
                id: None,
                email: format!("u{i}@example.com"),
                seat_id: format!("seat-{i}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn middle_batch_failure_does_not_stop_later_batches() {
        let registry = Arc::new(RecordingRegistry {
            fail_call: Some(1),
            ..Default::default()
        });
        let revoker = SeatRevoker::new(registry.clone());

        let outcomes = revoker.revoke(&candidates(120), 50).await.unwrap();

        let sizes: Vec<_> = registry.calls.lock().unwrap().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
        assert_eq!(
            outcomes.iter().map(RevocationOutcome::revoked_count).sum::<usize>(),
            70
        );
    }

    #[tokio::test]
    async fn no_candidates_means_no_calls() {
        let registry = Arc::new(RecordingRegistry::default());
        let revoker = SeatRevoker::new(registry.clone());

        let outcomes = revoker.revoke(&[], 50).await.unwrap();

        assert!(outcomes.is_empty());
        assert!(registry.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_batch_size_issues_no_calls() {
        let registry = Arc::new(RecordingRegistry::default());
        let revoker = SeatRevoker::new(registry.clone());

        assert!(revoker.revoke(&candidates(2), 0).await.is_err());
        assert!(registry.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_revoker_reports_same_totals() {
        let registry = Arc::new(RecordingRegistry {
            fail_call: Some(0),
            ..Default::default()
        });
        let revoker = SeatRevoker::with_concurrency(registry.clone(), 4);

        let outcomes = revoker.revoke(&candidates(10), 3).await.unwrap();

        assert_eq!(outcomes.len(), 4);
        let failed: usize = outcomes.iter().filter(|o| !o.is_revoked()).map(|o| o.size).sum();
        let revoked: usize = outcomes.iter().map(RevocationOutcome::revoked_count).sum();
        assert_eq!(failed + revoked, 10);
    }
}
