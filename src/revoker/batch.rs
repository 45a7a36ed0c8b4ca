//! Batch partitioning and per-batch outcomes.

use std::ops::Range;

use serde::Serialize;

use crate::directory::InactiveCandidate;
use crate::errors::{BatchRevocationError, SweepError, SweepResult};

/// One element of a bulk seat update: disables both entitlements of a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatRevocation {
    pub access_seat: bool,
    pub gateway_seat: bool,
    pub seat_uid: String,
}

impl SeatRevocation {
    pub fn disable(seat_uid: impl Into<String>) -> Self {
        Self {
            access_seat: false,
            gateway_seat: false,
            seat_uid: seat_uid.into(),
        }
    }
}

/// A contiguous slice of the candidate list submitted as one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationBatch {
    pub batch_index: usize,
    /// Position of the first member in the candidate list
    pub start_index: usize,
    pub requests: Vec<SeatRevocation>,
}

impl RevocationBatch {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Candidate indices covered by this batch.
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.start_index + self.len()
    }
}

/// Split `candidates` into contiguous batches of at most `batch_size`.
///
/// The last batch may be smaller. An empty candidate list yields no batches.
pub fn partition(
    candidates: &[InactiveCandidate],
    batch_size: usize,
) -> SweepResult<Vec<RevocationBatch>> {
    if batch_size == 0 {
        return Err(SweepError::InvalidArgument(
            "batch size must be greater than 0".to_string(),
        ));
    }

    Ok(candidates
        .chunks(batch_size)
        .enumerate()
        .map(|(batch_index, chunk)| RevocationBatch {
            batch_index,
            start_index: batch_index * batch_size,
            requests: chunk
                .iter()
                .map(|candidate| SeatRevocation::disable(candidate.seat_id.clone()))
                .collect(),
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchStatus {
    Revoked,
    Failed(BatchRevocationError),
}

/// Result of submitting one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RevocationOutcome {
    pub batch_index: usize,
    pub start_index: usize,
    pub size: usize,
    pub status: BatchStatus,
}

impl RevocationOutcome {
    pub fn revoked(batch: &RevocationBatch) -> Self {
        Self {
            batch_index: batch.batch_index,
            start_index: batch.start_index,
            size: batch.len(),
            status: BatchStatus::Revoked,
        }
    }

    pub fn failed(batch: &RevocationBatch, detail: serde_json::Value) -> Self {
        Self {
            batch_index: batch.batch_index,
            start_index: batch.start_index,
            size: batch.len(),
            status: BatchStatus::Failed(BatchRevocationError {
                batch_index: batch.batch_index,
                start_index: batch.start_index,
                size: batch.len(),
                detail,
            }),
        }
    }

    pub fn is_revoked(&self) -> bool {
        matches!(self.status, BatchStatus::Revoked)
    }

    /// Whole batch on success, zero on failure.
    pub fn revoked_count(&self) -> usize {
        if self.is_revoked() {
            self.size
        } else {
            0
        }
    }

    pub fn error(&self) -> Option<&BatchRevocationError> {
        match &self.status {
            BatchStatus::Failed(err) => Some(err),
            BatchStatus::Revoked => None,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start_index..self.start_index + self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidates(n: usize) -> Vec<InactiveCandidate> {
        (0..n)
            .map(|i| InactiveCandidate {
                id: Some(format!("id-{i}")),
                email: format!("user{i}@example.com"),
                seat_id: format!("seat-{i}"),
            })
            .collect()
    }

    #[test]
    fn batch_count_is_ceiling_of_candidates_over_size() {
        for (n, size, expected) in [(0, 50, 0), (1, 50, 1), (50, 50, 1), (51, 50, 2), (120, 50, 3)] {
            let batches = partition(&candidates(n), size).unwrap();
            assert_eq!(batches.len(), expected, "n={n} size={size}");
        }
    }

    #[test]
    fn batches_cover_every_candidate_once_in_order() {
        let list = candidates(120);
        let batches = partition(&list, 50).unwrap();

        let sizes: Vec<_> = batches.iter().map(RevocationBatch::len).collect();
        assert_eq!(sizes, vec![50, 50, 20]);

        let seats: Vec<_> = batches
            .iter()
            .flat_map(|b| b.requests.iter().map(|r| r.seat_uid.clone()))
            .collect();
        let expected: Vec<_> = list.iter().map(|c| c.seat_id.clone()).collect();
        assert_eq!(seats, expected);

        assert_eq!(batches[2].range(), 100..120);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = partition(&candidates(3), 0).unwrap_err();
        assert!(matches!(err, SweepError::InvalidArgument(_)));
    }

    #[test]
    fn revocation_disables_both_entitlements() {
        let body = serde_json::to_value(SeatRevocation::disable("seat-9")).unwrap();
        assert_eq!(
            body,
            json!({ "access_seat": false, "gateway_seat": false, "seat_uid": "seat-9" })
        );
    }

    #[test]
    fn failed_outcome_counts_nothing() {
        let batch = &partition(&candidates(3), 3).unwrap()[0];
        let ok = RevocationOutcome::revoked(batch);
        let failed = RevocationOutcome::failed(batch, json!(["boom"]));

        assert_eq!(ok.revoked_count(), 3);
        assert_eq!(failed.revoked_count(), 0);
        assert_eq!(failed.error().map(|e| e.size), Some(3));
    }
}
