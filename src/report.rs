//! Reconciliation of classifier and revoker output into a run summary.

use serde::Serialize;

use crate::directory::InactiveCandidate;
use crate::errors::BatchRevocationError;
use crate::revoker::RevocationOutcome;

/// Outcome of one run, surfaced unchanged by every trigger.
///
/// `deleted_count <= inactive_count <= total_users` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_users: usize,
    pub inactive_count: usize,
    pub deleted_count: usize,
    /// Emails of users whose batch succeeded, in candidate order
    pub deleted_identifiers: Vec<String>,
    pub failed_batches: Vec<BatchRevocationError>,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed_batches.is_empty()
    }
}

/// Aggregate per-batch outcomes.
///
/// Members of a failed batch are never reported as deleted, since the
/// registry gives no per-item result.
pub fn build(
    total_users: usize,
    candidates: &[InactiveCandidate],
    outcomes: &[RevocationOutcome],
) -> RunSummary {
    let mut ordered: Vec<&RevocationOutcome> = outcomes.iter().collect();
    ordered.sort_by_key(|o| o.batch_index);

    let mut deleted_identifiers = Vec::new();
    let mut failed_batches = Vec::new();

    for outcome in ordered {
        match outcome.error() {
            None => {
                let range = outcome.range();
                let members = candidates
                    .get(range.start.min(candidates.len())..range.end.min(candidates.len()))
                    .unwrap_or_default();
                deleted_identifiers.extend(members.iter().map(|c| c.email.clone()));
            }
            Some(err) => failed_batches.push(err.clone()),
        }
    }

    RunSummary {
        total_users,
        inactive_count: candidates.len(),
        deleted_count: deleted_identifiers.len(),
        deleted_identifiers,
        failed_batches,
    }
}
