//! Orchestration of a run in sweep or single-target mode.
//!
//! ```text
//! Idle -> Fetching -> Classifying (sweep only) -> Revoking -> Reported
//!            \-> Failed
//! ```
//!
//! Only a directory fetch failure moves a run to `Failed`; revocation
//! failures are reported inside the [`RunSummary`].

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::classifier::{classify, validate_threshold, Clock, SystemClock};
use crate::directory::{DirectoryReader, DirectoryUser, InactiveCandidate};
use crate::errors::{SweepError, SweepResult};
use crate::logging::{log_seat_event, SeatEvent};
use crate::report::{build, RunSummary};
use crate::revoker::SeatRevoker;

/// Stage of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Fetching,
    Classifying,
    Revoking,
    Reported,
    Failed,
}

impl RunStage {
    pub fn can_transition_to(self, next: RunStage) -> bool {
        matches!(
            (self, next),
            (RunStage::Idle, RunStage::Fetching)
                | (RunStage::Fetching, RunStage::Classifying)
                | (RunStage::Fetching, RunStage::Revoking)
                | (RunStage::Fetching, RunStage::Failed)
                | (RunStage::Classifying, RunStage::Revoking)
                | (RunStage::Revoking, RunStage::Reported)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunStage::Reported | RunStage::Failed)
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStage::Idle => "idle",
            RunStage::Fetching => "fetching",
            RunStage::Classifying => "classifying",
            RunStage::Revoking => "revoking",
            RunStage::Reported => "reported",
            RunStage::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Stage tracker for one run; logs every transition.
#[derive(Debug)]
struct RunProgress {
    stage: RunStage,
}

impl RunProgress {
    fn new() -> Self {
        Self {
            stage: RunStage::Idle,
        }
    }

    fn advance(&mut self, next: RunStage) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "invalid run transition {} -> {}",
            self.stage,
            next
        );
        debug!(from = %self.stage, to = %next, "Run stage changed");
        self.stage = next;
    }
}

/// Composes directory, classifier, revoker and reporter.
#[derive(Clone)]
pub struct SeatSweeper {
    directory: Arc<dyn DirectoryReader>,
    revoker: SeatRevoker,
    clock: Arc<dyn Clock>,
}

impl SeatSweeper {
    pub fn new(directory: Arc<dyn DirectoryReader>, revoker: SeatRevoker) -> Self {
        Self::with_clock(directory, revoker, Arc::new(SystemClock))
    }

    pub fn with_clock(
        directory: Arc<dyn DirectoryReader>,
        revoker: SeatRevoker,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            revoker,
            clock,
        }
    }

    /// Classify the whole directory and revoke the seats of inactive users.
    pub async fn run_sweep(
        &self,
        threshold_days: f64,
        batch_size: usize,
    ) -> SweepResult<RunSummary> {
        validate_threshold(threshold_days)?;
        if batch_size == 0 {
            return Err(SweepError::InvalidArgument(
                "batch size must be greater than 0".to_string(),
            ));
        }

        let run_id = Uuid::new_v4();
        let span = info_span!("sweep", run_id = %run_id, threshold_days, batch_size);

        async move {
            log_seat_event(SeatEvent::SweepStarted, "sweep", None);
            let mut progress = RunProgress::new();

            let users = self.fetch(&mut progress).await?;

            progress.advance(RunStage::Classifying);
            let candidates = classify(&users, threshold_days, self.clock.now());
            info!(
                total_users = users.len(),
                inactive = candidates.len(),
                "Classified directory users"
            );

            self.revoke_and_report(&mut progress, users.len(), candidates, batch_size)
                .await
        }
        .instrument(span)
        .await
    }

    /// Revoke the seat of the user with `email`, skipping the inactivity check.
    pub async fn run_single_target(&self, email: &str) -> SweepResult<RunSummary> {
        let run_id = Uuid::new_v4();
        let span = info_span!("single_target", run_id = %run_id, email = %email);

        async move {
            log_seat_event(SeatEvent::SweepStarted, email, None);
            let mut progress = RunProgress::new();

            let users = self.fetch(&mut progress).await?;

            let Some(user) = users.iter().find(|u| u.has_email(email)) else {
                log_seat_event(SeatEvent::TargetNotFound, email, None);
                return Err(SweepError::UserNotFound {
                    email: email.to_string(),
                });
            };

            let candidates = vec![InactiveCandidate::from(user)];
            self.revoke_and_report(&mut progress, users.len(), candidates, 1)
                .await
        }
        .instrument(span)
        .await
    }

    async fn fetch(&self, progress: &mut RunProgress) -> SweepResult<Vec<DirectoryUser>> {
        progress.advance(RunStage::Fetching);
        match self.directory.fetch().await {
            Ok(users) => Ok(users),
            Err(e) => {
                progress.advance(RunStage::Failed);
                log_seat_event(SeatEvent::SweepFailed, "directory", Some(&e.to_string()));
                Err(e)
            }
        }
    }

    async fn revoke_and_report(
        &self,
        progress: &mut RunProgress,
        total_users: usize,
        candidates: Vec<InactiveCandidate>,
        batch_size: usize,
    ) -> SweepResult<RunSummary> {
        progress.advance(RunStage::Revoking);
        let outcomes = self.revoker.revoke(&candidates, batch_size).await?;

        progress.advance(RunStage::Reported);
        let summary = build(total_users, &candidates, &outcomes);
        log_seat_event(
            SeatEvent::SweepCompleted,
            "run",
            Some(&format!(
                "{} users, {} inactive, {} deactivated, {} failed batches",
                summary.total_users,
                summary.inactive_count,
                summary.deleted_count,
                summary.failed_batches.len()
            )),
        );
        Ok(summary)
    }
}
