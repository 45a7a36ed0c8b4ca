//! Scheduled sweep trigger.
//!
//! Requires the `background-jobs` feature. The scheduler runs sweep mode on a
//! cron expression; the summary is logged and never returned to anyone.
//!
//! # Usage
//!
//! ```rust,ignore
//! use seatsweep::jobs::{JobConfig, JobScheduler};
//!
//! let scheduler = JobScheduler::new(sweeper, JobConfig::from(&config)).await?;
//! scheduler.start().await?;
//! ```

use chrono::Utc;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler as TokioJobScheduler};
use tracing::{error, info, warn};

use crate::config::SeatsweepConfig;
use crate::engine::SeatSweeper;
use crate::errors::SweepResult;
use crate::report::RunSummary;

/// Configuration for the scheduled sweep.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Six-field cron expression (default: daily at midnight)
    pub sweep_cron: String,
    /// Inactivity threshold in days (default: 5)
    pub threshold_days: f64,
    /// Seats per revocation request (default: 50)
    pub batch_size: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            sweep_cron: "0 0 0 * * *".to_string(),
            threshold_days: 5.0,
            batch_size: 50,
        }
    }
}

impl From<&SeatsweepConfig> for JobConfig {
    fn from(config: &SeatsweepConfig) -> Self {
        Self {
            sweep_cron: config.schedule.cron.clone(),
            threshold_days: config.sweep.threshold_days,
            batch_size: config.sweep.batch_size,
        }
    }
}

/// Run one scheduled sweep and log its outcome.
///
/// Errors are logged, not propagated: the next tick simply tries again.
pub async fn run_scheduled_sweep(sweeper: &SeatSweeper, config: &JobConfig) -> Option<RunSummary> {
    match sweeper
        .run_sweep(config.threshold_days, config.batch_size)
        .await
    {
        Ok(summary) => {
            if summary.has_failures() {
                warn!(
                    "Scheduled sweep: {} of {} inactive users deactivated, {} batches failed",
                    summary.deleted_count,
                    summary.inactive_count,
                    summary.failed_batches.len()
                );
            } else {
                info!(
                    "Inactive users processed successfully by scheduler: {} of {} deactivated",
                    summary.deleted_count, summary.inactive_count
                );
            }
            Some(summary)
        }
        Err(e) => {
            error!("Scheduled sweep failed: {}", e);
            None
        }
    }
}

/// Background job scheduler.
pub struct JobScheduler {
    scheduler: TokioJobScheduler,
    sweeper: Arc<SeatSweeper>,
    config: JobConfig,
}

impl JobScheduler {
    /// Create a new job scheduler.
    pub async fn new(sweeper: Arc<SeatSweeper>, config: JobConfig) -> Result<Self, JobError> {
        let scheduler = TokioJobScheduler::new()
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        Ok(Self {
            scheduler,
            sweeper,
            config,
        })
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Register the sweep job and start the scheduler.
    pub async fn start(&self) -> Result<(), JobError> {
        info!("Starting seatsweep job scheduler");

        self.add_sweep_job().await?;

        self.scheduler
            .start()
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        info!("seatsweep job scheduler started successfully");

        Ok(())
    }

    /// Stop the job scheduler.
    pub async fn shutdown(&mut self) -> Result<(), JobError> {
        info!("Shutting down seatsweep job scheduler");
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;
        Ok(())
    }

    async fn add_sweep_job(&self) -> Result<(), JobError> {
        let sweeper = Arc::clone(&self.sweeper);
        let config = self.config.clone();

        let job = Job::new_async(self.config.sweep_cron.as_str(), move |_uuid, _l| {
            let sweeper = Arc::clone(&sweeper);
            let config = config.clone();
            Box::pin(async move {
                info!("Running scheduled sweep at {}", Utc::now());
                run_scheduled_sweep(&sweeper, &config).await;
            })
        })
        .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| JobError::SchedulerError(e.to_string()))?;

        info!(
            "Added inactive seat sweep job (schedule: {}, threshold: {} days, batch size: {})",
            self.config.sweep_cron, self.config.threshold_days, self.config.batch_size
        );

        Ok(())
    }

    /// Run the sweep immediately with the scheduled parameters.
    pub async fn run_sweep_now(&self) -> SweepResult<RunSummary> {
        self.sweeper
            .run_sweep(self.config.threshold_days, self.config.batch_size)
            .await
    }
}

/// Errors that can occur in the job scheduler.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Scheduler error: {0}")]
    SchedulerError(String),
}
