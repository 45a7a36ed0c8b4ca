//! seatsweep - reclaims access seats from inactive directory users
//!
//! A run fetches the full directory snapshot, classifies users whose last
//! successful login is at least `threshold_days` old, and disables their
//! seats in bulk batches. Revocation failures are reported per batch and
//! never abort a run; a failed directory fetch does.
//!
//! # Features
//!
//! - `server` - Manual HTTP trigger (axum). Enabled by default.
//! - `background-jobs` - Scheduled sweep (cron). Enabled by default.
//!
//! # Example
//!
//! ```rust,ignore
//! use seatsweep::{config::SeatsweepConfig, provider::build_sweeper};
//!
//! let config = SeatsweepConfig::load()?;
//! let sweeper = build_sweeper(&config)?;
//! let summary = sweeper.run_sweep(5.0, 50).await?;
//! println!("{} of {} inactive users deactivated", summary.deleted_count, summary.inactive_count);
//! ```

// Engine (always available)
pub mod classifier;
pub mod config;
pub mod directory;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod provider;
pub mod report;
pub mod revoker;

// Scheduled trigger (requires "background-jobs" feature)
#[cfg(feature = "background-jobs")]
pub mod jobs;

// Manual HTTP trigger (requires "server" feature)
#[cfg(feature = "server")]
#[path = "server/mod.rs"]
pub mod server;

pub use engine::{RunStage, SeatSweeper};
pub use errors::{BatchRevocationError, SweepError, SweepResult};
pub use report::RunSummary;
