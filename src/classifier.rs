//! Inactivity classification.
//!
//! A user is inactive when at least `threshold_days` fixed 24-hour days have
//! passed since their last successful login. Users with no recorded login are
//! never classified as inactive.

use chrono::{DateTime, Utc};

use crate::directory::{DirectoryUser, InactiveCandidate};
use crate::errors::{SweepError, SweepResult};

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Source of "now" for classification.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fractional days between `since` and `now`; negative if `since` is in the future.
pub fn elapsed_days(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - since).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// A threshold must be a finite, non-negative number of days.
pub fn validate_threshold(threshold_days: f64) -> SweepResult<()> {
    if threshold_days.is_finite() && threshold_days >= 0.0 {
        Ok(())
    } else {
        Err(SweepError::InvalidArgument(format!(
            "threshold days must be a non-negative number, got {threshold_days}"
        )))
    }
}

/// Select the users whose last login is at least `threshold_days` old.
///
/// Preserves directory order.
pub fn classify(
    users: &[DirectoryUser],
    threshold_days: f64,
    now: DateTime<Utc>,
) -> Vec<InactiveCandidate> {
    users
        .iter()
        .filter(|user| {
            user.last_successful_login
                .is_some_and(|login| elapsed_days(login, now) >= threshold_days)
        })
        .map(InactiveCandidate::from)
        .collect()
}
