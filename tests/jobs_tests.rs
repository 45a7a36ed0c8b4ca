//! Tests for the scheduled sweep.
//!
//! These tests require the `background-jobs` feature to be enabled.

#![cfg(feature = "background-jobs")]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use seatsweep::directory::{DirectoryReader, DirectoryUser};
use seatsweep::errors::{SweepError, SweepResult};
use seatsweep::jobs::{run_scheduled_sweep, JobConfig, JobScheduler};
use seatsweep::revoker::{SeatRegistry, SeatRevocation, SeatRevoker};
use seatsweep::SeatSweeper;

struct Directory(Option<Vec<DirectoryUser>>);

#[async_trait]
impl DirectoryReader for Directory {
    async fn fetch(&self) -> SweepResult<Vec<DirectoryUser>> {
        self.0.clone().ok_or_else(|| SweepError::DirectoryFetch {
            errors: json!(["unavailable"]),
        })
    }
}

#[derive(Default)]
struct Registry {
    seats: Mutex<Vec<String>>,
}

#[async_trait]
impl SeatRegistry for Registry {
    async fn disable_seats(&self, requests: &[SeatRevocation]) -> SweepResult<()> {
        self.seats
            .lock()
            .unwrap()
            .extend(requests.iter().map(|r| r.seat_uid.clone()));
        Ok(())
    }
}

fn stale_user(email: &str, days_ago: i64) -> DirectoryUser {
    DirectoryUser {
        id: None,
        email: Some(email.to_string()),
        seat_id: Some(format!("seat-{email}")),
        last_successful_login: Some(Utc::now() - Duration::days(days_ago)),
    }
}

fn sweeper(users: Option<Vec<DirectoryUser>>, registry: Arc<Registry>) -> Arc<SeatSweeper> {
    Arc::new(SeatSweeper::new(
        Arc::new(Directory(users)),
        SeatRevoker::new(registry),
    ))
}

#[tokio::test]
async fn scheduled_sweep_uses_configured_threshold() {
    let registry = Arc::new(Registry::default());
    let sweeper = sweeper(
        Some(vec![
            stale_user("month@example.com", 31),
            stale_user("week@example.com", 8),
        ]),
        registry.clone(),
    );
    let config = JobConfig {
        threshold_days: 30.0,
        ..JobConfig::default()
    };

    let summary = run_scheduled_sweep(&sweeper, &config).await.unwrap();

    assert_eq!(summary.deleted_count, 1);
    assert_eq!(
        registry.seats.lock().unwrap().clone(),
        vec!["seat-month@example.com".to_string()]
    );
}

#[tokio::test]
async fn scheduled_sweep_swallows_fetch_failure() {
    let registry = Arc::new(Registry::default());
    let sweeper = sweeper(None, registry.clone());

    assert!(run_scheduled_sweep(&sweeper, &JobConfig::default())
        .await
        .is_none());
    assert!(registry.seats.lock().unwrap().is_empty());
}

#[tokio::test]
async fn run_sweep_now_uses_job_parameters() {
    let registry = Arc::new(Registry::default());
    let sweeper = sweeper(
        Some((0..3).map(|i| stale_user(&format!("u{i}@example.com"), 6)).collect()),
        registry.clone(),
    );

    let scheduler = assert_ok!(JobScheduler::new(sweeper, JobConfig::default()).await);
    let summary = assert_ok!(scheduler.run_sweep_now().await);

    assert_eq!(summary.inactive_count, 3);
    assert_eq!(summary.deleted_count, 3);
}

#[tokio::test]
async fn invalid_cron_fails_to_start() {
    let registry = Arc::new(Registry::default());
    let config = JobConfig {
        sweep_cron: "every day please".to_string(),
        ..JobConfig::default()
    };

    let scheduler = assert_ok!(JobScheduler::new(sweeper(Some(Vec::new()), registry), config).await);

    assert_err!(scheduler.start().await);
}
