use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::SweepConfig;
use crate::engine::SeatSweeper;
use crate::report::RunSummary;
use crate::server::api_error::ApiError;
use crate::server::logging::HealthResponse;
use crate::server::validation::normalize_lookup_key;

/// Shared application state for handlers.
#[derive(Clone)]
pub struct AppState {
    pub sweeper: Arc<SeatSweeper>,
    /// Threshold and batch size used by manual sweeps
    pub sweep: SweepConfig,
}

/// Query parameters of the manual trigger.
#[derive(Debug, Default, Deserialize)]
pub struct TriggerParams {
    /// Revoke only this user, bypassing the inactivity check
    pub email: Option<String>,
}

/// Response of a successful manual run.
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: RunSummary,
}

/// Handler for the manual trigger.
///
/// Without `email` (or with an empty one) the whole directory is swept.
/// With `email`, only the user whose key matches (ignoring case) is revoked;
/// an unknown key yields 404 and no revocation request is sent. A blank key
/// yields 400.
pub async fn manual_trigger_handler(
    State(state): State<AppState>,
    Query(params): Query<TriggerParams>,
) -> Result<Json<TriggerResponse>, ApiError> {
    let email = params.email.filter(|e| !e.is_empty());

    let response = match email {
        Some(email) => {
            let email = normalize_lookup_key(&email, "email")?;
            info!(email = %email, "Manual single-target revocation requested");

            let summary = state.sweeper.run_single_target(email).await?;
            TriggerResponse {
                message: format!("User with email {} processed for deletion", email),
                summary,
            }
        }
        None => {
            info!(
                threshold_days = state.sweep.threshold_days,
                batch_size = state.sweep.batch_size,
                "Manual sweep requested"
            );

            let summary = state
                .sweeper
                .run_sweep(state.sweep.threshold_days, state.sweep.batch_size)
                .await?;
            TriggerResponse {
                message: "Inactive users processed (Manual)".to_string(),
                summary,
            }
        }
    };

    Ok(Json(response))
}

/// Browsers request this on every manual trigger; answer without running anything.
pub async fn favicon_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
