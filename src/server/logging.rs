//! Request logging middleware for the manual trigger.
//!
//! Every request runs inside a `trigger` span carrying the request ID and
//! the [`TriggerMode`]; status and duration are recorded on the span when
//! the response is ready. The request ID is echoed in `X-Request-Id`; a
//! caller-supplied one is reused so runs can be correlated upstream.
//!
//! # Usage
//!
//! ```rust,ignore
//! use axum::middleware;
//! use seatsweep::server::logging::request_logging_middleware;
//!
//! let app = Router::new()
//!     .route("/", get(manual_trigger_handler))
//!     .layer(middleware::from_fn(request_logging_middleware));
//! ```

use axum::{
    extract::{Query, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{field, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::server::handlers::TriggerParams;

/// Header name for the request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

const MAX_REQUEST_ID_LEN: usize = 128;

/// Generate a new unique request ID.
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Caller-supplied request ID if usable, a fresh one otherwise.
pub fn request_id_for(request: &Request) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id)
}

/// What a request to the service is going to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    Sweep,
    SingleTarget,
    Health,
    Ignored,
}

impl TriggerMode {
    pub fn of(request: &Request) -> Self {
        match request.uri().path() {
            "/health" => TriggerMode::Health,
            "/favicon.ico" => TriggerMode::Ignored,
            _ => {
                let email = Query::<TriggerParams>::try_from_uri(request.uri())
                    .ok()
                    .and_then(|Query(params)| params.email);
                if email.is_some_and(|e| !e.is_empty()) {
                    TriggerMode::SingleTarget
                } else {
                    TriggerMode::Sweep
                }
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TriggerMode::Sweep => "sweep",
            TriggerMode::SingleTarget => "single_target",
            TriggerMode::Health => "health",
            TriggerMode::Ignored => "ignored",
        }
    }
}

/// Wraps each request in a `trigger` span and tags the response with its ID.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let request_id = request_id_for(&request);
    let mode = TriggerMode::of(&request);

    let span = info_span!(
        "trigger",
        request_id = %request_id,
        mode = mode.as_str(),
        method = %request.method(),
        path = %request.uri().path(),
        status = field::Empty,
        duration_ms = field::Empty,
    );

    let start = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let status = response.status();

    span.record("status", status.as_u16());
    span.record("duration_ms", start.elapsed().as_millis() as u64);
    span.in_scope(|| {
        if status.is_server_error() {
            warn!("Trigger failed");
        } else if mode != TriggerMode::Ignored {
            info!("Trigger completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Health check response structure.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "seatsweep".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
