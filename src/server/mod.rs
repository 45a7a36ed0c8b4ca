// src/server/mod.rs

//! Manual HTTP trigger.
//!
//! - `api_error`  → JSON error responses and status mapping
//! - `handlers`   → Axum handlers for the trigger, health and favicon
//! - `logging`    → Request logging middleware
//! - `routes`     → Router builder
//! - `validation` → Query parameter validation

pub mod api_error;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod validation;

pub use api_error::{ApiError, ErrorBody, ErrorCode};
pub use handlers::{
    favicon_handler, health_handler, manual_trigger_handler, AppState, TriggerParams,
    TriggerResponse,
};
pub use logging::{request_logging_middleware, HealthResponse, TriggerMode, REQUEST_ID_HEADER};
pub use routes::build_router;
pub use validation::{normalize_lookup_key, validate_not_empty, ValidationError, ValidationResult};
