use axum::{
    middleware,
    routing::{any, get},
    Router,
};

use crate::server::handlers::{favicon_handler, health_handler, manual_trigger_handler, AppState};
use crate::server::logging::request_logging_middleware;

/// Build the application router.
///
/// # Routes
///
/// - `GET /` - Manual trigger (`?email=` for single-target mode)
/// - `GET /health` - Health check
/// - `/favicon.ico` - Always 204, any method
///
/// Any other path falls through to the manual trigger.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(manual_trigger_handler))
        .route("/health", get(health_handler))
        .route("/favicon.ico", any(favicon_handler))
        .fallback(manual_trigger_handler)
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(state)
}
