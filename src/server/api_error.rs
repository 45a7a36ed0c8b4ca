//! Standardized API error responses for the manual trigger.
//!
//! # Response Format
//!
//! ```json
//! {
//!   "error": {
//!     "code": "USER_NOT_FOUND",
//!     "message": "User with email ghost@example.com not found.",
//!     "details": null
//!   }
//! }
//! ```
//!
//! `details` carries the raw provider error payload for upstream failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::SweepError;
use crate::server::validation::ValidationError;

/// Machine-readable error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // === Lookup Errors (404) ===
    /// Single-target email is not in the directory
    UserNotFound,

    // === Validation Errors (400) ===
    /// Request parameters are invalid
    InvalidRequest,
    /// A field value is invalid
    InvalidField,

    // === Upstream Errors (500) ===
    /// The directory service did not report success
    DirectoryFetchFailed,
    /// The seat registry did not report success
    SeatUpdateRejected,
    /// Transport failure talking to the provider
    NetworkError,
    /// The provider answered with an undecodable body
    InvalidUpstreamResponse,

    // === Server Errors (500) ===
    /// Server configuration error
    ConfigError,
    /// Unexpected internal server error
    InternalError,
}

impl ErrorCode {
    /// Returns the HTTP status code for this error code.
    ///
    /// Every hard failure of a run maps to 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::UserNotFound => StatusCode::NOT_FOUND,

            ErrorCode::InvalidRequest | ErrorCode::InvalidField => StatusCode::BAD_REQUEST,

            ErrorCode::DirectoryFetchFailed
            | ErrorCode::SeatUpdateRejected
            | ErrorCode::NetworkError
            | ErrorCode::InvalidUpstreamResponse
            | ErrorCode::ConfigError
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a default human-readable message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::InvalidRequest => "Request parameters are invalid",
            ErrorCode::InvalidField => "A field value is invalid",
            ErrorCode::DirectoryFetchFailed => "Error fetching users",
            ErrorCode::SeatUpdateRejected => "Seat update was rejected",
            ErrorCode::NetworkError => "Failed to communicate with the provider",
            ErrorCode::InvalidUpstreamResponse => "Provider returned an invalid response",
            ErrorCode::ConfigError => "Server configuration error",
            ErrorCode::InternalError => "An unexpected error occurred",
        }
    }
}

/// The inner error object containing code, message, and optional details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Standardized API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

impl ApiError {
    /// Creates a new API error with the default message for `code`.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: code.default_message().to_string(),
                details: None,
            },
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.error.code.status_code()
    }

    /// Invalid request error with field details.
    pub fn invalid_field(field: &str, reason: &str) -> Self {
        Self::with_details(
            ErrorCode::InvalidField,
            format!("Invalid value for '{}': {}", field, reason),
            serde_json::json!({ "field": field }),
        )
    }

    pub fn internal_error() -> Self {
        Self::new(ErrorCode::InternalError)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.error.code.default_message(),
            self.error.message
        )
    }
}

impl std::error::Error for ApiError {}

impl From<SweepError> for ApiError {
    fn from(err: SweepError) -> Self {
        let message = err.to_string();
        match err {
            SweepError::UserNotFound { .. } => {
                ApiError::with_message(ErrorCode::UserNotFound, message)
            }
            SweepError::DirectoryFetch { errors } => {
                ApiError::with_details(ErrorCode::DirectoryFetchFailed, message, errors)
            }
            SweepError::SeatUpdateRejected { errors } => {
                ApiError::with_details(ErrorCode::SeatUpdateRejected, message, errors)
            }
            SweepError::Network(_) => ApiError::with_message(ErrorCode::NetworkError, message),
            SweepError::InvalidResponse(_) => {
                ApiError::with_message(ErrorCode::InvalidUpstreamResponse, message)
            }
            SweepError::InvalidArgument(_) => {
                ApiError::with_message(ErrorCode::InvalidRequest, message)
            }
            SweepError::Config(_) => ApiError::with_message(ErrorCode::ConfigError, message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::invalid_field(&err.field, &err.message)
    }
}
