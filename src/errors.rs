//! Error types shared by the sweep engine, the provider client and the
//! trigger layers.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors that abort a run or reject its inputs.
///
/// Only directory failures are fatal to a sweep. Seat registry failures are
/// converted into [`BatchRevocationError`] by the revoker and never escape a
/// run through this type.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The directory service answered but did not report success.
    ///
    /// `errors` is the service-reported payload, kept verbatim.
    #[error("error fetching users: {errors}")]
    DirectoryFetch { errors: Value },

    /// The seat registry answered a bulk update without reporting success.
    #[error("seat update rejected: {errors}")]
    SeatUpdateRejected { errors: Value },

    /// Single-target lookup found no directory user with this email.
    #[error("User with email {email} not found.")]
    UserNotFound { email: String },

    /// Transport-level failure talking to the provider.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a body that could not be decoded.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Caller-supplied arguments were rejected before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SweepError {
    /// Provider error payload suitable for surfacing to an operator.
    ///
    /// Returns the raw `errors` array for rejections, and a JSON string with
    /// the error message for everything else.
    pub fn detail(&self) -> Value {
        match self {
            SweepError::DirectoryFetch { errors } | SweepError::SeatUpdateRejected { errors } => {
                errors.clone()
            }
            other => Value::String(other.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SweepError::UserNotFound { .. })
    }
}

pub type SweepResult<T> = Result<T, SweepError>;

/// A single batch whose bulk seat update did not succeed.
///
/// Recovered locally: the batch is excluded from the deleted count and the
/// remaining batches still run.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("batch {batch_index} (starting at index {start_index}, {size} seats) failed: {detail}")]
pub struct BatchRevocationError {
    pub batch_index: usize,
    pub start_index: usize,
    pub size: usize,
    pub detail: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn directory_fetch_keeps_payload_verbatim() {
        let payload = json!([{ "code": 10000, "message": "Authentication error" }]);
        let err = SweepError::DirectoryFetch {
            errors: payload.clone(),
        };

        assert_eq!(err.detail(), payload);
        assert!(err.to_string().contains("Authentication error"));
    }

    #[test]
    fn not_found_message_names_the_email() {
        let err = SweepError::UserNotFound {
            email: "ghost@example.com".to_string(),
        };

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "User with email ghost@example.com not found.");
    }

    #[test]
    fn batch_error_serializes_camel_case() {
        let err = BatchRevocationError {
            batch_index: 1,
            start_index: 50,
            size: 50,
            detail: json!([{ "code": 7003 }]),
        };

        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["batchIndex"], 1);
        assert_eq!(value["startIndex"], 50);
        assert_eq!(value["detail"][0]["code"], 7003);
    }
}
