//! Directory snapshot types and the reader seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::SweepResult;

/// Placeholder reported for users without an email.
pub const UNKNOWN_EMAIL: &str = "Unknown";

/// Placeholder reported for users without a seat identifier.
pub const UNAVAILABLE_SEAT: &str = "unavailable";

/// One record of the directory snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryUser {
    pub id: Option<String>,
    pub email: Option<String>,
    pub seat_id: Option<String>,
    /// `None` means the user was never observed active.
    pub last_successful_login: Option<DateTime<Utc>>,
}

impl DirectoryUser {
    pub fn email_or_unknown(&self) -> &str {
        self.email.as_deref().unwrap_or(UNKNOWN_EMAIL)
    }

    pub fn seat_id_or_unavailable(&self) -> &str {
        self.seat_id.as_deref().unwrap_or(UNAVAILABLE_SEAT)
    }

    /// Case-insensitive email comparison. Users without an email never match.
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == email.to_lowercase())
    }
}

/// Minimal projection handed from the classifier to the revoker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InactiveCandidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    pub seat_id: String,
}

impl From<&DirectoryUser> for InactiveCandidate {
    fn from(user: &DirectoryUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email_or_unknown().to_string(),
            seat_id: user.seat_id_or_unavailable().to_string(),
        }
    }
}

/// Source of the full directory snapshot.
///
/// A failed fetch aborts the run; implementations must not return a partial
/// user set.
#[async_trait]
pub trait DirectoryReader: Send + Sync {
    async fn fetch(&self) -> SweepResult<Vec<DirectoryUser>>;
}
