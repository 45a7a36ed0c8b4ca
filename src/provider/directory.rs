use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::directory::{DirectoryReader, DirectoryUser};
use crate::errors::{SweepError, SweepResult};

use super::{ProviderClient, USERS_PATH};

/// Directory user as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    seat_uid: Option<String>,
    #[serde(default)]
    last_successful_login: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Unparseable timestamps count as "never seen".
fn parse_login(raw: Option<String>, user_id: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = non_empty(raw)?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!(
                user_id = user_id.unwrap_or("unknown"),
                value = %raw,
                "Ignoring unparseable last_successful_login: {}",
                e
            );
            None
        }
    }
}

impl From<ApiUser> for DirectoryUser {
    fn from(user: ApiUser) -> Self {
        let last_successful_login = parse_login(user.last_successful_login, user.id.as_deref());
        Self {
            id: non_empty(user.id),
            email: non_empty(user.email),
            seat_id: non_empty(user.seat_uid),
            last_successful_login,
        }
    }
}

/// Reads the full directory, following pagination.
#[derive(Debug, Clone)]
pub struct HttpDirectoryReader {
    client: Arc<ProviderClient>,
}

impl HttpDirectoryReader {
    pub fn new(client: Arc<ProviderClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectoryReader for HttpDirectoryReader {
    async fn fetch(&self) -> SweepResult<Vec<DirectoryUser>> {
        let mut users = Vec::new();
        let mut page = 1;

        loop {
            let envelope = self.client.get_page::<Vec<ApiUser>>(USERS_PATH, page).await?;

            if !envelope.success {
                return Err(SweepError::DirectoryFetch {
                    errors: envelope.errors,
                });
            }

            let batch = envelope.result.unwrap_or_default();
            let fetched = batch.len();
            users.extend(batch.into_iter().map(DirectoryUser::from));

            let total_pages = envelope
                .result_info
                .and_then(|info| info.total_pages)
                .unwrap_or(1);

            debug!(page, total_pages, fetched, "Fetched directory page");

            if page >= total_pages || fetched == 0 {
                break;
            }
            page += 1;
        }

        info!(total_users = users.len(), "Fetched directory snapshot");
        Ok(users)
    }
}
