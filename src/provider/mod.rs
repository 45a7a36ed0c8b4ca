//! HTTP adapter for the directory + seat registry provider.
//!
//! Every provider response is wrapped in the same envelope:
//!
//! ```json
//! { "success": true, "result": [...], "errors": [], "result_info": { "total_pages": 3 } }
//! ```
//!
//! The `success` flag is authoritative. A non-2xx status with a decodable
//! envelope is handled like any other `success: false` answer.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use std::sync::Arc;

use crate::config::{ProviderConfig, SeatsweepConfig};
use crate::engine::SeatSweeper;
use crate::errors::{SweepError, SweepResult};
use crate::revoker::SeatRevoker;

mod directory;
mod seats;

pub use directory::HttpDirectoryReader;
pub use seats::HttpSeatRegistry;

/// Path of the directory listing, relative to the account URL.
pub const USERS_PATH: &str = "access/users";

/// Path of the bulk seat update, relative to the account URL.
pub const SEATS_PATH: &str = "access/seats";

fn empty_errors() -> Value {
    Value::Array(Vec::new())
}

/// Response envelope shared by all provider endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub result: Option<T>,
    #[serde(default = "empty_errors")]
    pub errors: Value,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

/// Pagination metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultInfo {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub count: Option<u32>,
    pub total_count: Option<u32>,
    pub total_pages: Option<u32>,
}

/// Thin reqwest wrapper that knows the account URL and auth headers.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: Client,
    base_url: String,
    account_id: String,
    auth_email: String,
    api_key: String,
    per_page: u32,
}

impl ProviderClient {
    pub fn new(config: &ProviderConfig) -> SweepResult<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            auth_email: config.auth_email.clone(),
            api_key: config.api_key.clone(),
            per_page: config.per_page,
        })
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// `{base}/accounts/{account_id}/{path}`
    pub fn account_url(&self, path: &str) -> String {
        format!("{}/accounts/{}/{}", self.base_url, self.account_id, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Auth-Email", &self.auth_email)
            .header("X-Auth-Key", &self.api_key)
            .header("Content-Type", "application/json")
    }

    /// GET one page of a listing endpoint.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
    ) -> SweepResult<ApiEnvelope<T>> {
        let request = self
            .http
            .get(self.account_url(path))
            .query(&[("page", page), ("per_page", self.per_page)]);

        let response = self.authorized(request).send().await?;
        decode(response).await
    }

    /// PATCH `body` as JSON.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SweepResult<ApiEnvelope<Value>> {
        let request = self.http.patch(self.account_url(path)).json(body);

        let response = self.authorized(request).send().await?;
        decode(response).await
    }
}

/// Wire the engine to the provider described by `config`.
pub fn build_sweeper(config: &SeatsweepConfig) -> SweepResult<SeatSweeper> {
    let client = Arc::new(ProviderClient::new(&config.provider)?);
    let directory = Arc::new(HttpDirectoryReader::new(Arc::clone(&client)));
    let registry = Arc::new(HttpSeatRegistry::new(client));
    let revoker = SeatRevoker::with_concurrency(registry, config.sweep.max_concurrent_batches);

    Ok(SeatSweeper::new(directory, revoker))
}

async fn decode<T: DeserializeOwned>(response: Response) -> SweepResult<ApiEnvelope<T>> {
    let status = response.status();
    let body = response.bytes().await?;

    serde_json::from_slice::<ApiEnvelope<T>>(&body).map_err(|e| {
        SweepError::InvalidResponse(format!(
            "HTTP {}: failed to parse provider response: {e}",
            status.as_u16()
        ))
    })
}
