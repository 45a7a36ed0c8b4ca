use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{SweepError, SweepResult};
use crate::revoker::{SeatRegistry, SeatRevocation};

use super::{ProviderClient, SEATS_PATH};

/// Seat registry backed by the provider's bulk PATCH endpoint.
#[derive(Debug, Clone)]
pub struct HttpSeatRegistry {
    client: Arc<ProviderClient>,
}

impl HttpSeatRegistry {
    pub fn new(client: Arc<ProviderClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SeatRegistry for HttpSeatRegistry {
    async fn disable_seats(&self, requests: &[SeatRevocation]) -> SweepResult<()> {
        let envelope = self.client.patch(SEATS_PATH, requests).await?;

        if envelope.success {
            Ok(())
        } else {
            Err(SweepError::SeatUpdateRejected {
                errors: envelope.errors,
            })
        }
    }
}
