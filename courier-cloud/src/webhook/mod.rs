//! Drivers webhook (realtime "work available" broadcast)

use async_trait::async_trait;
use tracing::instrument;

use crate::pipeline::{BroadcastError, DriverBroadcaster, WorkAvailable};

/// Posts availability events to a realtime relay
#[derive(Debug, Clone)]
pub struct HttpBroadcaster {
    client: reqwest::Client,
    url: String,
}

impl HttpBroadcaster {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl DriverBroadcaster for HttpBroadcaster {
    fn is_enabled(&self) -> bool {
        true
    }

    #[instrument(skip(self, event), fields(url = %self.url, order_id = %event.order_id))]
    async fn broadcast(&self, event: &WorkAvailable) -> Result<(), BroadcastError> {
        let resp = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| BroadcastError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Drivers webhook accepted");
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(BroadcastError::Http {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Used when no webhook URL is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBroadcaster;

#[async_trait]
impl DriverBroadcaster for NoopBroadcaster {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn broadcast(&self, _event: &WorkAvailable) -> Result<(), BroadcastError> {
        Ok(())
    }
}
