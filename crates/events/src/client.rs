//! HTTP event bus client
//!
//! POSTs events to the bus ingest endpoint at `{base_url}/events`.

use crate::{BusEvent, EventBus, EventBusConfig, EventBusError};

/// Real HTTP client for publishing events to the bus ingest API.
pub struct HttpEventBus {
    http: reqwest::Client,
    ingest_url: String,
    api_key: String,
}

impl HttpEventBus {
    /// Create a new client from configuration.
    pub fn new(config: EventBusConfig) -> Self {
        let ingest_url = format!("{}/events", config.base_url.trim_end_matches('/'));
        Self {
            http: reqwest::Client::new(),
            ingest_url,
            api_key: config.api_key.unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl EventBus for HttpEventBus {
    async fn publish(&self, event: BusEvent) -> Result<(), EventBusError> {
        let response = self
            .http
            .post(&self.ingest_url)
            .bearer_auth(&self.api_key)
            .json(&event)
            .send()
            .await
            .map_err(|e| EventBusError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(EventBusError::Response(format!(
                "Event bus returned {}: {}",
                status, body
            )));
        }

        tracing::debug!(event_name = %event.name, "Event published successfully");
        Ok(())
    }
}
