//! Wardrobe Event Bus
//!
//! Best-effort fan-out of engagement and moderation events for downstream
//! analytics. Supports:
//! - An HTTP event API client for production
//! - A mock bus that records events for testing and development
//! - Configurable provider and base URL
//!
//! Delivery is not guaranteed; callers treat publish failures as a secondary
//! signal and never roll back persisted state because of them.

pub mod client;
pub mod mock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventBusError {
    #[error("Event bus configuration error: {0}")]
    Configuration(String),

    #[error("Event bus request error: {0}")]
    Request(String),

    #[error("Event bus response error: {0}")]
    Response(String),
}

/// An event to publish on the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusEvent {
    /// Namespaced event name, e.g. "closet/engagement.liked"
    pub name: String,
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

impl BusEvent {
    pub fn new(name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            data,
            id: None,
            ts: Some(chrono::Utc::now().timestamp_millis()),
        }
    }
}

/// Event bus configuration.
#[derive(Clone)]
pub struct EventBusConfig {
    /// Bus provider (http, mock)
    pub provider: String,
    /// Base URL for the HTTP event API
    pub base_url: String,
    /// Optional API key for authenticating with the event API
    pub api_key: Option<String>,
}

impl std::fmt::Debug for EventBusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBusConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl EventBusConfig {
    /// Create event bus config from environment variables.
    pub fn from_env() -> Result<Self, EventBusError> {
        let provider = std::env::var("EVENT_BUS_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let base_url = std::env::var("EVENT_BUS_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8289".to_string());
        let api_key = std::env::var("EVENT_BUS_API_KEY").ok();

        if provider == "http" && api_key.is_none() {
            return Err(EventBusError::Configuration(
                "EVENT_BUS_API_KEY is required for the http provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            base_url,
            api_key,
        })
    }
}

/// Event bus trait for different implementations.
#[async_trait::async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a single event to the bus.
    async fn publish(&self, event: BusEvent) -> Result<(), EventBusError>;
}

/// Factory for creating EventBus implementations.
pub struct EventBusFactory;

impl EventBusFactory {
    /// Create an EventBus based on configuration.
    pub fn create(config: EventBusConfig) -> Result<Box<dyn EventBus>, EventBusError> {
        match config.provider.as_str() {
            "http" => {
                tracing::info!("Creating HTTP event bus client");
                if config.api_key.is_none() {
                    return Err(EventBusError::Configuration(
                        "EVENT_BUS_API_KEY is required for the http provider".to_string(),
                    ));
                }
                Ok(Box::new(client::HttpEventBus::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock event bus");
                Ok(Box::new(mock::MockEventBus::new()))
            }
            provider => Err(EventBusError::Configuration(format!(
                "Unknown event bus provider: {}. Supported providers: http, mock",
                provider
            ))),
        }
    }
}
