//! Wardrobe Workflow Engine Client
//!
//! Starts named long-running workflow executions on an external engine:
//! - HTTP client for production, with a bounded start timeout
//! - Mock engine for testing and development, with programmable failures
//! - Configurable provider, base URL, and timeout
//!
//! Starting is fire-and-forget: the engine reports completion later through
//! an out-of-band callback carrying the execution reference. Nothing in this
//! crate blocks on a workflow finishing.

pub mod client;
pub mod mock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowEngineError {
    #[error("Workflow engine configuration error: {0}")]
    Configuration(String),

    #[error("Workflow engine request error: {0}")]
    Request(String),

    #[error("Workflow engine response error: {0}")]
    Response(String),

    #[error("Workflow engine start timed out after {0}s")]
    Timeout(u64),
}

/// Request to start a workflow execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    /// Workflow definition name, e.g. "closet-approval"
    pub workflow: String,
    pub input: serde_json::Value,
}

/// Response from a successful start call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResponse {
    /// Opaque handle identifying the execution on the engine
    pub execution_ref: String,
}

/// Workflow engine configuration.
#[derive(Clone)]
pub struct WorkflowEngineConfig {
    /// Engine provider (http, mock)
    pub provider: String,
    /// Base URL for the engine's start API
    pub base_url: String,
    /// Optional API key for authenticating start calls
    pub api_key: Option<String>,
    /// Bound on the start call, in seconds
    pub start_timeout_secs: u64,
}

impl std::fmt::Debug for WorkflowEngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngineConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("start_timeout_secs", &self.start_timeout_secs)
            .finish()
    }
}

impl WorkflowEngineConfig {
    /// Create workflow engine config from environment variables.
    pub fn from_env() -> Result<Self, WorkflowEngineError> {
        let provider = std::env::var("WORKFLOW_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let base_url = std::env::var("WORKFLOW_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8288".to_string());
        let api_key = std::env::var("WORKFLOW_API_KEY").ok();
        let start_timeout_secs = std::env::var("WORKFLOW_START_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        if provider == "http" && api_key.is_none() {
            return Err(WorkflowEngineError::Configuration(
                "WORKFLOW_API_KEY is required for the http provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            base_url,
            api_key,
            start_timeout_secs,
        })
    }
}

/// Workflow engine trait for different implementations.
#[async_trait::async_trait]
pub trait WorkflowEngine: Send + Sync {
    /// Start a named workflow and return the execution reference.
    ///
    /// Completion is reported later via an out-of-band callback; this call
    /// only covers the start handshake.
    async fn start(&self, request: StartRequest) -> Result<StartResponse, WorkflowEngineError>;
}

/// Factory for creating WorkflowEngine implementations.
pub struct WorkflowEngineFactory;

impl WorkflowEngineFactory {
    /// Create a WorkflowEngine based on configuration.
    pub fn create(
        config: WorkflowEngineConfig,
    ) -> Result<Box<dyn WorkflowEngine>, WorkflowEngineError> {
        match config.provider.as_str() {
            "http" => {
                tracing::info!("Creating HTTP workflow engine client");
                if config.api_key.is_none() {
                    return Err(WorkflowEngineError::Configuration(
                        "WORKFLOW_API_KEY is required for the http provider".to_string(),
                    ));
                }
                Ok(Box::new(client::HttpWorkflowEngine::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock workflow engine");
                Ok(Box::new(mock::MockWorkflowEngine::new()))
            }
            provider => Err(WorkflowEngineError::Configuration(format!(
                "Unknown workflow engine provider: {}. Supported providers: http, mock",
                provider
            ))),
        }
    }
}
