//! HTTP workflow engine client
//!
//! POSTs start requests to `{base_url}/executions` with a bounded timeout.
//! A timeout or transport failure means no execution was durably started as
//! far as this engine is concerned; the caller surfaces it as a start
//! failure and retains no active lock.

use std::time::Duration;

use crate::{
    StartRequest, StartResponse, WorkflowEngine, WorkflowEngineConfig, WorkflowEngineError,
};

/// Real HTTP client for starting executions on the workflow engine.
pub struct HttpWorkflowEngine {
    http: reqwest::Client,
    start_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl HttpWorkflowEngine {
    /// Create a new client from configuration.
    pub fn new(config: WorkflowEngineConfig) -> Self {
        let start_url = format!("{}/executions", config.base_url.trim_end_matches('/'));
        Self {
            http: reqwest::Client::new(),
            start_url,
            api_key: config.api_key.unwrap_or_default(),
            timeout_secs: config.start_timeout_secs,
        }
    }
}

#[async_trait::async_trait]
impl WorkflowEngine for HttpWorkflowEngine {
    async fn start(&self, request: StartRequest) -> Result<StartResponse, WorkflowEngineError> {
        let response = self
            .http
            .post(&self.start_url)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WorkflowEngineError::Timeout(self.timeout_secs)
                } else {
                    WorkflowEngineError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(WorkflowEngineError::Response(format!(
                "Workflow engine returned {}: {}",
                status, body
            )));
        }

        let started: StartResponse = response
            .json()
            .await
            .map_err(|e| WorkflowEngineError::Response(e.to_string()))?;

        tracing::debug!(
            workflow = %request.workflow,
            execution_ref = %started.execution_ref,
            "Workflow execution started"
        );
        Ok(started)
    }
}
