//! Mock workflow engine implementation
//!
//! Records start requests in memory, hands out unique execution references,
//! and can be told to fail the next start to exercise start-failure
//! compensation paths. Thread-safe via `Arc<Mutex<>>`.

use crate::{StartRequest, StartResponse, WorkflowEngine, WorkflowEngineError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// A start request as recorded by the mock, with the ref it was given.
#[derive(Debug, Clone)]
pub struct RecordedStart {
    pub request: StartRequest,
    pub execution_ref: String,
}

/// Mock workflow engine that records starts for test assertions.
#[derive(Debug, Clone, Default)]
pub struct MockWorkflowEngine {
    starts: Arc<Mutex<Vec<RecordedStart>>>,
    fail_next: Arc<AtomicBool>,
}

impl MockWorkflowEngine {
    /// Create a new mock workflow engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return all recorded start requests.
    pub fn recorded_starts(&self) -> Vec<RecordedStart> {
        self.starts
            .lock()
            .expect("starts lock poisoned")
            .clone()
    }

    /// Clear recorded starts.
    pub fn reset(&self) {
        self.starts
            .lock()
            .expect("starts lock poisoned")
            .clear();
        self.fail_next.store(false, Ordering::SeqCst);
    }

    /// Make the next start fail with a request error (one-shot).
    pub fn fail_next_start(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl WorkflowEngine for MockWorkflowEngine {
    async fn start(&self, request: StartRequest) -> Result<StartResponse, WorkflowEngineError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(WorkflowEngineError::Request(
                "mock workflow engine: simulated start failure".to_string(),
            ));
        }

        let execution_ref = format!("exec-{}", uuid::Uuid::new_v4());
        tracing::debug!(
            workflow = %request.workflow,
            execution_ref = %execution_ref,
            "Mock workflow engine: recording start"
        );

        self.starts
            .lock()
            .map_err(|e| WorkflowEngineError::Request(format!("starts lock poisoned: {e}")))?
            .push(RecordedStart {
                request,
                execution_ref: execution_ref.clone(),
            });

        Ok(StartResponse { execution_ref })
    }
}
