//! Mock event bus implementation
//!
//! Stores published events in memory for test assertions and can be told to
//! fail the next publish to exercise best-effort delivery paths.
//! Thread-safe via `Arc<Mutex<>>`.

use crate::{BusEvent, EventBus, EventBusError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock event bus that records events for test assertions.
#[derive(Debug, Clone, Default)]
pub struct MockEventBus {
    events: Arc<Mutex<Vec<BusEvent>>>,
    fail_next: Arc<AtomicBool>,
}

impl MockEventBus {
    /// Create a new mock event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return all recorded events.
    pub fn recorded_events(&self) -> Vec<BusEvent> {
        self.events
            .lock()
            .expect("events lock poisoned")
            .clone()
    }

    /// Clear all recorded events.
    pub fn reset(&self) {
        self.events
            .lock()
            .expect("events lock poisoned")
            .clear();
        self.fail_next.store(false, Ordering::SeqCst);
    }

    /// Make the next publish fail with a request error (one-shot).
    pub fn fail_next_publish(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl EventBus for MockEventBus {
    async fn publish(&self, event: BusEvent) -> Result<(), EventBusError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(EventBusError::Request(
                "mock event bus: simulated publish failure".to_string(),
            ));
        }

        tracing::debug!(event_name = %event.name, "Mock event bus: recording event");
        self.events
            .lock()
            .map_err(|e| EventBusError::Request(format!("events lock poisoned: {e}")))?
            .push(event);
        Ok(())
    }
}
