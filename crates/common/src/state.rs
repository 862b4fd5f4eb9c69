//! Common state machine error types
//!
//! Shared across domain crates that implement state machines.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot apply {event} while in {from}")]
    InvalidTransition { from: String, event: String },

    #[error("Guard condition failed: {0}")]
    GuardFailed(String),

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

impl From<StateError> for crate::Error {
    fn from(err: StateError) -> Self {
        match err {
            StateError::InvalidTransition { from, event } => crate::Error::InvalidTransition {
                event,
                status: from,
            },
            StateError::GuardFailed(msg) => crate::Error::Validation(msg),
            StateError::TerminalState(state) => crate::Error::InvalidTransition {
                event: "transition".to_string(),
                status: state,
            },
        }
    }
}
