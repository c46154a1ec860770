//! # Error Types
//!
//! The error taxonomy shared by every LOC subsystem. Subsystem crates keep
//! their own narrower errors and convert into [`LocError`] at their boundary.

use thiserror::Error;

/// Errors surfaced by LOC operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocError {
    /// A state object (or its enclosing snapshot) was used after a transition
    /// superseded it. Programming error, not retryable.
    #[error("Stale state: the LOC state was discarded by a previous transition")]
    StaleState,

    /// The backend answered with a non-2xx status.
    #[error("Backend error {status}: {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Structural problem in tokens, terms, files or transition parameters.
    /// Always raised before any ledger submission.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The ledger knows the entity but the backend companion record is missing.
    #[error("Off-chain record not found for {entity} {id}")]
    OffchainRecordNotFound {
        /// Entity kind ("collection item", "tokens record", ...).
        entity: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Every queried legal-officer node failed.
    #[error("All sources failed: {}", .failures.join("; "))]
    AllSourcesFailed {
        /// One `source: message` entry per failed node.
        failures: Vec<String>,
    },

    /// Ledger submission or query failure.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// The request never reached the backend or the response was unreadable.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The caller lacks the right to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation is not valid in the current lifecycle state.
    #[error("Invalid transition: cannot {operation} while {state}")]
    InvalidTransition {
        /// Current state or item status.
        state: String,
        /// Attempted operation.
        operation: String,
    },

    /// Fresh data described a lifecycle stage the transition cannot produce.
    #[error("Unexpected state after transition: expected {expected}, got {actual}")]
    UnexpectedState {
        /// Expected stage(s).
        expected: String,
        /// Observed stage.
        actual: String,
    },

    /// No node is registered for the given legal officer.
    #[error("Unknown legal officer: {0}")]
    UnknownLegalOfficer(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LocError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        LocError::Validation(message.into())
    }

    /// Shorthand for an invalid transition.
    pub fn invalid_transition(state: impl ToString, operation: impl Into<String>) -> Self {
        LocError::InvalidTransition {
            state: state.to_string(),
            operation: operation.into(),
        }
    }

    /// True for errors the caller may retry unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LocError::Transport(_) | LocError::AllSourcesFailed { .. } | LocError::Ledger(_)
        ) || matches!(self, LocError::Backend { status, .. } if *status >= 500)
    }
}
