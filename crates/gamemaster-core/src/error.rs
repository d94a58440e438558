//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A session was not found in the store.
    #[error("session not found: {0}")]
    NotFound(Uuid),

    /// Game settings were rejected before a session could be created.
    #[error("invalid settings: {field}: {message}")]
    InvalidSettings {
        /// The offending settings field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A pointer does not address any step of the current script.
    #[error("pointer ({phase_index}, {step_index}) does not address a step")]
    InvalidPointer {
        /// Phase index of the rejected pointer.
        phase_index: usize,
        /// Step index of the rejected pointer.
        step_index: usize,
    },

    /// A subflow was entered while another one is still active.
    #[error("subflow conflict: '{active}' is already active")]
    SubflowConflict {
        /// Label of the subflow that is currently active.
        active: String,
    },

    /// The session no longer accepts navigation.
    #[error("session {0} is closed")]
    SessionClosed(Uuid),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidSettings`].
    #[must_use]
    pub fn invalid_settings(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            field: field.into(),
            message: message.into(),
        }
    }
}
