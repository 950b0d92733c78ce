//! Helpdesk error types.

use thiserror::Error;

/// Errors raised by schema lookups, record access and list resolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeskError {
    /// Caller lacks the requested right on a doctype
    #[error("User '{user}' does not have {ptype} permission on '{doctype}'")]
    PermissionDenied {
        user: String,
        doctype: String,
        ptype: &'static str,
    },

    /// Doctype not registered in the schema registry
    #[error("DocType '{doctype}' not found")]
    DocTypeNotFound { doctype: String },

    /// Record not found in a doctype
    #[error("{doctype} '{name}' not found")]
    RecordNotFound { doctype: String, name: String },

    /// Malformed filter, order-by, column or row input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Insert of a record whose name is already taken
    #[error("{doctype} '{name}' already exists")]
    DuplicateEntry { doctype: String, name: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Lock poisoned (RwLock poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,

    /// I/O error during persistence
    #[error("I/O error: {0}")]
    IoError(String),

    /// Transient I/O error that may succeed on retry
    #[error("Transient I/O error: {0}")]
    TransientIoError(String),

    /// Data corruption detected
    #[error("Data corruption detected: {0}")]
    DataCorruption(String),
}

impl DeskError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        DeskError::ValidationError(message.into())
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        DeskError::SerializationError(e.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DeskError>;
