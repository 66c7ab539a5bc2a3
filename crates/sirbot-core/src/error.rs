//! Unified error types for the sirbot core.
//!
//! This module provides the error types shared by every gateway contract.
//! Handler-level errors (like `HandlerError`) are defined in sirbot-framework.

use thiserror::Error;

// =============================================================================
// Event Errors
// =============================================================================

/// Errors that can occur while decoding an inbound platform payload.
#[derive(Debug, Clone, Error)]
pub enum EventError {
    /// The payload is not a JSON object.
    #[error("event payload is not an object")]
    NotAnObject,

    /// A required field is missing from the payload.
    #[error("event payload is missing field '{0}'")]
    MissingField(&'static str),

    /// The event id cannot be turned into a timestamp.
    #[error("invalid event timestamp '{0}'")]
    InvalidTimestamp(String),
}

// =============================================================================
// API Errors
// =============================================================================

/// Error type for chat platform API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The reaction is already present on the message.
    ///
    /// This is the only error kind the dispatch core treats as transient.
    #[error("reaction already applied")]
    AlreadyReacted,

    /// The platform answered with an error code.
    #[error("platform error: {error}")]
    Platform {
        /// Error code reported by the platform (e.g. `channel_not_found`).
        error: String,
    },

    /// The HTTP request completed with an unexpected status code.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The request could not be delivered.
    #[error("transport error: {0}")]
    Transport(String),

    /// Failed to serialize/deserialize.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Builds an error from a platform error code, recognising the codes that
    /// have a dedicated variant.
    pub fn from_code(code: impl Into<String>) -> Self {
        let code = code.into();
        match code.as_str() {
            "already_reacted" => Self::AlreadyReacted,
            _ => Self::Platform { error: code },
        }
    }

    /// Returns `true` for the duplicate-reaction error.
    pub fn is_already_reacted(&self) -> bool {
        matches!(self, Self::AlreadyReacted)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// Persistence Errors
// =============================================================================

/// Errors reported by a persistence backend.
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    /// A row with the same unique key already exists.
    #[error("duplicate key '{key}'")]
    DuplicateKey {
        /// The conflicting key.
        key: String,
    },

    /// Any other backend failure.
    #[error("persistence backend error: {0}")]
    Backend(String),
}

impl PersistenceError {
    /// Returns `true` when the error is a unique-key conflict.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for event decoding.
pub type EventResult<T> = Result<T, EventError>;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
