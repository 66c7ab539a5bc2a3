//! Error types for the sirbot framework.

use thiserror::Error;
use tower::BoxError;

use sirbot_core::{ApiError, EventError, PersistenceError};

/// Errors a command handler can return.
///
/// The dispatcher treats [`is_transient`](Self::is_transient) errors as a
/// no-op; every other error is a failure that is logged and reported, but
/// never stops the remaining handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Chat platform API failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Persistence backend failure.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The event could not be interpreted.
    #[error(transparent)]
    Event(#[from] EventError),

    /// An outbound payload could not be encoded.
    #[error("failed to encode payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The event lacks a field the handler needs.
    #[error("event has no '{0}'")]
    MissingField(&'static str),
}

impl HandlerError {
    /// Returns `true` for recognized transient platform errors.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_already_reacted())
    }
}

/// Returns `true` if a boxed service error wraps a transient [`HandlerError`].
pub fn is_transient(err: &BoxError) -> bool {
    err.downcast_ref::<HandlerError>()
        .is_some_and(HandlerError::is_transient)
}

/// Result type returned by command handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Errors raised while building the handler registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A registration pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for registry construction.
pub type RegistryResult<T> = Result<T, RegistryError>;
