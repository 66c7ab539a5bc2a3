//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;
use sirbot_framework::RegistryError;

/// Errors that can occur while assembling or running the bot.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A handler pattern failed to compile.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The database pool could not be created.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The database URL uses a scheme no store supports.
    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
