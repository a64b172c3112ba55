use thiserror::Error;

use crate::cache::KeyError;
use crate::config::ConfigError;

/// Application-wide error type for the maintenance commands.
///
/// Cache operations themselves never fail their callers; these errors come
/// from configuration, key validation and setup.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A key, prefix or namespace name was rejected
    #[error("Invalid cache key: {0}")]
    Key(#[from] KeyError),

    /// Named namespace is not configured
    #[error("Unknown namespace '{name}'. Configured namespaces: {known}")]
    UnknownNamespace { name: String, known: String },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
