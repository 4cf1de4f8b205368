//! Error types for the cache exercises
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for store access, value coercion and page fetching.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Backing store could not be reached
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Backing store rejected a command
    #[error("Store operation failed: {0}")]
    Store(String),

    /// Stored bytes could not be coerced to the requested type
    #[error("Value conversion failed: {0}")]
    ValueConversion(String),

    /// Page fetch failed before a body was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// Writing diagnostic output failed
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
            CacheError::Connection(err.to_string())
        } else {
            CacheError::Store(err.to_string())
        }
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Io(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
