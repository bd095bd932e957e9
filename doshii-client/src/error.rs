//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum DoshiiError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required or token rejected
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected by the platform's validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Server-side error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token generation failed
    #[error("Token error: {0}")]
    Token(String),

    /// Event channel failure (socket task gone, subscribe refused, ...)
    #[error("Event channel error: {0}")]
    Channel(String),

    /// A pending operation is already registered under this correlation key
    #[error("Correlation key already pending: {0}")]
    CorrelationConflict(String),

    /// The confirmation event for a pending operation never arrived
    #[error("Correlation timed out for key: {0}")]
    CorrelationTimeout(String),
}

/// Result type for client operations
pub type DoshiiResult<T> = Result<T, DoshiiError>;
