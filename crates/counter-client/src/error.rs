//! Client error types

use thiserror::Error;

/// Backend call failures.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend rejected the payload
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Configuration rejected before any call was made
    #[error("Invalid backend configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
