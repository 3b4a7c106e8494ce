//! API JSON error types

use thiserror::Error;

/// Errors raised while encoding or decoding API JSON
#[derive(Error, Debug)]
pub enum ApiJsonError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid RFC 3339 timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("API error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ApiJsonError>;
