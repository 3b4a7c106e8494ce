//! R2 sub-resource error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum R2Error {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid import ID: {0}")]
    InvalidImportId(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    ApiJson(#[from] fleetflow_apijson::ApiJsonError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl R2Error {
    /// True when the request body could not be encoded or decoded
    pub fn is_serialization(&self) -> bool {
        matches!(
            self,
            R2Error::Serialization(_)
                | R2Error::ApiJson(fleetflow_apijson::ApiJsonError::Serialization(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, R2Error>;
