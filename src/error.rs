//! Error types for the scorebox service

use thiserror::Error;

/// Result type alias for scorebox operations
pub type Result<T> = std::result::Result<T, ScoreboxError>;

/// Main error type for the scorebox service
#[derive(Error, Debug)]
pub enum ScoreboxError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Artifact fetch error: {0}")]
    FetchError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for ScoreboxError {
    fn from(err: polars::error::PolarsError) -> Self {
        ScoreboxError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ScoreboxError {
    fn from(err: serde_json::Error) -> Self {
        ScoreboxError::SerializationError(err.to_string())
    }
}

impl From<sqlx::Error> for ScoreboxError {
    fn from(err: sqlx::Error) -> Self {
        ScoreboxError::StorageError(err.to_string())
    }
}

impl From<reqwest::Error> for ScoreboxError {
    fn from(err: reqwest::Error) -> Self {
        ScoreboxError::FetchError(err.to_string())
    }
}
