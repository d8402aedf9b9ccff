//! Error types for portal-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Unknown value for {field}: {value}")]
    UnknownVariant { field: &'static str, value: String },

    #[error("Reference data error: {0}")]
    ReferenceData(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
