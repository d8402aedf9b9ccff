//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reference data error: {0}")]
    Core(#[from] portal_core::CoreError),

    #[error("Order error: {0}")]
    Oms(#[from] portal_oms::OmsError),

    #[error("Registry error: {0}")]
    Registry(#[from] portal_registry::RegistryError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] portal_telemetry::TelemetryError),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

pub type AppResult<T> = Result<T, AppError>;
