//! Prometheus metrics and structured logging for the banking portal.
//!
//! - Structured logging with tracing (pretty in development, JSON in production)
//! - Prometheus counters for order submissions, notifications and module probes

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, init_logging_with, LogFormat};
pub use metrics::Metrics;
