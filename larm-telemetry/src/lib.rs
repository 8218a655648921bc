//! # Larm Telemetry
//!
//! Subscriber setup, structured alert-event logging and Prometheus metrics.

pub mod logging;
pub mod metrics;

use thiserror::Error;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter `{filter}`: {reason}")]
    Filter { filter: String, reason: String },

    #[error("Failed to install tracing subscriber: {0}")]
    Subscriber(String),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Metrics output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
