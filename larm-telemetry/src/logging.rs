//! ## larm-telemetry::logging
//! **Structured logging with tracing and OpenTelemetry attributes**
//!
//! ### Expectations:
//! - `RUST_LOG` overrides the configured level
//! - Installing twice is an error, never a panic
//! - Panics recovered by the arbiter log one `error` line instead of a stderr backtrace

use opentelemetry::KeyValue;
use tracing::{error, info_span};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use crate::TelemetryError;

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global `fmt` subscriber with `level` as the default filter.
    pub fn init(level: &str) -> Result<(), TelemetryError> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(level).map_err(|e| TelemetryError::Filter {
                filter: level.to_string(),
                reason: e.to_string(),
            })?,
        };

        fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .try_init()
            .map_err(|e| TelemetryError::Subscriber(e.to_string()))
    }

    /// Replaces the default panic hook with one that logs through `tracing`.
    ///
    /// The arbiter catches generator panics and substitutes the fallback
    /// alert; with the default hook each of those panics would also print a
    /// message and backtrace to stderr on every tick.
    pub fn route_panics() {
        std::panic::set_hook(Box::new(|info| {
            let payload = info.payload();
            let message = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("non-string payload");
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_default();
            error!(panic = message, location = %location, "Panic caught");
        }));
    }

    #[inline]
    pub fn log_event(event_type: &str, metadata: &[KeyValue]) {
        let span = info_span!(
            "alert_event",
            event_type = event_type,
            otel.kind = "INTERNAL"
        );

        span.in_scope(|| {
            tracing::info!(
                metadata = ?metadata,
                "Alert event recorded"
            );
        });
    }
}
