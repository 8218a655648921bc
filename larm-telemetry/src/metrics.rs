//! ## larm-telemetry::metrics
//! **Prometheus exporter for the tick loop**
//!
//! ### Components:
//! - tick, resolved-alert, unknown-event and template-fault counters
//! - resolve latency histogram in nanoseconds

use std::time::Duration;

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};

use crate::TelemetryError;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub ticks: IntCounter,
    pub alerts_resolved: IntCounter,
    pub unknown_events: IntCounter,
    pub template_faults: IntCounter,
    pub resolve_latency: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();
        let ticks = IntCounter::new("larm_ticks_total", "Retired control-loop ticks")?;
        let alerts_resolved =
            IntCounter::new("larm_alerts_resolved_total", "Alerts returned by resolve")?;
        let unknown_events = IntCounter::new(
            "larm_unknown_events_total",
            "Inbound records naming events outside the catalog",
        )?;
        let template_faults = IntCounter::new(
            "larm_template_faults_total",
            "Generated templates replaced by the fallback alert",
        )?;
        let resolve_latency = Histogram::with_opts(
            HistogramOpts::new("larm_resolve_latency_ns", "Arbiter resolve time per tick")
                .buckets(vec![1_000.0, 10_000.0, 100_000.0, 1_000_000.0]),
        )?;

        registry.register(Box::new(ticks.clone()))?;
        registry.register(Box::new(alerts_resolved.clone()))?;
        registry.register(Box::new(unknown_events.clone()))?;
        registry.register(Box::new(template_faults.clone()))?;
        registry.register(Box::new(resolve_latency.clone()))?;

        Ok(Self {
            registry,
            ticks,
            alerts_resolved,
            unknown_events,
            template_faults,
            resolve_latency,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, TelemetryError> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// One retired tick that resolved `resolved` alerts in `latency`.
    pub fn record_tick(&self, resolved: usize, latency: Duration) {
        self.ticks.inc();
        self.alerts_resolved.inc_by(resolved as u64);
        self.resolve_latency.observe(latency.as_nanos() as f64);
    }

    pub fn add_unknown_events(&self, count: u64) {
        self.unknown_events.inc_by(count);
    }

    pub fn add_template_faults(&self, count: u64) {
        self.template_faults.inc_by(count);
    }
}
