//! Replay module.
//!
//! Loads a scenario file, runs it through a fresh [`TickDriver`] and checks
//! the resulting state hash against an expected value.

use std::path::Path;

use larm_telemetry::MetricsRecorder;
use tracing::info;

use crate::driver::{SimulationReport, StockArbiter, TickDriver};
use crate::scenario::Scenario;
use crate::ScenarioError;

/// Runs `scenario` and, when given, compares the hash with `expected_hash`.
pub fn replay(
    scenario: &Scenario,
    arbiter: StockArbiter,
    expected_hash: Option<&str>,
    metrics: Option<MetricsRecorder>,
) -> Result<SimulationReport, ScenarioError> {
    let compiled = scenario.compile(arbiter.catalog())?;
    let mut driver = TickDriver::new(arbiter);
    if let Some(metrics) = metrics {
        driver = driver.with_metrics(metrics);
    }
    let report = driver.run(&compiled);

    if let Some(expected) = expected_hash {
        if !expected.eq_ignore_ascii_case(&report.state_hash) {
            return Err(ScenarioError::HashMismatch {
                expected: expected.to_string(),
                actual: report.state_hash,
            });
        }
        info!(hash = %report.state_hash, "State hash verified");
    }
    Ok(report)
}

pub fn replay_file(
    path: impl AsRef<Path>,
    arbiter: StockArbiter,
    expected_hash: Option<&str>,
    metrics: Option<MetricsRecorder>,
) -> Result<SimulationReport, ScenarioError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Replaying scenario");
    let scenario = Scenario::load(path)?;
    replay(&scenario, arbiter, expected_hash, metrics)
}
