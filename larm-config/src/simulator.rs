//! Deterministic simulation and fuzzing parameters.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SimulatorConfig {
    /// Seed for generated scenarios.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Ticks per generated scenario.
    #[serde(default = "default_ticks")]
    #[validate(range(min = 1, max = 1_000_000))]
    pub ticks: u32,

    /// Chance that a generated record carries an id outside the catalog.
    #[serde(default = "default_unknown_probability")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub unknown_probability: f64,

    #[serde(default = "default_max_events")]
    #[validate(range(min = 1, max = 256))]
    pub max_events_per_tick: usize,
}

fn default_seed() -> u64 {
    42
}

fn default_ticks() -> u32 {
    1000
}

fn default_unknown_probability() -> f64 {
    0.01
}

fn default_max_events() -> usize {
    8
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            ticks: default_ticks(),
            unknown_probability: default_unknown_probability(),
            max_events_per_tick: default_max_events(),
        }
    }
}
