//! Arbitration engine parameters.

use std::time::Duration;

use larm_core::{FallbackAlert, UnitSystem};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct EngineConfig {
    /// Control-loop period in milliseconds.
    #[serde(default = "default_tick_ms")]
    #[validate(range(min = 1, max = 1000))]
    pub tick_ms: u64,

    #[serde(default)]
    pub units: UnitSystem,

    /// Alert shown in place of a generator that failed.
    #[serde(default)]
    #[validate(nested)]
    pub fallback: FallbackConfig,
}

fn default_tick_ms() -> u64 {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            units: UnitSystem::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct FallbackConfig {
    #[serde(default = "default_title")]
    #[validate(custom(function = validation::validate_display_text))]
    pub title: String,

    #[serde(default = "default_subtitle")]
    #[validate(custom(function = validation::validate_display_text))]
    pub subtitle: String,
}

fn default_title() -> String {
    "System Malfunction".into()
}

fn default_subtitle() -> String {
    "Alert Unavailable".into()
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
        }
    }
}

impl FallbackConfig {
    pub fn to_fallback(&self) -> FallbackAlert {
        FallbackAlert::new(self.title.clone(), self.subtitle.clone())
    }
}
