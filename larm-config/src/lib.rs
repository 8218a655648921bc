//! # Larm Configuration System
//!
//! Layered configuration for the alert arbitration engine and its tooling.
//!
//! ## Features
//! - **Unified Configuration**: one document covers engine, catalog, telemetry and simulator
//! - **Validation**: every loaded value is range- and format-checked before use
//! - **Environment Awareness**: per-environment files and `LARM_*` overrides

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

mod catalog;
mod engine;
mod error;
mod simulator;
mod telemetry;
mod validation;

pub use catalog::CatalogConfig;
pub use engine::{EngineConfig, FallbackConfig};
pub use error::ConfigError;
pub use simulator::SimulatorConfig;
pub use telemetry::TelemetryConfig;

const BASE_FILE: &str = "config/larm.yaml";
const ENV_PREFIX: &str = "LARM_";

#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct LarmConfig {
    #[serde(default)]
    #[validate(nested)]
    pub engine: EngineConfig,

    #[serde(default)]
    #[validate(nested)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    #[validate(nested)]
    pub simulator: SimulatorConfig,
}

impl LarmConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/larm.yaml`, skipped when missing
    /// 3. `config/<LARM_ENV>.yaml` (`production` when unset)
    /// 4. `LARM_*` environment variables, `__` separating sections
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(LarmConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        } else {
            debug!("{BASE_FILE} not found, using default configuration");
        }

        let env = std::env::var("LARM_ENV").unwrap_or_else(|_| "production".into());
        let env_file = format!("config/{}.yaml", env);
        if Path::new(&env_file).exists() {
            figment = figment.merge(Yaml::file(env_file));
        }

        Self::extract(figment)
    }

    /// Load configuration from a specific file, still honouring env overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let figment =
            Figment::from(Serialized::defaults(LarmConfig::default())).merge(Yaml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
