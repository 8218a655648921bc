use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scenario YAML error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Scenario references unknown event `{0}`")]
    UnknownEvent(String),

    #[error("Scenario runs {ticks} ticks, more than the limit of {max}")]
    TooLong { ticks: u64, max: u64 },

    #[error("Step {index} is invalid: {reason}")]
    InvalidStep { index: usize, reason: String },

    #[error("State hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
}
