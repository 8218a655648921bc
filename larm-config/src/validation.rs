//! Custom validation functions for configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static LOG_LEVEL: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new("^(?i)(trace|debug|info|warn|error)$"));

/// Accepts the `tracing` level names, case-insensitive.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let re = LOG_LEVEL
        .as_ref()
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(level) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Rejects blank display text.
pub fn validate_display_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::new("blank_text"))
    } else {
        Ok(())
    }
}
