//! ## larm-catalog::overlay
//! **YAML overlays that append fixed-alert events to a catalog**
//!
//! ### Expectations:
//! - Overlays only add events; reusing an existing name fails at build time
//! - Every field is validated before any event is defined
//! - Durations are given in seconds and rounded to whole milliseconds
//!
//! ### Example:
//! ```yaml
//! events:
//!   - name: trailerConnected
//!     alerts:
//!       - category: noEntry
//!         text1: Assist Unavailable
//!         text2: Trailer Connected
//!         priority: 2
//!         audible: chimeError
//!         sound_seconds: 0.4
//!         hud_seconds: 2.0
//!         text_seconds: 3.0
//! ```

use std::path::{Path, PathBuf};

use larm_core::alert::{ms, Alert, AlertSize, AlertStatus, AudibleAlert, Priority, VisualAlert};
use larm_core::{CatalogBuilder, CatalogError, Category};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use validator::{Validate, ValidationError, ValidationErrors};

static EVENT_NAME: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new("^[a-z][A-Za-z0-9]{0,63}$"));

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Failed to read overlay {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Overlay YAML parsing error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid overlay: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Event names are camelCase identifiers.
pub fn validate_event_name(name: &str) -> Result<(), ValidationError> {
    let re = EVENT_NAME
        .as_ref()
        .map_err(|_| ValidationError::new("invalid_regex"))?;
    if re.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_event_name"))
    }
}

/// Range checks let NaN through.
pub fn validate_finite(value: f32) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("not_finite"))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Overlay {
    #[serde(default)]
    #[validate(nested)]
    pub events: Vec<OverlayEvent>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OverlayEvent {
    #[validate(custom(function = validate_event_name))]
    pub name: String,

    /// Empty for a log-only event.
    #[serde(default)]
    #[validate(nested)]
    pub alerts: Vec<OverlayAlert>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OverlayAlert {
    pub category: Category,

    #[validate(length(max = 128))]
    pub text1: String,

    #[serde(default)]
    #[validate(length(max = 128))]
    pub text2: String,

    #[serde(default)]
    pub status: AlertStatus,

    #[serde(default = "default_size")]
    pub size: AlertSize,

    #[validate(range(min = 0, max = 5))]
    pub priority: u8,

    #[serde(default)]
    pub visual: VisualAlert,

    #[serde(default)]
    pub audible: AudibleAlert,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 60.0), custom(function = validate_finite))]
    pub sound_seconds: f32,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 60.0), custom(function = validate_finite))]
    pub hud_seconds: f32,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 60.0), custom(function = validate_finite))]
    pub text_seconds: f32,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 10.0), custom(function = validate_finite))]
    pub rate: f32,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 3600.0), custom(function = validate_finite))]
    pub min_dwell_seconds: f32,
}

fn default_size() -> AlertSize {
    AlertSize::Mid
}

fn seconds(value: f32) -> std::time::Duration {
    ms((value * 1000.0).round().max(0.0) as u64)
}

impl OverlayAlert {
    pub fn to_alert(&self) -> Alert {
        let priority = Priority::from_level(self.priority).unwrap_or(Priority::Highest);
        Alert::new(
            self.text1.clone(),
            self.text2.clone(),
            self.status,
            self.size,
            priority,
            self.visual,
            self.audible,
            seconds(self.sound_seconds),
            seconds(self.hud_seconds),
            seconds(self.text_seconds),
        )
        .with_rate(self.rate)
        .with_min_dwell(seconds(self.min_dwell_seconds))
    }
}

impl Overlay {
    /// Parses and validates an overlay document.
    pub fn from_yaml(source: &str) -> Result<Self, OverlayError> {
        let overlay: Overlay = serde_yaml::from_str(source)?;
        overlay.validate()?;
        Ok(overlay)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, OverlayError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| OverlayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let overlay = Self::from_yaml(&source)?;
        debug!(path = %path.display(), events = overlay.events.len(), "Loaded catalog overlay");
        Ok(overlay)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Appends every overlay event to `builder` in document order.
    pub fn apply<P, L>(&self, builder: &mut CatalogBuilder<P, L>) {
        for event in &self.events {
            let mut entry = builder.define(event.name.clone());
            for alert in &event.alerts {
                entry = entry.on(alert.category, alert.to_alert());
            }
        }
        info!(events = self.events.len(), "Applied catalog overlay");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;
    use crate::stock::{stock_builder, stock_catalog};

    const TRAILER: &str = r#"
events:
  - name: trailerConnected
    alerts:
      - category: noEntry
        text1: Assist Unavailable
        text2: Trailer Connected
        priority: 2
        audible: chimeError
        sound_seconds: 0.4
        hud_seconds: 2.0
        text_seconds: 3.0
      - category: permanent
        text1: Trailer Connected
        priority: 1
        size: small
        min_dwell_seconds: 0.5
  - name: debugMarker
"#;

    #[test]
    fn overlay_appends_after_stock_events() {
        let stock_len = stock_catalog().unwrap().len();
        let overlay = Overlay::from_yaml(TRAILER).unwrap();
        assert_eq!(overlay.len(), 2);

        let mut builder = stock_builder();
        overlay.apply(&mut builder);
        let catalog = builder.build().unwrap();

        assert_eq!(catalog.len(), stock_len + 2);
        let id = catalog.lookup("trailerConnected").unwrap();
        assert_eq!(id.index(), stock_len);
        assert!(catalog.categories(id).has(Category::NoEntry));
        assert!(catalog.categories(catalog.lookup("debugMarker").unwrap()).is_empty());

        let template = catalog.template(id, Category::Permanent).unwrap();
        assert_eq!(template.min_dwell(), Duration::from_millis(500));
    }

    #[test]
    fn overlay_alert_fields_convert() {
        let overlay = Overlay::from_yaml(TRAILER).unwrap();
        let alert = overlay.events[0].alerts[0].to_alert();
        assert_eq!(alert.priority, Priority::Low);
        assert_eq!(alert.audible, AudibleAlert::ChimeError);
        assert_eq!(alert.duration_sound, Duration::from_millis(400));
        assert_eq!(alert.size, AlertSize::Mid);
    }

    #[test]
    fn redefining_stock_event_is_rejected() {
        let overlay = Overlay::from_yaml(
            "events:\n  - name: doorOpen\n",
        )
        .unwrap();
        let mut builder = stock_builder();
        overlay.apply(&mut builder);
        assert!(matches!(
            builder.build(),
            Err(CatalogError::DuplicateEvent(name)) if name == "doorOpen"
        ));
    }

    #[test]
    fn invalid_fields_fail_validation() {
        let bad_priority = r#"
events:
  - name: tooLoud
    alerts:
      - category: warning
        text1: Loud
        priority: 7
"#;
        assert!(matches!(
            Overlay::from_yaml(bad_priority),
            Err(OverlayError::Validation(_))
        ));

        let bad_name = "events:\n  - name: Has Spaces\n";
        assert!(matches!(
            Overlay::from_yaml(bad_name),
            Err(OverlayError::Validation(_))
        ));
    }

    #[test]
    fn event_names_are_camel_case() {
        assert!(validate_event_name("trailerConnected").is_ok());
        assert!(validate_event_name("Trailer").is_err());
        assert!(validate_event_name("trailer_connected").is_err());
        let err = validate_event_name("").unwrap_err();
        assert_eq!(err.code, "invalid_event_name");
    }

    #[test]
    fn non_finite_numbers_fail_validation() {
        for field in ["rate", "hud_seconds", "min_dwell_seconds"] {
            let yaml = format!(
                "events:\n  - name: flaky\n    alerts:\n      - category: warning\n        text1: Flaky\n        priority: 1\n        {field}: .nan\n"
            );
            assert!(
                matches!(Overlay::from_yaml(&yaml), Err(OverlayError::Validation(_))),
                "{field}"
            );
        }
        assert!(validate_finite(f32::INFINITY).is_err());
        assert!(validate_finite(0.25).is_ok());
    }

    #[test]
    fn unknown_category_is_a_parse_error() {
        let yaml = "events:\n  - name: x\n    alerts:\n      - category: sometimes\n        text1: a\n        priority: 0\n";
        assert!(matches!(Overlay::from_yaml(yaml), Err(OverlayError::Parse(_))));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TRAILER.as_bytes()).unwrap();
        let overlay = Overlay::load(file.path()).unwrap();
        assert_eq!(overlay.events[1].name, "debugMarker");

        assert!(matches!(
            Overlay::load("/nonexistent/overlay.yaml"),
            Err(OverlayError::Io { .. })
        ));
    }
}
