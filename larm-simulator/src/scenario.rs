//! ## larm-simulator::scenario
//! **YAML tick scripts**
//!
//! A scenario lists steps, each raising events over a tick range. Events are
//! referenced by catalog name or raw id; raw ids outside the catalog are kept
//! so the unknown-drop path can be exercised.
//!
//! ```yaml
//! units: imperial
//! params: { car_name: honda, min_steer_speed: 12.0 }
//! categories: [noEntry, softDisable, permanent]
//! steps:
//!   - from: 0
//!     until: 50
//!     events: [doorOpen, 900]
//!   - from: 10
//!     persistent: [calibrationIncomplete]
//!     live: { calibration_percent: 40 }
//! ```

use std::path::Path;

use larm_catalog::{CarParams, LiveSnapshot};
use larm_core::wire::InboundRecord;
use larm_core::{Catalog, Category, EventId, UnitSystem};
use serde::{Deserialize, Serialize};

use crate::ScenarioError;

/// Longest run a scenario may request.
pub const MAX_TICKS: u64 = 1_000_000;

/// Catalog name or raw id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventRef {
    Id(u16),
    Name(String),
}

impl EventRef {
    fn resolve<P, L>(&self, catalog: &Catalog<P, L>) -> Result<EventId, ScenarioError> {
        match self {
            EventRef::Id(raw) => Ok(EventId::new(*raw)),
            EventRef::Name(name) => catalog
                .lookup(name)
                .ok_or_else(|| ScenarioError::UnknownEvent(name.clone())),
        }
    }
}

impl From<&str> for EventRef {
    fn from(name: &str) -> Self {
        EventRef::Name(name.to_string())
    }
}

impl From<u16> for EventRef {
    fn from(raw: u16) -> Self {
        EventRef::Id(raw)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub units: UnitSystem,
    pub params: CarParams,
    /// Categories resolved each tick; empty means all of them.
    pub categories: Vec<Category>,
    /// Run length; defaults to the end of the last step.
    pub ticks: Option<u64>,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub from: u64,
    /// Exclusive end; a step without one covers the single tick `from`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EventRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub persistent: Vec<EventRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unpersist: Vec<EventRef>,
    /// Replaces the live snapshot at `from`; it stays until replaced again.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<LiveSnapshot>,
}

impl Step {
    pub fn at(tick: u64) -> Self {
        Self {
            from: tick,
            until: None,
            events: Vec::new(),
            persistent: Vec::new(),
            unpersist: Vec::new(),
            live: None,
        }
    }

    fn end(&self) -> Option<u64> {
        match self.until {
            Some(until) => Some(until),
            None => self.from.checked_add(1),
        }
    }
}

/// Scenario with every reference resolved against a catalog.
#[derive(Clone, Debug)]
pub struct CompiledScenario {
    pub name: String,
    pub units: UnitSystem,
    pub params: CarParams,
    pub categories: Vec<Category>,
    pub ticks: u64,
    steps: Vec<CompiledStep>,
}

#[derive(Clone, Debug)]
pub struct CompiledStep {
    pub from: u64,
    pub until: u64,
    pub records: Vec<InboundRecord>,
    pub unpersist: Vec<EventId>,
    pub live: Option<LiveSnapshot>,
}

impl Scenario {
    pub fn from_yaml(source: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Resolves names and checks step ranges and the run length.
    pub fn compile<P, L>(&self, catalog: &Catalog<P, L>) -> Result<CompiledScenario, ScenarioError> {
        let mut steps = Vec::with_capacity(self.steps.len());
        let mut last_end = 0;
        for (index, step) in self.steps.iter().enumerate() {
            let end = step.end().ok_or_else(|| ScenarioError::InvalidStep {
                index,
                reason: format!("from ({}) has no following tick", step.from),
            })?;
            last_end = last_end.max(end);

            if let Some(until) = step.until {
                if until <= step.from {
                    return Err(ScenarioError::InvalidStep {
                        index,
                        reason: format!("until ({until}) must be greater than from ({})", step.from),
                    });
                }
            }

            let mut records = Vec::with_capacity(step.events.len() + step.persistent.len());
            for event in &step.events {
                records.push(InboundRecord::new(event.resolve(catalog)?));
            }
            for event in &step.persistent {
                records.push(InboundRecord::persistent(event.resolve(catalog)?));
            }
            let unpersist = step
                .unpersist
                .iter()
                .map(|event| event.resolve(catalog))
                .collect::<Result<Vec<_>, _>>()?;

            steps.push(CompiledStep {
                from: step.from,
                until: end,
                records,
                unpersist,
                live: step.live.clone(),
            });
        }

        let ticks = self.ticks.unwrap_or(last_end);
        if ticks > MAX_TICKS {
            return Err(ScenarioError::TooLong {
                ticks,
                max: MAX_TICKS,
            });
        }
        let categories = if self.categories.is_empty() {
            Category::ALL.to_vec()
        } else {
            self.categories.clone()
        };

        Ok(CompiledScenario {
            name: self.name.clone(),
            units: self.units,
            params: self.params.clone(),
            categories,
            ticks,
            steps,
        })
    }
}

impl CompiledScenario {
    /// Steps covering `tick`, in document order.
    pub fn steps_at(&self, tick: u64) -> impl Iterator<Item = &CompiledStep> {
        self.steps
            .iter()
            .filter(move |step| step.from <= tick && tick < step.until)
    }

    pub fn steps(&self) -> &[CompiledStep] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larm_catalog::stock_catalog;

    const DOOR: &str = r#"
name: door
units: imperial
categories: [noEntry, softDisable]
steps:
  - from: 0
    until: 5
    events: [doorOpen, 4000]
  - from: 3
    persistent: [calibrationIncomplete]
    live: { calibration_percent: 40 }
"#;

    #[test]
    fn compiles_names_and_raw_ids() {
        let catalog = stock_catalog().unwrap();
        let scenario = Scenario::from_yaml(DOOR).unwrap();
        assert_eq!(scenario.units, UnitSystem::Imperial);

        let compiled = scenario.compile(&catalog).unwrap();
        assert_eq!(compiled.ticks, 5);
        assert_eq!(compiled.categories, vec![Category::NoEntry, Category::SoftDisable]);

        let first = &compiled.steps()[0];
        assert_eq!(first.records[0].event, catalog.lookup("doorOpen").unwrap());
        assert_eq!(first.records[1].event, EventId::new(4000));
        assert_eq!(first.records[0].persistent, None);

        let second = &compiled.steps()[1];
        assert_eq!(second.until, 4);
        assert_eq!(second.records[0].persistent, Some(true));
        assert_eq!(second.live.as_ref().unwrap().calibration_percent, Some(40));
    }

    #[test]
    fn steps_at_respects_ranges() {
        let catalog = stock_catalog().unwrap();
        let compiled = Scenario::from_yaml(DOOR).unwrap().compile(&catalog).unwrap();
        assert_eq!(compiled.steps_at(0).count(), 1);
        assert_eq!(compiled.steps_at(3).count(), 2);
        assert_eq!(compiled.steps_at(4).count(), 1);
        assert_eq!(compiled.steps_at(5).count(), 0);
    }

    #[test]
    fn unknown_names_fail_to_compile() {
        let catalog = stock_catalog().unwrap();
        let scenario = Scenario::from_yaml("steps:\n  - from: 0\n    events: [doorAjar]\n").unwrap();
        assert!(matches!(
            scenario.compile(&catalog),
            Err(ScenarioError::UnknownEvent(name)) if name == "doorAjar"
        ));
    }

    #[test]
    fn empty_ranges_are_rejected() {
        let catalog = stock_catalog().unwrap();
        let scenario = Scenario::from_yaml("steps:\n  - from: 4\n    until: 4\n").unwrap();
        assert!(matches!(
            scenario.compile(&catalog),
            Err(ScenarioError::InvalidStep { index: 0, .. })
        ));
    }

    #[test]
    fn step_at_last_tick_is_rejected() {
        let catalog = stock_catalog().unwrap();
        let scenario = Scenario::from_yaml("steps:\n  - from: 18446744073709551615\n").unwrap();
        assert!(matches!(
            scenario.compile(&catalog),
            Err(ScenarioError::InvalidStep { index: 0, .. })
        ));
    }

    #[test]
    fn overlong_runs_are_rejected() {
        let catalog = stock_catalog().unwrap();
        let scenario = Scenario::from_yaml("ticks: 18446744073709551615\nsteps: []\n").unwrap();
        assert!(matches!(
            scenario.compile(&catalog),
            Err(ScenarioError::TooLong { max: MAX_TICKS, .. })
        ));

        let implied = Scenario::from_yaml("steps:\n  - from: 0\n    until: 1000001\n").unwrap();
        assert!(matches!(
            implied.compile(&catalog),
            Err(ScenarioError::TooLong { ticks: 1_000_001, .. })
        ));

        let at_limit = Scenario::from_yaml("ticks: 1000000\n").unwrap();
        assert_eq!(at_limit.compile(&catalog).unwrap().ticks, MAX_TICKS);
    }

    #[test]
    fn missing_categories_mean_all() {
        let catalog = stock_catalog().unwrap();
        let compiled = Scenario::default().compile(&catalog).unwrap();
        assert_eq!(compiled.categories.len(), Category::ALL.len());
        assert_eq!(compiled.ticks, 0);
    }
}
