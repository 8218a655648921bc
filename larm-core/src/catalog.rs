//! ## larm-core::catalog
//! **Immutable event → (category, template) mapping**
//!
//! A [`Catalog`] is built once at startup through [`CatalogBuilder`] and then
//! shared read-only (typically behind an `Arc`). The type parameters are the
//! static parameters `P` and the live snapshot `L` that generated templates
//! read; the engine never looks inside either.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alert::{Alert, AlertOrigin};
use crate::category::{Category, CategoryFlags};
use crate::events::EventId;

/// Unit system the driver has selected for displayed speeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn is_metric(self) -> bool {
        matches!(self, UnitSystem::Metric)
    }
}

/// Failure of a generated template.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Live snapshot is missing field `{0}`")]
    MissingField(&'static str),
    #[error("Template evaluation failed: {0}")]
    Evaluation(String),
    #[error("Template generator panicked")]
    Panicked,
}

/// Generator signature for parametric alerts.
///
/// Generators must be pure: no shared-state mutation and no blocking I/O.
/// The arbiter may call them several times per tick (once per `resolve`).
pub type Generator<P, L> =
    Arc<dyn Fn(&P, &L, UnitSystem) -> Result<Alert, TemplateError> + Send + Sync>;

/// Either a fixed alert or a generator evaluated on demand.
pub enum AlertTemplate<P, L> {
    Fixed(Alert),
    /// A panicking generator is caught and replaced by the fallback alert,
    /// but the process panic hook still runs on every such tick. Install a
    /// quiet hook (for example `EventLogger::route_panics` in
    /// `larm-telemetry`) when generators can fault repeatedly.
    Generated {
        /// Declared up front so debounce can run before evaluation.
        min_dwell: Duration,
        generate: Generator<P, L>,
    },
}

impl<P, L> AlertTemplate<P, L> {
    pub fn generated<F>(min_dwell: Duration, generate: F) -> Self
    where
        F: Fn(&P, &L, UnitSystem) -> Result<Alert, TemplateError> + Send + Sync + 'static,
    {
        AlertTemplate::Generated {
            min_dwell,
            generate: Arc::new(generate),
        }
    }

    pub fn min_dwell(&self) -> Duration {
        match self {
            AlertTemplate::Fixed(alert) => alert.min_dwell,
            AlertTemplate::Generated { min_dwell, .. } => *min_dwell,
        }
    }

    /// Produces the concrete alert. Generated alerts inherit the declared dwell.
    pub fn evaluate(&self, params: &P, live: &L, units: UnitSystem) -> Result<Alert, TemplateError> {
        match self {
            AlertTemplate::Fixed(alert) => Ok(alert.clone()),
            AlertTemplate::Generated {
                min_dwell,
                generate,
            } => generate(params, live, units).map(|alert| alert.with_min_dwell(*min_dwell)),
        }
    }
}

impl<P, L> Clone for AlertTemplate<P, L> {
    fn clone(&self) -> Self {
        match self {
            AlertTemplate::Fixed(alert) => AlertTemplate::Fixed(alert.clone()),
            AlertTemplate::Generated {
                min_dwell,
                generate,
            } => AlertTemplate::Generated {
                min_dwell: *min_dwell,
                generate: Arc::clone(generate),
            },
        }
    }
}

impl<P, L> fmt::Debug for AlertTemplate<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertTemplate::Fixed(alert) => f.debug_tuple("Fixed").field(alert).finish(),
            AlertTemplate::Generated { min_dwell, .. } => f
                .debug_struct("Generated")
                .field("min_dwell", min_dwell)
                .finish_non_exhaustive(),
        }
    }
}

impl<P, L> From<Alert> for AlertTemplate<P, L> {
    fn from(alert: Alert) -> Self {
        AlertTemplate::Fixed(alert)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Event `{0}` is defined more than once")]
    DuplicateEvent(String),
    #[error("Event `{event}` defines category `{category}` more than once")]
    DuplicateCategory { event: String, category: Category },
    #[error("Catalog exceeds {max} events")]
    TooManyEvents { max: usize },
    #[error("Event name must not be empty")]
    EmptyName,
}

struct CatalogEntry<P, L> {
    name: String,
    flags: CategoryFlags,
    templates: Vec<(Category, AlertTemplate<P, L>)>,
}

/// Immutable event catalog.
pub struct Catalog<P, L> {
    entries: Vec<CatalogEntry<P, L>>,
    by_name: HashMap<String, EventId>,
}

impl<P, L> Catalog<P, L> {
    pub fn builder() -> CatalogBuilder<P, L> {
        CatalogBuilder::new()
    }

    /// Size of the event universe.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: EventId) -> bool {
        id.index() < self.entries.len()
    }

    pub fn lookup(&self, name: &str) -> Option<EventId> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, id: EventId) -> Option<&str> {
        self.entries.get(id.index()).map(|e| e.name.as_str())
    }

    /// Categories `id` can surface in; empty for log-only or unknown events.
    #[inline]
    pub fn categories(&self, id: EventId) -> CategoryFlags {
        self.entries
            .get(id.index())
            .map_or(CategoryFlags::empty(), |e| e.flags)
    }

    pub fn template(&self, id: EventId, category: Category) -> Option<&AlertTemplate<P, L>> {
        self.entries
            .get(id.index())?
            .templates
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, t)| t)
    }

    /// All ids in the universe, ascending.
    pub fn ids(&self) -> impl Iterator<Item = EventId> + '_ {
        (0..self.entries.len()).map(|i| EventId::new(i as u16))
    }

    /// `"<eventName>/<category>"` label for a resolved alert.
    pub fn alert_type(&self, origin: &AlertOrigin) -> String {
        match self.name(origin.event) {
            Some(name) => format!("{}/{}", name, origin.category),
            None => format!("{}/{}", origin.event, origin.category),
        }
    }
}

impl<P, L> fmt::Debug for Catalog<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("events", &self.entries.len())
            .finish()
    }
}

/// Accumulates event definitions; ids are assigned in definition order.
pub struct CatalogBuilder<P, L> {
    entries: Vec<CatalogEntry<P, L>>,
}

impl<P, L> Default for CatalogBuilder<P, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, L> CatalogBuilder<P, L> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Starts a new event definition. Validation happens in [`CatalogBuilder::build`].
    pub fn define(&mut self, name: impl Into<String>) -> EntryBuilder<'_, P, L> {
        self.entries.push(CatalogEntry {
            name: name.into(),
            flags: CategoryFlags::empty(),
            templates: Vec::new(),
        });
        let index = self.entries.len() - 1;
        EntryBuilder {
            entry: &mut self.entries[index],
            id: EventId::new(index.min(u16::MAX as usize) as u16),
        }
    }

    /// Names defined so far, in id order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn build(self) -> Result<Catalog<P, L>, CatalogError> {
        let max = u16::MAX as usize;
        if self.entries.len() > max {
            return Err(CatalogError::TooManyEvents { max });
        }

        let mut by_name = HashMap::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.name.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if by_name
                .insert(entry.name.clone(), EventId::new(index as u16))
                .is_some()
            {
                return Err(CatalogError::DuplicateEvent(entry.name.clone()));
            }
            let mut seen = CategoryFlags::empty();
            for (category, _) in &entry.templates {
                if seen.has(*category) {
                    return Err(CatalogError::DuplicateCategory {
                        event: entry.name.clone(),
                        category: *category,
                    });
                }
                seen |= category.flag();
            }
        }

        Ok(Catalog {
            entries: self.entries,
            by_name,
        })
    }
}

/// Handle for adding templates to the event being defined.
pub struct EntryBuilder<'a, P, L> {
    entry: &'a mut CatalogEntry<P, L>,
    id: EventId,
}

impl<P, L> EntryBuilder<'_, P, L> {
    pub fn on(self, category: Category, template: impl Into<AlertTemplate<P, L>>) -> Self {
        self.entry.flags |= category.flag();
        self.entry.templates.push((category, template.into()));
        self
    }

    /// Id the event will carry in the built catalog.
    pub fn id(&self) -> EventId {
        self.id
    }
}
