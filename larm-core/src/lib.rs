//! # larm-core
//!
//! Per-tick alert arbitration for a real-time driver-assistance control loop.
//! Deterministic, single-threaded and free of I/O.
//!
//! ### Tick contract:
//! 1. raise events into the [`EventLog`] (directly or via [`wire::ingest`])
//! 2. resolve categories with the [`Arbiter`] (any number of times)
//! 3. [`EventLog::retire`] exactly once
//!
//! ### Key Submodules:
//! - `events`: event ids and the per-tick log with recurrence counters
//! - `catalog`: immutable event → (category, template) mapping
//! - `arbiter`: debounce and priority resolution
//! - `wire`: inbound/outbound record adapters

pub mod alert;
pub mod arbiter;
pub mod catalog;
pub mod category;
pub mod diagnostics;
pub mod events;
pub mod wire;

pub mod prelude {
    pub use crate::alert::*;
    pub use crate::arbiter::*;
    pub use crate::catalog::*;
    pub use crate::category::*;
    pub use crate::diagnostics::*;
    pub use crate::events::*;
    pub use crate::wire::*;
}

pub use alert::{Alert, AlertOrigin, Priority};
pub use arbiter::{Arbiter, ArbiterError, FallbackAlert};
pub use catalog::{AlertTemplate, Catalog, CatalogBuilder, CatalogError, TemplateError, UnitSystem};
pub use category::{Category, CategoryFlags};
pub use events::{EventError, EventId, EventLog};
