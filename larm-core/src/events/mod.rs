//! ## larm-core::events
//! **Event identifiers and the per-tick event log**
//!
//! ### Components:
//! - `id`: `EventId`, an index into the catalog's fixed universe
//! - `log`: `EventLog`, active/persistent sets plus recurrence counters
pub mod id;
pub mod log;

pub use id::EventId;
pub use log::{EventError, EventLog};
