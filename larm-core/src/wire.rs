//! ## larm-core::wire
//! **Inbound/outbound event records**
//!
//! Inbound records come from upstream publishers once per tick and may name
//! ids this build does not know (version skew); those are dropped and
//! counted. Outbound records carry one flag per category the catalog maps
//! the event to.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::Catalog;
use crate::category::{Category, CategoryFlags};
use crate::events::{EventError, EventId, EventLog};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundRecord {
    pub event: EventId,
    /// Absent means non-persistent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent: Option<bool>,
}

impl InboundRecord {
    pub fn new(event: EventId) -> Self {
        Self {
            event,
            persistent: None,
        }
    }

    pub fn persistent(event: EventId) -> Self {
        Self {
            event,
            persistent: Some(true),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRecord {
    pub event: EventId,
    pub flags: CategoryFlags,
}

impl OutboundRecord {
    #[inline]
    pub fn is_set(&self, category: Category) -> bool {
        self.flags.has(category)
    }
}

/// Outcome of one [`ingest`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub accepted: usize,
    pub unknown: usize,
}

/// Raises each known record into `log`, in record order.
pub fn ingest<'r, I>(log: &mut EventLog, records: I) -> IngestReport
where
    I: IntoIterator<Item = &'r InboundRecord>,
{
    let mut report = IngestReport::default();
    for record in records {
        match log.raise(record.event, record.persistent.unwrap_or(false)) {
            Ok(()) => report.accepted += 1,
            Err(EventError::UnknownEvent(id)) => {
                report.unknown += 1;
                warn!(event = id.raw(), "Dropping inbound record for unknown event");
            }
        }
    }
    report
}

/// One record per active event, in firing order.
pub fn export<P, L>(log: &EventLog, catalog: &Catalog<P, L>) -> Vec<OutboundRecord> {
    log.active()
        .iter()
        .map(|id| OutboundRecord {
            event: *id,
            flags: catalog.categories(*id),
        })
        .collect()
}
