//! Local-recovery counters.
//!
//! Nothing in the core escalates a fault; instead these counters let the
//! caller's supervisory layer (and the metrics exporter) see how often the
//! engine had to recover.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct Diagnostics {
    unknown_events: AtomicU64,
    template_faults: AtomicU64,
    suppressed: AtomicU64,
}

/// Point-in-time copy of [`Diagnostics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticsSnapshot {
    pub unknown_events: u64,
    pub template_faults: u64,
    pub suppressed: u64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_unknown(&self, count: u64) {
        self.unknown_events.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_fault(&self) {
        self.template_faults.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            unknown_events: self.unknown_events.load(Ordering::Relaxed),
            template_faults: self.template_faults.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
        }
    }
}

impl DiagnosticsSnapshot {
    /// Counter growth since `earlier`.
    pub fn since(&self, earlier: &DiagnosticsSnapshot) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            unknown_events: self.unknown_events.saturating_sub(earlier.unknown_events),
            template_faults: self.template_faults.saturating_sub(earlier.template_faults),
            suppressed: self.suppressed.saturating_sub(earlier.suppressed),
        }
    }
}
