//! Per-tick event state owned by the control loop.
//!
//! The log is mutated through `&mut self` only; the tick loop is its single
//! owner. Per tick the caller raises events, resolves alerts against a
//! shared borrow, then calls [`EventLog::retire`] exactly once.

use thiserror::Error;
use tracing::{debug, trace};

use super::id::EventId;
use crate::catalog::Catalog;
use crate::category::Category;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Event {0} is outside the catalog universe")]
    UnknownEvent(EventId),
}

#[derive(Clone, Debug)]
pub struct EventLog {
    /// Insertion order is firing order within the tick.
    active: Vec<EventId>,
    /// Reseeded into `active` on every retire, in registration order.
    persistent: Vec<EventId>,
    /// Consecutive ticks each event has been active, one slot per id.
    recurrence: Vec<u32>,
    /// Scratch membership bitmap reused by `retire`.
    seen: Vec<bool>,
    ticks: u64,
}

impl EventLog {
    /// Creates an empty log for a universe of `universe` event ids.
    pub fn new(universe: usize) -> Self {
        Self {
            active: Vec::new(),
            persistent: Vec::new(),
            recurrence: vec![0; universe],
            seen: vec![false; universe],
            ticks: 0,
        }
    }

    /// Creates an empty log sized for `catalog`.
    pub fn for_catalog<P, L>(catalog: &Catalog<P, L>) -> Self {
        Self::new(catalog.len())
    }

    #[inline]
    pub fn universe(&self) -> usize {
        self.recurrence.len()
    }

    #[inline]
    pub fn contains(&self, id: EventId) -> bool {
        id.index() < self.universe()
    }

    /// Marks `id` active for this tick.
    ///
    /// A second raise of the same id within a tick is ignored. With
    /// `persistent` set the id is also registered to re-enter the active set
    /// on every following tick until [`EventLog::unpersist`] is called.
    pub fn raise(&mut self, id: EventId, persistent: bool) -> Result<(), EventError> {
        if !self.contains(id) {
            return Err(EventError::UnknownEvent(id));
        }
        if !self.active.contains(&id) {
            self.active.push(id);
        }
        if persistent && !self.persistent.contains(&id) {
            self.persistent.push(id);
        }
        Ok(())
    }

    /// Stops re-raising `id` from the next retire on. The current tick keeps it.
    pub fn unpersist(&mut self, id: EventId) {
        self.persistent.retain(|p| *p != id);
    }

    /// True if any active event has a template for `category`.
    pub fn is_active<P, L>(&self, catalog: &Catalog<P, L>, category: Category) -> bool {
        self.active
            .iter()
            .any(|id| catalog.categories(*id).has(category))
    }

    /// Closes the tick: advance counters, clear, reseed persistent events.
    pub fn retire(&mut self) {
        for id in &self.active {
            self.seen[id.index()] = true;
        }
        for (count, seen) in self.recurrence.iter_mut().zip(self.seen.iter_mut()) {
            *count = if *seen { count.saturating_add(1) } else { 0 };
            *seen = false;
        }

        trace!(
            tick = self.ticks,
            retired = self.active.len(),
            persistent = self.persistent.len(),
            "Tick retired"
        );

        self.active.clear();
        self.active.extend_from_slice(&self.persistent);
        self.ticks += 1;

        if self.ticks % 1000 == 0 {
            debug!(ticks = self.ticks, "Event log checkpoint");
        }
    }

    /// Active events in firing order.
    #[inline]
    pub fn active(&self) -> &[EventId] {
        &self.active
    }

    #[inline]
    pub fn persistent(&self) -> &[EventId] {
        &self.persistent
    }

    /// Consecutive retired ticks `id` has been active; 0 for unknown ids.
    #[inline]
    pub fn recurrence(&self, id: EventId) -> u32 {
        self.recurrence.get(id.index()).copied().unwrap_or(0)
    }

    /// Number of retired ticks.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u16) -> EventId {
        EventId::new(raw)
    }

    #[test]
    fn raise_ignores_duplicates_within_a_tick() {
        let mut log = EventLog::new(4);
        log.raise(id(2), false).unwrap();
        log.raise(id(1), false).unwrap();
        log.raise(id(2), false).unwrap();
        assert_eq!(log.active(), &[id(2), id(1)]);
    }

    #[test]
    fn raise_rejects_ids_outside_universe() {
        let mut log = EventLog::new(2);
        assert_eq!(log.raise(id(2), false), Err(EventError::UnknownEvent(id(2))));
        assert!(log.is_empty());
        assert!(log.persistent().is_empty());
    }

    #[test]
    fn recurrence_counts_consecutive_ticks() {
        let mut log = EventLog::new(3);
        log.raise(id(0), false).unwrap();
        assert_eq!(log.recurrence(id(0)), 0);
        log.retire();
        assert_eq!(log.recurrence(id(0)), 1);
        log.raise(id(0), false).unwrap();
        log.retire();
        assert_eq!(log.recurrence(id(0)), 2);
        log.retire();
        assert_eq!(log.recurrence(id(0)), 0);
        assert_eq!(log.ticks(), 3);
    }

    #[test]
    fn never_raised_ids_stay_at_zero() {
        let mut log = EventLog::new(5);
        for _ in 0..50 {
            log.raise(id(1), false).unwrap();
            log.retire();
        }
        for raw in [0, 2, 3, 4] {
            assert_eq!(log.recurrence(id(raw)), 0);
        }
        assert_eq!(log.recurrence(id(1)), 50);
    }

    #[test]
    fn persistent_events_reseed_every_tick() {
        let mut log = EventLog::new(4);
        log.raise(id(3), true).unwrap();
        log.raise(id(1), false).unwrap();
        for tick in 1..=5 {
            log.retire();
            assert_eq!(log.active(), &[id(3)]);
            assert_eq!(log.recurrence(id(3)), tick);
        }
        assert_eq!(log.recurrence(id(1)), 0);
    }

    #[test]
    fn persistent_reseed_keeps_registration_order() {
        let mut log = EventLog::new(4);
        log.raise(id(2), true).unwrap();
        log.raise(id(0), true).unwrap();
        log.raise(id(2), true).unwrap();
        log.retire();
        assert_eq!(log.active(), &[id(2), id(0)]);
        assert_eq!(log.persistent(), &[id(2), id(0)]);
    }

    #[test]
    fn unpersist_keeps_current_tick() {
        let mut log = EventLog::new(2);
        log.raise(id(0), true).unwrap();
        log.retire();
        log.unpersist(id(0));
        assert_eq!(log.active(), &[id(0)]);
        log.retire();
        assert!(log.is_empty());
        assert_eq!(log.recurrence(id(0)), 2);
        log.retire();
        assert_eq!(log.recurrence(id(0)), 0);
    }

    #[test]
    fn unpersist_of_non_member_is_noop() {
        let mut log = EventLog::new(2);
        log.unpersist(id(1));
        log.unpersist(id(40));
        assert!(log.persistent().is_empty());
    }

    #[test]
    fn double_retire_without_raise() {
        let mut log = EventLog::new(3);
        log.raise(id(0), false).unwrap();
        log.raise(id(1), true).unwrap();
        log.retire();
        log.retire();
        assert_eq!(log.active(), &[id(1)]);
        assert_eq!(log.recurrence(id(0)), 0);
        assert_eq!(log.recurrence(id(1)), 2);
        assert_eq!(log.ticks(), 2);
    }

    #[test]
    fn recurrence_of_unknown_id_is_zero() {
        let log = EventLog::new(1);
        assert_eq!(log.recurrence(id(9)), 0);
    }
}
