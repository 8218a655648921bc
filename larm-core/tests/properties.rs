use std::sync::Arc;
use std::time::Duration;

use larm_core::alert::{ms, AlertSize, AlertStatus, AudibleAlert, VisualAlert};
use larm_core::prelude::*;
use proptest::prelude::*;

const UNIVERSE: u16 = 12;
const TICK: Duration = Duration::from_millis(10);

/// Event `i` maps to categories chosen by its bit pattern, priority `i % 6`.
fn catalog() -> Arc<Catalog<(), ()>> {
    let mut builder = Catalog::<(), ()>::builder();
    for i in 0..UNIVERSE {
        let mut entry = builder.define(format!("event{i}"));
        for (bit, category) in Category::ALL.into_iter().enumerate() {
            if (i as usize + bit) % 3 == 0 {
                let alert = Alert::new(
                    format!("event{i}"),
                    category.as_str(),
                    AlertStatus::Normal,
                    AlertSize::Small,
                    Priority::from_level((i % 6) as u8).unwrap(),
                    VisualAlert::None,
                    AudibleAlert::None,
                    Duration::ZERO,
                    Duration::ZERO,
                    ms(100),
                )
                .with_min_dwell(ms(u64::from(i % 4) * 10));
                entry = entry.on(category, alert);
            }
        }
    }
    Arc::new(builder.build().unwrap())
}

fn tick_plan() -> impl Strategy<Value = Vec<Vec<(u16, bool)>>> {
    prop::collection::vec(
        prop::collection::vec((0..UNIVERSE + 4, prop::bool::weighted(0.1)), 0..8),
        1..20,
    )
}

proptest! {
    #[test]
    fn never_raised_ids_keep_zero_recurrence(plan in tick_plan()) {
        let catalog = catalog();
        let arbiter = Arbiter::new(catalog, TICK).unwrap();
        let mut log = arbiter.new_log();
        let mut raised = std::collections::HashSet::new();

        for tick in &plan {
            let records: Vec<_> = tick
                .iter()
                .map(|(raw, persistent)| InboundRecord {
                    event: EventId::new(*raw),
                    persistent: Some(*persistent),
                })
                .collect();
            arbiter.ingest(&mut log, &records);
            raised.extend(tick.iter().map(|(raw, _)| *raw));
            log.retire();
        }
        for _ in 0..3 {
            log.retire();
        }

        for raw in 0..UNIVERSE {
            if !raised.contains(&raw) {
                prop_assert_eq!(log.recurrence(EventId::new(raw)), 0);
            }
        }
    }

    #[test]
    fn active_events_have_positive_recurrence_after_retire(plan in tick_plan()) {
        let mut log = EventLog::new(UNIVERSE as usize);
        for tick in &plan {
            let mut fired = Vec::new();
            for (raw, persistent) in tick {
                if log.raise(EventId::new(*raw), *persistent).is_ok() {
                    fired.push(EventId::new(*raw));
                }
            }
            let before: Vec<_> = log.active().to_vec();
            log.retire();
            for id in log.ids_for_test() {
                let was_active = before.contains(&id);
                prop_assert_eq!(log.recurrence(id) >= 1, was_active);
            }
            prop_assert!(fired.iter().all(|id| before.contains(id)));
        }
    }

    #[test]
    fn export_of_ingest_matches_direct_raise(events in prop::collection::vec(0..UNIVERSE + 4, 0..16)) {
        let catalog = catalog();
        let arbiter = Arbiter::new(Arc::clone(&catalog), TICK).unwrap();

        let records: Vec<_> = events.iter().map(|raw| InboundRecord::new(EventId::new(*raw))).collect();
        let mut ingested = arbiter.new_log();
        arbiter.ingest(&mut ingested, &records);

        let mut direct = arbiter.new_log();
        for raw in &events {
            let _ = direct.raise(EventId::new(*raw), false);
        }

        prop_assert_eq!(arbiter.export(&ingested), arbiter.export(&direct));
        for record in arbiter.export(&ingested) {
            prop_assert_eq!(record.flags, catalog.categories(record.event));
        }
    }

    #[test]
    fn resolve_is_repeatable_and_picks_max_priority(plan in tick_plan()) {
        let catalog = catalog();
        let arbiter = Arbiter::new(Arc::clone(&catalog), TICK).unwrap();
        let mut log = arbiter.new_log();

        for tick in &plan {
            for (raw, persistent) in tick {
                let _ = log.raise(EventId::new(*raw), *persistent);
            }
            let first = arbiter.resolve(&log, &Category::ALL, &(), &(), UnitSystem::Metric);
            let second = arbiter.resolve(&log, &Category::ALL, &(), &(), UnitSystem::Metric);
            prop_assert_eq!(&first, &second);

            for alert in &first {
                let origin = alert.origin.unwrap();
                prop_assert!(arbiter.is_active(&log, origin.category));
                let eligible = log.active().iter().filter_map(|id| {
                    let template = catalog.template(*id, origin.category)?;
                    (TICK * log.recurrence(*id) >= template.min_dwell()).then_some(template)
                });
                for template in eligible {
                    if let AlertTemplate::Fixed(candidate) = template {
                        prop_assert!(candidate.priority <= alert.priority);
                    }
                }
            }
            log.retire();
        }
    }
}

trait TestIds {
    fn ids_for_test(&self) -> Vec<EventId>;
}

impl TestIds for EventLog {
    fn ids_for_test(&self) -> Vec<EventId> {
        (0..self.universe() as u16).map(EventId::new).collect()
    }
}

#[test]
fn priority_four_beats_priority_two() {
    let mut builder = Catalog::<(), ()>::builder();
    let low = builder
        .define("steerTempUnavailableSilent")
        .on(Category::Warning, Alert::no_entry("two").with_min_dwell(Duration::ZERO))
        .id();
    let high = builder
        .define("speedTooHigh")
        .on(
            Category::Warning,
            Alert::new(
                "Speed Too High",
                "Model uncertain at this speed",
                AlertStatus::UserPrompt,
                AlertSize::Mid,
                Priority::High,
                VisualAlert::SteerRequired,
                AudibleAlert::ChimeWarning2Repeat,
                ms(2200),
                ms(3000),
                ms(4000),
            ),
        )
        .id();
    let arbiter = Arbiter::new(Arc::new(builder.build().unwrap()), TICK).unwrap();
    let mut log = arbiter.new_log();
    log.raise(low, false).unwrap();
    log.raise(high, false).unwrap();

    let alerts = arbiter.resolve(&log, &[Category::Warning], &(), &(), UnitSystem::Metric);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].priority, Priority::High);
    assert_eq!(alerts[0].origin.unwrap().event, high);
}

#[test]
fn thirty_tick_dwell_at_ten_milliseconds() {
    let mut builder = Catalog::<(), ()>::builder();
    let id = builder
        .define("gasPressed")
        .on(
            Category::PreEnable,
            Alert::normal_permanent("Release Gas Pedal to Engage", "").with_min_dwell(ms(300)),
        )
        .id();
    let arbiter = Arbiter::new(Arc::new(builder.build().unwrap()), TICK).unwrap();
    let mut log = arbiter.new_log();

    let mut first_seen = None;
    for tick in 0..60u32 {
        log.raise(id, false).unwrap();
        let shown = !arbiter
            .resolve(&log, &[Category::PreEnable], &(), &(), UnitSystem::Metric)
            .is_empty();
        if shown && first_seen.is_none() {
            first_seen = Some(tick);
        }
        log.retire();
    }
    assert_eq!(first_seen, Some(30));
}
