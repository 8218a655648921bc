//! ## larm-core::arbiter
//! **Per-category priority resolution with minimum-dwell debounce**
//!
//! For each requested category the arbiter walks the active events in firing
//! order, drops candidates whose event has not been active for the template's
//! minimum dwell, evaluates the survivors and keeps the one with the highest
//! [`Precedence`]. Resolution only borrows the [`EventLog`], so it can run
//! any number of times per tick.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, trace};

use crate::alert::{
    ms, Alert, AlertOrigin, AlertSize, AlertStatus, AudibleAlert, Priority, VisualAlert,
};
use crate::catalog::{AlertTemplate, Catalog, TemplateError, UnitSystem};
use crate::category::Category;
use crate::diagnostics::{Diagnostics, DiagnosticsSnapshot};
use crate::events::{EventId, EventLog};
use crate::wire::{self, InboundRecord, IngestReport, OutboundRecord};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ArbiterError {
    #[error("Tick duration must be greater than zero")]
    ZeroTick,
}

/// Total order used to pick the winning candidate of a category.
///
/// Higher priority wins; on equal priority the event that fired first in the
/// tick wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Precedence {
    priority: Priority,
    order: Reverse<usize>,
}

impl Precedence {
    pub fn new(priority: Priority, position: usize) -> Self {
        Self {
            priority,
            order: Reverse(position),
        }
    }
}

/// Alert substituted when a template fails to evaluate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackAlert {
    pub title: Cow<'static, str>,
    pub subtitle: Cow<'static, str>,
}

impl Default for FallbackAlert {
    fn default() -> Self {
        Self {
            title: Cow::Borrowed("System Malfunction"),
            subtitle: Cow::Borrowed("Alert Unavailable"),
        }
    }
}

impl FallbackAlert {
    pub fn new(title: impl Into<Cow<'static, str>>, subtitle: impl Into<Cow<'static, str>>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    /// No-entry shaped, but at the highest priority so it is never outranked.
    pub fn alert(&self) -> Alert {
        Alert::new(
            self.title.clone(),
            self.subtitle.clone(),
            AlertStatus::Normal,
            AlertSize::Mid,
            Priority::Highest,
            VisualAlert::None,
            AudibleAlert::ChimeError,
            ms(400),
            ms(2000),
            ms(3000),
        )
    }
}

pub struct Arbiter<P, L> {
    catalog: Arc<Catalog<P, L>>,
    tick: Duration,
    fallback: FallbackAlert,
    diagnostics: Diagnostics,
}

impl<P, L> Arbiter<P, L> {
    /// Creates an arbiter over `catalog` for a loop running every `tick`.
    pub fn new(catalog: Arc<Catalog<P, L>>, tick: Duration) -> Result<Self, ArbiterError> {
        if tick.is_zero() {
            return Err(ArbiterError::ZeroTick);
        }
        Ok(Self {
            catalog,
            tick,
            fallback: FallbackAlert::default(),
            diagnostics: Diagnostics::new(),
        })
    }

    pub fn with_fallback(mut self, fallback: FallbackAlert) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog<P, L>> {
        &self.catalog
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    /// Fresh log sized for this arbiter's catalog.
    pub fn new_log(&self) -> EventLog {
        EventLog::for_catalog(&self.catalog)
    }

    /// True if any active event belongs to `category`.
    pub fn is_active(&self, log: &EventLog, category: Category) -> bool {
        log.is_active(&self.catalog, category)
    }

    /// Raises every inbound record whose id is known; unknown ids are counted.
    pub fn ingest<'r, I>(&self, log: &mut EventLog, records: I) -> IngestReport
    where
        I: IntoIterator<Item = &'r InboundRecord>,
    {
        let report = wire::ingest(log, records);
        if report.unknown > 0 {
            self.diagnostics.record_unknown(report.unknown as u64);
        }
        report
    }

    pub fn export(&self, log: &EventLog) -> Vec<OutboundRecord> {
        wire::export(log, &self.catalog)
    }

    /// Resolves one alert per requested category, in the requested order.
    ///
    /// Categories with no eligible candidate produce no entry.
    pub fn resolve(
        &self,
        log: &EventLog,
        categories: &[Category],
        params: &P,
        live: &L,
        units: UnitSystem,
    ) -> Vec<Alert> {
        categories
            .iter()
            .filter_map(|category| self.resolve_category(log, *category, params, live, units))
            .collect()
    }

    /// Winning alert for a single category, if any.
    pub fn resolve_category(
        &self,
        log: &EventLog,
        category: Category,
        params: &P,
        live: &L,
        units: UnitSystem,
    ) -> Option<Alert> {
        let mut best: Option<(Precedence, Alert)> = None;

        for (position, id) in log.active().iter().copied().enumerate() {
            let Some(template) = self.catalog.template(id, category) else {
                continue;
            };

            let recurrence = log.recurrence(id);
            if !self.dwell_elapsed(recurrence, template.min_dwell()) {
                self.diagnostics.record_suppressed();
                trace!(
                    event = self.catalog.name(id).unwrap_or("?"),
                    %category,
                    recurrence,
                    "Candidate below minimum dwell"
                );
                continue;
            }

            // Fixed alerts are only cloned when they would win.
            if let AlertTemplate::Fixed(alert) = template {
                let rank = Precedence::new(alert.priority, position);
                if best.as_ref().is_some_and(|(b, _)| rank <= *b) {
                    continue;
                }
            }

            let origin = AlertOrigin {
                event: id,
                category,
            };
            let alert = self.evaluate(template, origin, params, live, units);
            let rank = Precedence::new(alert.priority, position);
            if best.as_ref().map_or(true, |(b, _)| rank > *b) {
                best = Some((rank, alert));
            }
        }

        best.map(|(_, alert)| alert)
    }

    #[inline]
    fn dwell_elapsed(&self, recurrence: u32, min_dwell: Duration) -> bool {
        self.tick.saturating_mul(recurrence) >= min_dwell
    }

    fn evaluate(
        &self,
        template: &AlertTemplate<P, L>,
        origin: AlertOrigin,
        params: &P,
        live: &L,
        units: UnitSystem,
    ) -> Alert {
        let result = catch_unwind(AssertUnwindSafe(|| template.evaluate(params, live, units)))
            .unwrap_or(Err(TemplateError::Panicked));

        match result {
            Ok(alert) => alert.stamped(origin),
            Err(e) => {
                self.diagnostics.record_fault();
                error!(
                    alert_type = %self.catalog.alert_type(&origin),
                    error = %e,
                    "Alert template failed, substituting fallback"
                );
                self.fallback.alert().stamped(origin)
            }
        }
    }

    /// Id lookup convenience for callers holding only the arbiter.
    pub fn lookup(&self, name: &str) -> Option<EventId> {
        self.catalog.lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    const TICK: Duration = Duration::from_millis(10);

    #[derive(Default)]
    struct Live {
        cal_perc: Option<u8>,
    }

    fn alert(text: &'static str, priority: Priority) -> Alert {
        Alert::new(
            text,
            "",
            AlertStatus::Normal,
            AlertSize::Small,
            priority,
            VisualAlert::None,
            AudibleAlert::None,
            Duration::ZERO,
            Duration::ZERO,
            ms(100),
        )
    }

    fn arbiter(builder: crate::catalog::CatalogBuilder<(), Live>) -> Arbiter<(), Live> {
        Arbiter::new(Arc::new(builder.build().unwrap()), TICK).unwrap()
    }

    fn resolve(arb: &Arbiter<(), Live>, log: &EventLog, categories: &[Category]) -> Vec<Alert> {
        arb.resolve(log, categories, &(), &Live::default(), UnitSystem::Metric)
    }

    #[test]
    fn rejects_zero_tick() {
        let catalog = Arc::new(Catalog::<(), ()>::builder().build().unwrap());
        assert_eq!(
            Arbiter::new(catalog, Duration::ZERO).err(),
            Some(ArbiterError::ZeroTick)
        );
    }

    #[test]
    fn highest_priority_wins() {
        let mut builder = Catalog::<(), Live>::builder();
        let low = builder
            .define("low")
            .on(Category::Warning, alert("low", Priority::Low))
            .id();
        let high = builder
            .define("high")
            .on(Category::Warning, alert("high", Priority::High))
            .id();
        let arb = arbiter(builder);
        let mut log = arb.new_log();
        log.raise(low, false).unwrap();
        log.raise(high, false).unwrap();

        let alerts = resolve(&arb, &log, &[Category::Warning]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].text1, "high");
        assert_eq!(
            alerts[0].origin,
            Some(AlertOrigin {
                event: high,
                category: Category::Warning
            })
        );
    }

    #[test]
    fn ties_go_to_first_fired() {
        let mut builder = Catalog::<(), Live>::builder();
        let a = builder
            .define("a")
            .on(Category::NoEntry, alert("a", Priority::Low))
            .id();
        let b = builder
            .define("b")
            .on(Category::NoEntry, alert("b", Priority::Low))
            .id();
        let arb = arbiter(builder);

        let mut log = arb.new_log();
        log.raise(b, false).unwrap();
        log.raise(a, false).unwrap();
        assert_eq!(resolve(&arb, &log, &[Category::NoEntry])[0].text1, "b");

        let mut log = arb.new_log();
        log.raise(a, false).unwrap();
        log.raise(b, false).unwrap();
        assert_eq!(resolve(&arb, &log, &[Category::NoEntry])[0].text1, "a");
    }

    #[test]
    fn output_follows_requested_category_order() {
        let mut builder = Catalog::<(), Live>::builder();
        let id = builder
            .define("overheat")
            .on(Category::SoftDisable, Alert::soft_disable("System Overheated"))
            .on(Category::NoEntry, Alert::no_entry("System Overheated"))
            .id();
        let arb = arbiter(builder);
        let mut log = arb.new_log();
        log.raise(id, false).unwrap();

        let alerts = resolve(
            &arb,
            &log,
            &[Category::NoEntry, Category::Warning, Category::SoftDisable],
        );
        let categories: Vec<_> = alerts
            .iter()
            .map(|a| a.origin.unwrap().category)
            .collect();
        assert_eq!(categories, vec![Category::NoEntry, Category::SoftDisable]);
    }

    #[test]
    fn debounce_holds_until_dwell_elapsed() {
        let mut builder = Catalog::<(), Live>::builder();
        let id = builder
            .define("blinkerSteeringPaused")
            .on(
                Category::Warning,
                alert("paused", Priority::Low).with_min_dwell(ms(300)),
            )
            .id();
        let arb = arbiter(builder);
        let mut log = arb.new_log();

        for tick in 0..30 {
            log.raise(id, false).unwrap();
            assert!(
                resolve(&arb, &log, &[Category::Warning]).is_empty(),
                "surfaced early at tick {tick}"
            );
            log.retire();
        }
        log.raise(id, false).unwrap();
        assert_eq!(log.recurrence(id), 30);
        assert_eq!(resolve(&arb, &log, &[Category::Warning]).len(), 1);
        assert_eq!(arb.diagnostics().suppressed, 30);
    }

    #[test]
    fn debounced_candidate_does_not_block_lower_priority() {
        let mut builder = Catalog::<(), Live>::builder();
        let slow = builder
            .define("slow")
            .on(
                Category::Warning,
                alert("slow", Priority::Highest).with_min_dwell(Duration::from_secs(1)),
            )
            .id();
        let fast = builder
            .define("fast")
            .on(Category::Warning, alert("fast", Priority::Lowest))
            .id();
        let arb = arbiter(builder);
        let mut log = arb.new_log();
        log.raise(slow, false).unwrap();
        log.raise(fast, false).unwrap();
        assert_eq!(resolve(&arb, &log, &[Category::Warning])[0].text1, "fast");
    }

    #[test]
    fn generator_runs_once_per_surviving_candidate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut builder = Catalog::<(), Live>::builder();
        let gen = builder
            .define("calibrationIncomplete")
            .on(
                Category::Permanent,
                AlertTemplate::generated(Duration::ZERO, move |_, live: &Live, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let perc = live.cal_perc.ok_or(TemplateError::MissingField("cal_perc"))?;
                    Ok(alert("cal", Priority::Lowest).with_text1(format!("{perc}%")))
                }),
            )
            .id();
        let slow = builder
            .define("noGps")
            .on(
                Category::Permanent,
                AlertTemplate::generated(Duration::from_secs(300), |_, _, _| {
                    panic!("debounced generator must not run")
                }),
            )
            .id();
        let arb = arbiter(builder);
        let mut log = arb.new_log();
        log.raise(gen, false).unwrap();
        log.raise(slow, false).unwrap();

        let live = Live { cal_perc: Some(40) };
        assert!(arb
            .resolve(&log, &[Category::Warning], &(), &live, UnitSystem::Metric)
            .is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let first = arb.resolve(&log, &[Category::Permanent], &(), &live, UnitSystem::Metric);
        let second = arb.resolve(&log, &[Category::Permanent], &(), &live, UnitSystem::Metric);
        assert_eq!(first, second);
        assert_eq!(first[0].text1, "40%");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(arb.diagnostics().template_faults, 0);
    }

    #[traced_test]
    #[test]
    fn failing_generator_degrades_to_fallback() {
        let mut builder = Catalog::<(), Live>::builder();
        let id = builder
            .define("calibrationIncomplete")
            .on(
                Category::Permanent,
                AlertTemplate::generated(Duration::ZERO, |_, live: &Live, _| {
                    let perc = live.cal_perc.ok_or(TemplateError::MissingField("cal_perc"))?;
                    Ok(alert("cal", Priority::Lowest).with_text1(format!("{perc}%")))
                }),
            )
            .id();
        let arb = arbiter(builder).with_fallback(FallbackAlert::new("Fault", "Check system"));
        let mut log = arb.new_log();
        log.raise(id, false).unwrap();

        let alerts = resolve(&arb, &log, &[Category::Permanent]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].text1, "Fault");
        assert_eq!(alerts[0].priority, Priority::Highest);
        assert_eq!(alerts[0].origin.unwrap().event, id);
        assert_eq!(arb.diagnostics().template_faults, 1);
        assert!(logs_contain("calibrationIncomplete/permanent"));
    }

    #[test]
    fn panicking_generator_degrades_to_fallback() {
        let mut builder = Catalog::<(), Live>::builder();
        let id = builder
            .define("joystickDebug")
            .on(
                Category::Warning,
                AlertTemplate::generated(Duration::ZERO, |_, _, _| -> Result<Alert, TemplateError> {
                    let axes: Vec<f32> = Vec::new();
                    Ok(alert("joystick", Priority::Low).with_text1(format!("{}", axes[1])))
                }),
            )
            .id();
        let arb = arbiter(builder);
        let mut log = arb.new_log();
        log.raise(id, false).unwrap();

        let alerts = resolve(&arb, &log, &[Category::Warning]);
        assert_eq!(alerts[0].text1, FallbackAlert::default().title);
        assert_eq!(arb.diagnostics().template_faults, 1);
    }

    #[test]
    fn is_active_tracks_category_membership() {
        let mut builder = Catalog::<(), Live>::builder();
        let log_only = builder.define("stockFcw").id();
        let door = builder
            .define("doorOpen")
            .on(Category::SoftDisable, Alert::user_soft_disable("Door Open"))
            .on(Category::NoEntry, Alert::no_entry("Door Open"))
            .id();
        let arb = arbiter(builder);
        let mut log = arb.new_log();

        log.raise(log_only, false).unwrap();
        assert!(Category::ALL.iter().all(|c| !arb.is_active(&log, *c)));
        assert!(resolve(&arb, &log, &Category::ALL).is_empty());

        log.raise(door, false).unwrap();
        assert!(arb.is_active(&log, Category::SoftDisable));
        assert!(arb.is_active(&log, Category::NoEntry));
        assert!(!arb.is_active(&log, Category::Warning));
    }

    #[test]
    fn persistent_event_stays_resolvable() {
        let mut builder = Catalog::<(), Live>::builder();
        let id = builder
            .define("startup")
            .on(
                Category::Permanent,
                Alert::normal_permanent("Be ready to take over at any time", ""),
            )
            .id();
        let arb = arbiter(builder);
        let mut log = arb.new_log();
        log.raise(id, true).unwrap();

        for _ in 0..5 {
            log.retire();
            assert!(arb.is_active(&log, Category::Permanent));
            assert_eq!(resolve(&arb, &log, &[Category::Permanent]).len(), 1);
        }
    }
}
