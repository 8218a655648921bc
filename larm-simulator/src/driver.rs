//! ## larm-simulator::driver
//! **Deterministic tick loop around the arbiter**
//!
//! ### Per tick:
//! 1. unpersist, then ingest the tick's inbound records
//! 2. resolve the requested categories
//! 3. read category flags and export outbound records
//! 4. retire the tick
//!
//! Every frame is folded into a BLAKE3 state hash. Two runs over the same
//! catalog and scenario produce the same hash.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use blake3::Hasher;
use larm_catalog::{CarParams, LiveSnapshot, StockCatalog};
use larm_core::diagnostics::DiagnosticsSnapshot;
use larm_core::wire::{InboundRecord, OutboundRecord};
use larm_core::{Alert, Arbiter, Category, CategoryFlags, EventId, EventLog, UnitSystem};
use larm_telemetry::{EventLogger, MetricsRecorder};
use opentelemetry::KeyValue;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::TickClock;
use crate::scenario::CompiledScenario;

pub type StockArbiter = Arbiter<CarParams, LiveSnapshot>;

/// Everything observable about one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickFrame {
    pub tick: u64,
    pub alerts: Vec<ResolvedAlert>,
    pub active_categories: CategoryFlags,
    pub outbound: Vec<OutboundRecord>,
    pub unknown: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedAlert {
    /// `"<eventName>/<category>"`.
    pub alert_type: String,
    pub alert: Alert,
}

impl TickFrame {
    pub fn alert(&self, alert_type: &str) -> Option<&Alert> {
        self.alerts
            .iter()
            .find(|resolved| resolved.alert_type == alert_type)
            .map(|resolved| &resolved.alert)
    }
}

#[derive(Clone, Debug)]
pub struct SimulationReport {
    pub frames: Vec<TickFrame>,
    pub state_hash: String,
    pub diagnostics: DiagnosticsSnapshot,
}

pub struct TickDriver {
    arbiter: StockArbiter,
    log: EventLog,
    clock: TickClock,
    hasher: Hasher,
    metrics: Option<MetricsRecorder>,
    last_diagnostics: DiagnosticsSnapshot,
    shown: BTreeSet<String>,
}

impl TickDriver {
    pub fn new(arbiter: StockArbiter) -> Self {
        let log = arbiter.new_log();
        let clock = TickClock::new(arbiter.tick());
        let last_diagnostics = arbiter.diagnostics();
        Self {
            arbiter,
            log,
            clock,
            hasher: Hasher::new(),
            metrics: None,
            last_diagnostics,
            shown: BTreeSet::new(),
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn catalog(&self) -> &Arc<StockCatalog> {
        self.arbiter.catalog()
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Runs one tick.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        records: &[InboundRecord],
        unpersist: &[EventId],
        categories: &[Category],
        params: &CarParams,
        live: &LiveSnapshot,
        units: UnitSystem,
    ) -> TickFrame {
        for id in unpersist {
            self.log.unpersist(*id);
        }
        let report = self.arbiter.ingest(&mut self.log, records);

        let started = Instant::now();
        let alerts = self.arbiter.resolve(&self.log, categories, params, live, units);
        let latency = started.elapsed();

        let active_categories = Category::ALL
            .into_iter()
            .filter(|category| self.arbiter.is_active(&self.log, *category))
            .collect::<CategoryFlags>();
        let outbound = self.arbiter.export(&self.log);

        let catalog = self.arbiter.catalog();
        let alerts: Vec<ResolvedAlert> = alerts
            .into_iter()
            .map(|alert| ResolvedAlert {
                alert_type: alert
                    .origin
                    .map(|origin| catalog.alert_type(&origin))
                    .unwrap_or_default(),
                alert,
            })
            .collect();

        let frame = TickFrame {
            tick: self.clock.tick(),
            alerts,
            active_categories,
            outbound,
            unknown: report.unknown,
        };

        self.log.retire();
        self.hash_frame(&frame);
        self.announce(&frame);
        self.record_metrics(frame.alerts.len(), latency);
        self.clock.advance();
        frame
    }

    /// Drives `scenario` to completion from the current tick.
    pub fn run(&mut self, scenario: &CompiledScenario) -> SimulationReport {
        let start = self.clock.tick();
        let mut live = LiveSnapshot::default();
        let mut frames = Vec::new();

        for tick in 0..scenario.ticks {
            let mut records = Vec::new();
            let mut unpersist = Vec::new();
            for step in scenario.steps_at(tick) {
                if step.from == tick {
                    if let Some(snapshot) = &step.live {
                        live = snapshot.clone();
                    }
                }
                records.extend_from_slice(&step.records);
                unpersist.extend_from_slice(&step.unpersist);
            }
            frames.push(self.step(
                &records,
                &unpersist,
                &scenario.categories,
                &scenario.params,
                &live,
                scenario.units,
            ));
        }

        let state_hash = self.state_hash();
        let diagnostics = self.arbiter.diagnostics();
        info!(
            scenario = %scenario.name,
            ticks = self.clock.tick() - start,
            unknown_events = diagnostics.unknown_events,
            template_faults = diagnostics.template_faults,
            state_hash = %state_hash,
            "Simulation complete"
        );
        SimulationReport {
            frames,
            state_hash,
            diagnostics,
        }
    }

    /// Hex digest of every frame so far.
    pub fn state_hash(&self) -> String {
        hex::encode(self.hasher.clone().finalize().as_bytes())
    }

    fn hash_frame(&mut self, frame: &TickFrame) {
        let h = &mut self.hasher;
        h.update(&frame.tick.to_le_bytes());
        h.update(&frame.active_categories.bits().to_le_bytes());
        h.update(&(frame.unknown as u64).to_le_bytes());
        for record in &frame.outbound {
            h.update(&record.event.raw().to_le_bytes());
            h.update(&record.flags.bits().to_le_bytes());
        }
        for resolved in &frame.alerts {
            h.update(resolved.alert_type.as_bytes());
            h.update(&[0, resolved.alert.priority.level()]);
            h.update(resolved.alert.text1.as_bytes());
            h.update(&[0]);
            h.update(resolved.alert.text2.as_bytes());
            h.update(&[0]);
        }
    }

    /// Logs alert types as they appear and disappear.
    fn announce(&mut self, frame: &TickFrame) {
        let current: BTreeSet<String> = frame
            .alerts
            .iter()
            .map(|resolved| resolved.alert_type.clone())
            .collect();
        for alert_type in current.difference(&self.shown) {
            EventLogger::log_event(
                "alert_shown",
                &[
                    KeyValue::new("alert_type", alert_type.clone()),
                    KeyValue::new("tick", frame.tick as i64),
                ],
            );
        }
        for alert_type in self.shown.difference(&current) {
            debug!(alert_type = %alert_type, tick = frame.tick, "Alert cleared");
        }
        self.shown = current;
    }

    fn record_metrics(&mut self, resolved: usize, latency: std::time::Duration) {
        let diagnostics = self.arbiter.diagnostics();
        let delta = diagnostics.since(&self.last_diagnostics);
        self.last_diagnostics = diagnostics;

        if let Some(metrics) = &self.metrics {
            metrics.record_tick(resolved, latency);
            metrics.add_unknown_events(delta.unknown_events);
            metrics.add_template_faults(delta.template_faults);
        }
    }
}
