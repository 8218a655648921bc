//! Chaos module.
//!
//! Seeded random scenarios for fuzzing the tick loop. Generated scenarios
//! mix catalog ids, ids past the end of the catalog, persistent raises with
//! later unpersists, and live snapshots that are sometimes left empty so
//! generated templates fail and fall back.

use larm_catalog::{LaneChange, LaneChangeAlert, LaneChangeDirection, LiveSnapshot, PandaType};
use larm_core::Catalog;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scenario::{EventRef, Scenario, Step, MAX_TICKS};
use crate::ScenarioError;

/// Ids past the end of the catalog are drawn from this many values.
const UNKNOWN_SPAN: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub struct ChaosOptions {
    pub seed: u64,
    pub ticks: u64,
    pub unknown_probability: f64,
    pub max_events_per_tick: usize,
}

impl Default for ChaosOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 1000,
            unknown_probability: 0.01,
            max_events_per_tick: 8,
        }
    }
}

/// Builds a reproducible scenario: the same catalog size and options always
/// give the same scenario. Runs longer than [`MAX_TICKS`] are rejected.
pub fn generate_scenario<P, L>(
    catalog: &Catalog<P, L>,
    options: &ChaosOptions,
) -> Result<Scenario, ScenarioError> {
    if options.ticks > MAX_TICKS {
        return Err(ScenarioError::TooLong {
            ticks: options.ticks,
            max: MAX_TICKS,
        });
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let universe = catalog.len();
    let unknown_probability = options.unknown_probability.clamp(0.0, 1.0);
    let mut persisted: Vec<u16> = Vec::new();
    let mut steps = Vec::new();

    for tick in 0..options.ticks {
        let mut step = Step::at(tick);

        if tick == 0 || rng.random_bool(0.002) {
            step.live = Some(if rng.random_bool(0.1) {
                LiveSnapshot::default()
            } else {
                random_live(&mut rng)
            });
        }

        let count = rng.random_range(0..=options.max_events_per_tick);
        for _ in 0..count {
            let raw = if universe == 0 || rng.random_bool(unknown_probability) {
                let offset = rng.random_range(0..UNKNOWN_SPAN);
                u16::try_from(universe + offset).unwrap_or(u16::MAX)
            } else {
                u16::try_from(rng.random_range(0..universe)).unwrap_or(u16::MAX)
            };

            if rng.random_bool(0.05) {
                persisted.push(raw);
                step.persistent.push(EventRef::Id(raw));
            } else {
                step.events.push(EventRef::Id(raw));
            }
        }

        if !persisted.is_empty() && rng.random_bool(0.05) {
            let index = rng.random_range(0..persisted.len());
            step.unpersist.push(EventRef::Id(persisted.swap_remove(index)));
        }

        steps.push(step);
    }

    Ok(Scenario {
        name: format!("chaos-{}", options.seed),
        ticks: Some(options.ticks),
        steps,
        ..Scenario::default()
    })
}

fn random_live(rng: &mut StdRng) -> LiveSnapshot {
    const LANE_ALERTS: [LaneChangeAlert; 9] = [
        LaneChangeAlert::None,
        LaneChangeAlert::NudgelessBlockedNoLane,
        LaneChangeAlert::NudgelessCountdown,
        LaneChangeAlert::NudgelessBlockedOncoming,
        LaneChangeAlert::NudgelessBlockedTimeout,
        LaneChangeAlert::NudgelessBlockedMinSpeed,
        LaneChangeAlert::NudgelessBlockedOnePedal,
        LaneChangeAlert::NudgeWarningNoLane,
        LaneChangeAlert::NudgeWarningOncoming,
    ];

    let dead_services = if rng.random_bool(0.5) {
        vec!["radarState".to_string()]
    } else {
        Vec::new()
    };

    LiveSnapshot {
        calibration_percent: Some(rng.random_range(0..=100)),
        panda_type: Some(if rng.random_bool(0.5) {
            PandaType::Uno
        } else {
            PandaType::BlackPanda
        }),
        invalid_services: Vec::new(),
        dead_services,
        radar_errors: Some(vec!["canError".to_string()]),
        lane_change: Some(LaneChange {
            direction: if rng.random_bool(0.5) {
                LaneChangeDirection::Left
            } else {
                LaneChangeDirection::Right
            },
            alert: LANE_ALERTS[rng.random_range(0..LANE_ALERTS.len())],
            countdown: rng.random_range(0.0..5.0),
        }),
        seconds_stopped: Some(rng.random_range(-2..7200)),
        joystick_axes: Some(vec![rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)]),
    }
}
