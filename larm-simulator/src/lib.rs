/*!
# Larm Simulator

Deterministic tick-loop driver for the alert arbitration engine. Scenarios
are scripted in YAML or generated from a seed, run against a catalog on a
virtual clock, and summarised by a BLAKE3 state hash so two runs can be
compared byte for byte.

## Key Components:
- **Tick Clock:** virtual time advanced one control period per tick.
- **Scenarios:** YAML steps raising events over tick ranges.
- **Tick Driver:** ingest, resolve, flag, export and retire, frame by frame.
- **Chaos Engine:** seeded random scenarios including unknown ids.
- **Replay Engine:** file-driven runs with hash verification.
*/

pub mod chaos;
pub mod clock;
pub mod driver;
mod error;
pub mod replay;
pub mod scenario;

pub use chaos::{generate_scenario, ChaosOptions};
pub use clock::TickClock;
pub use driver::{ResolvedAlert, SimulationReport, StockArbiter, TickDriver, TickFrame};
pub use error::ScenarioError;
pub use replay::{replay, replay_file};
pub use scenario::{CompiledScenario, EventRef, Scenario, Step, MAX_TICKS};
