use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use larm_catalog::load_catalog;
use larm_config::LarmConfig;
use larm_core::Arbiter;
use larm_simulator::{generate_scenario, replay_file, ChaosOptions, StockArbiter, TickDriver};
use larm_telemetry::MetricsRecorder;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "larm", version, about)]
pub struct Cli {
    /// Configuration file; defaults to `config/larm.yaml` plus `LARM_*` overrides
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scenario file through the arbiter
    Simulate(SimulateArgs),
    /// Run generated scenarios and check each one replays identically
    Fuzz(FuzzArgs),
    /// List catalog events and their categories
    Catalog,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[arg(short, long)]
    pub scenario: PathBuf,
    /// Fail unless the run produces this state hash
    #[arg(long)]
    pub validate_hash: Option<String>,
    /// Print every tick that resolved at least one alert
    #[arg(long)]
    pub verbose_frames: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FuzzArgs {
    /// Initial seed (auto-increments); defaults to `simulator.seed`
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of scenarios to run (0 for unlimited)
    #[arg(long, default_value_t = 10)]
    pub iterations: usize,
    /// Ticks per scenario; defaults to `simulator.ticks`
    #[arg(long)]
    pub ticks: Option<u64>,
}

fn build_arbiter(config: &LarmConfig) -> anyhow::Result<StockArbiter> {
    let catalog = load_catalog(config.catalog.overlay.as_deref())
        .context("failed to build event catalog")?;
    let arbiter = Arbiter::new(Arc::new(catalog), config.engine.tick())?
        .with_fallback(config.engine.fallback.to_fallback());
    Ok(arbiter)
}

fn metrics_for(config: &LarmConfig) -> anyhow::Result<Option<MetricsRecorder>> {
    if config.telemetry.metrics {
        Ok(Some(MetricsRecorder::new()?))
    } else {
        Ok(None)
    }
}

pub fn simulate(args: SimulateArgs, config: &LarmConfig) -> anyhow::Result<()> {
    let arbiter = build_arbiter(config)?;
    let metrics = metrics_for(config)?;
    let report = replay_file(
        &args.scenario,
        arbiter,
        args.validate_hash.as_deref(),
        metrics.clone(),
    )
    .with_context(|| format!("scenario {} failed", args.scenario.display()))?;

    if args.verbose_frames {
        for frame in report.frames.iter().filter(|frame| !frame.alerts.is_empty()) {
            let types: Vec<&str> = frame
                .alerts
                .iter()
                .map(|resolved| resolved.alert_type.as_str())
                .collect();
            println!("tick {:>6}: {}", frame.tick, types.join(", "));
        }
    }

    println!("ticks:           {}", report.frames.len());
    println!("unknown events:  {}", report.diagnostics.unknown_events);
    println!("template faults: {}", report.diagnostics.template_faults);
    println!("state hash:      {}", report.state_hash);
    if let Some(metrics) = metrics {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

pub fn fuzz(args: FuzzArgs, config: &LarmConfig) -> anyhow::Result<()> {
    let mut options = ChaosOptions {
        seed: args.seed.unwrap_or(config.simulator.seed),
        ticks: args.ticks.unwrap_or(u64::from(config.simulator.ticks)),
        unknown_probability: config.simulator.unknown_probability,
        max_events_per_tick: config.simulator.max_events_per_tick,
    };
    let metrics = metrics_for(config)?;

    let mut count = 0;
    loop {
        let arbiter = build_arbiter(config)?;
        let mut scenario = generate_scenario(arbiter.catalog(), &options)?;
        scenario.units = config.engine.units;
        let compiled = scenario.compile(arbiter.catalog())?;

        let mut driver = TickDriver::new(arbiter);
        if let Some(metrics) = &metrics {
            driver = driver.with_metrics(metrics.clone());
        }
        let first = driver.run(&compiled);
        let second = TickDriver::new(build_arbiter(config)?).run(&compiled);

        if first.state_hash != second.state_hash {
            bail!(
                "seed {} is not deterministic: {} != {}",
                options.seed,
                first.state_hash,
                second.state_hash
            );
        }
        if first.diagnostics.template_faults > 0 {
            warn!(
                seed = options.seed,
                faults = first.diagnostics.template_faults,
                "Fallback alerts used"
            );
        }
        info!(seed = options.seed, hash = %first.state_hash, "Fuzz iteration passed");

        count += 1;
        if args.iterations > 0 && count >= args.iterations {
            break;
        }
        options.seed = options.seed.wrapping_add(1);
    }

    println!("{count} scenarios replayed deterministically");
    if let Some(metrics) = metrics {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

pub fn list_catalog(config: &LarmConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(config.catalog.overlay.as_deref())
        .context("failed to build event catalog")?;
    for id in catalog.ids() {
        let categories: Vec<&str> = catalog
            .categories(id)
            .categories()
            .map(|category| category.as_str())
            .collect();
        println!(
            "{:>4}  {:<28} {}",
            id.raw(),
            catalog.name(id).unwrap_or("?"),
            categories.join(",")
        );
    }
    Ok(())
}
