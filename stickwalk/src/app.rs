//! # Stick Walk Application Logic
//!
//! Loads the rig, then runs one or more independent simulation instances,
//! each on its own thread with its own clock and history. Every instance is
//! paced by a [`Driver`] and observed by a [`LogObserver`], which stands in
//! for a canvas renderer by logging rolling statistics.
//!
//! All instances share one [`StopSignal`]: when any of them fails, the others
//! finish their current tick and stop.

use std::path::PathBuf;
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use physics::{IdentityStep, State};
use runtime::{
    Driver, HistoryStats, Settings, Simulation, SimulationConfig, StopSignal, SystemClock,
    DEFAULT_HISTORY_CAPACITY, DEFAULT_UPDATES_PER_SECOND,
};
use tracing::{error, info};

use crate::observer::LogObserver;

/// Command-line options.
#[derive(Debug, Clone, Parser)]
#[command(name = "stickwalk", version, about = "Fixed-timestep stickman sandbox")]
pub struct Cli {
    /// Rig JSON to load instead of the built-in stick walk rig.
    #[arg(long)]
    pub rig: Option<PathBuf>,

    /// Physics updates per second.
    #[arg(long, default_value_t = DEFAULT_UPDATES_PER_SECOND)]
    pub ups: u32,

    /// Tick records kept for statistics.
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub history: usize,

    /// Display frames per second driving the ticks; 0 runs unpaced.
    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    /// Ticks to run per instance.
    #[arg(long, default_value_t = 300)]
    pub ticks: u64,

    /// Artificial delay added to every tick, in milliseconds.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub delay_ms: f64,

    /// Start with physics paused.
    #[arg(long)]
    pub paused: bool,

    /// Independent simulation instances, one thread each.
    #[arg(long, default_value_t = 1)]
    pub instances: usize,

    /// Log statistics every this many ticks.
    #[arg(long, default_value_t = 60)]
    pub log_every: u64,
}

/// Outcome of one simulation instance.
#[derive(Debug, Clone)]
pub struct InstanceReport {
    pub instance: usize,
    pub ticks: u64,
    pub simulated_ms: f64,
    pub clock_anomalies: u64,
    pub stats: Option<HistoryStats>,
}

/// Run every instance to completion.
///
/// # Errors
///
/// Returns the rig loading error, an invalid configuration, or the first
/// failed tick of any instance.
pub fn run(cli: &Cli) -> Result<Vec<InstanceReport>> {
    let config = SimulationConfig::new(cli.ups, cli.history).context("invalid simulation config")?;
    let initial = phenotype::load(cli.rig.as_deref())?;
    let settings = Settings::new(cli.paused, cli.delay_ms);
    let driver = Driver::new(cli.fps).with_max_ticks(cli.ticks);
    let stop = StopSignal::new();

    info!(
        instances = cli.instances,
        ups = cli.ups,
        fps = cli.fps,
        ticks = cli.ticks,
        "starting stick walk"
    );

    let results: Vec<Result<InstanceReport>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..cli.instances)
            .map(|instance| {
                let initial = initial.clone();
                let stop = stop.clone();
                let log_every = cli.log_every;
                scope.spawn(move || {
                    run_instance(instance, config, initial, driver, settings, log_every, &stop)
                })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(instance, handle)| {
                handle
                    .join()
                    .map_err(|_| anyhow!("instance {instance} panicked"))?
            })
            .collect()
    });

    let reports = results.into_iter().collect::<Result<Vec<_>>>()?;
    for report in &reports {
        info!(
            instance = report.instance,
            ticks = report.ticks,
            simulated_ms = report.simulated_ms,
            clock_anomalies = report.clock_anomalies,
            ups = report.stats.map(|s| s.updates_per_second),
            fps = report.stats.map(|s| s.frames_per_second),
            "instance finished"
        );
    }
    Ok(reports)
}

fn run_instance(
    instance: usize,
    config: SimulationConfig,
    initial: State,
    driver: Driver,
    mut settings: Settings,
    log_every: u64,
    stop: &StopSignal,
) -> Result<InstanceReport> {
    let mut sim = Simulation::create(config, initial, IdentityStep, SystemClock::new())?;
    let mut observer = LogObserver::new(instance, log_every);

    let ticks = match driver.run(&mut sim, &mut settings, &mut observer, stop) {
        Ok(ticks) => ticks,
        Err(e) => {
            error!(instance, error = %e, "instance failed; stopping all instances");
            stop.stop();
            return Err(e).with_context(|| format!("instance {instance} failed"));
        }
    };

    let clock_anomalies = sim.clock_anomalies();
    let history = sim.dispose();
    Ok(InstanceReport {
        instance,
        ticks,
        simulated_ms: history.last().last_state().end_ms(),
        clock_anomalies,
        stats: history.stats(),
    })
}
