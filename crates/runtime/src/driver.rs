//! # Pacing Driver
//!
//! Owns the loop that calls [`Simulation::tick`] once per frame. The loop
//! checks a cooperative [`StopSignal`] before every tick: a stop never
//! interrupts a tick in progress, it only prevents the next one. Frame pacing
//! sleeps on the simulation's own clock, so it blocks only this instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use physics::PhysicsStep;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::TickError;
use crate::simulation::{Observer, Simulation};
use crate::tick::Settings;

/// Clonable cooperative cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Supplies the input settings at the start of each tick.
pub trait SettingsProvider {
    fn sample(&mut self) -> Settings;
}

impl SettingsProvider for Settings {
    fn sample(&mut self) -> Settings {
        *self
    }
}

impl<F> SettingsProvider for F
where
    F: FnMut() -> Settings,
{
    fn sample(&mut self) -> Settings {
        self()
    }
}

/// Fixed-rate frame loop around a simulation.
#[derive(Copy, Clone, Debug)]
pub struct Driver {
    /// Target time between ticks; zero runs ticks back to back.
    pub frame_interval_ms: f64,
    /// Stop on its own after this many ticks.
    pub max_ticks: Option<u64>,
}

impl Driver {
    #[must_use]
    pub fn new(frames_per_second: f64) -> Self {
        let frame_interval_ms = if frames_per_second > 0.0 {
            1000.0 / frames_per_second
        } else {
            0.0
        };
        Self {
            frame_interval_ms,
            max_ticks: None,
        }
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    /// Tick `sim` until `stop` is raised or `max_ticks` is reached. Returns
    /// the number of completed ticks.
    ///
    /// # Errors
    ///
    /// Stops at the first failed tick and returns its error.
    pub fn run<S, C, P, O>(
        &self,
        sim: &mut Simulation<S, C>,
        settings: &mut P,
        observer: &mut O,
        stop: &StopSignal,
    ) -> Result<u64, TickError>
    where
        S: PhysicsStep,
        C: Clock,
        P: SettingsProvider + ?Sized,
        O: Observer + ?Sized,
    {
        let mut ticks = 0_u64;
        info!(
            frame_interval_ms = self.frame_interval_ms,
            max_ticks = ?self.max_ticks,
            "driver started"
        );

        loop {
            if stop.is_stopped() {
                debug!(ticks, "stop requested");
                break;
            }
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }

            let frame_start = sim.clock().now_ms();
            sim.tick(settings.sample(), observer)?;
            ticks += 1;

            let frame_time = sim.clock().now_ms() - frame_start;
            if frame_time < self.frame_interval_ms {
                sim.clock().sleep_ms(self.frame_interval_ms - frame_time);
            }
        }

        info!(ticks, "driver finished");
        Ok(ticks)
    }
}
