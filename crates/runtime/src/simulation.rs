//! # Simulation Instance
//!
//! An explicitly owned simulation: its configuration, history, physics step
//! and clock. There is no ambient state, so several instances can run side by
//! side, each on its own thread.

use physics::{PhysicsStep, State, StepError};
use tracing::{error, info};

use crate::clock::Clock;
use crate::config::SimulationConfig;
use crate::error::{ConfigError, TickError};
use crate::history::TickHistory;
use crate::scheduler::Scheduler;
use crate::tick::{Settings, TickRecord};

/// Render hook, called once per tick with the updated history.
pub trait Observer {
    /// # Errors
    ///
    /// An error undoes the tick that was just recorded.
    fn observe(&mut self, history: &TickHistory) -> Result<(), StepError>;
}

impl<F> Observer for F
where
    F: FnMut(&TickHistory) -> Result<(), StepError>,
{
    fn observe(&mut self, history: &TickHistory) -> Result<(), StepError> {
        self(history)
    }
}

/// Observer that ignores every tick.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn observe(&mut self, _history: &TickHistory) -> Result<(), StepError> {
        Ok(())
    }
}

pub struct Simulation<S, C> {
    config: SimulationConfig,
    scheduler: Scheduler,
    history: TickHistory,
    step: S,
    clock: C,
}

impl<S, C> Simulation<S, C>
where
    S: PhysicsStep,
    C: Clock,
{
    /// Seed a simulation with its initial state at the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid configuration.
    pub fn create(
        config: SimulationConfig,
        initial: State,
        step: S,
        clock: C,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = TickRecord::seed(initial, clock.now_ms());
        info!(
            updates_per_second = config.updates_per_second,
            history_capacity = config.history_capacity,
            entities = seed.last_state().entity_count(),
            "simulation created"
        );
        Ok(Self {
            scheduler: Scheduler::new(&config),
            history: TickHistory::with_seed(config.history_capacity, seed),
            config,
            step,
            clock,
        })
    }

    /// Run one tick: advance physics, record the result, then hand the
    /// history to `observer`.
    ///
    /// # Errors
    ///
    /// A failing physics step or observer leaves the history and the clock
    /// anomaly count as they were before the tick.
    pub fn tick<O>(&mut self, settings: Settings, observer: &mut O) -> Result<&TickRecord, TickError>
    where
        O: Observer + ?Sized,
    {
        let checkpoint = self.scheduler.clone();
        let record = match self.scheduler.advance_tick(
            self.history.last(),
            settings,
            &self.step,
            &self.clock,
        ) {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "physics step failed; tick discarded");
                self.scheduler = checkpoint;
                return Err(e);
            }
        };

        let evicted = self.history.append(record);
        if let Err(source) = observer.observe(&self.history) {
            error!(error = %source, "render hook failed; tick rolled back");
            self.history.rollback(evicted);
            self.scheduler = checkpoint;
            return Err(TickError::Observe { source });
        }
        Ok(self.history.last())
    }

    #[must_use]
    pub fn history(&self) -> &TickHistory {
        &self.history
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn current_state(&self) -> &State {
        self.history.last().last_state()
    }

    /// Ticks on which the clock went backwards.
    #[must_use]
    pub fn clock_anomalies(&self) -> u64 {
        self.scheduler.clock_anomalies()
    }

    /// Tear the simulation down, keeping its history.
    #[must_use]
    pub fn dispose(self) -> TickHistory {
        info!(
            records = self.history.len(),
            simulated_ms = self.current_state().end_ms(),
            "simulation disposed"
        );
        self.history
    }
}
