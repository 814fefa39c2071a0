//! # Fixed-Timestep Scheduler
//!
//! Turns variable-rate ticks into a whole number of fixed physics steps.
//! Real time elapsed since the previous tick is added to the carried-over
//! accumulator; every full `dt` in it becomes one call to the physics step,
//! and the remainder is carried into the next tick. The accumulator is only
//! ever reduced by consumed steps, never reset, so rounding never drifts.

use std::sync::Arc;

use physics::PhysicsStep;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::config::SimulationConfig;
use crate::error::TickError;
use crate::tick::{Settings, TickRecord};

/// Slack when comparing the accumulator against `dt`, so elapsed times that
/// are whole multiples of `dt` are not lost to floating-point rounding.
const STEP_EPSILON_MS: f64 = 1e-9;

/// Step function of the simulation loop. Holds no state besides `dt` and a
/// counter of clock anomalies.
#[derive(Clone, Debug)]
pub struct Scheduler {
    dt_ms: f64,
    clock_anomalies: u64,
}

impl Scheduler {
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            dt_ms: config.dt_ms(),
            clock_anomalies: 0,
        }
    }

    #[must_use]
    pub fn dt_ms(&self) -> f64 {
        self.dt_ms
    }

    /// Ticks on which the clock reported time going backwards.
    #[must_use]
    pub fn clock_anomalies(&self) -> u64 {
        self.clock_anomalies
    }

    /// Compute the record that follows `previous`.
    ///
    /// Sleeps for the requested artificial delay, samples the clock, then
    /// runs as many physics steps as fit in the accumulated time. A paused
    /// tick runs no steps and keeps the previous timing anchors.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Step`] if the physics step fails. `previous` is
    /// untouched, so no simulated time is lost.
    pub fn advance_tick<S, C>(
        &mut self,
        previous: &TickRecord,
        settings: Settings,
        step: &S,
        clock: &C,
    ) -> Result<TickRecord, TickError>
    where
        S: PhysicsStep + ?Sized,
        C: Clock + ?Sized,
    {
        let settings = settings.sanitized();
        if settings.delay_ms > 0.0 {
            clock.sleep_ms(settings.delay_ms);
        }
        let mut now_ms = clock.now_ms();
        if !now_ms.is_finite() {
            self.clock_anomalies += 1;
            warn!(
                now_ms,
                previous_ms = previous.wall_ms,
                anomalies = self.clock_anomalies,
                "clock reading is not finite; reusing the previous tick time"
            );
            now_ms = previous.wall_ms;
        }
        let carried = Arc::clone(previous.last_state());

        if settings.paused {
            return Ok(TickRecord {
                accumulated_ms: previous.accumulated_ms,
                start_ms: previous.start_ms,
                wall_ms: now_ms,
                states: vec![carried],
                physics_steps: 0,
                delay_ms: settings.delay_ms,
                paused: true,
            });
        }

        // Time spent paused is not replayed: after a pause, measure from the
        // last paused tick.
        let anchor_ms = if previous.paused {
            previous.wall_ms
        } else {
            previous.start_ms
        };
        let mut elapsed_ms = now_ms - anchor_ms;
        if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            self.clock_anomalies += 1;
            warn!(
                now_ms,
                anchor_ms,
                anomalies = self.clock_anomalies,
                "clock went backwards; treating elapsed time as zero"
            );
            elapsed_ms = 0.0;
        }

        let mut accumulated_ms = elapsed_ms + previous.accumulated_ms;
        let mut states = Vec::new();
        let mut current = carried;
        while accumulated_ms + STEP_EPSILON_MS >= self.dt_ms {
            let next = step
                .step(self.dt_ms, &current)
                .map_err(|source| TickError::Step {
                    step: states.len() + 1,
                    source,
                })?;
            current = Arc::new(next);
            states.push(Arc::clone(&current));
            accumulated_ms = (accumulated_ms - self.dt_ms).max(0.0);
        }

        let physics_steps = states.len();
        if states.is_empty() {
            states.push(current);
        }

        debug!(
            elapsed_ms,
            physics_steps,
            accumulated_ms,
            "tick advanced"
        );

        Ok(TickRecord {
            accumulated_ms,
            start_ms: now_ms,
            wall_ms: now_ms,
            states,
            physics_steps,
            delay_ms: settings.delay_ms,
            paused: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use physics::{IdentityStep, State, StepError};

    fn seed() -> TickRecord {
        TickRecord::seed(State::new(0.0, 0.0), 0.0)
    }

    #[test]
    fn three_steps_in_fifty_milliseconds() {
        let clock = ManualClock::new(50.0);
        let mut scheduler = Scheduler::new(&SimulationConfig::default());
        let record = scheduler
            .advance_tick(&seed(), Settings::running(), &IdentityStep, &clock)
            .unwrap();
        assert_eq!(record.physics_steps, 3);
        assert_eq!(record.states().len(), 3);
        assert!(record.accumulated_ms.abs() < 1e-6);
        assert_eq!(record.start_ms, 50.0);
    }

    #[test]
    fn short_frame_carries_state_forward() {
        let clock = ManualClock::new(5.0);
        let mut scheduler = Scheduler::new(&SimulationConfig::default());
        let previous = seed();
        let record = scheduler
            .advance_tick(&previous, Settings::running(), &IdentityStep, &clock)
            .unwrap();
        assert_eq!(record.physics_steps, 0);
        assert_eq!(record.states().len(), 1);
        assert!(Arc::ptr_eq(record.last_state(), previous.last_state()));
        assert_eq!(record.accumulated_ms, 5.0);
    }

    #[test]
    fn delay_is_slept_before_sampling_time() {
        let clock = ManualClock::new(0.0);
        let mut scheduler = Scheduler::new(&SimulationConfig::default());
        let record = scheduler
            .advance_tick(&seed(), Settings::new(false, 40.0), &IdentityStep, &clock)
            .unwrap();
        assert_eq!(clock.now_ms(), 40.0);
        assert_eq!(record.physics_steps, 2);
        assert_eq!(record.delay_ms, 40.0);
    }

    #[test]
    fn failing_step_reports_its_index() {
        let clock = ManualClock::new(50.0);
        let mut scheduler = Scheduler::new(&SimulationConfig::default());
        let fail_second = |_: f64, prev: &State| -> Result<State, StepError> {
            if prev.end_ms() > 0.0 {
                Err("integrator diverged".into())
            } else {
                Ok(prev.advanced(1000.0 / 60.0))
            }
        };
        let err = scheduler
            .advance_tick(&seed(), Settings::running(), &fail_second, &clock)
            .unwrap_err();
        assert!(matches!(err, TickError::Step { step: 2, .. }));
    }
}
