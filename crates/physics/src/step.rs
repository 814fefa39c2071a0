//! # Physics Step Seam
//!
//! The scheduler advances the world through a [`PhysicsStep`]. An integrator,
//! or a controller tuned by an evolutionary search, plugs in here. A step is
//! a pure function of `(dt_ms, previous state)`: it must be deterministic and
//! must not alter anything reachable from the previous state, which the
//! `&State` borrow already enforces.

use std::error::Error;

use crate::state::State;

/// Error raised by an externally supplied hook.
pub type StepError = Box<dyn Error + Send + Sync + 'static>;

/// Advance the world by one fixed step of `dt_ms` milliseconds.
pub trait PhysicsStep {
    /// Produce the state that follows `prev`.
    ///
    /// # Errors
    ///
    /// Any error aborts the current tick; the scheduler does not retry.
    fn step(&self, dt_ms: f64, prev: &State) -> Result<State, StepError>;
}

impl<F> PhysicsStep for F
where
    F: Fn(f64, &State) -> Result<State, StepError>,
{
    fn step(&self, dt_ms: f64, prev: &State) -> Result<State, StepError> {
        self(dt_ms, prev)
    }
}

/// Default step: bodies are left where they are and only the simulated time
/// window moves forward.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentityStep;

impl PhysicsStep for IdentityStep {
    fn step(&self, dt_ms: f64, prev: &State) -> Result<State, StepError> {
        Ok(prev.advanced(dt_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_step_only_moves_time() {
        let state = State::new(0.0, 32.0);
        let next = IdentityStep.step(16.0, &state).unwrap();
        assert_eq!(next.start_ms(), 32.0);
        assert_eq!(next.end_ms(), 48.0);
        assert_eq!(next.entity_count(), 0);
        assert_eq!(state.end_ms(), 32.0);
    }

    #[test]
    fn closures_are_steps() {
        let failing = |_: f64, _: &State| -> Result<State, StepError> { Err("diverged".into()) };
        let err = failing.step(1.0, &State::default()).unwrap_err();
        assert_eq!(err.to_string(), "diverged");
    }
}
