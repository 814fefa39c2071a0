use physics::StepError;
use thiserror::Error;

/// Rejected simulation configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("updates per second must be positive")]
    NonPositiveUpdateRate,
    #[error("history capacity must be at least one record")]
    ZeroHistoryCapacity,
}

/// A tick that did not advance the simulation.
///
/// The history is left exactly as it was before the tick: no record is
/// appended and no accumulated time is consumed.
#[derive(Error, Debug)]
pub enum TickError {
    #[error("physics step {step} of this tick failed")]
    Step {
        step: usize,
        #[source]
        source: StepError,
    },
    #[error("render hook failed")]
    Observe {
        #[source]
        source: StepError,
    },
}
