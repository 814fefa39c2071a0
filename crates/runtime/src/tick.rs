use std::sync::Arc;

use physics::State;

/// Input settings sampled once at the start of a tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub paused: bool,
    /// Artificial per-tick delay used to simulate slow frames.
    pub delay_ms: f64,
}

impl Settings {
    #[must_use]
    pub fn new(paused: bool, delay_ms: f64) -> Self {
        Self { paused, delay_ms }.sanitized()
    }

    #[must_use]
    pub fn running() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn paused() -> Self {
        Self {
            paused: true,
            delay_ms: 0.0,
        }
    }

    /// Negative or non-finite delays become zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let delay_ms = if self.delay_ms.is_finite() && self.delay_ms > 0.0 {
            self.delay_ms
        } else {
            0.0
        };
        Self { delay_ms, ..self }
    }
}

/// Outcome of one tick.
///
/// Only the scheduler and [`TickRecord::seed`] build records, so the state
/// list can never be empty:
///
/// ```compile_fail
/// use runtime::TickRecord;
///
/// let record = TickRecord {
///     accumulated_ms: 0.0,
///     start_ms: 0.0,
///     wall_ms: 0.0,
///     states: Vec::new(),
///     physics_steps: 0,
///     delay_ms: 0.0,
///     paused: false,
/// };
/// ```
#[derive(Clone, Debug)]
pub struct TickRecord {
    /// Simulated time carried over that did not fill a whole step, in
    /// `[0, dt)`.
    pub accumulated_ms: f64,
    /// Real time the accumulator is anchored at. Paused ticks keep the anchor
    /// of the tick before them.
    pub start_ms: f64,
    /// Real time at which this tick was taken.
    pub wall_ms: f64,
    pub(crate) states: Vec<Arc<State>>,
    /// Genuine physics steps run this tick.
    pub physics_steps: usize,
    pub delay_ms: f64,
    pub paused: bool,
}

impl TickRecord {
    /// First record of a simulation, holding only the initial state.
    #[must_use]
    pub fn seed(initial: State, now_ms: f64) -> Self {
        Self {
            accumulated_ms: 0.0,
            start_ms: now_ms,
            wall_ms: now_ms,
            states: vec![Arc::new(initial)],
            physics_steps: 0,
            delay_ms: 0.0,
            paused: false,
        }
    }

    /// States produced this tick, oldest first. Never empty: a tick without a
    /// whole step carries the previous state forward.
    #[must_use]
    pub fn states(&self) -> &[Arc<State>] {
        &self.states
    }

    /// Most recent state of this tick.
    #[must_use]
    pub fn last_state(&self) -> &Arc<State> {
        // `states` is never empty; `seed` and the scheduler both guarantee it.
        &self.states[self.states.len() - 1]
    }
}
