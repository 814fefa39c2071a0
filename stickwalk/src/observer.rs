use physics::StepError;
use runtime::{Observer, TickHistory};
use tracing::{debug, info};

/// Render hook that logs rolling statistics instead of drawing.
#[derive(Debug, Clone)]
pub struct LogObserver {
    instance: usize,
    every: u64,
    ticks: u64,
}

impl LogObserver {
    #[must_use]
    pub fn new(instance: usize, every: u64) -> Self {
        Self {
            instance,
            every: every.max(1),
            ticks: 0,
        }
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Observer for LogObserver {
    fn observe(&mut self, history: &TickHistory) -> Result<(), StepError> {
        self.ticks += 1;
        let last = history.last();
        debug!(
            instance = self.instance,
            tick = self.ticks,
            physics_steps = last.physics_steps,
            accumulated_ms = last.accumulated_ms,
            "frame"
        );

        if self.ticks % self.every != 0 {
            return Ok(());
        }
        let state = last.last_state();
        match history.stats() {
            Some(stats) => info!(
                instance = self.instance,
                tick = self.ticks,
                fps = stats.frames_per_second,
                ups = stats.updates_per_second,
                frame_ms = stats.instant_frame_interval_ms,
                accumulated_ms = last.accumulated_ms,
                simulated_ms = state.end_ms(),
                paused = last.paused,
                "simulation tick {} complete",
                self.ticks
            ),
            None => info!(
                instance = self.instance,
                tick = self.ticks,
                simulated_ms = state.end_ms(),
                "simulation tick {} complete, not enough history for rates yet",
                self.ticks
            ),
        }
        Ok(())
    }
}
