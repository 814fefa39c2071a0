use crate::error::ConfigError;

/// Physics rate used when nothing else is configured.
pub const DEFAULT_UPDATES_PER_SECOND: u32 = 60;
/// Tick records retained for statistics and lookback.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Fixed-timestep simulation parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    pub updates_per_second: u32,
    pub history_capacity: usize,
}

impl SimulationConfig {
    /// Validated configuration.
    ///
    /// # Errors
    ///
    /// See [`SimulationConfig::validate`].
    pub fn new(updates_per_second: u32, history_capacity: usize) -> Result<Self, ConfigError> {
        let config = Self {
            updates_per_second,
            history_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Rejects a zero update rate and a zero history capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.updates_per_second == 0 {
            return Err(ConfigError::NonPositiveUpdateRate);
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        Ok(())
    }

    /// Length of one physics step in milliseconds.
    #[must_use]
    pub fn dt_ms(&self) -> f64 {
        1000.0 / f64::from(self.updates_per_second)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            updates_per_second: DEFAULT_UPDATES_PER_SECOND,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}
