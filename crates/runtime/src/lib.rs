#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Stick Walk Runtime
//!
//! Decouples the physics rate from the display rate. A driver calls
//! [`Simulation::tick`] once per available frame; the [`Scheduler`] converts
//! the real time since the previous tick into a whole number of fixed physics
//! steps and carries the remainder over. Every tick is recorded in a bounded
//! [`TickHistory`], which the render hook reads for drawing and for rolling
//! frame and update rates.
//!
//! ```rust
//! use physics::{IdentityStep, State};
//! use runtime::{ManualClock, NullObserver, Settings, Simulation, SimulationConfig};
//!
//! let clock = ManualClock::new(0.0);
//! let mut sim = Simulation::create(
//!     SimulationConfig::default(),
//!     State::new(0.0, 0.0),
//!     IdentityStep,
//!     clock.clone(),
//! )?;
//!
//! clock.advance(50.0);
//! let record = sim.tick(Settings::running(), &mut NullObserver)?;
//! assert_eq!(record.physics_steps, 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod history;
pub mod scheduler;
pub mod simulation;
pub mod tick;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{SimulationConfig, DEFAULT_HISTORY_CAPACITY, DEFAULT_UPDATES_PER_SECOND};
pub use driver::{Driver, SettingsProvider, StopSignal};
pub use error::{ConfigError, TickError};
pub use history::{HistoryStats, TickHistory};
pub use scheduler::Scheduler;
pub use simulation::{NullObserver, Observer, Simulation};
pub use tick::{Settings, TickRecord};
