//! # Stick Walk
//!
//! A real-time sandbox for an articulated stickman whose joint actuation is
//! meant to be tuned by an evolutionary search. The core is a fixed-timestep
//! simulation clock: physics advances at a constant rate no matter how fast
//! or slow frames arrive, and a bounded history of recent ticks feeds frame
//! and update rate statistics.
//!
//! ## Project Architecture
//!
//! -   **`stickwalk`:** This crate. The executable entry point: command-line
//!     parsing, logging, and one thread per simulation instance.
//! -   **[`physics`]:** Particles, the rigid-body constraint graph, immutable
//!     world snapshots, and the [`physics::PhysicsStep`] seam an integrator
//!     or controller plugs into.
//! -   **[`runtime`]:** The fixed-timestep scheduler, the tick history ring
//!     buffer, the simulation lifecycle and the pacing driver.
//! -   **[`phenotype`]:** Loads rigs from JSON and ships the built-in stick
//!     walk rig (box, pinned ground line, nine segment skeleton).

pub mod app;
pub mod observer;

pub use phenotype;
pub use physics;
pub use runtime;
