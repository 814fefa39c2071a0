#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Stick Walk Physics
//!
//! The physics layer of Stick Walk: 2D particle primitives, the constraint
//! graph that articulates them into rigid bodies, and immutable world
//! snapshots that the runtime scheduler advances one fixed step at a time.
//!
//! ## Key Components
//!
//! -   **Primitives:** [`Vec2`] and [`Particle`] live in [`types`].
//! -   **Rigid bodies:** [`RigidBodyBuilder`] in [`rigid_body`] resolves
//!     authored edges and their parent attachments into a [`RigidBody`], an
//!     arena of shared joint particles over an acyclic edge graph.
//! -   **Snapshots:** [`State`] in [`state`] maps entity names to
//!     [`Entity`] values at one simulated instant.
//! -   **Step seam:** [`PhysicsStep`] in [`step`] is the pure function the
//!     scheduler calls once per fixed step. [`IdentityStep`] is the default
//!     until an integrator or controller is attached.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{Entity, IdentityStep, Particle, PhysicsStep, RigidBody, State, Vec2};
//!
//! let mut builder = RigidBody::builder();
//! builder.edge("torso", Particle::new(Vec2::new(0.0, 0.0), 5.0), Particle::new(Vec2::new(0.0, -20.0), 5.0));
//! builder
//!     .edge("neck", Particle::new(Vec2::new(0.0, -20.0), 5.0), Particle::new(Vec2::new(0.0, -30.0), 5.0))
//!     .attach_begin("torso");
//! let body = builder.build()?;
//! assert_eq!(body.particle_count(), 3);
//!
//! let state = State::new(0.0, 0.0).with_entity("skeleton", Entity::with_body(body))?;
//! let next = IdentityStep.step(1000.0 / 60.0, &state)?;
//! assert!(next.end_ms() > state.end_ms());
//! # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
//! ```

pub mod error;
pub mod rigid_body;
pub mod state;
pub mod step;
pub mod types;

pub use error::PhysicsError;
pub use rigid_body::{
    Edge, EdgeId, EdgeSpec, ParticleId, ResolvedEdge, RigidBody, RigidBodyBuilder, Skeleton,
};
pub use state::{Entity, State};
pub use step::{IdentityStep, PhysicsStep, StepError};
pub use types::{Endpoint, Particle, Vec2};
