#![deny(clippy::all, clippy::pedantic)]
//! # Rig Loader
//!
//! Reads the initial world from JSON: entities, their rigid bodies, the
//! edges of each body and the particles at both ends. The schema mirrors
//! the world state exactly. Unknown fields and missing particle fields are
//! rejected, and so is anything [`physics::RigidBodyBuilder`] rejects
//! (duplicate names, dangling or cyclic parent attachments).
//!
//! The stick walk rig (a box, a pinned ground line and a nine segment
//! skeleton) is built in; see [`stick_walk`].

mod named;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use physics::{Entity, Particle, RigidBody, State, Vec2};
use serde::Deserialize;
use tracing::info;

pub use named::NamedMap;

/// JSON source of the built-in rig.
pub const STICK_WALK_RIG: &str = include_str!("../rigs/stick_walk.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Rig {
    pub start_ms: f64,
    pub end_ms: f64,
    pub entities: NamedMap<EntityDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct EntityDef {
    #[serde(default)]
    pub rigid_body: Option<RigidBodyDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RigidBodyDef {
    pub edges: NamedMap<EdgeDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDef {
    pub begin: ParticleDef,
    pub end: ParticleDef,
    #[serde(default)]
    pub parents: Option<ParentsDef>,
}

/// Edges whose endpoints the `begin` and `end` of an edge sit on.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParentsDef {
    #[serde(default)]
    pub begin: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParticleDef {
    pub position: VecDef,
    pub velocity: VecDef,
    pub mass: f64,
    pub pinned: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VecDef {
    pub x: f64,
    pub y: f64,
}

impl From<VecDef> for Vec2 {
    fn from(v: VecDef) -> Self {
        Vec2::new(v.x, v.y)
    }
}

impl From<ParticleDef> for Particle {
    fn from(p: ParticleDef) -> Self {
        Particle {
            position: p.position.into(),
            velocity: p.velocity.into(),
            mass: p.mass,
            pinned: p.pinned,
        }
    }
}

impl Rig {
    /// Parse a rig from JSON text.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, unknown or missing fields, and repeated
    /// entity or edge names.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid rig JSON")
    }

    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read rig {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("failed to load rig {}", path.display()))
    }

    /// Build the validated initial state.
    ///
    /// # Errors
    ///
    /// Fails if any rigid body is rejected by the constraint graph builder.
    pub fn into_state(self) -> Result<State> {
        let mut state = State::new(self.start_ms, self.end_ms);
        for (name, def) in self.entities {
            let body = def
                .rigid_body
                .map(|body| body.build())
                .transpose()
                .with_context(|| format!("invalid rigid body for entity `{name}`"))?;
            state.insert_entity(name, Entity::new(body))?;
        }
        info!(entities = state.entity_count(), "rig loaded");
        Ok(state)
    }
}

impl RigidBodyDef {
    /// # Errors
    ///
    /// See [`physics::RigidBodyBuilder::build`].
    pub fn build(self) -> Result<RigidBody, physics::PhysicsError> {
        let mut builder = RigidBody::builder();
        for (name, edge) in self.edges {
            let spec = builder.edge(name, edge.begin.into(), edge.end.into());
            let parents = edge.parents.unwrap_or_default();
            if let Some(parent) = parents.begin {
                spec.attach_begin(parent);
            }
            if let Some(parent) = parents.end {
                spec.attach_end(parent);
            }
        }
        builder.build()
    }
}

/// Initial state of the built-in stick walk rig.
///
/// # Errors
///
/// Only fails if the bundled rig itself is broken.
pub fn stick_walk() -> Result<State> {
    Rig::parse(STICK_WALK_RIG)?.into_state()
}

/// Load a rig file, or the built-in rig when no path is given.
///
/// # Errors
///
/// See [`Rig::from_path`] and [`Rig::into_state`].
pub fn load(path: Option<&Path>) -> Result<State> {
    match path {
        Some(path) => Rig::from_path(path)?
            .into_state()
            .with_context(|| format!("rig {} is not a valid world", path.display())),
        None => stick_walk(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_rig_loads() {
        let state = stick_walk().unwrap();
        assert_eq!(state.entity_count(), 3);
        let skeleton = state.rigid_body("skeleton").unwrap();
        assert_eq!(skeleton.edge_count(), 9);
        // torso 2, neck 1, head 1, hands 2, knees 2, feet 2
        assert_eq!(skeleton.particle_count(), 10);
        let ground = state.rigid_body("ground").unwrap();
        assert!(ground.particles().iter().all(|p| p.pinned));
    }

    #[test]
    fn parents_default_to_none() {
        let json = r#"{"begin": {"position": {"x": 0, "y": 0}, "velocity": {"x": 0, "y": 0}, "mass": 1, "pinned": false},
                       "end":   {"position": {"x": 1, "y": 0}, "velocity": {"x": 0, "y": 0}, "mass": 1, "pinned": false}}"#;
        let edge: EdgeDef = serde_json::from_str(json).unwrap();
        assert!(edge.parents.is_none());
    }
}
