//! # World State Snapshots
//!
//! A [`State`] is the world at one simulated instant. States are produced once
//! and then only read: physics steps build a new state from the previous one,
//! so every entry kept in the tick history stays a trustworthy snapshot.
//! Rigid bodies are held behind [`Arc`] and shared between consecutive states
//! until a step actually replaces them.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::PhysicsError;
use crate::rigid_body::RigidBody;

/// A named object in the world. Entities without a rigid body are markers.
#[derive(Clone, Debug, Default)]
pub struct Entity {
    rigid_body: Option<Arc<RigidBody>>,
}

impl Entity {
    #[must_use]
    pub fn new(rigid_body: Option<RigidBody>) -> Self {
        Self {
            rigid_body: rigid_body.map(Arc::new),
        }
    }

    #[must_use]
    pub fn with_body(rigid_body: RigidBody) -> Self {
        Self::new(Some(rigid_body))
    }

    #[must_use]
    pub fn rigid_body(&self) -> Option<&RigidBody> {
        self.rigid_body.as_deref()
    }

    /// Whether both entities hold the very same body snapshot.
    #[must_use]
    pub fn shares_body(&self, other: &Self) -> bool {
        match (&self.rigid_body, &other.rigid_body) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// World snapshot covering simulated time `[start_ms, end_ms]`.
#[derive(Clone, Debug, Default)]
pub struct State {
    start_ms: f64,
    end_ms: f64,
    entities: BTreeMap<String, Entity>,
}

impl State {
    #[must_use]
    pub fn new(start_ms: f64, end_ms: f64) -> Self {
        Self {
            start_ms,
            end_ms,
            entities: BTreeMap::new(),
        }
    }

    /// Add a uniquely named entity.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DuplicateEntity`] if the name is taken.
    pub fn insert_entity(
        &mut self,
        name: impl Into<String>,
        entity: Entity,
    ) -> Result<(), PhysicsError> {
        let name = name.into();
        if self.entities.contains_key(&name) {
            return Err(PhysicsError::DuplicateEntity(name));
        }
        self.entities.insert(name, entity);
        Ok(())
    }

    /// Builder-style [`State::insert_entity`].
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DuplicateEntity`] if the name is taken.
    pub fn with_entity(
        mut self,
        name: impl Into<String>,
        entity: Entity,
    ) -> Result<Self, PhysicsError> {
        self.insert_entity(name, entity)?;
        Ok(self)
    }

    #[must_use]
    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    #[must_use]
    pub fn end_ms(&self) -> f64 {
        self.end_ms
    }

    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    #[must_use]
    pub fn rigid_body(&self, entity: &str) -> Option<&RigidBody> {
        self.entity(entity).and_then(Entity::rigid_body)
    }

    /// Entities ordered by name.
    pub fn entities(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entities.iter().map(|(name, entity)| (name.as_str(), entity))
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// The state following this one after `dt_ms` of simulated time, with
    /// every entity carried over unchanged.
    #[must_use]
    pub fn advanced(&self, dt_ms: f64) -> Self {
        Self {
            start_ms: self.end_ms,
            end_ms: self.end_ms + dt_ms,
            entities: self.entities.clone(),
        }
    }

    /// The state following this one with the named entity's body replaced.
    /// Unknown names leave the entities untouched.
    #[must_use]
    pub fn advanced_with(&self, dt_ms: f64, bodies: impl IntoIterator<Item = (String, RigidBody)>) -> Self {
        let mut next = self.advanced(dt_ms);
        for (name, body) in bodies {
            if let Some(entity) = next.entities.get_mut(&name) {
                *entity = Entity::with_body(body);
            }
        }
        next
    }
}
