//! # Rigid Body Constraint Graph
//!
//! A rigid body is a named set of edges (distance segments) between particles.
//! An edge endpoint may declare a *parent attachment*: it sits on an endpoint
//! of another edge instead of owning an independent particle. Attachments are
//! resolved once, when the body is built, into a particle arena where a shared
//! joint is a single particle referenced by every edge that meets there.
//!
//! The attachment relation must be acyclic. [`RigidBodyBuilder::build`] orders
//! edges topologically (Kahn's algorithm, ready edges taken in name order so
//! the authored order never changes the result) and rejects cycles.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::PhysicsError;
use crate::types::{Endpoint, Particle, Vec2};

/// Authored and resolved positions further apart than this are reported.
const ATTACHMENT_TOLERANCE: f64 = 1e-6;

/// Handle to an edge, its index in authored order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl EdgeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle into the particle arena of a rigid body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u32);

impl ParticleId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Resolved edge: particle handles plus the attachments it was authored with.
#[derive(Clone, Debug)]
pub struct Edge {
    name: String,
    begin: ParticleId,
    end: ParticleId,
    parent_begin: Option<EdgeId>,
    parent_end: Option<EdgeId>,
}

impl Edge {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn begin(&self) -> ParticleId {
        self.begin
    }

    #[must_use]
    pub fn end(&self) -> ParticleId {
        self.end
    }

    #[must_use]
    pub fn particle(&self, endpoint: Endpoint) -> ParticleId {
        match endpoint {
            Endpoint::Begin => self.begin,
            Endpoint::End => self.end,
        }
    }

    #[must_use]
    pub fn parent(&self, endpoint: Endpoint) -> Option<EdgeId> {
        match endpoint {
            Endpoint::Begin => self.parent_begin,
            Endpoint::End => self.parent_end,
        }
    }

    /// An edge with no parent attachment on either end.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_begin.is_none() && self.parent_end.is_none()
    }
}

/// Immutable topology of a rigid body, shared between every snapshot of it.
#[derive(Debug)]
pub struct Skeleton {
    edges: Vec<Edge>,
    by_name: HashMap<String, EdgeId>,
    order: Vec<EdgeId>,
    particle_count: usize,
}

/// Edge with its endpoint positions looked up in the particle arena.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEdge {
    pub name: String,
    pub begin: Vec2,
    pub end: Vec2,
}

/// Skeleton plus the current particle arena.
///
/// Bodies are never mutated after construction; a physics step produces a new
/// body through [`RigidBody::with_particles`] or [`RigidBody::map_particles`],
/// which share the skeleton with the original.
#[derive(Clone, Debug)]
pub struct RigidBody {
    skeleton: Arc<Skeleton>,
    particles: Vec<Particle>,
}

impl RigidBody {
    #[must_use]
    pub fn builder() -> RigidBodyBuilder {
        RigidBodyBuilder::new()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.skeleton.edges.len()
    }

    #[must_use]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.index())
    }

    #[must_use]
    pub fn edge_id(&self, name: &str) -> Option<EdgeId> {
        self.skeleton.by_name.get(name).copied()
    }

    #[must_use]
    pub fn edge(&self, name: &str) -> Option<&Edge> {
        self.edge_id(name).map(|id| &self.skeleton.edges[id.index()])
    }

    /// Edges in authored order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.skeleton.edges.iter()
    }

    /// Edges with roots first; every edge comes after the edges it attaches to.
    #[must_use]
    pub fn topological_order(&self) -> &[EdgeId] {
        &self.skeleton.order
    }

    /// Current `(begin, end)` positions of the named edge.
    #[must_use]
    pub fn endpoints(&self, name: &str) -> Option<(Vec2, Vec2)> {
        self.edge(name).map(|edge| {
            (
                self.particles[edge.begin.index()].position,
                self.particles[edge.end.index()].position,
            )
        })
    }

    /// Endpoint positions of every edge, in topological order.
    #[must_use]
    pub fn resolve(&self) -> Vec<ResolvedEdge> {
        self.skeleton
            .order
            .iter()
            .map(|id| {
                let edge = &self.skeleton.edges[id.index()];
                ResolvedEdge {
                    name: edge.name.clone(),
                    begin: self.particles[edge.begin.index()].position,
                    end: self.particles[edge.end.index()].position,
                }
            })
            .collect()
    }

    /// New body over the same skeleton with a replaced particle arena.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::ParticleCountMismatch`] if `particles` does not
    /// have exactly one entry per arena slot.
    pub fn with_particles(&self, particles: Vec<Particle>) -> Result<Self, PhysicsError> {
        if particles.len() != self.skeleton.particle_count {
            return Err(PhysicsError::ParticleCountMismatch {
                expected: self.skeleton.particle_count,
                actual: particles.len(),
            });
        }
        Ok(Self {
            skeleton: Arc::clone(&self.skeleton),
            particles,
        })
    }

    /// New body over the same skeleton with every particle passed through `f`.
    #[must_use]
    pub fn map_particles<F>(&self, mut f: F) -> Self
    where
        F: FnMut(ParticleId, &Particle) -> Particle,
    {
        let particles = self
            .particles
            .iter()
            .enumerate()
            .map(|(i, p)| f(ParticleId(arena_index(i)), p))
            .collect();
        Self {
            skeleton: Arc::clone(&self.skeleton),
            particles,
        }
    }

    /// Whether both bodies are snapshots of the same skeleton.
    #[must_use]
    pub fn shares_skeleton(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.skeleton, &other.skeleton)
    }
}

/// Authored edge awaiting resolution.
#[derive(Clone, Debug)]
pub struct EdgeSpec {
    name: String,
    begin: Particle,
    end: Particle,
    parent_begin: Option<String>,
    parent_end: Option<String>,
}

impl EdgeSpec {
    /// Attach this edge's `begin` to an endpoint of `parent`.
    pub fn attach_begin(&mut self, parent: impl Into<String>) -> &mut Self {
        self.parent_begin = Some(parent.into());
        self
    }

    /// Attach this edge's `end` to an endpoint of `parent`.
    pub fn attach_end(&mut self, parent: impl Into<String>) -> &mut Self {
        self.parent_end = Some(parent.into());
        self
    }

    fn parent(&self, endpoint: Endpoint) -> Option<&str> {
        match endpoint {
            Endpoint::Begin => self.parent_begin.as_deref(),
            Endpoint::End => self.parent_end.as_deref(),
        }
    }

    fn particle(&self, endpoint: Endpoint) -> &Particle {
        match endpoint {
            Endpoint::Begin => &self.begin,
            Endpoint::End => &self.end,
        }
    }
}

/// Collects authored edges and resolves them into a [`RigidBody`].
#[derive(Clone, Debug, Default)]
pub struct RigidBodyBuilder {
    specs: Vec<EdgeSpec>,
}

impl RigidBodyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge with its authored endpoint particles.
    pub fn edge(&mut self, name: impl Into<String>, begin: Particle, end: Particle) -> &mut EdgeSpec {
        self.specs.push(EdgeSpec {
            name: name.into(),
            begin,
            end,
            parent_begin: None,
            parent_end: None,
        });
        let last = self.specs.len() - 1;
        &mut self.specs[last]
    }

    /// Validate the authored edges and resolve attachments.
    ///
    /// # Errors
    ///
    /// Fails on duplicate edge names, invalid particles, attachments to
    /// unknown edges, cyclic attachments, and edges whose two endpoints
    /// land on the same joint.
    pub fn build(self) -> Result<RigidBody, PhysicsError> {
        let specs = self.specs;

        let mut by_name: HashMap<String, EdgeId> = HashMap::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            for endpoint in [Endpoint::Begin, Endpoint::End] {
                spec.particle(endpoint)
                    .validate()
                    .map_err(|reason| PhysicsError::InvalidParticle {
                        edge: spec.name.clone(),
                        endpoint,
                        reason,
                    })?;
            }
            if by_name.insert(spec.name.clone(), EdgeId(arena_index(i))).is_some() {
                return Err(PhysicsError::DuplicateEdge(spec.name.clone()));
            }
        }

        let parents = resolve_parent_ids(&specs, &by_name)?;
        let order = topological_order(&specs, &parents)?;

        let mut particles: Vec<Particle> = Vec::with_capacity(specs.len() * 2);
        let mut slots: Vec<Option<(ParticleId, ParticleId)>> = vec![None; specs.len()];
        for id in &order {
            let spec = &specs[id.index()];
            let [parent_begin, parent_end] = parents[id.index()];
            let begin = place_endpoint(spec, Endpoint::Begin, parent_begin, &specs, &slots, &mut particles);
            let end = place_endpoint(spec, Endpoint::End, parent_end, &specs, &slots, &mut particles);
            if begin == end {
                return Err(PhysicsError::DegenerateEdge {
                    edge: spec.name.clone(),
                });
            }
            slots[id.index()] = Some((begin, end));
        }

        let edges = specs
            .into_iter()
            .zip(slots)
            .zip(parents)
            .map(|((spec, slot), [parent_begin, parent_end])| {
                // Every edge appears in `order`, so every slot is filled.
                let (begin, end) = slot.unwrap_or((ParticleId(0), ParticleId(0)));
                Edge {
                    name: spec.name,
                    begin,
                    end,
                    parent_begin,
                    parent_end,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            edges = edges.len(),
            particles = particles.len(),
            "rigid body resolved"
        );

        let particle_count = particles.len();
        Ok(RigidBody {
            skeleton: Arc::new(Skeleton {
                edges,
                by_name,
                order,
                particle_count,
            }),
            particles,
        })
    }
}

fn arena_index(i: usize) -> u32 {
    u32::try_from(i).unwrap_or(u32::MAX)
}

fn resolve_parent_ids(
    specs: &[EdgeSpec],
    by_name: &HashMap<String, EdgeId>,
) -> Result<Vec<[Option<EdgeId>; 2]>, PhysicsError> {
    specs
        .iter()
        .map(|spec| {
            let lookup = |endpoint: Endpoint| -> Result<Option<EdgeId>, PhysicsError> {
                match spec.parent(endpoint) {
                    None => Ok(None),
                    Some(parent) => by_name.get(parent).copied().map(Some).ok_or_else(|| {
                        PhysicsError::UnknownParent {
                            edge: spec.name.clone(),
                            endpoint,
                            parent: parent.to_owned(),
                        }
                    }),
                }
            };
            Ok([lookup(Endpoint::Begin)?, lookup(Endpoint::End)?])
        })
        .collect()
}

fn topological_order(
    specs: &[EdgeSpec],
    parents: &[[Option<EdgeId>; 2]],
) -> Result<Vec<EdgeId>, PhysicsError> {
    let mut pending = vec![0_usize; specs.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); specs.len()];
    for (child, pair) in parents.iter().enumerate() {
        let mut distinct: Vec<EdgeId> = pair.iter().flatten().copied().collect();
        distinct.dedup();
        for parent in distinct {
            pending[child] += 1;
            children[parent.index()].push(child);
        }
    }

    let mut ready: BTreeSet<(&str, usize)> = pending
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(i, _)| (specs[i].name.as_str(), i))
        .collect();

    let mut order = Vec::with_capacity(specs.len());
    while let Some(next) = ready.pop_first() {
        let (_, index) = next;
        order.push(EdgeId(arena_index(index)));
        for &child in &children[index] {
            pending[child] -= 1;
            if pending[child] == 0 {
                ready.insert((specs[child].name.as_str(), child));
            }
        }
    }

    if order.len() < specs.len() {
        let mut edges: Vec<String> = pending
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(i, _)| specs[i].name.clone())
            .collect();
        edges.sort();
        return Err(PhysicsError::CyclicAttachment { edges });
    }
    Ok(order)
}

/// Pick the particle for one endpoint: a fresh arena slot for a free
/// endpoint, or the nearest endpoint of the already-placed parent. An exact
/// tie goes to the parent's `end`.
fn place_endpoint(
    spec: &EdgeSpec,
    endpoint: Endpoint,
    parent: Option<EdgeId>,
    specs: &[EdgeSpec],
    slots: &[Option<(ParticleId, ParticleId)>],
    particles: &mut Vec<Particle>,
) -> ParticleId {
    let authored = *spec.particle(endpoint);
    let Some((parent_begin, parent_end)) = parent.and_then(|p| slots[p.index()]) else {
        particles.push(authored);
        return ParticleId(arena_index(particles.len() - 1));
    };

    let to_begin = authored.position.distance(particles[parent_begin.index()].position);
    let to_end = authored.position.distance(particles[parent_end.index()].position);
    let (shared, gap) = if to_end <= to_begin {
        (parent_end, to_end)
    } else {
        (parent_begin, to_begin)
    };

    if gap > ATTACHMENT_TOLERANCE {
        if let Some(parent) = parent {
            warn!(
                edge = %spec.name,
                %endpoint,
                parent = %specs[parent.index()].name,
                gap,
                "attached endpoint does not coincide with its parent; using the parent's position"
            );
        }
    }
    shared
}
