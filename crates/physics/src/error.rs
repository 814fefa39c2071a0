use thiserror::Error;

use crate::types::Endpoint;

/// Construction-time errors for rigid bodies and world states.
///
/// All of these are configuration mistakes in the authored topology. They are
/// reported once, when the body or state is built, and never coerced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("edge `{0}` is declared more than once in the same rigid body")]
    DuplicateEdge(String),
    #[error("edge `{edge}` attaches its {endpoint} to unknown edge `{parent}`")]
    UnknownParent {
        edge: String,
        endpoint: Endpoint,
        parent: String,
    },
    #[error("parent attachments form a cycle through edges {edges:?}")]
    CyclicAttachment { edges: Vec<String> },
    #[error("entity `{0}` is declared more than once in the same state")]
    DuplicateEntity(String),
    #[error("edge `{edge}` has an invalid {endpoint} particle: {reason}")]
    InvalidParticle {
        edge: String,
        endpoint: Endpoint,
        reason: &'static str,
    },
    #[error("edge `{edge}` resolves both endpoints to the same particle")]
    DegenerateEdge { edge: String },
    #[error("expected {expected} particles for this skeleton, got {actual}")]
    ParticleCountMismatch { expected: usize, actual: usize },
}
