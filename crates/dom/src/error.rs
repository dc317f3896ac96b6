use thiserror::Error;

/// Structural errors are programmer errors: they are never retried and
/// never silently clamped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("child index {index} out of range (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("reference node not found among direct children")]
    ReferenceNotFound,

    #[error("node is not a child of the given parent")]
    NotAChild,

    #[error("node kind cannot hold children")]
    NotNestable,

    #[error("node kind cannot hold attributes")]
    NotAnAttributeHolder,

    #[error("operation would create a cycle in the tree")]
    CycleDetected,
}
