//! MeshModelError: Unified error type for model-sieve public APIs
//!
//! Every fallible operation of the attribute store, the mesh element
//! collections and the relationship graph reports through this type.
//! Failures are local and synchronous: a call that returns an error has not
//! mutated any state.

use thiserror::Error;

use crate::data::attribute::AttributeKind;
use crate::data::value::ValueType;
use crate::topology::component::{ComponentId, ComponentType};
use crate::topology::relation::RelationKind;

/// Unified error type for model-sieve operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshModelError {
    /// No attribute registered under this name.
    #[error("attribute `{name}` not found")]
    AttributeNotFound { name: String },
    /// The attribute exists but stores another element type.
    #[error("attribute `{name}` stores `{found}` values, requested `{expected}`")]
    AttributeTypeMismatch {
        name: String,
        expected: ValueType,
        found: ValueType,
    },
    /// Element index is not below the element count.
    #[error("index {index} out of range for {len} elements")]
    OutOfRange { index: usize, len: usize },
    /// The operation is not available for this attribute storage.
    #[error("unsupported operation on {kind:?} attribute: {operation}")]
    Unsupported {
        kind: AttributeKind,
        operation: &'static str,
    },
    /// A deletion mask whose length differs from the element count.
    #[error("deletion mask has {found} flags, expected {expected}")]
    MaskLengthMismatch { expected: usize, found: usize },
    /// Permutation is not a bijection of `0..len`.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),
    /// Interpolation weights and indices differ in length.
    #[error("interpolation has {indices} indices but {lambdas} weights")]
    InterpolationLengthMismatch { indices: usize, lambdas: usize },
    /// Point coordinates of the wrong dimension.
    #[error("expected {expected} coordinates, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// Mesh element with an unexpected number of vertices.
    #[error("{element} needs {expected} vertices, found {found}")]
    InvalidElementSize {
        element: &'static str,
        expected: &'static str,
        found: usize,
    },
    /// Unknown or removed component id.
    #[error("component {0} not found")]
    ComponentNotFound(ComponentId),
    /// The id is live but names a component of another type.
    #[error("component {id} is a {found}, expected a {expected}")]
    ComponentTypeMismatch {
        id: ComponentId,
        expected: ComponentType,
        found: ComponentType,
    },
    /// The component types cannot be linked by this relation kind.
    #[error("a {from} cannot be related to a {to} by a {kind} relation")]
    InvalidRelationship {
        kind: RelationKind,
        from: ComponentType,
        to: ComponentType,
    },
    /// The two components are already related by another kind.
    #[error("{from} and {to} already share a {existing} relation, cannot add a {requested} relation")]
    ConflictingRelationship {
        from: ComponentId,
        to: ComponentId,
        existing: RelationKind,
        requested: RelationKind,
    },
    /// Relation added twice under `DuplicateRelationHandling::Error`.
    #[error("{kind} relation from {from} to {to} already exists")]
    DuplicateRelation {
        kind: RelationKind,
        from: ComponentId,
        to: ComponentId,
    },
    /// An internal consistency check failed.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// Underlying file system failure.
    #[error("I/O error: {0}")]
    Io(String),
    /// Native archive could not be encoded or decoded.
    #[error("archive error: {0}")]
    Archive(String),
    /// File extension does not match the native format of the object.
    #[error("expected a `.{expected}` file, found `{found}`")]
    UnknownExtension {
        expected: &'static str,
        found: String,
    },
}

impl From<std::io::Error> for MeshModelError {
    fn from(e: std::io::Error) -> Self {
        MeshModelError::Io(e.to_string())
    }
}

impl From<bincode::Error> for MeshModelError {
    fn from(e: bincode::Error) -> Self {
        MeshModelError::Archive(e.to_string())
    }
}
