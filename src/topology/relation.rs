//! Relation kinds between model components and the type rules they obey.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshModelError;
use crate::topology::component::ComponentType;

/// Kind of a directed relation `from -> to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// `from` bounds `to` (`to` is incident to `from`).
    Boundary,
    /// `from` is embedded in `to` without bounding it.
    Internal,
    /// `from` is an item of the collection `to`.
    Item,
}

impl RelationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Boundary => "boundary",
            RelationKind::Internal => "internal",
            RelationKind::Item => "item",
        }
    }

    /// Whether `from -> to` is a legal relation of this kind.
    pub fn allows(self, from: ComponentType, to: ComponentType) -> bool {
        use ComponentType::*;
        match self {
            RelationKind::Boundary => matches!(
                (from, to),
                (Corner, Line) | (Line, Surface) | (Surface, Block)
            ),
            RelationKind::Internal => matches!(
                (from, to),
                (Corner, Surface)
                    | (Corner, Block)
                    | (Line, Surface)
                    | (Line, Block)
                    | (Surface, Block)
            ),
            RelationKind::Item => matches!(
                (from, to),
                (Corner, CornerCollection)
                    | (Line, LineCollection)
                    | (Surface, SurfaceCollection)
                    | (Block, BlockCollection)
                    | (Line, ModelBoundary)
                    | (Surface, ModelBoundary)
            ),
        }
    }

    /// `InvalidRelationship` unless [`allows`](Self::allows) holds.
    pub fn check(self, from: ComponentType, to: ComponentType) -> Result<(), MeshModelError> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(MeshModelError::InvalidRelationship {
                kind: self,
                from,
                to,
            })
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavior when a relation that already exists is added again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicateRelationHandling {
    /// Keep the existing relation silently.
    Ignore,
    /// Keep the existing relation and log a warning.
    #[default]
    Warn,
    /// Return `DuplicateRelation`.
    Error,
}
