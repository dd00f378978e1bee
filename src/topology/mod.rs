//! Top-level module for model topology.
//!
//! This module provides the component identifiers and the relationship graph
//! tying model components together:
//! - [`ComponentId`] / [`ComponentType`] / [`ComponentRef`] to name components
//! - [`RelationKind`] and the type rules of boundary, internal and item relations
//! - [`Relationships`], the in-memory graph with its range queries

pub mod component;
pub mod relation;
pub mod relationships;

pub use component::{ComponentId, ComponentRef, ComponentType};
pub use relation::{DuplicateRelationHandling, RelationKind};
pub use relationships::{RelationRange, Relationships};
