#![cfg_attr(docsrs, feature(doc_cfg))]
//! # model-sieve
//!
//! model-sieve stores per-element attributes for mesh entity collections and
//! the topological relationships between the components of geological
//! models. It is the data layer under boundary representations (3D `BRep`)
//! and cross sections (2D `Section`).
//!
//! ## Features
//! - Named attributes with constant, dense and sparse storage, kept in
//!   lock-step with their element collection on resize, deletion and
//!   permutation
//! - Point sets, curves, surfaces and solids owning their attribute managers
//! - A relationship graph of boundary, internal and collection relations with
//!   lazy, restartable range queries
//! - Generation-checked component ids: a removed component is never aliased
//! - Native binary archives for models and attribute managers
//!
//! ## Invariant checking
//!
//! Structural invariants are re-validated after mutations in debug builds.
//! Enable the `check-invariants` (or `strict-invariants`) feature to keep the
//! checks in release builds:
//!
//! ```toml
//! [dependencies]
//! model-sieve = { version = "0.1", features = ["check-invariants"] }
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the `log` facade; install any logger to see them.
//! Re-adding an existing relation is reported with `warn!`.

pub mod data;
pub mod debug_invariants;
pub mod io;
pub mod mesh;
pub mod mesh_error;
pub mod model;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use mesh_error::MeshModelError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::{
        Attribute, AttributeKind, AttributeLinearInterpolation, AttributeManager,
        AttributeProperties, AttributeValue, TaggedAttribute, ValueType,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::{
        NativeArchive, load_attribute_manager, load_brep, load_section, save_attribute_manager,
        save_brep, save_section,
    };
    pub use crate::mesh::{EdgedCurve, Mesh, MeshAttributes, PointSet, SolidMesh, SurfaceMesh};
    pub use crate::mesh_error::MeshModelError;
    pub use crate::model::{
        BRep, BRepBuilder, BlockModel, BlockModelBuilder, ComponentModel, ModelBuilder,
        ModelCopyMapping, Section, SectionBuilder,
    };
    pub use crate::topology::{
        ComponentId, ComponentRef, ComponentType, DuplicateRelationHandling, RelationKind,
        Relationships,
    };
}
