//! Geological models assembled from meshed components.
//!
//! - [`BRep`]: 3D boundary representation (corners, lines, surfaces, blocks)
//! - [`Section`]: 2D model (corners, lines, surfaces)
//!
//! Read access goes through the [`ComponentModel`] / [`BlockModel`] traits and
//! mutation through the matching builders.

pub mod brep;
pub mod builder;
pub mod component;
pub mod core;
pub mod model_trait;
pub mod section;
pub mod store;

pub use brep::{BRep, BRepBuilder};
pub use builder::{BlockModelBuilder, ModelBuilder};
pub use component::{Block, Collection, Component, ComponentMesh, Corner, Line, Surface};
pub use self::core::{ModelCopyMapping, ModelCore};
pub use model_trait::{BlockModel, ComponentModel};
pub use section::{Section, SectionBuilder};
pub use store::ComponentStore;
