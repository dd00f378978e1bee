//! Mesh element collections attached to model components.

pub mod element_set;
pub mod mesh_attributes;
pub mod meshes;
pub mod vertex_set;

pub use element_set::{ElementKind, ElementSet};
pub use mesh_attributes::MeshAttributes;
pub use meshes::{EdgedCurve, Mesh, PointSet, SolidMesh, SurfaceMesh};
pub use vertex_set::VertexSet;
