//! Concrete meshes carried by model components.
//!
//! Every mesh owns a [`VertexSet`]; curves, surfaces and solids add one
//! [`ElementSet`]. Vertex deletion and permutation go through the [`Mesh`]
//! trait so that element connectivity and every attribute manager follow.

use serde::{Deserialize, Serialize};

use crate::data::attribute_manager::AttributeManager;
use crate::mesh::element_set::{ElementKind, ElementSet};
use crate::mesh::mesh_attributes::MeshAttributes;
use crate::mesh::vertex_set::VertexSet;
use crate::mesh_error::MeshModelError;

/// Operations shared by all meshes. Only the vertex accessors and the
/// connectivity hooks are required.
pub trait Mesh {
    fn vertices(&self) -> &VertexSet;
    fn vertices_mut(&mut self) -> &mut VertexSet;

    /// Update connectivity after vertices were deleted.
    fn on_vertices_deleted(&mut self, old2new: &[Option<usize>]) -> Result<(), MeshModelError>;
    /// Update connectivity after vertices were permuted.
    fn on_vertices_permuted(&mut self, permutation: &[usize]);

    fn dimension(&self) -> usize {
        self.vertices().dimension()
    }

    fn nb_vertices(&self) -> usize {
        self.vertices().nb_vertices()
    }

    fn point(&self, vertex: usize) -> Result<&[f64], MeshModelError> {
        self.vertices().point(vertex)
    }

    fn set_point(&mut self, vertex: usize, point: &[f64]) -> Result<(), MeshModelError> {
        self.vertices_mut().set_point(vertex, point)
    }

    fn create_vertex(&mut self, point: &[f64]) -> Result<usize, MeshModelError> {
        self.vertices_mut().create_vertex(point)
    }

    fn create_vertices(&mut self, count: usize) -> usize {
        self.vertices_mut().create_vertices(count)
    }

    /// Delete vertices; elements referencing a deleted vertex are removed.
    fn delete_vertices(&mut self, to_delete: &[bool]) -> Result<Vec<Option<usize>>, MeshModelError> {
        let old2new = self.vertices_mut().delete_vertices(to_delete)?;
        self.on_vertices_deleted(&old2new)?;
        Ok(old2new)
    }

    /// Reorder vertices so that `new[i] = old[permutation[i]]`.
    fn permute_vertices(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        self.vertices_mut().permute_vertices(permutation)?;
        self.on_vertices_permuted(permutation);
        Ok(())
    }

    fn vertex_attribute_manager(&self) -> &AttributeManager {
        self.vertices().attribute_manager()
    }

    fn vertex_attribute_manager_mut(&mut self) -> &mut MeshAttributes {
        self.vertices_mut().attribute_manager_mut()
    }
}

macro_rules! impl_vertex_access {
    () => {
        fn vertices(&self) -> &VertexSet {
            &self.vertices
        }

        fn vertices_mut(&mut self) -> &mut VertexSet {
            &mut self.vertices
        }
    };
}

/// Vertices only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    vertices: VertexSet,
}

impl PointSet {
    pub fn new(dimension: usize) -> Self {
        Self {
            vertices: VertexSet::new(dimension),
        }
    }
}

impl Mesh for PointSet {
    impl_vertex_access!();

    fn on_vertices_deleted(&mut self, _old2new: &[Option<usize>]) -> Result<(), MeshModelError> {
        Ok(())
    }

    fn on_vertices_permuted(&mut self, _permutation: &[usize]) {}
}

/// Vertices joined by edges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgedCurve {
    vertices: VertexSet,
    edges: ElementSet,
}

impl EdgedCurve {
    pub fn new(dimension: usize) -> Self {
        Self {
            vertices: VertexSet::new(dimension),
            edges: ElementSet::new(ElementKind::Edge),
        }
    }

    pub fn nb_edges(&self) -> usize {
        self.edges.nb_elements()
    }

    pub fn create_edge(&mut self, v0: usize, v1: usize) -> Result<usize, MeshModelError> {
        self.edges
            .create_element(&[v0, v1], self.vertices.nb_vertices())
    }

    pub fn edge_vertices(&self, edge: usize) -> Result<[usize; 2], MeshModelError> {
        match self.edges.element_vertices(edge)? {
            &[v0, v1] => Ok([v0, v1]),
            other => Err(MeshModelError::InvalidElementSize {
                element: ElementKind::Edge.as_str(),
                expected: "2",
                found: other.len(),
            }),
        }
    }

    pub fn delete_edges(&mut self, to_delete: &[bool]) -> Result<Vec<Option<usize>>, MeshModelError> {
        self.edges.delete_elements(to_delete)
    }

    pub fn permute_edges(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        self.edges.permute_elements(permutation)
    }

    pub fn edge_attribute_manager(&self) -> &AttributeManager {
        self.edges.attribute_manager()
    }

    pub fn edge_attribute_manager_mut(&mut self) -> &mut MeshAttributes {
        self.edges.attribute_manager_mut()
    }
}

impl Mesh for EdgedCurve {
    impl_vertex_access!();

    fn on_vertices_deleted(&mut self, old2new: &[Option<usize>]) -> Result<(), MeshModelError> {
        self.edges.remap_vertices(old2new).map(|_| ())
    }

    fn on_vertices_permuted(&mut self, permutation: &[usize]) {
        self.edges.permute_vertices(permutation);
    }
}

/// Vertices joined by polygons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    vertices: VertexSet,
    polygons: ElementSet,
}

impl SurfaceMesh {
    pub fn new(dimension: usize) -> Self {
        Self {
            vertices: VertexSet::new(dimension),
            polygons: ElementSet::new(ElementKind::Polygon),
        }
    }

    pub fn nb_polygons(&self) -> usize {
        self.polygons.nb_elements()
    }

    pub fn create_polygon(&mut self, vertices: &[usize]) -> Result<usize, MeshModelError> {
        self.polygons
            .create_element(vertices, self.vertices.nb_vertices())
    }

    pub fn polygon_vertices(&self, polygon: usize) -> Result<&[usize], MeshModelError> {
        self.polygons.element_vertices(polygon)
    }

    pub fn delete_polygons(
        &mut self,
        to_delete: &[bool],
    ) -> Result<Vec<Option<usize>>, MeshModelError> {
        self.polygons.delete_elements(to_delete)
    }

    pub fn permute_polygons(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        self.polygons.permute_elements(permutation)
    }

    pub fn polygon_attribute_manager(&self) -> &AttributeManager {
        self.polygons.attribute_manager()
    }

    pub fn polygon_attribute_manager_mut(&mut self) -> &mut MeshAttributes {
        self.polygons.attribute_manager_mut()
    }
}

impl Mesh for SurfaceMesh {
    impl_vertex_access!();

    fn on_vertices_deleted(&mut self, old2new: &[Option<usize>]) -> Result<(), MeshModelError> {
        self.polygons.remap_vertices(old2new).map(|_| ())
    }

    fn on_vertices_permuted(&mut self, permutation: &[usize]) {
        self.polygons.permute_vertices(permutation);
    }
}

/// Vertices joined by polyhedra.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolidMesh {
    vertices: VertexSet,
    polyhedra: ElementSet,
}

impl SolidMesh {
    pub fn new(dimension: usize) -> Self {
        Self {
            vertices: VertexSet::new(dimension),
            polyhedra: ElementSet::new(ElementKind::Polyhedron),
        }
    }

    pub fn nb_polyhedra(&self) -> usize {
        self.polyhedra.nb_elements()
    }

    pub fn create_polyhedron(&mut self, vertices: &[usize]) -> Result<usize, MeshModelError> {
        self.polyhedra
            .create_element(vertices, self.vertices.nb_vertices())
    }

    pub fn polyhedron_vertices(&self, polyhedron: usize) -> Result<&[usize], MeshModelError> {
        self.polyhedra.element_vertices(polyhedron)
    }

    pub fn delete_polyhedra(
        &mut self,
        to_delete: &[bool],
    ) -> Result<Vec<Option<usize>>, MeshModelError> {
        self.polyhedra.delete_elements(to_delete)
    }

    pub fn permute_polyhedra(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        self.polyhedra.permute_elements(permutation)
    }

    pub fn polyhedron_attribute_manager(&self) -> &AttributeManager {
        self.polyhedra.attribute_manager()
    }

    pub fn polyhedron_attribute_manager_mut(&mut self) -> &mut MeshAttributes {
        self.polyhedra.attribute_manager_mut()
    }
}

impl Mesh for SolidMesh {
    impl_vertex_access!();

    fn on_vertices_deleted(&mut self, old2new: &[Option<usize>]) -> Result<(), MeshModelError> {
        self.polyhedra.remap_vertices(old2new).map(|_| ())
    }

    fn on_vertices_permuted(&mut self, permutation: &[usize]) {
        self.polyhedra.permute_vertices(permutation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_follows_vertex_deletion() {
        let mut curve = EdgedCurve::new(3);
        curve.create_vertices(3);
        curve.create_edge(0, 1).unwrap();
        curve.create_edge(1, 2).unwrap();
        curve
            .edge_attribute_manager_mut()
            .find_or_create_attribute_variable("w", 1.0f64)
            .unwrap();
        curve.delete_vertices(&[true, false, false]).unwrap();
        assert_eq!(curve.nb_vertices(), 2);
        assert_eq!(curve.nb_edges(), 1);
        assert_eq!(curve.edge_vertices(0).unwrap(), [0, 1]);
        assert_eq!(curve.edge_attribute_manager().nb_elements(), 1);
    }

    #[test]
    fn solid_needs_four_vertices() {
        let mut solid = SolidMesh::new(3);
        solid.create_vertices(4);
        assert!(solid.create_polyhedron(&[0, 1, 2]).is_err());
        assert_eq!(solid.create_polyhedron(&[0, 1, 2, 3]).unwrap(), 0);
        solid.permute_vertices(&[3, 2, 1, 0]).unwrap();
        assert_eq!(solid.polyhedron_vertices(0).unwrap(), &[3, 2, 1, 0]);
    }
}
