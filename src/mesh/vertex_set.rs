//! Vertex coordinates with their attribute manager.
//!
//! Coordinates are stored in one flat buffer with a fixed dimension per
//! vertex. The vertex count is owned by the set and the vertex attribute
//! manager always spans exactly `nb_vertices` elements.

use serde::{Deserialize, Serialize};

use crate::data::attribute_manager::AttributeManager;
use crate::mesh::mesh_attributes::MeshAttributes;
use crate::data::storage::{check_deletion_mask, old_to_new_mapping, validate_permutation};
use crate::mesh_error::MeshModelError;

/// Vertex storage shared by every mesh type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexSet {
    dimension: usize,
    nb_vertices: usize,
    coordinates: Vec<f64>,
    attributes: MeshAttributes,
}

impl VertexSet {
    /// Empty set of `dimension`-dimensional vertices.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            nb_vertices: 0,
            coordinates: Vec::new(),
            attributes: MeshAttributes::new(),
        }
    }

    /// Spatial dimension of each vertex.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn nb_vertices(&self) -> usize {
        self.nb_vertices
    }

    fn check_vertex(&self, vertex: usize) -> Result<(), MeshModelError> {
        if vertex < self.nb_vertices() {
            Ok(())
        } else {
            Err(MeshModelError::OutOfRange {
                index: vertex,
                len: self.nb_vertices(),
            })
        }
    }

    /// Coordinates of `vertex`.
    pub fn point(&self, vertex: usize) -> Result<&[f64], MeshModelError> {
        self.check_vertex(vertex)?;
        let start = vertex * self.dimension;
        Ok(&self.coordinates[start..start + self.dimension])
    }

    /// Overwrite the coordinates of `vertex`.
    pub fn set_point(&mut self, vertex: usize, point: &[f64]) -> Result<(), MeshModelError> {
        self.check_vertex(vertex)?;
        if point.len() != self.dimension {
            return Err(MeshModelError::DimensionMismatch {
                expected: self.dimension,
                found: point.len(),
            });
        }
        let start = vertex * self.dimension;
        self.coordinates[start..start + self.dimension].copy_from_slice(point);
        Ok(())
    }

    /// Append one vertex at `point` and return its index.
    pub fn create_vertex(&mut self, point: &[f64]) -> Result<usize, MeshModelError> {
        if point.len() != self.dimension {
            return Err(MeshModelError::DimensionMismatch {
                expected: self.dimension,
                found: point.len(),
            });
        }
        let vertex = self.nb_vertices;
        self.coordinates.extend_from_slice(point);
        self.nb_vertices += 1;
        self.attributes.manager_mut().resize(self.nb_vertices);
        Ok(vertex)
    }

    /// Append `count` vertices at the origin and return the first index.
    pub fn create_vertices(&mut self, count: usize) -> usize {
        let first = self.nb_vertices;
        self.nb_vertices += count;
        self.coordinates
            .resize(self.nb_vertices * self.dimension, 0.0);
        self.attributes.manager_mut().resize(self.nb_vertices);
        first
    }

    /// Remove the flagged vertices and return the old → new mapping.
    pub fn delete_vertices(
        &mut self,
        to_delete: &[bool],
    ) -> Result<Vec<Option<usize>>, MeshModelError> {
        if !check_deletion_mask(to_delete, self.nb_vertices())? {
            return Ok((0..self.nb_vertices()).map(Some).collect());
        }
        self.attributes.manager_mut().delete_elements(to_delete)?;
        self.nb_vertices -= to_delete.iter().filter(|&&d| d).count();
        let dimension = self.dimension;
        let mut flags = to_delete.iter().flat_map(|&d| std::iter::repeat_n(d, dimension));
        self.coordinates
            .retain(|_| !flags.next().unwrap_or(false));
        Ok(old_to_new_mapping(to_delete))
    }

    /// Reorder vertices so that `new[i] = old[permutation[i]]`.
    pub fn permute_vertices(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        validate_permutation(permutation, self.nb_vertices())?;
        self.attributes.manager_mut().permute_elements(permutation)?;
        let old = std::mem::take(&mut self.coordinates);
        self.coordinates = permutation
            .iter()
            .flat_map(|&p| old[p * self.dimension..(p + 1) * self.dimension].iter().copied())
            .collect();
        Ok(())
    }

    pub fn attribute_manager(&self) -> &AttributeManager {
        &self.attributes
    }

    /// Attribute access that cannot change the vertex count.
    pub fn attribute_manager_mut(&mut self) -> &mut MeshAttributes {
        &mut self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_dimension_checked() {
        let mut v = VertexSet::new(2);
        let a = v.create_vertex(&[1.0, 2.0]).unwrap();
        assert_eq!(v.point(a).unwrap(), &[1.0, 2.0]);
        assert!(matches!(
            v.create_vertex(&[1.0]),
            Err(MeshModelError::DimensionMismatch { expected: 2, found: 1 })
        ));
        assert!(matches!(
            v.point(3),
            Err(MeshModelError::OutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn deletion_keeps_coordinates_and_attributes_aligned() {
        let mut v = VertexSet::new(3);
        v.create_vertices(4);
        for i in 0..4 {
            v.set_point(i, &[i as f64; 3]).unwrap();
        }
        v.attribute_manager_mut()
            .find_or_create_attribute_variable("id", 0u32)
            .unwrap();
        let map = v.delete_vertices(&[false, true, false, false]).unwrap();
        assert_eq!(map, vec![Some(0), None, Some(1), Some(2)]);
        assert_eq!(v.nb_vertices(), 3);
        assert_eq!(v.point(1).unwrap(), &[2.0; 3]);
        assert_eq!(
            v.attribute_manager()
                .find_generic_attribute("id")
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn permutation_moves_coordinates() {
        let mut v = VertexSet::new(1);
        for x in [10.0, 20.0, 30.0] {
            v.create_vertex(&[x]).unwrap();
        }
        v.permute_vertices(&[2, 0, 1]).unwrap();
        assert_eq!(v.point(0).unwrap(), &[30.0]);
        assert_eq!(v.point(2).unwrap(), &[20.0]);
    }

    #[test]
    fn attribute_writes_leave_the_vertex_count_alone() {
        let mut v = VertexSet::new(3);
        v.create_vertex(&[1.0, 2.0, 3.0]).unwrap();
        v.attribute_manager_mut()
            .find_or_create_attribute_sparse("flag", false)
            .unwrap();
        v.attribute_manager_mut().clear_attributes();
        assert_eq!(v.nb_vertices(), 1);
        assert_eq!(v.attribute_manager().nb_elements(), 1);
        assert!(matches!(
            v.point(3),
            Err(MeshModelError::OutOfRange { index: 3, len: 1 })
        ));
    }
}
