//! Mesh elements as vertex-index tuples.

use serde::{Deserialize, Serialize};

use crate::data::attribute_manager::AttributeManager;
use crate::mesh::mesh_attributes::MeshAttributes;
use crate::data::storage::{check_deletion_mask, old_to_new_mapping, validate_permutation};
use crate::mesh_error::MeshModelError;

/// Element family stored by an [`ElementSet`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Exactly two vertices.
    Edge,
    /// Three or more vertices.
    Polygon,
    /// Four or more vertices.
    Polyhedron,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Edge => "edge",
            ElementKind::Polygon => "polygon",
            ElementKind::Polyhedron => "polyhedron",
        }
    }

    fn check_size(self, found: usize) -> Result<(), MeshModelError> {
        let (ok, expected) = match self {
            ElementKind::Edge => (found == 2, "2"),
            ElementKind::Polygon => (found >= 3, "at least 3"),
            ElementKind::Polyhedron => (found >= 4, "at least 4"),
        };
        if ok {
            Ok(())
        } else {
            Err(MeshModelError::InvalidElementSize {
                element: self.as_str(),
                expected,
                found,
            })
        }
    }
}

/// Elements of one kind plus their attribute manager.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementSet {
    kind: ElementKind,
    elements: Vec<Vec<usize>>,
    attributes: MeshAttributes,
}

impl ElementSet {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            elements: Vec::new(),
            attributes: MeshAttributes::new(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[inline]
    pub fn nb_elements(&self) -> usize {
        self.elements.len()
    }

    /// Vertex indices of `element`.
    pub fn element_vertices(&self, element: usize) -> Result<&[usize], MeshModelError> {
        self.elements
            .get(element)
            .map(Vec::as_slice)
            .ok_or(MeshModelError::OutOfRange {
                index: element,
                len: self.elements.len(),
            })
    }

    /// Append an element over `vertices`, each below `nb_vertices`.
    pub fn create_element(
        &mut self,
        vertices: &[usize],
        nb_vertices: usize,
    ) -> Result<usize, MeshModelError> {
        self.kind.check_size(vertices.len())?;
        if let Some(&bad) = vertices.iter().find(|&&v| v >= nb_vertices) {
            return Err(MeshModelError::OutOfRange {
                index: bad,
                len: nb_vertices,
            });
        }
        self.elements.push(vertices.to_vec());
        self.attributes.manager_mut().resize(self.elements.len());
        Ok(self.elements.len() - 1)
    }

    /// Remove the flagged elements and return the old → new mapping.
    pub fn delete_elements(
        &mut self,
        to_delete: &[bool],
    ) -> Result<Vec<Option<usize>>, MeshModelError> {
        if !check_deletion_mask(to_delete, self.elements.len())? {
            return Ok((0..self.elements.len()).map(Some).collect());
        }
        self.attributes.manager_mut().delete_elements(to_delete)?;
        let mut flags = to_delete.iter();
        self.elements
            .retain(|_| !flags.next().copied().unwrap_or(false));
        Ok(old_to_new_mapping(to_delete))
    }

    /// Reorder elements so that `new[i] = old[permutation[i]]`.
    pub fn permute_elements(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        validate_permutation(permutation, self.elements.len())?;
        self.attributes.manager_mut().permute_elements(permutation)?;
        let mut old: Vec<Option<Vec<usize>>> =
            std::mem::take(&mut self.elements).into_iter().map(Some).collect();
        self.elements = permutation
            .iter()
            .filter_map(|&p| old[p].take())
            .collect();
        Ok(())
    }

    /// Renumber vertices after a vertex deletion.
    ///
    /// Elements touching a removed vertex are deleted; the returned mapping
    /// describes that element deletion.
    pub fn remap_vertices(
        &mut self,
        old2new: &[Option<usize>],
    ) -> Result<Vec<Option<usize>>, MeshModelError> {
        let to_delete: Vec<bool> = self
            .elements
            .iter()
            .map(|e| e.iter().any(|&v| old2new.get(v).copied().flatten().is_none()))
            .collect();
        let mapping = self.delete_elements(&to_delete)?;
        for element in &mut self.elements {
            for v in element.iter_mut() {
                if let Some(Some(new)) = old2new.get(*v) {
                    *v = *new;
                }
            }
        }
        Ok(mapping)
    }

    /// Renumber vertices after `new[i] = old[permutation[i]]`.
    pub(crate) fn permute_vertices(&mut self, permutation: &[usize]) {
        let mut new_of_old = vec![0; permutation.len()];
        for (new, &old) in permutation.iter().enumerate() {
            new_of_old[old] = new;
        }
        for v in self.elements.iter_mut().flatten() {
            if let Some(&new) = new_of_old.get(*v) {
                *v = new;
            }
        }
    }

    pub fn attribute_manager(&self) -> &AttributeManager {
        &self.attributes
    }

    /// Attribute access that cannot change the element count.
    pub fn attribute_manager_mut(&mut self) -> &mut MeshAttributes {
        &mut self.attributes
    }
}
