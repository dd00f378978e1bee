//! Boundary representation of a 3D model.

use serde::{Deserialize, Serialize};

use crate::debug_invariants::DebugInvariants;
use crate::mesh::SurfaceMesh;
use crate::mesh_error::MeshModelError;
use crate::model::builder::{BlockModelBuilder, ModelBuilder};
use crate::model::component::Surface;
use crate::model::core::{ModelCopyMapping, ModelCore};
use crate::model::model_trait::{BlockModel, ComponentModel};
use crate::topology::component::{ComponentId, ComponentType};
use crate::topology::relation::RelationKind;
use crate::topology::relationships::Relationships;

/// A 3D model made of corners, lines, surfaces and blocks, with collections
/// and model boundaries grouping surfaces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BRep {
    core: ModelCore,
}

impl Default for BRep {
    fn default() -> Self {
        Self::new()
    }
}

impl BRep {
    pub fn new() -> Self {
        Self {
            core: ModelCore::new(3),
        }
    }

    /// Mutable access through a builder.
    pub fn builder(&mut self) -> BRepBuilder<'_> {
        BRepBuilder::new(self)
    }

    /// Surfaces of the model boundary `boundary`.
    pub fn model_boundary_items(
        &self,
        boundary: ComponentId,
    ) -> Result<impl Iterator<Item = &Surface> + Clone + '_, MeshModelError> {
        let range = self.core.typed_range(
            boundary,
            ComponentType::ModelBoundary,
            Relationships::items,
        )?;
        Ok(self.core.related::<SurfaceMesh>(range))
    }

    /// Whether `surface` belongs to the model boundary `boundary`.
    pub fn is_model_boundary_item(
        &self,
        surface: ComponentId,
        boundary: ComponentId,
    ) -> Result<bool, MeshModelError> {
        self.core.expect_type(boundary, ComponentType::ModelBoundary)?;
        self.core.relationships().is_item(surface, boundary)
    }
}

impl ComponentModel for BRep {
    fn core(&self) -> &ModelCore {
        &self.core
    }
}

impl BlockModel for BRep {}

impl DebugInvariants for BRep {
    fn validate_invariants(&self) -> Result<(), MeshModelError> {
        if self.core.dimension() != 3 {
            return Err(MeshModelError::InvariantViolation(format!(
                "BRep of dimension {}",
                self.core.dimension()
            )));
        }
        self.core.validate_invariants()
    }
}

/// Builder editing a [`BRep`] in place.
pub struct BRepBuilder<'a> {
    brep: &'a mut BRep,
}

impl<'a> BRepBuilder<'a> {
    pub fn new(brep: &'a mut BRep) -> Self {
        Self { brep }
    }

    /// Put `surface` in the model boundary `boundary`.
    pub fn add_surface_in_model_boundary(
        &mut self,
        surface: ComponentId,
        boundary: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.brep.core.relate(
            RelationKind::Item,
            (surface, ComponentType::Surface),
            (boundary, ComponentType::ModelBoundary),
        )
    }

    /// Append copies of every component of `other` and return the id mapping.
    pub fn copy_components(&mut self, other: &BRep) -> Result<ModelCopyMapping, MeshModelError> {
        self.brep.core.copy_components(&other.core)
    }

    /// Recreate the relations of `other` between components copied with
    /// [`copy_components`](Self::copy_components).
    pub fn copy_relationships(
        &mut self,
        mapping: &ModelCopyMapping,
        other: &BRep,
    ) -> Result<(), MeshModelError> {
        self.brep.core.copy_relationships(mapping, &other.core)?;
        crate::debug_invariants!(self.brep.validate_invariants(), "BRepBuilder::copy_relationships");
        Ok(())
    }

    /// Replace the whole model with a copy of `other`. Ids are preserved.
    pub fn copy(&mut self, other: &BRep) {
        self.brep.core = other.core.clone();
    }
}

impl ModelBuilder for BRepBuilder<'_> {
    fn core_mut(&mut self) -> &mut ModelCore {
        &mut self.brep.core
    }
}

impl BlockModelBuilder for BRepBuilder<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Mesh, PointSet};

    #[test]
    fn surfaces_only_in_model_boundaries() {
        let mut brep = BRep::new();
        let mut builder = brep.builder();
        let line = builder.add_line();
        let surface = builder.add_surface();
        let boundary = builder.add_model_boundary();
        assert!(matches!(
            builder.add_surface_in_model_boundary(line, boundary),
            Err(MeshModelError::ComponentTypeMismatch { .. })
        ));
        builder
            .add_surface_in_model_boundary(surface, boundary)
            .unwrap();
        assert!(brep.is_model_boundary_item(surface, boundary).unwrap());
        assert_eq!(brep.model_boundary_items(boundary).unwrap().count(), 1);
    }

    #[test]
    fn removed_ids_are_stale() {
        let mut brep = BRep::new();
        let mut builder = brep.builder();
        let block = builder.add_block();
        builder.remove_block(block).unwrap();
        assert!(matches!(
            builder.remove_block(block),
            Err(MeshModelError::ComponentNotFound(_))
        ));
        let again = builder.add_block();
        assert_ne!(again, block);
        assert!(brep.block(block).is_err());
        assert_eq!(brep.nb_blocks(), 1);
        brep.validate_invariants().unwrap();
    }

    #[test]
    fn meshes_follow_model_dimension() {
        let mut brep = BRep::new();
        let mut builder = brep.builder();
        assert!(matches!(
            builder.add_corner_with_mesh(PointSet::new(2)),
            Err(MeshModelError::DimensionMismatch { expected: 3, found: 2 })
        ));
        let corner = builder.add_corner();
        builder
            .corner_mesh_mut(corner)
            .unwrap()
            .vertices_mut()
            .create_vertex(&[0.0, 1.0, 2.0])
            .unwrap();
        assert_eq!(brep.corner(corner).unwrap().mesh().nb_vertices(), 1);
    }
}
