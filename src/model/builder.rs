//! Mutation traits for models.
//!
//! A builder borrows its model mutably; every method validates component
//! types before touching the model, so a failed call leaves it unchanged.

use crate::mesh::{EdgedCurve, PointSet, SolidMesh, SurfaceMesh};
use crate::mesh_error::MeshModelError;
use crate::model::core::ModelCore;
use crate::topology::component::{ComponentId, ComponentType};
use crate::topology::relation::{DuplicateRelationHandling, RelationKind};

use ComponentType::*;

/// Creation, naming, removal and relations of corners, lines and surfaces.
pub trait ModelBuilder {
    /// Shared component storage of the model being built.
    fn core_mut(&mut self) -> &mut ModelCore;

    fn set_duplicate_relation_handling(&mut self, handling: DuplicateRelationHandling) {
        self.core_mut()
            .relationships_mut()
            .set_duplicate_handling(handling);
    }

    fn add_corner(&mut self) -> ComponentId {
        self.core_mut().add_empty_component::<PointSet>()
    }

    fn add_corner_with_mesh(&mut self, mesh: PointSet) -> Result<ComponentId, MeshModelError> {
        self.core_mut().add_component(mesh)
    }

    fn add_line(&mut self) -> ComponentId {
        self.core_mut().add_empty_component::<EdgedCurve>()
    }

    fn add_line_with_mesh(&mut self, mesh: EdgedCurve) -> Result<ComponentId, MeshModelError> {
        self.core_mut().add_component(mesh)
    }

    fn add_surface(&mut self) -> ComponentId {
        self.core_mut().add_empty_component::<SurfaceMesh>()
    }

    fn add_surface_with_mesh(&mut self, mesh: SurfaceMesh) -> Result<ComponentId, MeshModelError> {
        self.core_mut().add_component(mesh)
    }

    fn add_model_boundary(&mut self) -> ComponentId {
        self.core_mut().add_collection(ModelBoundary)
    }

    fn add_corner_collection(&mut self) -> ComponentId {
        self.core_mut().add_collection(CornerCollection)
    }

    fn add_line_collection(&mut self) -> ComponentId {
        self.core_mut().add_collection(LineCollection)
    }

    fn add_surface_collection(&mut self) -> ComponentId {
        self.core_mut().add_collection(SurfaceCollection)
    }

    fn set_corner_name(&mut self, id: ComponentId, name: &str) -> Result<(), MeshModelError> {
        self.core_mut().component_mut::<PointSet>(id)?.set_name(name);
        Ok(())
    }

    fn set_line_name(&mut self, id: ComponentId, name: &str) -> Result<(), MeshModelError> {
        self.core_mut().component_mut::<EdgedCurve>(id)?.set_name(name);
        Ok(())
    }

    fn set_surface_name(&mut self, id: ComponentId, name: &str) -> Result<(), MeshModelError> {
        self.core_mut()
            .component_mut::<SurfaceMesh>(id)?
            .set_name(name);
        Ok(())
    }

    fn set_model_boundary_name(&mut self, id: ComponentId, name: &str) -> Result<(), MeshModelError> {
        self.core_mut()
            .collection_mut(id, ModelBoundary)?
            .set_name(name);
        Ok(())
    }

    /// Name a collection of any kind.
    fn set_collection_name(&mut self, id: ComponentId, name: &str) -> Result<(), MeshModelError> {
        let core = self.core_mut();
        let component_type = core.component_type(id)?;
        if !component_type.is_collection() {
            return Err(MeshModelError::ComponentTypeMismatch {
                id,
                expected: ModelBoundary,
                found: component_type,
            });
        }
        core.collection_mut(id, component_type)?.set_name(name);
        Ok(())
    }

    fn corner_mesh_mut(&mut self, id: ComponentId) -> Result<&mut PointSet, MeshModelError> {
        Ok(self.core_mut().component_mut::<PointSet>(id)?.mesh_mut())
    }

    fn line_mesh_mut(&mut self, id: ComponentId) -> Result<&mut EdgedCurve, MeshModelError> {
        Ok(self.core_mut().component_mut::<EdgedCurve>(id)?.mesh_mut())
    }

    fn surface_mesh_mut(&mut self, id: ComponentId) -> Result<&mut SurfaceMesh, MeshModelError> {
        Ok(self.core_mut().component_mut::<SurfaceMesh>(id)?.mesh_mut())
    }

    /// Remove a corner and every relation touching it.
    fn remove_corner(&mut self, id: ComponentId) -> Result<(), MeshModelError> {
        self.core_mut().remove(id, Corner)
    }

    fn remove_line(&mut self, id: ComponentId) -> Result<(), MeshModelError> {
        self.core_mut().remove(id, Line)
    }

    fn remove_surface(&mut self, id: ComponentId) -> Result<(), MeshModelError> {
        self.core_mut().remove(id, Surface)
    }

    fn remove_model_boundary(&mut self, id: ComponentId) -> Result<(), MeshModelError> {
        self.core_mut().remove(id, ModelBoundary)
    }

    fn remove_corner_collection(&mut self, id: ComponentId) -> Result<(), MeshModelError> {
        self.core_mut().remove(id, CornerCollection)
    }

    fn remove_line_collection(&mut self, id: ComponentId) -> Result<(), MeshModelError> {
        self.core_mut().remove(id, LineCollection)
    }

    fn remove_surface_collection(&mut self, id: ComponentId) -> Result<(), MeshModelError> {
        self.core_mut().remove(id, SurfaceCollection)
    }

    fn add_corner_line_boundary_relationship(
        &mut self,
        corner: ComponentId,
        line: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut()
            .relate(RelationKind::Boundary, (corner, Corner), (line, Line))
    }

    fn add_line_surface_boundary_relationship(
        &mut self,
        line: ComponentId,
        surface: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut()
            .relate(RelationKind::Boundary, (line, Line), (surface, Surface))
    }

    fn add_corner_surface_internal_relationship(
        &mut self,
        corner: ComponentId,
        surface: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut()
            .relate(RelationKind::Internal, (corner, Corner), (surface, Surface))
    }

    fn add_line_surface_internal_relationship(
        &mut self,
        line: ComponentId,
        surface: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut()
            .relate(RelationKind::Internal, (line, Line), (surface, Surface))
    }

    fn add_corner_in_corner_collection(
        &mut self,
        corner: ComponentId,
        collection: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut().relate(
            RelationKind::Item,
            (corner, Corner),
            (collection, CornerCollection),
        )
    }

    fn add_line_in_line_collection(
        &mut self,
        line: ComponentId,
        collection: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut()
            .relate(RelationKind::Item, (line, Line), (collection, LineCollection))
    }

    fn add_surface_in_surface_collection(
        &mut self,
        surface: ComponentId,
        collection: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut().relate(
            RelationKind::Item,
            (surface, Surface),
            (collection, SurfaceCollection),
        )
    }

    /// Remove the relation between two components, whichever way it points.
    fn remove_relation(
        &mut self,
        a: ComponentId,
        b: ComponentId,
    ) -> Result<Option<RelationKind>, MeshModelError> {
        self.core_mut().relationships_mut().remove_relation(a, b)
    }
}

/// Mutations involving blocks, for volumetric models.
pub trait BlockModelBuilder: ModelBuilder {
    fn add_block(&mut self) -> ComponentId {
        self.core_mut().add_empty_component::<SolidMesh>()
    }

    fn add_block_with_mesh(&mut self, mesh: SolidMesh) -> Result<ComponentId, MeshModelError> {
        self.core_mut().add_component(mesh)
    }

    fn add_block_collection(&mut self) -> ComponentId {
        self.core_mut().add_collection(BlockCollection)
    }

    fn set_block_name(&mut self, id: ComponentId, name: &str) -> Result<(), MeshModelError> {
        self.core_mut().component_mut::<SolidMesh>(id)?.set_name(name);
        Ok(())
    }

    fn block_mesh_mut(&mut self, id: ComponentId) -> Result<&mut SolidMesh, MeshModelError> {
        Ok(self.core_mut().component_mut::<SolidMesh>(id)?.mesh_mut())
    }

    fn remove_block(&mut self, id: ComponentId) -> Result<(), MeshModelError> {
        self.core_mut().remove(id, Block)
    }

    fn remove_block_collection(&mut self, id: ComponentId) -> Result<(), MeshModelError> {
        self.core_mut().remove(id, BlockCollection)
    }

    fn add_surface_block_boundary_relationship(
        &mut self,
        surface: ComponentId,
        block: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut()
            .relate(RelationKind::Boundary, (surface, Surface), (block, Block))
    }

    fn add_corner_block_internal_relationship(
        &mut self,
        corner: ComponentId,
        block: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut()
            .relate(RelationKind::Internal, (corner, Corner), (block, Block))
    }

    fn add_line_block_internal_relationship(
        &mut self,
        line: ComponentId,
        block: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut()
            .relate(RelationKind::Internal, (line, Line), (block, Block))
    }

    fn add_surface_block_internal_relationship(
        &mut self,
        surface: ComponentId,
        block: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut()
            .relate(RelationKind::Internal, (surface, Surface), (block, Block))
    }

    fn add_block_in_block_collection(
        &mut self,
        block: ComponentId,
        collection: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.core_mut()
            .relate(RelationKind::Item, (block, Block), (collection, BlockCollection))
    }
}
