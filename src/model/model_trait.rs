//! Read access shared by boundary representations and sections.
//!
//! Implementors only provide [`ComponentModel::core`]; every query is a
//! default method over the shared [`ModelCore`]. Typed relationship ranges
//! resolve related ids to components of one family and keep the insertion
//! order of the underlying relations.

use crate::mesh::{EdgedCurve, PointSet, SolidMesh, SurfaceMesh};
use crate::mesh_error::MeshModelError;
use crate::model::component::{Block, Collection, Corner, Line, Surface};
use crate::model::core::ModelCore;
use crate::topology::component::{ComponentId, ComponentType};
use crate::topology::relationships::Relationships;

/// Queries over corners, lines, surfaces, their collections and relations.
pub trait ComponentModel {
    /// Shared component storage.
    fn core(&self) -> &ModelCore;

    fn dimension(&self) -> usize {
        self.core().dimension()
    }

    fn relationships(&self) -> &Relationships {
        self.core().relationships()
    }

    /// Type of any live component.
    fn component_type(&self, id: ComponentId) -> Result<ComponentType, MeshModelError> {
        self.core().component_type(id)
    }

    fn nb_corners(&self) -> usize {
        self.core().store::<PointSet>().len()
    }

    fn nb_lines(&self) -> usize {
        self.core().store::<EdgedCurve>().len()
    }

    fn nb_surfaces(&self) -> usize {
        self.core().store::<SurfaceMesh>().len()
    }

    fn corner(&self, id: ComponentId) -> Result<&Corner, MeshModelError> {
        self.core().component(id)
    }

    fn line(&self, id: ComponentId) -> Result<&Line, MeshModelError> {
        self.core().component(id)
    }

    fn surface(&self, id: ComponentId) -> Result<&Surface, MeshModelError> {
        self.core().component(id)
    }

    fn corners(&self) -> impl Iterator<Item = &Corner> + Clone + '_ {
        self.core().store::<PointSet>().iter()
    }

    fn lines(&self) -> impl Iterator<Item = &Line> + Clone + '_ {
        self.core().store::<EdgedCurve>().iter()
    }

    fn surfaces(&self) -> impl Iterator<Item = &Surface> + Clone + '_ {
        self.core().store::<SurfaceMesh>().iter()
    }

    fn nb_model_boundaries(&self) -> usize {
        self.core()
            .nb_collections_of_type(ComponentType::ModelBoundary)
    }

    fn model_boundary(&self, id: ComponentId) -> Result<&Collection, MeshModelError> {
        self.core().collection(id, ComponentType::ModelBoundary)
    }

    fn model_boundaries(&self) -> impl Iterator<Item = &Collection> + Clone + '_ {
        self.core()
            .collections_of_type(ComponentType::ModelBoundary)
    }

    fn nb_corner_collections(&self) -> usize {
        self.core()
            .nb_collections_of_type(ComponentType::CornerCollection)
    }

    fn corner_collection(&self, id: ComponentId) -> Result<&Collection, MeshModelError> {
        self.core().collection(id, ComponentType::CornerCollection)
    }

    fn corner_collections(&self) -> impl Iterator<Item = &Collection> + Clone + '_ {
        self.core()
            .collections_of_type(ComponentType::CornerCollection)
    }

    fn nb_line_collections(&self) -> usize {
        self.core()
            .nb_collections_of_type(ComponentType::LineCollection)
    }

    fn line_collection(&self, id: ComponentId) -> Result<&Collection, MeshModelError> {
        self.core().collection(id, ComponentType::LineCollection)
    }

    fn line_collections(&self) -> impl Iterator<Item = &Collection> + Clone + '_ {
        self.core()
            .collections_of_type(ComponentType::LineCollection)
    }

    fn nb_surface_collections(&self) -> usize {
        self.core()
            .nb_collections_of_type(ComponentType::SurfaceCollection)
    }

    fn surface_collection(&self, id: ComponentId) -> Result<&Collection, MeshModelError> {
        self.core().collection(id, ComponentType::SurfaceCollection)
    }

    fn surface_collections(&self) -> impl Iterator<Item = &Collection> + Clone + '_ {
        self.core()
            .collections_of_type(ComponentType::SurfaceCollection)
    }

    // --- relationship ranges ---

    /// Corners bounding `line`.
    fn boundary_corners(
        &self,
        line: ComponentId,
    ) -> Result<impl Iterator<Item = &Corner> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.typed_range(line, ComponentType::Line, Relationships::boundaries)?;
        Ok(core.related::<PointSet>(range))
    }

    /// Lines bounding `surface`.
    fn boundary_lines(
        &self,
        surface: ComponentId,
    ) -> Result<impl Iterator<Item = &Line> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.typed_range(surface, ComponentType::Surface, Relationships::boundaries)?;
        Ok(core.related::<EdgedCurve>(range))
    }

    /// Lines bounded by `corner`.
    fn incident_lines(
        &self,
        corner: ComponentId,
    ) -> Result<impl Iterator<Item = &Line> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.typed_range(corner, ComponentType::Corner, Relationships::incidences)?;
        Ok(core.related::<EdgedCurve>(range))
    }

    /// Surfaces bounded by `line`.
    fn incident_surfaces(
        &self,
        line: ComponentId,
    ) -> Result<impl Iterator<Item = &Surface> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.typed_range(line, ComponentType::Line, Relationships::incidences)?;
        Ok(core.related::<SurfaceMesh>(range))
    }

    /// Surfaces in which `id` is embedded.
    fn embedding_surfaces(
        &self,
        id: ComponentId,
    ) -> Result<impl Iterator<Item = &Surface> + Clone + '_, MeshModelError> {
        let core = self.core();
        Ok(core.related::<SurfaceMesh>(core.relationships().embeddings(id)?))
    }

    /// Corners embedded in `id`.
    fn internal_corners(
        &self,
        id: ComponentId,
    ) -> Result<impl Iterator<Item = &Corner> + Clone + '_, MeshModelError> {
        let core = self.core();
        Ok(core.related::<PointSet>(core.relationships().internals(id)?))
    }

    /// Lines embedded in `id`.
    fn internal_lines(
        &self,
        id: ComponentId,
    ) -> Result<impl Iterator<Item = &Line> + Clone + '_, MeshModelError> {
        let core = self.core();
        Ok(core.related::<EdgedCurve>(core.relationships().internals(id)?))
    }

    /// Collections (of any kind) containing `id`.
    fn collections(
        &self,
        id: ComponentId,
    ) -> Result<impl Iterator<Item = &Collection> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.relationships().collections(id)?;
        Ok(range.filter_map(move |c| core.collection_by_id(c)))
    }

    fn corner_collection_items(
        &self,
        collection: ComponentId,
    ) -> Result<impl Iterator<Item = &Corner> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.typed_range(
            collection,
            ComponentType::CornerCollection,
            Relationships::items,
        )?;
        Ok(core.related::<PointSet>(range))
    }

    fn line_collection_items(
        &self,
        collection: ComponentId,
    ) -> Result<impl Iterator<Item = &Line> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range =
            core.typed_range(collection, ComponentType::LineCollection, Relationships::items)?;
        Ok(core.related::<EdgedCurve>(range))
    }

    fn surface_collection_items(
        &self,
        collection: ComponentId,
    ) -> Result<impl Iterator<Item = &Surface> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.typed_range(
            collection,
            ComponentType::SurfaceCollection,
            Relationships::items,
        )?;
        Ok(core.related::<SurfaceMesh>(range))
    }

    // --- counts ---

    fn nb_boundaries(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.relationships().nb_boundaries(id)
    }

    fn nb_incidences(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.relationships().nb_incidences(id)
    }

    fn nb_internals(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.relationships().nb_internals(id)
    }

    fn nb_embeddings(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.relationships().nb_embeddings(id)
    }

    fn nb_collections(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.relationships().nb_collections(id)
    }

    fn nb_items(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.relationships().nb_items(id)
    }

    fn nb_internal_corners(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.internal_corners(id).map(Iterator::count)
    }

    fn nb_internal_lines(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.internal_lines(id).map(Iterator::count)
    }

    fn nb_embedding_surfaces(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.embedding_surfaces(id).map(Iterator::count)
    }

    // --- predicates ---

    /// Whether `boundary` bounds `incident`.
    fn is_boundary(
        &self,
        boundary: ComponentId,
        incident: ComponentId,
    ) -> Result<bool, MeshModelError> {
        self.relationships().is_boundary(boundary, incident)
    }

    /// Whether `internal` is embedded in `embedding`.
    fn is_internal(
        &self,
        internal: ComponentId,
        embedding: ComponentId,
    ) -> Result<bool, MeshModelError> {
        self.relationships().is_internal(internal, embedding)
    }

    /// Whether `item` belongs to `collection`.
    fn is_collection_item(
        &self,
        item: ComponentId,
        collection: ComponentId,
    ) -> Result<bool, MeshModelError> {
        self.relationships().is_item(item, collection)
    }
}

/// Queries involving blocks, for volumetric models.
pub trait BlockModel: ComponentModel {
    fn nb_blocks(&self) -> usize {
        self.core().store::<SolidMesh>().len()
    }

    fn block(&self, id: ComponentId) -> Result<&Block, MeshModelError> {
        self.core().component(id)
    }

    fn blocks(&self) -> impl Iterator<Item = &Block> + Clone + '_ {
        self.core().store::<SolidMesh>().iter()
    }

    fn nb_block_collections(&self) -> usize {
        self.core()
            .nb_collections_of_type(ComponentType::BlockCollection)
    }

    fn block_collection(&self, id: ComponentId) -> Result<&Collection, MeshModelError> {
        self.core().collection(id, ComponentType::BlockCollection)
    }

    fn block_collections(&self) -> impl Iterator<Item = &Collection> + Clone + '_ {
        self.core()
            .collections_of_type(ComponentType::BlockCollection)
    }

    /// Surfaces bounding `block`.
    fn boundary_surfaces(
        &self,
        block: ComponentId,
    ) -> Result<impl Iterator<Item = &Surface> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.typed_range(block, ComponentType::Block, Relationships::boundaries)?;
        Ok(core.related::<SurfaceMesh>(range))
    }

    /// Blocks bounded by `surface`.
    fn incident_blocks(
        &self,
        surface: ComponentId,
    ) -> Result<impl Iterator<Item = &Block> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.typed_range(surface, ComponentType::Surface, Relationships::incidences)?;
        Ok(core.related::<SolidMesh>(range))
    }

    /// Blocks in which `id` is embedded.
    fn embedding_blocks(
        &self,
        id: ComponentId,
    ) -> Result<impl Iterator<Item = &Block> + Clone + '_, MeshModelError> {
        let core = self.core();
        Ok(core.related::<SolidMesh>(core.relationships().embeddings(id)?))
    }

    /// Surfaces embedded in `block`.
    fn internal_surfaces(
        &self,
        block: ComponentId,
    ) -> Result<impl Iterator<Item = &Surface> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.typed_range(block, ComponentType::Block, Relationships::internals)?;
        Ok(core.related::<SurfaceMesh>(range))
    }

    fn block_collection_items(
        &self,
        collection: ComponentId,
    ) -> Result<impl Iterator<Item = &Block> + Clone + '_, MeshModelError> {
        let core = self.core();
        let range = core.typed_range(
            collection,
            ComponentType::BlockCollection,
            Relationships::items,
        )?;
        Ok(core.related::<SolidMesh>(range))
    }

    fn nb_internal_surfaces(&self, block: ComponentId) -> Result<usize, MeshModelError> {
        self.internal_surfaces(block).map(Iterator::count)
    }

    fn nb_embedding_blocks(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.embedding_blocks(id).map(Iterator::count)
    }
}
