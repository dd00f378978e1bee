//! Storage shared by every model: the component arena, one store per
//! component family and the relationship graph.
//!
//! [`ModelCore`] keeps three views of each component in sync: its slot in the
//! generation-checked registry, its entry in the matching store and its
//! registration in [`Relationships`]. All mutations go through the methods
//! below so that the three views never diverge.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::debug_invariants::DebugInvariants;
use crate::mesh::Mesh;
use crate::mesh_error::MeshModelError;
use crate::model::component::{Block, Collection, Component, ComponentMesh, Corner, Line, Surface};
use crate::model::store::ComponentStore;
use crate::topology::component::{ComponentId, ComponentRef, ComponentType};
use crate::topology::relation::RelationKind;
use crate::topology::relationships::{RelationRange, Relationships};

/// Old → new component ids produced when copying components between models.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelCopyMapping {
    mappings: BTreeMap<ComponentType, HashMap<ComponentId, ComponentId>>,
}

impl ModelCopyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&mut self, component_type: ComponentType, old: ComponentId, new: ComponentId) {
        self.mappings
            .entry(component_type)
            .or_default()
            .insert(old, new);
    }

    /// New id of `old`, a component of `component_type`.
    pub fn get(&self, component_type: ComponentType, old: ComponentId) -> Option<ComponentId> {
        self.mappings.get(&component_type)?.get(&old).copied()
    }

    /// New id of `old`, whatever its type.
    pub fn in2out(&self, old: ComponentId) -> Option<ComponentId> {
        self.mappings
            .values()
            .find_map(|mapping| mapping.get(&old).copied())
    }

    pub fn nb_mappings(&self, component_type: ComponentType) -> usize {
        self.mappings.get(&component_type).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.values().all(HashMap::is_empty)
    }
}

/// Components and relationships of a model of a given dimension.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelCore {
    dimension: usize,
    registry: SlotMap<ComponentId, ComponentType>,
    pub(crate) corners: ComponentStore<Corner>,
    pub(crate) lines: ComponentStore<Line>,
    pub(crate) surfaces: ComponentStore<Surface>,
    pub(crate) blocks: ComponentStore<Block>,
    collections: ComponentStore<Collection>,
    relationships: Relationships,
}

impl ModelCore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            registry: SlotMap::with_key(),
            corners: ComponentStore::default(),
            lines: ComponentStore::default(),
            surfaces: ComponentStore::default(),
            blocks: ComponentStore::default(),
            collections: ComponentStore::default(),
            relationships: Relationships::new(),
        }
    }

    /// Spatial dimension of the component meshes.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    pub(crate) fn relationships_mut(&mut self) -> &mut Relationships {
        &mut self.relationships
    }

    pub fn nb_components(&self) -> usize {
        self.registry.len()
    }

    /// Type of a live component.
    pub fn component_type(&self, id: ComponentId) -> Result<ComponentType, MeshModelError> {
        self.registry
            .get(id)
            .copied()
            .ok_or(MeshModelError::ComponentNotFound(id))
    }

    /// `ComponentTypeMismatch` unless `id` is a live component of `expected`.
    pub fn expect_type(
        &self,
        id: ComponentId,
        expected: ComponentType,
    ) -> Result<(), MeshModelError> {
        let found = self.component_type(id)?;
        if found == expected {
            Ok(())
        } else {
            Err(MeshModelError::ComponentTypeMismatch {
                id,
                expected,
                found,
            })
        }
    }

    pub fn store<M: ComponentMesh>(&self) -> &ComponentStore<Component<M>> {
        M::store(self)
    }

    pub fn component<M: ComponentMesh>(
        &self,
        id: ComponentId,
    ) -> Result<&Component<M>, MeshModelError> {
        self.expect_type(id, M::COMPONENT_TYPE)?;
        M::store(self)
            .get(id)
            .ok_or(MeshModelError::ComponentNotFound(id))
    }

    pub(crate) fn component_mut<M: ComponentMesh>(
        &mut self,
        id: ComponentId,
    ) -> Result<&mut Component<M>, MeshModelError> {
        self.expect_type(id, M::COMPONENT_TYPE)?;
        M::store_mut(self)
            .get_mut(id)
            .ok_or(MeshModelError::ComponentNotFound(id))
    }

    pub fn collection(
        &self,
        id: ComponentId,
        component_type: ComponentType,
    ) -> Result<&Collection, MeshModelError> {
        self.expect_type(id, component_type)?;
        self.collections
            .get(id)
            .ok_or(MeshModelError::ComponentNotFound(id))
    }

    pub(crate) fn collection_mut(
        &mut self,
        id: ComponentId,
        component_type: ComponentType,
    ) -> Result<&mut Collection, MeshModelError> {
        self.expect_type(id, component_type)?;
        self.collections
            .get_mut(id)
            .ok_or(MeshModelError::ComponentNotFound(id))
    }

    /// Collection of any type.
    pub fn collection_by_id(&self, id: ComponentId) -> Option<&Collection> {
        self.collections.get(id)
    }

    /// Collections of one type in insertion order.
    pub fn collections_of_type(
        &self,
        component_type: ComponentType,
    ) -> impl Iterator<Item = &Collection> + Clone + '_ {
        self.collections
            .iter()
            .filter(move |c| c.component_type() == component_type)
    }

    pub fn nb_collections_of_type(&self, component_type: ComponentType) -> usize {
        self.collections_of_type(component_type).count()
    }

    /// Insert a component owning `mesh`, which must match the model dimension.
    pub(crate) fn add_component<M: ComponentMesh>(
        &mut self,
        mesh: M,
    ) -> Result<ComponentId, MeshModelError> {
        if mesh.dimension() != self.dimension {
            return Err(MeshModelError::DimensionMismatch {
                expected: self.dimension,
                found: mesh.dimension(),
            });
        }
        Ok(self.insert_component(mesh))
    }

    /// Insert a component with an empty mesh of the model dimension.
    pub(crate) fn add_empty_component<M: ComponentMesh>(&mut self) -> ComponentId {
        self.insert_component(M::with_dimension(self.dimension))
    }

    fn insert_component<M: ComponentMesh>(&mut self, mesh: M) -> ComponentId {
        let id = self.registry.insert(M::COMPONENT_TYPE);
        M::store_mut(self).insert(id, Component::new(id, mesh));
        self.relationships
            .register_component(ComponentRef::new(id, M::COMPONENT_TYPE));
        id
    }

    pub(crate) fn add_collection(&mut self, component_type: ComponentType) -> ComponentId {
        debug_assert!(component_type.is_collection());
        let id = self.registry.insert(component_type);
        self.collections
            .insert(id, Collection::new(id, component_type));
        self.relationships
            .register_component(ComponentRef::new(id, component_type));
        id
    }

    /// Remove a component of `expected` type and every relation touching it.
    pub(crate) fn remove(
        &mut self,
        id: ComponentId,
        expected: ComponentType,
    ) -> Result<(), MeshModelError> {
        self.expect_type(id, expected)?;
        self.relationships.unregister_component(id)?;
        match expected {
            ComponentType::Corner => self.corners.remove(id).map(|_| ()),
            ComponentType::Line => self.lines.remove(id).map(|_| ()),
            ComponentType::Surface => self.surfaces.remove(id).map(|_| ()),
            ComponentType::Block => self.blocks.remove(id).map(|_| ()),
            _ => self.collections.remove(id).map(|_| ()),
        };
        self.registry.remove(id);
        crate::debug_invariants!(self.validate_invariants(), "ModelCore::remove");
        Ok(())
    }

    /// Add `from -> to` after checking both component types.
    pub(crate) fn relate(
        &mut self,
        kind: RelationKind,
        (from, from_type): (ComponentId, ComponentType),
        (to, to_type): (ComponentId, ComponentType),
    ) -> Result<(), MeshModelError> {
        self.expect_type(from, from_type)?;
        self.expect_type(to, to_type)?;
        match kind {
            RelationKind::Boundary => self.relationships.add_boundary_relation(from, to),
            RelationKind::Internal => self.relationships.add_internal_relation(from, to),
            RelationKind::Item => self.relationships.add_item_in_collection(from, to),
        }
    }

    /// Resolve the `M` components of a relation range.
    pub fn related<'a, M: ComponentMesh>(
        &'a self,
        range: RelationRange<'a>,
    ) -> impl Iterator<Item = &'a Component<M>> + Clone + 'a {
        let store = M::store(self);
        range
            .of_type(M::COMPONENT_TYPE)
            .filter_map(move |id| store.get(id))
    }

    /// Ranges anchored at a component of a known type.
    pub(crate) fn typed_range<'a>(
        &'a self,
        id: ComponentId,
        expected: ComponentType,
        range: fn(&'a Relationships, ComponentId) -> Result<RelationRange<'a>, MeshModelError>,
    ) -> Result<RelationRange<'a>, MeshModelError> {
        self.expect_type(id, expected)?;
        range(&self.relationships, id)
    }

    /// Every component in a stable order: corners, lines, surfaces, blocks,
    /// then collections, each in insertion order.
    pub fn component_refs(&self) -> impl Iterator<Item = ComponentRef> + '_ {
        self.corners
            .iter()
            .map(Corner::component_ref)
            .chain(self.lines.iter().map(Line::component_ref))
            .chain(self.surfaces.iter().map(Surface::component_ref))
            .chain(self.blocks.iter().map(Block::component_ref))
            .chain(self.collections.iter().map(Collection::component_ref))
    }

    /// Append copies of every component of `other`.
    pub(crate) fn copy_components(
        &mut self,
        other: &ModelCore,
    ) -> Result<ModelCopyMapping, MeshModelError> {
        if other.dimension != self.dimension {
            return Err(MeshModelError::DimensionMismatch {
                expected: self.dimension,
                found: other.dimension,
            });
        }
        let mut mapping = ModelCopyMapping::new();
        self.copy_store::<crate::mesh::PointSet>(other, &mut mapping)?;
        self.copy_store::<crate::mesh::EdgedCurve>(other, &mut mapping)?;
        self.copy_store::<crate::mesh::SurfaceMesh>(other, &mut mapping)?;
        self.copy_store::<crate::mesh::SolidMesh>(other, &mut mapping)?;
        for collection in other.collections.iter() {
            let id = self.add_collection(collection.component_type());
            if let Some(copy) = self.collections.get_mut(id) {
                copy.set_name(collection.name());
            }
            mapping.map(collection.component_type(), collection.id(), id);
        }
        log::debug!(
            "copied {} components",
            ComponentType::ALL
                .iter()
                .map(|&t| mapping.nb_mappings(t))
                .sum::<usize>()
        );
        Ok(mapping)
    }

    fn copy_store<M: ComponentMesh>(
        &mut self,
        other: &ModelCore,
        mapping: &mut ModelCopyMapping,
    ) -> Result<(), MeshModelError> {
        for component in M::store(other).iter() {
            let id = self.add_component(component.mesh().clone())?;
            self.component_mut::<M>(id)?.set_name(component.name());
            mapping.map(M::COMPONENT_TYPE, component.id(), id);
        }
        Ok(())
    }

    /// Recreate the relations of `other` between mapped components.
    ///
    /// Relations touching an unmapped component are skipped.
    pub(crate) fn copy_relationships(
        &mut self,
        mapping: &ModelCopyMapping,
        other: &ModelCore,
    ) -> Result<(), MeshModelError> {
        for component in other.component_refs() {
            let Some(from) = mapping.get(component.component_type, component.id) else {
                continue;
            };
            for (to, kind) in other.relationships.outgoing(component.id)? {
                let Some(to) = mapping.in2out(to) else {
                    continue;
                };
                if self.relationships.relation_kind(from, to) == Some(kind) {
                    continue;
                }
                match kind {
                    RelationKind::Boundary => self.relationships.add_boundary_relation(from, to)?,
                    RelationKind::Internal => self.relationships.add_internal_relation(from, to)?,
                    RelationKind::Item => self.relationships.add_item_in_collection(from, to)?,
                }
            }
        }
        Ok(())
    }
}

impl DebugInvariants for ModelCore {
    fn validate_invariants(&self) -> Result<(), MeshModelError> {
        self.relationships.validate_invariants()?;
        let stored = self.corners.len()
            + self.lines.len()
            + self.surfaces.len()
            + self.blocks.len()
            + self.collections.len();
        if stored != self.registry.len() {
            return Err(MeshModelError::InvariantViolation(format!(
                "{stored} stored components for {} registered ids",
                self.registry.len()
            )));
        }
        for (id, &component_type) in &self.registry {
            let present = match component_type {
                ComponentType::Corner => self.corners.contains(id),
                ComponentType::Line => self.lines.contains(id),
                ComponentType::Surface => self.surfaces.contains(id),
                ComponentType::Block => self.blocks.contains(id),
                _ => self.collections.contains(id),
            };
            if !present {
                return Err(MeshModelError::InvariantViolation(format!(
                    "{component_type}({id}) is registered but not stored"
                )));
            }
            if self.relationships.component_type(id)? != component_type {
                return Err(MeshModelError::InvariantViolation(format!(
                    "{component_type}({id}) has another type in the relationship graph"
                )));
            }
        }
        Ok(())
    }
}
