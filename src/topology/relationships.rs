//! In-memory relationship graph between model components.
//!
//! [`Relationships`] stores one [`RelationKind`] per ordered component pair
//! in a single edge map, plus two mirrored adjacency lists (outgoing by
//! `from`, incoming by `to`) kept in insertion order. All range queries read
//! the adjacency lists and filter them by kind through the edge map, so every
//! count is consistent with its range.
//!
//! Naming follows the direction of the stored edge `from -> to`:
//!
//! | kind     | `from` sees `to` as | `to` sees `from` as |
//! |----------|---------------------|---------------------|
//! | Boundary | incidence           | boundary            |
//! | Internal | embedding           | internal            |
//! | Item     | collection          | item                |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshModelError;
use crate::topology::component::{ComponentId, ComponentRef, ComponentType};
use crate::topology::relation::{DuplicateRelationHandling, RelationKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    /// Edges ending at the anchor.
    Incoming,
    /// Edges starting at the anchor.
    Outgoing,
}

/// Relationship graph over registered components.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationships {
    components: HashMap<ComponentId, ComponentType>,
    edges: HashMap<(ComponentId, ComponentId), RelationKind>,
    /// Outgoing adjacency: `from -> [to]` in insertion order.
    adjacency_out: HashMap<ComponentId, Vec<ComponentId>>,
    /// Incoming adjacency: `to -> [from]` in insertion order.
    adjacency_in: HashMap<ComponentId, Vec<ComponentId>>,
    duplicate_handling: DuplicateRelationHandling,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duplicate_handling(&self) -> DuplicateRelationHandling {
        self.duplicate_handling
    }

    pub fn set_duplicate_handling(&mut self, handling: DuplicateRelationHandling) {
        self.duplicate_handling = handling;
    }

    /// Make `component` eligible for relations.
    ///
    /// Registering an id twice is a no-op. The first registered type is
    /// kept; a second registration under another type is reported and
    /// ignored.
    pub fn register_component(&mut self, component: ComponentRef) {
        match self.components.get(&component.id) {
            Some(&existing) if existing == component.component_type => {}
            Some(&existing) => {
                log::warn!("ignore registration of {component}: already registered as {existing}");
            }
            None => {
                self.components
                    .insert(component.id, component.component_type);
                log::debug!("registered {component}");
            }
        }
    }

    /// Forget `id` and every relation touching it, in either direction.
    ///
    /// Returns the number of removed relations.
    pub fn unregister_component(&mut self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.component_type(id)?;
        let outgoing = self.adjacency_out.remove(&id).unwrap_or_default();
        let incoming = self.adjacency_in.remove(&id).unwrap_or_default();
        for &to in &outgoing {
            self.edges.remove(&(id, to));
            if let Some(ins) = self.adjacency_in.get_mut(&to) {
                ins.retain(|&from| from != id);
            }
        }
        for &from in &incoming {
            self.edges.remove(&(from, id));
            if let Some(outs) = self.adjacency_out.get_mut(&from) {
                outs.retain(|&to| to != id);
            }
        }
        self.components.remove(&id);
        let removed = outgoing.len() + incoming.len();
        log::debug!("unregistered {id}, removed {removed} relations");
        crate::debug_invariants!(self.validate_invariants(), "Relationships::unregister_component");
        Ok(removed)
    }

    pub fn is_registered(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    /// Type of a registered component.
    pub fn component_type(&self, id: ComponentId) -> Result<ComponentType, MeshModelError> {
        self.components
            .get(&id)
            .copied()
            .ok_or(MeshModelError::ComponentNotFound(id))
    }

    fn add_relation(
        &mut self,
        from: ComponentId,
        to: ComponentId,
        kind: RelationKind,
    ) -> Result<(), MeshModelError> {
        let from_type = self.component_type(from)?;
        let to_type = self.component_type(to)?;
        kind.check(from_type, to_type)?;
        if let Some(&existing) = self.edges.get(&(from, to)) {
            if existing != kind {
                return Err(MeshModelError::ConflictingRelationship {
                    from,
                    to,
                    existing,
                    requested: kind,
                });
            }
            return match self.duplicate_handling {
                DuplicateRelationHandling::Ignore => Ok(()),
                DuplicateRelationHandling::Warn => {
                    log::warn!("{kind} relation from {from} to {to} already exists");
                    Ok(())
                }
                DuplicateRelationHandling::Error => {
                    Err(MeshModelError::DuplicateRelation { kind, from, to })
                }
            };
        }
        if let Some(&existing) = self.edges.get(&(to, from)) {
            return Err(MeshModelError::ConflictingRelationship {
                from,
                to,
                existing,
                requested: kind,
            });
        }
        self.edges.insert((from, to), kind);
        self.adjacency_out.entry(from).or_default().push(to);
        self.adjacency_in.entry(to).or_default().push(from);
        #[cfg(any(debug_assertions, feature = "check-invariants"))]
        self.debug_assert_consistent();
        Ok(())
    }

    /// Record that `boundary` bounds `incident`.
    pub fn add_boundary_relation(
        &mut self,
        boundary: ComponentId,
        incident: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.add_relation(boundary, incident, RelationKind::Boundary)
    }

    /// Record that `internal` is embedded in `embedding`.
    pub fn add_internal_relation(
        &mut self,
        internal: ComponentId,
        embedding: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.add_relation(internal, embedding, RelationKind::Internal)
    }

    /// Record that `item` belongs to `collection`.
    pub fn add_item_in_collection(
        &mut self,
        item: ComponentId,
        collection: ComponentId,
    ) -> Result<(), MeshModelError> {
        self.add_relation(item, collection, RelationKind::Item)
    }

    /// Remove the relation between `a` and `b`, whichever way it points.
    ///
    /// Returns the kind of the removed relation, if any.
    pub fn remove_relation(
        &mut self,
        a: ComponentId,
        b: ComponentId,
    ) -> Result<Option<RelationKind>, MeshModelError> {
        self.component_type(a)?;
        self.component_type(b)?;
        let (from, to, kind) = match (self.edges.remove(&(a, b)), self.edges.remove(&(b, a))) {
            (Some(kind), _) => (a, b, kind),
            (None, Some(kind)) => (b, a, kind),
            (None, None) => return Ok(None),
        };
        if let Some(outs) = self.adjacency_out.get_mut(&from) {
            outs.retain(|&t| t != to);
        }
        if let Some(ins) = self.adjacency_in.get_mut(&to) {
            ins.retain(|&f| f != from);
        }
        Ok(Some(kind))
    }

    /// Kind of the stored relation `from -> to`.
    pub fn relation_kind(&self, from: ComponentId, to: ComponentId) -> Option<RelationKind> {
        self.edges.get(&(from, to)).copied()
    }

    /// Every relation starting at `id`, in insertion order.
    pub fn outgoing(
        &self,
        id: ComponentId,
    ) -> Result<impl Iterator<Item = (ComponentId, RelationKind)> + '_, MeshModelError> {
        self.component_type(id)?;
        let outs = self.adjacency_out.get(&id).map_or(&[][..], Vec::as_slice);
        Ok(outs
            .iter()
            .filter_map(move |&to| self.relation_kind(id, to).map(|kind| (to, kind))))
    }

    /// Number of registered components taking part in at least one relation.
    pub fn nb_components_with_relations(&self) -> usize {
        self.components
            .keys()
            .filter(|&id| {
                self.adjacency_out.get(id).is_some_and(|v| !v.is_empty())
                    || self.adjacency_in.get(id).is_some_and(|v| !v.is_empty())
            })
            .count()
    }

    /// Total number of stored relations.
    pub fn nb_relations(&self) -> usize {
        self.edges.len()
    }

    fn range(
        &self,
        anchor: ComponentId,
        direction: Direction,
        kind: RelationKind,
    ) -> Result<RelationRange<'_>, MeshModelError> {
        self.component_type(anchor)?;
        let adjacency = match direction {
            Direction::Incoming => &self.adjacency_in,
            Direction::Outgoing => &self.adjacency_out,
        };
        let neighbors = adjacency.get(&anchor).map_or(&[][..], Vec::as_slice);
        Ok(RelationRange {
            relationships: self,
            anchor,
            neighbors: neighbors.iter(),
            direction,
            kind,
        })
    }

    /// Components bounding `id`.
    pub fn boundaries(&self, id: ComponentId) -> Result<RelationRange<'_>, MeshModelError> {
        self.range(id, Direction::Incoming, RelationKind::Boundary)
    }

    /// Components bounded by `id`.
    pub fn incidences(&self, id: ComponentId) -> Result<RelationRange<'_>, MeshModelError> {
        self.range(id, Direction::Outgoing, RelationKind::Boundary)
    }

    /// Components embedded in `id`.
    pub fn internals(&self, id: ComponentId) -> Result<RelationRange<'_>, MeshModelError> {
        self.range(id, Direction::Incoming, RelationKind::Internal)
    }

    /// Components `id` is embedded in.
    pub fn embeddings(&self, id: ComponentId) -> Result<RelationRange<'_>, MeshModelError> {
        self.range(id, Direction::Outgoing, RelationKind::Internal)
    }

    /// Items of the collection `id`.
    pub fn items(&self, id: ComponentId) -> Result<RelationRange<'_>, MeshModelError> {
        self.range(id, Direction::Incoming, RelationKind::Item)
    }

    /// Collections containing `id`.
    pub fn collections(&self, id: ComponentId) -> Result<RelationRange<'_>, MeshModelError> {
        self.range(id, Direction::Outgoing, RelationKind::Item)
    }

    pub fn nb_boundaries(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.boundaries(id).map(Iterator::count)
    }

    pub fn nb_incidences(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.incidences(id).map(Iterator::count)
    }

    pub fn nb_internals(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.internals(id).map(Iterator::count)
    }

    pub fn nb_embeddings(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.embeddings(id).map(Iterator::count)
    }

    pub fn nb_items(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.items(id).map(Iterator::count)
    }

    pub fn nb_collections(&self, id: ComponentId) -> Result<usize, MeshModelError> {
        self.collections(id).map(Iterator::count)
    }

    fn has_relation(
        &self,
        from: ComponentId,
        to: ComponentId,
        kind: RelationKind,
    ) -> Result<bool, MeshModelError> {
        self.component_type(from)?;
        self.component_type(to)?;
        Ok(self.relation_kind(from, to) == Some(kind))
    }

    /// Whether `boundary` bounds `incident`.
    pub fn is_boundary(
        &self,
        boundary: ComponentId,
        incident: ComponentId,
    ) -> Result<bool, MeshModelError> {
        self.has_relation(boundary, incident, RelationKind::Boundary)
    }

    /// Whether `internal` is embedded in `embedding`.
    pub fn is_internal(
        &self,
        internal: ComponentId,
        embedding: ComponentId,
    ) -> Result<bool, MeshModelError> {
        self.has_relation(internal, embedding, RelationKind::Internal)
    }

    /// Whether `item` belongs to `collection`.
    pub fn is_item(
        &self,
        item: ComponentId,
        collection: ComponentId,
    ) -> Result<bool, MeshModelError> {
        self.has_relation(item, collection, RelationKind::Item)
    }

    #[cfg(any(debug_assertions, feature = "check-invariants"))]
    fn debug_assert_consistent(&self) {
        if let Err(e) = self.validate_invariants() {
            panic!("[invariants] Relationships: {e}");
        }
    }
}

impl DebugInvariants for Relationships {
    fn validate_invariants(&self) -> Result<(), MeshModelError> {
        let mut mirrored = 0;
        for (&from, outs) in &self.adjacency_out {
            for &to in outs {
                if !self.edges.contains_key(&(from, to)) {
                    return Err(MeshModelError::InvariantViolation(format!(
                        "adjacency {from} -> {to} has no edge"
                    )));
                }
                let mirror = self
                    .adjacency_in
                    .get(&to)
                    .is_some_and(|ins| ins.contains(&from));
                if !mirror {
                    return Err(MeshModelError::InvariantViolation(format!(
                        "missing mirror in[{to}] for edge {from} -> {to}"
                    )));
                }
                mirrored += 1;
            }
        }
        let incoming: usize = self.adjacency_in.values().map(Vec::len).sum();
        if mirrored != self.edges.len() || incoming != self.edges.len() {
            return Err(MeshModelError::InvariantViolation(format!(
                "{} edges, {mirrored} outgoing and {incoming} incoming entries",
                self.edges.len()
            )));
        }
        for &(from, to) in self.edges.keys() {
            for id in [from, to] {
                if !self.components.contains_key(&id) {
                    return Err(MeshModelError::InvariantViolation(format!(
                        "edge {from} -> {to} touches unregistered {id}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Lazy, restartable range of related components in insertion order.
#[derive(Clone, Debug)]
pub struct RelationRange<'a> {
    relationships: &'a Relationships,
    anchor: ComponentId,
    neighbors: std::slice::Iter<'a, ComponentId>,
    direction: Direction,
    kind: RelationKind,
}

impl<'a> RelationRange<'a> {
    /// Restrict the range to components of `component_type`.
    pub fn of_type(
        self,
        component_type: ComponentType,
    ) -> impl Iterator<Item = ComponentId> + Clone + 'a {
        let relationships = self.relationships;
        self.filter(move |&id| {
            relationships.components.get(&id) == Some(&component_type)
        })
    }

    /// Pair each id with its component type.
    pub fn with_types(self) -> impl Iterator<Item = ComponentRef> + Clone + 'a {
        let relationships = self.relationships;
        self.filter_map(move |id| {
            relationships
                .components
                .get(&id)
                .map(|&t| ComponentRef::new(id, t))
        })
    }
}

impl Iterator for RelationRange<'_> {
    type Item = ComponentId;

    fn next(&mut self) -> Option<ComponentId> {
        for &other in self.neighbors.by_ref() {
            let key = match self.direction {
                Direction::Incoming => (other, self.anchor),
                Direction::Outgoing => (self.anchor, other),
            };
            if self.relationships.edges.get(&key) == Some(&self.kind) {
                return Some(other);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.neighbors.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    struct Fixture {
        arena: SlotMap<ComponentId, ComponentType>,
        rel: Relationships,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                arena: SlotMap::with_key(),
                rel: Relationships::new(),
            }
        }

        fn add(&mut self, t: ComponentType) -> ComponentId {
            let id = self.arena.insert(t);
            self.rel.register_component(ComponentRef::new(id, t));
            id
        }
    }

    #[test]
    fn reregistration_keeps_the_first_type() {
        let mut f = Fixture::new();
        let c = f.add(ComponentType::Corner);
        let l = f.add(ComponentType::Line);
        f.rel.add_boundary_relation(c, l).unwrap();
        f.rel
            .register_component(ComponentRef::new(c, ComponentType::Block));
        f.rel
            .register_component(ComponentRef::new(c, ComponentType::Corner));
        assert_eq!(f.rel.component_type(c).unwrap(), ComponentType::Corner);
        assert_eq!(f.rel.nb_incidences(c).unwrap(), 1);
        f.rel.validate_invariants().unwrap();
    }

    #[test]
    fn boundary_ranges_mirror() {
        let mut f = Fixture::new();
        let c = f.add(ComponentType::Corner);
        let l0 = f.add(ComponentType::Line);
        let l1 = f.add(ComponentType::Line);
        f.rel.add_boundary_relation(c, l0).unwrap();
        f.rel.add_boundary_relation(c, l1).unwrap();
        assert_eq!(f.rel.incidences(c).unwrap().collect::<Vec<_>>(), vec![l0, l1]);
        assert_eq!(f.rel.boundaries(l1).unwrap().collect::<Vec<_>>(), vec![c]);
        assert_eq!(f.rel.nb_boundaries(c).unwrap(), 0);
        assert!(f.rel.is_boundary(c, l0).unwrap());
        assert!(!f.rel.is_boundary(l0, c).unwrap());
        f.rel.validate_invariants().unwrap();
    }

    #[test]
    fn ranges_restart_from_clone() {
        let mut f = Fixture::new();
        let c = f.add(ComponentType::Corner);
        let l = f.add(ComponentType::Line);
        f.rel.add_boundary_relation(c, l).unwrap();
        let range = f.rel.incidences(c).unwrap();
        assert_eq!(range.clone().count(), 1);
        assert_eq!(range.count(), 1);
    }

    #[test]
    fn invalid_types_rejected_without_mutation() {
        let mut f = Fixture::new();
        let c = f.add(ComponentType::Corner);
        let b = f.add(ComponentType::Block);
        assert!(matches!(
            f.rel.add_boundary_relation(c, b),
            Err(MeshModelError::InvalidRelationship { .. })
        ));
        assert_eq!(f.rel.nb_relations(), 0);
        assert_eq!(f.rel.nb_components_with_relations(), 0);
    }

    #[test]
    fn kinds_are_exclusive() {
        let mut f = Fixture::new();
        let s = f.add(ComponentType::Surface);
        let b = f.add(ComponentType::Block);
        f.rel.add_boundary_relation(s, b).unwrap();
        assert!(matches!(
            f.rel.add_internal_relation(s, b),
            Err(MeshModelError::ConflictingRelationship {
                existing: RelationKind::Boundary,
                requested: RelationKind::Internal,
                ..
            })
        ));
        assert_eq!(f.rel.nb_relations(), 1);
    }

    #[test]
    fn duplicate_policies() {
        let mut f = Fixture::new();
        let c = f.add(ComponentType::Corner);
        let l = f.add(ComponentType::Line);
        f.rel.add_boundary_relation(c, l).unwrap();
        f.rel.add_boundary_relation(c, l).unwrap();
        assert_eq!(f.rel.nb_incidences(c).unwrap(), 1);
        f.rel.set_duplicate_handling(DuplicateRelationHandling::Error);
        assert!(matches!(
            f.rel.add_boundary_relation(c, l),
            Err(MeshModelError::DuplicateRelation { .. })
        ));
    }

    #[test]
    fn unregister_cascades() {
        let mut f = Fixture::new();
        let c = f.add(ComponentType::Corner);
        let l = f.add(ComponentType::Line);
        let s = f.add(ComponentType::Surface);
        let coll = f.add(ComponentType::LineCollection);
        f.rel.add_boundary_relation(c, l).unwrap();
        f.rel.add_boundary_relation(l, s).unwrap();
        f.rel.add_item_in_collection(l, coll).unwrap();
        f.rel.add_internal_relation(c, s).unwrap();
        assert_eq!(f.rel.unregister_component(l).unwrap(), 3);
        assert_eq!(f.rel.nb_incidences(c).unwrap(), 0);
        assert_eq!(f.rel.nb_items(coll).unwrap(), 0);
        assert_eq!(f.rel.nb_embeddings(c).unwrap(), 1);
        assert!(matches!(
            f.rel.nb_boundaries(l),
            Err(MeshModelError::ComponentNotFound(_))
        ));
        f.rel.validate_invariants().unwrap();
    }

    #[test]
    fn remove_relation_either_way() {
        let mut f = Fixture::new();
        let l = f.add(ComponentType::Line);
        let s = f.add(ComponentType::Surface);
        f.rel.add_internal_relation(l, s).unwrap();
        assert_eq!(
            f.rel.remove_relation(s, l).unwrap(),
            Some(RelationKind::Internal)
        );
        assert_eq!(f.rel.remove_relation(l, s).unwrap(), None);
        assert_eq!(f.rel.nb_internals(s).unwrap(), 0);
        f.rel.validate_invariants().unwrap();
    }

    #[test]
    fn type_filter() {
        let mut f = Fixture::new();
        let c = f.add(ComponentType::Corner);
        let s = f.add(ComponentType::Surface);
        let b = f.add(ComponentType::Block);
        f.rel.add_internal_relation(c, s).unwrap();
        f.rel.add_internal_relation(c, b).unwrap();
        let blocks: Vec<_> = f
            .rel
            .embeddings(c)
            .unwrap()
            .of_type(ComponentType::Block)
            .collect();
        assert_eq!(blocks, vec![b]);
    }
}
