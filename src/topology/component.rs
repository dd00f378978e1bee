//! `ComponentId`: a generation-checked handle for model components
//!
//! Every component of a model (corner, line, surface, block or collection)
//! is identified by a key into the model's component arena. Keys carry a
//! generation so that an id kept after its component was removed is
//! detected instead of silently aliasing a newer component.
//!
//! This module provides:
//! - [`ComponentId`], the arena key (`Copy`, hashable, ordered, serializable),
//! - [`ComponentType`], the closed set of component kinds,
//! - [`ComponentRef`], an id paired with its type.

use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::Key;

slotmap::new_key_type! {
    /// Opaque, generation-checked component handle.
    pub struct ComponentId;
}

/// Prints the arena slot and generation, e.g. `3v1`.
impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.data())
    }
}

/// Kinds of model components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentType {
    Corner,
    Line,
    Surface,
    Block,
    CornerCollection,
    LineCollection,
    SurfaceCollection,
    BlockCollection,
    ModelBoundary,
}

impl ComponentType {
    /// Every component type, mesh components first.
    pub const ALL: [ComponentType; 9] = [
        ComponentType::Corner,
        ComponentType::Line,
        ComponentType::Surface,
        ComponentType::Block,
        ComponentType::CornerCollection,
        ComponentType::LineCollection,
        ComponentType::SurfaceCollection,
        ComponentType::BlockCollection,
        ComponentType::ModelBoundary,
    ];

    /// Returns a stable string label for the component type.
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Corner => "Corner",
            ComponentType::Line => "Line",
            ComponentType::Surface => "Surface",
            ComponentType::Block => "Block",
            ComponentType::CornerCollection => "CornerCollection",
            ComponentType::LineCollection => "LineCollection",
            ComponentType::SurfaceCollection => "SurfaceCollection",
            ComponentType::BlockCollection => "BlockCollection",
            ComponentType::ModelBoundary => "ModelBoundary",
        }
    }

    /// Topological dimension of mesh components, `None` for collections.
    pub fn dimension(self) -> Option<usize> {
        match self {
            ComponentType::Corner => Some(0),
            ComponentType::Line => Some(1),
            ComponentType::Surface => Some(2),
            ComponentType::Block => Some(3),
            _ => None,
        }
    }

    pub fn is_collection(self) -> bool {
        self.dimension().is_none()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A component id together with its type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentRef {
    pub id: ComponentId,
    pub component_type: ComponentType,
}

impl ComponentRef {
    pub fn new(id: ComponentId, component_type: ComponentType) -> Self {
        Self { id, component_type }
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.component_type, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use static_assertions::assert_eq_size;

    assert_eq_size!(ComponentId, u64);
    assert_eq_size!(Option<ComponentId>, u64);

    #[test]
    fn stale_ids_do_not_alias() {
        let mut arena = SlotMap::<ComponentId, ComponentType>::with_key();
        let a = arena.insert(ComponentType::Corner);
        arena.remove(a);
        let b = arena.insert(ComponentType::Line);
        assert_ne!(a, b);
        assert!(!arena.contains_key(a));
        assert_eq!(arena[b], ComponentType::Line);
    }

    #[test]
    fn display_and_serde() {
        let mut arena = SlotMap::<ComponentId, ()>::with_key();
        let id = arena.insert(());
        let r = ComponentRef::new(id, ComponentType::Surface);
        assert!(r.to_string().starts_with("Surface("));
        let json = serde_json::to_string(&r).unwrap();
        let back: ComponentRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn collections_have_no_dimension() {
        assert_eq!(ComponentType::Block.dimension(), Some(3));
        assert!(ComponentType::ModelBoundary.is_collection());
        assert!(!ComponentType::Corner.is_collection());
        assert_eq!(ComponentType::ALL.len(), 9);
    }
}
