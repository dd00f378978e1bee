//! Model components: meshed components and collections.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::mesh::{EdgedCurve, Mesh, PointSet, SolidMesh, SurfaceMesh};
use crate::model::core::ModelCore;
use crate::model::store::ComponentStore;
use crate::topology::component::{ComponentId, ComponentRef, ComponentType};

/// A mesh type that can back a model component.
///
/// Maps each mesh to its component type and to the store holding the
/// components of that type inside a [`ModelCore`].
pub trait ComponentMesh:
    Mesh + Clone + Debug + PartialEq + Serialize + DeserializeOwned + 'static
{
    const COMPONENT_TYPE: ComponentType;

    /// Empty mesh embedded in `dimension`-dimensional space.
    fn with_dimension(dimension: usize) -> Self;

    #[doc(hidden)]
    fn store(core: &ModelCore) -> &ComponentStore<Component<Self>>;
    #[doc(hidden)]
    fn store_mut(core: &mut ModelCore) -> &mut ComponentStore<Component<Self>>;
}

macro_rules! impl_component_mesh {
    ($mesh:ty, $ty:ident, $field:ident) => {
        impl ComponentMesh for $mesh {
            const COMPONENT_TYPE: ComponentType = ComponentType::$ty;

            fn with_dimension(dimension: usize) -> Self {
                <$mesh>::new(dimension)
            }

            fn store(core: &ModelCore) -> &ComponentStore<Component<Self>> {
                &core.$field
            }

            fn store_mut(core: &mut ModelCore) -> &mut ComponentStore<Component<Self>> {
                &mut core.$field
            }
        }
    };
}

impl_component_mesh!(PointSet, Corner, corners);
impl_component_mesh!(EdgedCurve, Line, lines);
impl_component_mesh!(SurfaceMesh, Surface, surfaces);
impl_component_mesh!(SolidMesh, Block, blocks);

/// A named, meshed model component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component<M> {
    id: ComponentId,
    name: String,
    mesh: M,
}

/// Dimension 0 component.
pub type Corner = Component<PointSet>;
/// Dimension 1 component.
pub type Line = Component<EdgedCurve>;
/// Dimension 2 component.
pub type Surface = Component<SurfaceMesh>;
/// Dimension 3 component.
pub type Block = Component<SolidMesh>;

impl<M: ComponentMesh> Component<M> {
    pub(crate) fn new(id: ComponentId, mesh: M) -> Self {
        Self {
            id,
            name: String::new(),
            mesh,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    pub fn component_type(&self) -> ComponentType {
        M::COMPONENT_TYPE
    }

    pub fn component_ref(&self) -> ComponentRef {
        ComponentRef::new(self.id, M::COMPONENT_TYPE)
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub(crate) fn mesh_mut(&mut self) -> &mut M {
        &mut self.mesh
    }
}

/// A named group of components: corner/line/surface/block collections and
/// model boundaries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    id: ComponentId,
    name: String,
    component_type: ComponentType,
}

impl Collection {
    pub(crate) fn new(id: ComponentId, component_type: ComponentType) -> Self {
        Self {
            id,
            name: String::new(),
            component_type,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn component_ref(&self) -> ComponentRef {
        ComponentRef::new(self.id, self.component_type)
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
