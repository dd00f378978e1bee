//! Attribute manager owned by a mesh vertex or element set.
//!
//! The element count of a mesh-owned manager is driven by the mesh: only
//! operations that keep `nb_elements` are exposed for writing. Reads go
//! through `Deref` to the wrapped [`AttributeManager`].

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::data::attribute::{Attribute, AttributeLinearInterpolation, AttributeProperties};
use crate::data::attribute_manager::AttributeManager;
use crate::data::value::AttributeValue;
use crate::mesh_error::MeshModelError;

/// An [`AttributeManager`] whose size follows its mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeshAttributes {
    manager: AttributeManager,
}

impl MeshAttributes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Size-changing access, reserved for the owning set.
    pub(crate) fn manager_mut(&mut self) -> &mut AttributeManager {
        &mut self.manager
    }

    pub fn find_or_create_attribute_constant<T: AttributeValue>(
        &mut self,
        name: &str,
        value: T,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.manager.find_or_create_attribute_constant(name, value)
    }

    pub fn find_or_create_attribute_constant_with_properties<T: AttributeValue>(
        &mut self,
        name: &str,
        value: T,
        properties: AttributeProperties,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.manager
            .find_or_create_attribute_constant_with_properties(name, value, properties)
    }

    pub fn find_or_create_attribute_variable<T: AttributeValue>(
        &mut self,
        name: &str,
        default: T,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.manager.find_or_create_attribute_variable(name, default)
    }

    pub fn find_or_create_attribute_variable_with_properties<T: AttributeValue>(
        &mut self,
        name: &str,
        default: T,
        properties: AttributeProperties,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.manager
            .find_or_create_attribute_variable_with_properties(name, default, properties)
    }

    pub fn find_or_create_attribute_sparse<T: AttributeValue>(
        &mut self,
        name: &str,
        default: T,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.manager.find_or_create_attribute_sparse(name, default)
    }

    pub fn find_or_create_attribute_sparse_with_properties<T: AttributeValue>(
        &mut self,
        name: &str,
        default: T,
        properties: AttributeProperties,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.manager
            .find_or_create_attribute_sparse_with_properties(name, default, properties)
    }

    pub fn find_attribute_mut<T: AttributeValue>(
        &mut self,
        name: &str,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.manager.find_attribute_mut(name)
    }

    pub fn set_attribute_properties(
        &mut self,
        name: &str,
        properties: AttributeProperties,
    ) -> Result<(), MeshModelError> {
        self.manager.set_attribute_properties(name, properties)
    }

    pub fn delete_attribute(&mut self, name: &str) -> bool {
        self.manager.delete_attribute(name)
    }

    /// Remove every attribute. The element count is unchanged.
    pub fn clear_attributes(&mut self) {
        self.manager.clear_attributes();
    }

    pub fn assign_attribute_value(&mut self, from: usize, to: usize) -> Result<(), MeshModelError> {
        self.manager.assign_attribute_value(from, to)
    }

    pub fn interpolate_attribute_value(
        &mut self,
        interpolation: &AttributeLinearInterpolation,
        to: usize,
    ) -> Result<(), MeshModelError> {
        self.manager.interpolate_attribute_value(interpolation, to)
    }

    /// Pull attributes of `other` through an old → new element mapping.
    pub fn import(
        &mut self,
        old2new: &[Option<usize>],
        other: &AttributeManager,
    ) -> Result<(), MeshModelError> {
        self.manager.import(old2new, other)
    }
}

impl Deref for MeshAttributes {
    type Target = AttributeManager;

    fn deref(&self) -> &AttributeManager {
        &self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_keep_the_element_count() {
        let mut attributes = MeshAttributes::new();
        attributes.manager_mut().resize(3);
        attributes
            .find_or_create_attribute_variable("w", 0.0f64)
            .unwrap()
            .set_value(2, 1.5)
            .unwrap();
        attributes.assign_attribute_value(2, 0).unwrap();
        attributes.clear_attributes();
        assert_eq!(attributes.nb_elements(), 3);
        assert_eq!(attributes.nb_attributes(), 0);
    }
}
