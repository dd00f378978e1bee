//! Typed attributes and their type-erased container.

use serde::{Deserialize, Serialize};

use crate::data::storage::{AttributeStorage, ConstantStorage, SparseStorage, VariableStorage};
use crate::data::value::{AttributeValue, ValueType};
use crate::mesh_error::MeshModelError;

pub use crate::data::storage::AttributeKind;

/// Per-attribute flags controlling value propagation between elements.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AttributeProperties {
    /// Copied by `assign_attribute_value`.
    pub assignable: bool,
    /// Blended by `interpolate_attribute_value`.
    pub interpolable: bool,
}

impl AttributeProperties {
    pub fn new(assignable: bool, interpolable: bool) -> Self {
        Self {
            assignable,
            interpolable,
        }
    }
}

impl Default for AttributeProperties {
    fn default() -> Self {
        Self {
            assignable: true,
            interpolable: false,
        }
    }
}

/// Linear blend of element values: `sum(lambdas[k] * value(indices[k]))`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeLinearInterpolation {
    indices: Vec<usize>,
    lambdas: Vec<f64>,
}

impl AttributeLinearInterpolation {
    pub fn new(indices: Vec<usize>, lambdas: Vec<f64>) -> Result<Self, MeshModelError> {
        if indices.len() != lambdas.len() {
            return Err(MeshModelError::InterpolationLengthMismatch {
                indices: indices.len(),
                lambdas: lambdas.len(),
            });
        }
        Ok(Self { indices, lambdas })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn lambdas(&self) -> &[f64] {
        &self.lambdas
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
enum Store<T> {
    Constant(ConstantStorage<T>),
    Variable(VariableStorage<T>),
    Sparse(SparseStorage<T>),
}

/// A named column of per-element values, created through an
/// [`AttributeManager`](crate::data::attribute_manager::AttributeManager).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute<T> {
    store: Store<T>,
    properties: AttributeProperties,
}

impl<T: AttributeValue> Attribute<T> {
    pub(crate) fn constant(value: T, len: usize, properties: AttributeProperties) -> Self {
        Self {
            store: Store::Constant(ConstantStorage::new(value, len)),
            properties,
        }
    }

    pub(crate) fn variable(default: T, len: usize, properties: AttributeProperties) -> Self {
        Self {
            store: Store::Variable(VariableStorage::new(default, len)),
            properties,
        }
    }

    pub(crate) fn sparse(default: T, len: usize, properties: AttributeProperties) -> Self {
        Self {
            store: Store::Sparse(SparseStorage::new(default, len)),
            properties,
        }
    }

    /// Same layout, default and properties, with no explicit values.
    pub(crate) fn empty_like(&self, len: usize) -> Self {
        let default = self.default_value().clone();
        match self.kind() {
            AttributeKind::Constant => Self::constant(default, len, self.properties),
            AttributeKind::Variable => Self::variable(default, len, self.properties),
            AttributeKind::Sparse => Self::sparse(default, len, self.properties),
        }
    }

    fn storage(&self) -> &dyn AttributeStorage<T> {
        match &self.store {
            Store::Constant(s) => s,
            Store::Variable(s) => s,
            Store::Sparse(s) => s,
        }
    }

    fn storage_mut(&mut self) -> &mut dyn AttributeStorage<T> {
        match &mut self.store {
            Store::Constant(s) => s,
            Store::Variable(s) => s,
            Store::Sparse(s) => s,
        }
    }

    pub fn kind(&self) -> AttributeKind {
        self.storage().kind()
    }

    pub fn len(&self) -> usize {
        self.storage().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn properties(&self) -> AttributeProperties {
        self.properties
    }

    pub fn set_properties(&mut self, properties: AttributeProperties) {
        self.properties = properties;
    }

    /// Value of element `index`. Constant attributes ignore the index.
    pub fn value(&self, index: usize) -> Result<&T, MeshModelError> {
        self.storage().value(index)
    }

    /// Overwrite one element. Fails with `Unsupported` on constant attributes.
    pub fn set_value(&mut self, index: usize, value: T) -> Result<(), MeshModelError> {
        self.storage_mut().set_value(index, value)
    }

    /// Edit one element in place.
    pub fn modify_value<F>(&mut self, index: usize, f: F) -> Result<(), MeshModelError>
    where
        F: FnOnce(&mut T),
    {
        match &mut self.store {
            Store::Constant(_) => Err(MeshModelError::Unsupported {
                kind: AttributeKind::Constant,
                operation: "modify_value",
            }),
            Store::Variable(s) => {
                f(s.value_mut(index)?);
                Ok(())
            }
            Store::Sparse(s) => {
                f(s.value_mut(index)?);
                Ok(())
            }
        }
    }

    /// The shared value of a constant attribute.
    pub fn constant_value(&self) -> Result<&T, MeshModelError> {
        match &self.store {
            Store::Constant(s) => Ok(s.constant_value()),
            _ => Err(MeshModelError::Unsupported {
                kind: self.kind(),
                operation: "constant_value",
            }),
        }
    }

    /// Change the shared value of a constant attribute for every element.
    pub fn set_constant_value(&mut self, value: T) -> Result<(), MeshModelError> {
        let kind = self.kind();
        match &mut self.store {
            Store::Constant(s) => {
                s.set_constant_value(value);
                Ok(())
            }
            _ => Err(MeshModelError::Unsupported {
                kind,
                operation: "set_constant_value",
            }),
        }
    }

    /// Value of unset elements (the shared value for constant attributes).
    pub fn default_value(&self) -> &T {
        self.storage().default_value()
    }

    pub fn is_genericable(&self) -> bool {
        T::is_genericable()
    }

    /// Element value read as `f32`.
    pub fn generic_value(&self, index: usize) -> Result<f32, MeshModelError> {
        self.value(index).map(AttributeValue::generic_value)
    }

    pub(crate) fn resize(&mut self, len: usize) {
        self.storage_mut().resize(len);
    }

    pub(crate) fn reserve(&mut self, capacity: usize) {
        self.storage_mut().reserve(capacity);
    }

    pub(crate) fn delete_elements(&mut self, to_delete: &[bool]) -> Result<(), MeshModelError> {
        self.storage_mut().delete_elements(to_delete)
    }

    pub(crate) fn permute_elements(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        self.storage_mut().permute_elements(permutation)
    }

    pub(crate) fn assign_value(&mut self, from: usize, to: usize) -> Result<(), MeshModelError> {
        if !self.properties.assignable || self.storage().is_constant() {
            return Ok(());
        }
        let value = self.value(from)?.clone();
        self.set_value(to, value)
    }

    pub(crate) fn interpolate_value(
        &mut self,
        interpolation: &AttributeLinearInterpolation,
        to: usize,
    ) -> Result<(), MeshModelError> {
        if !self.properties.interpolable || self.storage().is_constant() {
            return Ok(());
        }
        let values = interpolation
            .indices()
            .iter()
            .map(|&i| self.value(i))
            .collect::<Result<Vec<_>, _>>()?;
        match T::interpolate(&values, interpolation.lambdas()) {
            Some(value) => self.set_value(to, value),
            None => {
                log::trace!("{} values do not interpolate", T::VALUE_TYPE);
                Ok(())
            }
        }
    }

    /// Pull values of `other` through an old → new index mapping.
    pub(crate) fn import(
        &mut self,
        old2new: &[Option<usize>],
        other: &Attribute<T>,
    ) -> Result<(), MeshModelError> {
        if let (Store::Constant(dst), Store::Constant(src)) = (&mut self.store, &other.store) {
            dst.set_constant_value(src.constant_value().clone());
            return Ok(());
        }
        for (old, new) in old2new.iter().enumerate() {
            if let Some(new) = *new {
                let value = other.value(old)?.clone();
                self.set_value(new, value)?;
            }
        }
        Ok(())
    }
}

/// Tagged, type-erased attribute over the supported value types.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TaggedAttribute {
    Bool(Attribute<bool>),
    Int(Attribute<i32>),
    UInt(Attribute<u32>),
    Float(Attribute<f32>),
    Double(Attribute<f64>),
    Array2(Attribute<[f64; 2]>),
    Array3(Attribute<[f64; 3]>),
}

macro_rules! dispatch {
    ($self:expr, $a:ident => $body:expr) => {
        match $self {
            TaggedAttribute::Bool($a) => $body,
            TaggedAttribute::Int($a) => $body,
            TaggedAttribute::UInt($a) => $body,
            TaggedAttribute::Float($a) => $body,
            TaggedAttribute::Double($a) => $body,
            TaggedAttribute::Array2($a) => $body,
            TaggedAttribute::Array3($a) => $body,
        }
    };
}

impl TaggedAttribute {
    /// Return the value type tag for this attribute.
    pub fn value_type(&self) -> ValueType {
        match self {
            TaggedAttribute::Bool(_) => ValueType::Bool,
            TaggedAttribute::Int(_) => ValueType::Int,
            TaggedAttribute::UInt(_) => ValueType::UInt,
            TaggedAttribute::Float(_) => ValueType::Float,
            TaggedAttribute::Double(_) => ValueType::Double,
            TaggedAttribute::Array2(_) => ValueType::Array2,
            TaggedAttribute::Array3(_) => ValueType::Array3,
        }
    }

    pub fn kind(&self) -> AttributeKind {
        dispatch!(self, a => a.kind())
    }

    pub fn len(&self) -> usize {
        dispatch!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn properties(&self) -> AttributeProperties {
        dispatch!(self, a => a.properties())
    }

    pub fn set_properties(&mut self, properties: AttributeProperties) {
        dispatch!(self, a => a.set_properties(properties))
    }

    pub fn is_genericable(&self) -> bool {
        dispatch!(self, a => a.is_genericable())
    }

    /// Element value read as `f32`, whatever the stored type.
    pub fn generic_value(&self, index: usize) -> Result<f32, MeshModelError> {
        dispatch!(self, a => a.generic_value(index))
    }

    pub(crate) fn resize(&mut self, len: usize) {
        dispatch!(self, a => a.resize(len))
    }

    pub(crate) fn reserve(&mut self, capacity: usize) {
        dispatch!(self, a => a.reserve(capacity))
    }

    pub(crate) fn delete_elements(&mut self, to_delete: &[bool]) -> Result<(), MeshModelError> {
        dispatch!(self, a => a.delete_elements(to_delete))
    }

    pub(crate) fn permute_elements(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        dispatch!(self, a => a.permute_elements(permutation))
    }

    pub(crate) fn assign_value(&mut self, from: usize, to: usize) -> Result<(), MeshModelError> {
        dispatch!(self, a => a.assign_value(from, to))
    }

    pub(crate) fn interpolate_value(
        &mut self,
        interpolation: &AttributeLinearInterpolation,
        to: usize,
    ) -> Result<(), MeshModelError> {
        dispatch!(self, a => a.interpolate_value(interpolation, to))
    }

    pub(crate) fn empty_like(&self, len: usize) -> TaggedAttribute {
        dispatch!(self, a => AttributeValue::wrap(a.empty_like(len)))
    }

    /// Resize a clone of `self` to `len`, keeping explicit values in range.
    pub(crate) fn resized_clone(&self, len: usize) -> TaggedAttribute {
        let mut copy = self.clone();
        copy.resize(len);
        copy
    }

    pub(crate) fn import(
        &mut self,
        name: &str,
        old2new: &[Option<usize>],
        other: &TaggedAttribute,
    ) -> Result<(), MeshModelError> {
        let (expected, found) = (self.value_type(), other.value_type());
        match (self, other) {
            (TaggedAttribute::Bool(a), TaggedAttribute::Bool(b)) => a.import(old2new, b),
            (TaggedAttribute::Int(a), TaggedAttribute::Int(b)) => a.import(old2new, b),
            (TaggedAttribute::UInt(a), TaggedAttribute::UInt(b)) => a.import(old2new, b),
            (TaggedAttribute::Float(a), TaggedAttribute::Float(b)) => a.import(old2new, b),
            (TaggedAttribute::Double(a), TaggedAttribute::Double(b)) => a.import(old2new, b),
            (TaggedAttribute::Array2(a), TaggedAttribute::Array2(b)) => a.import(old2new, b),
            (TaggedAttribute::Array3(a), TaggedAttribute::Array3(b)) => a.import(old2new, b),
            _ => Err(MeshModelError::AttributeTypeMismatch {
                name: name.to_owned(),
                expected,
                found,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_requires_matching_lengths() {
        assert!(matches!(
            AttributeLinearInterpolation::new(vec![0, 1], vec![1.0]),
            Err(MeshModelError::InterpolationLengthMismatch {
                indices: 2,
                lambdas: 1
            })
        ));
    }

    #[test]
    fn constant_accessors_are_exclusive() {
        let mut c = Attribute::constant(1.5f64, 4, AttributeProperties::default());
        assert_eq!(*c.constant_value().unwrap(), 1.5);
        c.set_constant_value(2.5).unwrap();
        assert_eq!(*c.value(3).unwrap(), 2.5);
        assert!(c.modify_value(0, |v| *v += 1.0).is_err());

        let mut v = Attribute::variable(0u32, 4, AttributeProperties::default());
        assert!(matches!(
            v.constant_value(),
            Err(MeshModelError::Unsupported {
                kind: AttributeKind::Variable,
                ..
            })
        ));
        assert!(v.set_constant_value(3).is_err());
        v.modify_value(2, |x| *x += 7).unwrap();
        assert_eq!(*v.value(2).unwrap(), 7);
    }

    #[test]
    fn sparse_modify_creates_entry() {
        let mut s = Attribute::sparse(10i32, 5, AttributeProperties::default());
        s.modify_value(4, |x| *x *= 2).unwrap();
        assert_eq!(*s.value(4).unwrap(), 20);
        assert_eq!(*s.value(3).unwrap(), 10);
    }

    #[test]
    fn assign_respects_properties() {
        let mut a = Attribute::variable(0i32, 3, AttributeProperties::new(false, false));
        a.set_value(0, 5).unwrap();
        a.assign_value(0, 1).unwrap();
        assert_eq!(*a.value(1).unwrap(), 0);
        a.set_properties(AttributeProperties::default());
        a.assign_value(0, 1).unwrap();
        assert_eq!(*a.value(1).unwrap(), 5);
    }

    #[test]
    fn tagged_generic_reads() {
        let mut a = Attribute::variable(false, 2, AttributeProperties::default());
        a.set_value(1, true).unwrap();
        let tagged = bool::wrap(a);
        assert_eq!(tagged.value_type(), ValueType::Bool);
        assert_eq!(tagged.generic_value(1).unwrap(), 1.0);
        assert!(tagged.is_genericable());
        assert!(f64::unwrap(&tagged).is_none());
    }
}
