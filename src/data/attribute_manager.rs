//! AttributeManager: named attributes over one element collection.
//!
//! A manager owns every attribute attached to a collection of `nb_elements`
//! elements (vertices, edges, polygons, ...). Size-changing operations are
//! applied to all attributes at once so that every attribute always spans
//! exactly `nb_elements` elements.
//!
//! Attributes are looked up by name and by element type. Requesting an
//! existing name is idempotent; requesting it under another element type is
//! an error.

use std::collections::HashMap;

use itertools::Itertools;

use serde::{Deserialize, Serialize};

use crate::data::attribute::{
    Attribute, AttributeKind, AttributeLinearInterpolation, AttributeProperties, TaggedAttribute,
};
use crate::data::storage::{check_deletion_mask, validate_permutation};
use crate::data::value::{AttributeValue, ValueType};
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshModelError;

/// Container of named attributes kept in lock-step with an element count.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeManager {
    nb_elements: usize,
    attributes: HashMap<String, TaggedAttribute>,
    /// Registration order of `attributes`.
    order: Vec<String>,
}

impl AttributeManager {
    /// Empty manager over zero elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty manager over `nb_elements` elements.
    pub fn with_elements(nb_elements: usize) -> Self {
        Self {
            nb_elements,
            ..Self::default()
        }
    }

    /// Number of elements every attribute spans.
    pub fn nb_elements(&self) -> usize {
        self.nb_elements
    }

    fn find_or_create<T: AttributeValue>(
        &mut self,
        name: &str,
        requested: AttributeKind,
        create: impl FnOnce(usize) -> Attribute<T>,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        match self.attributes.get(name) {
            Some(existing) if existing.value_type() != T::VALUE_TYPE => {
                return Err(MeshModelError::AttributeTypeMismatch {
                    name: name.to_owned(),
                    expected: T::VALUE_TYPE,
                    found: existing.value_type(),
                });
            }
            Some(existing) if existing.kind() != requested => {
                log::warn!(
                    "attribute `{name}` already exists as {:?}, requested {requested:?}; keeping the existing one",
                    existing.kind()
                );
            }
            Some(_) => {}
            None => {
                self.attributes
                    .insert(name.to_owned(), T::wrap(create(self.nb_elements)));
                self.order.push(name.to_owned());
            }
        }
        self.find_attribute_mut(name)
    }

    /// Find `name` or create it as a constant attribute holding `value`.
    pub fn find_or_create_attribute_constant<T: AttributeValue>(
        &mut self,
        name: &str,
        value: T,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.find_or_create_attribute_constant_with_properties(
            name,
            value,
            AttributeProperties::default(),
        )
    }

    pub fn find_or_create_attribute_constant_with_properties<T: AttributeValue>(
        &mut self,
        name: &str,
        value: T,
        properties: AttributeProperties,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.find_or_create(name, AttributeKind::Constant, |n| {
            Attribute::constant(value, n, properties)
        })
    }

    /// Find `name` or create it as a dense attribute filled with `default`.
    pub fn find_or_create_attribute_variable<T: AttributeValue>(
        &mut self,
        name: &str,
        default: T,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.find_or_create_attribute_variable_with_properties(
            name,
            default,
            AttributeProperties::default(),
        )
    }

    pub fn find_or_create_attribute_variable_with_properties<T: AttributeValue>(
        &mut self,
        name: &str,
        default: T,
        properties: AttributeProperties,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.find_or_create(name, AttributeKind::Variable, |n| {
            Attribute::variable(default, n, properties)
        })
    }

    /// Find `name` or create it as a sparse attribute over `default`.
    pub fn find_or_create_attribute_sparse<T: AttributeValue>(
        &mut self,
        name: &str,
        default: T,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.find_or_create_attribute_sparse_with_properties(
            name,
            default,
            AttributeProperties::default(),
        )
    }

    pub fn find_or_create_attribute_sparse_with_properties<T: AttributeValue>(
        &mut self,
        name: &str,
        default: T,
        properties: AttributeProperties,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        self.find_or_create(name, AttributeKind::Sparse, |n| {
            Attribute::sparse(default, n, properties)
        })
    }

    /// Typed read access to an existing attribute.
    pub fn find_attribute<T: AttributeValue>(
        &self,
        name: &str,
    ) -> Result<&Attribute<T>, MeshModelError> {
        let tagged = self.find_generic_attribute(name)?;
        T::unwrap(tagged).ok_or_else(|| MeshModelError::AttributeTypeMismatch {
            name: name.to_owned(),
            expected: T::VALUE_TYPE,
            found: tagged.value_type(),
        })
    }

    /// Typed write access to an existing attribute.
    pub fn find_attribute_mut<T: AttributeValue>(
        &mut self,
        name: &str,
    ) -> Result<&mut Attribute<T>, MeshModelError> {
        let tagged = self
            .attributes
            .get_mut(name)
            .ok_or_else(|| MeshModelError::AttributeNotFound {
                name: name.to_owned(),
            })?;
        let found = tagged.value_type();
        T::unwrap_mut(tagged).ok_or_else(|| MeshModelError::AttributeTypeMismatch {
            name: name.to_owned(),
            expected: T::VALUE_TYPE,
            found,
        })
    }

    /// Type-erased access, e.g. for `generic_value` reads.
    pub fn find_generic_attribute(&self, name: &str) -> Result<&TaggedAttribute, MeshModelError> {
        self.attributes
            .get(name)
            .ok_or_else(|| MeshModelError::AttributeNotFound {
                name: name.to_owned(),
            })
    }

    /// Attribute names in registration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    pub fn nb_attributes(&self) -> usize {
        self.order.len()
    }

    pub fn attribute_exists(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Element type of `name`, if registered.
    pub fn attribute_type(&self, name: &str) -> Option<ValueType> {
        self.attributes.get(name).map(TaggedAttribute::value_type)
    }

    /// Storage layout of `name`, if registered.
    pub fn attribute_kind(&self, name: &str) -> Option<AttributeKind> {
        self.attributes.get(name).map(TaggedAttribute::kind)
    }

    /// Change the propagation flags of `name`.
    pub fn set_attribute_properties(
        &mut self,
        name: &str,
        properties: AttributeProperties,
    ) -> Result<(), MeshModelError> {
        self.attributes
            .get_mut(name)
            .ok_or_else(|| MeshModelError::AttributeNotFound {
                name: name.to_owned(),
            })?
            .set_properties(properties);
        Ok(())
    }

    /// Remove `name`. Returns `false` if it was not registered.
    pub fn delete_attribute(&mut self, name: &str) -> bool {
        if self.attributes.remove(name).is_none() {
            return false;
        }
        self.order.retain(|n| n != name);
        true
    }

    /// Remove every attribute. The element count is unchanged.
    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
        self.order.clear();
    }

    /// Remove every attribute and reset the element count to zero.
    pub fn clear(&mut self) {
        self.nb_elements = 0;
        self.clear_attributes();
    }

    /// Set the element count of the manager and of every attribute.
    pub fn resize(&mut self, nb_elements: usize) {
        if nb_elements == self.nb_elements {
            return;
        }
        log::trace!("resize attributes {} -> {nb_elements}", self.nb_elements);
        self.nb_elements = nb_elements;
        for attribute in self.attributes.values_mut() {
            attribute.resize(nb_elements);
        }
    }

    /// Capacity hint for `capacity` elements.
    pub fn reserve(&mut self, capacity: usize) {
        for attribute in self.attributes.values_mut() {
            attribute.reserve(capacity);
        }
    }

    /// Remove the flagged elements from every attribute.
    ///
    /// An empty or all-false mask is a no-op. Otherwise the mask must have
    /// exactly `nb_elements` flags.
    pub fn delete_elements(&mut self, to_delete: &[bool]) -> Result<(), MeshModelError> {
        if !check_deletion_mask(to_delete, self.nb_elements)? {
            return Ok(());
        }
        for attribute in self.attributes.values_mut() {
            attribute.delete_elements(to_delete)?;
        }
        let removed = to_delete.iter().filter(|&&d| d).count();
        log::trace!("deleted {removed} of {} elements", self.nb_elements);
        self.nb_elements -= removed;
        crate::debug_invariants!(self.validate_invariants(), "AttributeManager::delete_elements");
        Ok(())
    }

    /// Reorder every attribute so that `new[i] = old[permutation[i]]`.
    pub fn permute_elements(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        validate_permutation(permutation, self.nb_elements)?;
        for attribute in self.attributes.values_mut() {
            attribute.permute_elements(permutation)?;
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), MeshModelError> {
        if index < self.nb_elements {
            Ok(())
        } else {
            Err(MeshModelError::OutOfRange {
                index,
                len: self.nb_elements,
            })
        }
    }

    /// Copy the value of element `from` onto `to` in every assignable attribute.
    pub fn assign_attribute_value(&mut self, from: usize, to: usize) -> Result<(), MeshModelError> {
        self.check_index(from)?;
        self.check_index(to)?;
        for attribute in self.attributes.values_mut() {
            attribute.assign_value(from, to)?;
        }
        Ok(())
    }

    /// Blend values into element `to` in every interpolable attribute.
    pub fn interpolate_attribute_value(
        &mut self,
        interpolation: &AttributeLinearInterpolation,
        to: usize,
    ) -> Result<(), MeshModelError> {
        self.check_index(to)?;
        for &index in interpolation.indices() {
            self.check_index(index)?;
        }
        for attribute in self.attributes.values_mut() {
            attribute.interpolate_value(interpolation, to)?;
        }
        Ok(())
    }

    /// Adopt the element count and attributes of `other`.
    ///
    /// Attributes of `other` replace same-named attributes of the same type
    /// and are added when missing. Same-named attributes of another type are
    /// kept and reported.
    pub fn copy(&mut self, other: &AttributeManager) {
        self.resize(other.nb_elements);
        for name in &other.order {
            let Some(source) = other.attributes.get(name) else {
                continue;
            };
            match self.attributes.get_mut(name) {
                Some(target) if target.value_type() == source.value_type() => {
                    *target = source.resized_clone(self.nb_elements);
                }
                Some(target) => {
                    log::warn!(
                        "skip copy of attribute `{name}`: stored as {}, source is {}",
                        target.value_type(),
                        source.value_type()
                    );
                }
                None => {
                    self.attributes
                        .insert(name.clone(), source.resized_clone(self.nb_elements));
                    self.order.push(name.clone());
                }
            }
        }
    }

    /// Pull attribute values of `other` through an old → new element mapping.
    ///
    /// `old2new[i]` names the element of `self` receiving element `i` of
    /// `other`. Missing attributes are created with the source layout.
    /// Same-named attributes of another type, and constant attributes facing
    /// a per-element source, are kept and reported. On error `self` is left
    /// unchanged.
    pub fn import(
        &mut self,
        old2new: &[Option<usize>],
        other: &AttributeManager,
    ) -> Result<(), MeshModelError> {
        if old2new.len() > other.nb_elements {
            return Err(MeshModelError::OutOfRange {
                index: old2new.len() - 1,
                len: other.nb_elements,
            });
        }
        if let Some(&index) = old2new.iter().flatten().find(|&&n| n >= self.nb_elements) {
            return Err(MeshModelError::OutOfRange {
                index,
                len: self.nb_elements,
            });
        }
        let mut staged = self.clone();
        for name in &other.order {
            let Some(source) = other.attributes.get(name) else {
                continue;
            };
            match staged.attributes.get_mut(name) {
                Some(target) if target.value_type() != source.value_type() => {
                    log::warn!(
                        "skip import of attribute `{name}`: stored as {}, source is {}",
                        target.value_type(),
                        source.value_type()
                    );
                }
                Some(target)
                    if target.kind() == AttributeKind::Constant
                        && source.kind() != AttributeKind::Constant =>
                {
                    log::warn!(
                        "skip import of attribute `{name}`: constant target, {:?} source",
                        source.kind()
                    );
                }
                Some(target) => target.import(name, old2new, source)?,
                None => {
                    let mut target = source.empty_like(staged.nb_elements);
                    target.import(name, old2new, source)?;
                    staged.attributes.insert(name.clone(), target);
                    staged.order.push(name.clone());
                }
            }
        }
        *self = staged;
        Ok(())
    }
}

impl DebugInvariants for AttributeManager {
    fn validate_invariants(&self) -> Result<(), MeshModelError> {
        if self.order.len() != self.attributes.len() {
            return Err(MeshModelError::InvariantViolation(format!(
                "{} ordered names for {} attributes",
                self.order.len(),
                self.attributes.len()
            )));
        }
        if let Some(name) = self.order.iter().duplicates().next() {
            return Err(MeshModelError::InvariantViolation(format!(
                "attribute `{name}` is listed twice"
            )));
        }
        for name in &self.order {
            let attribute = self.attributes.get(name).ok_or_else(|| {
                MeshModelError::InvariantViolation(format!("ordered name `{name}` has no attribute"))
            })?;
            if attribute.len() != self.nb_elements {
                return Err(MeshModelError::InvariantViolation(format!(
                    "attribute `{name}` spans {} elements, manager has {}",
                    attribute.len(),
                    self.nb_elements
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> AttributeManager {
        let mut m = AttributeManager::new();
        m.resize(10);
        m
    }

    #[test]
    fn find_or_create_is_idempotent() {
        let mut m = manager();
        m.find_or_create_attribute_variable("int", 12i32)
            .unwrap()
            .set_value(3, 3)
            .unwrap();
        let again = m.find_or_create_attribute_variable("int", 0i32).unwrap();
        assert_eq!(*again.value(3).unwrap(), 3);
        assert_eq!(*again.default_value(), 12);
        assert_eq!(m.nb_attributes(), 1);
    }

    #[test]
    fn type_mismatch_is_reported() {
        let mut m = manager();
        m.find_or_create_attribute_variable("a", 1.0f64).unwrap();
        assert!(matches!(
            m.find_or_create_attribute_variable("a", 1i32),
            Err(MeshModelError::AttributeTypeMismatch {
                expected: ValueType::Int,
                found: ValueType::Double,
                ..
            })
        ));
        assert!(matches!(
            m.find_attribute::<bool>("a"),
            Err(MeshModelError::AttributeTypeMismatch { .. })
        ));
        assert!(matches!(
            m.find_attribute::<f64>("missing"),
            Err(MeshModelError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn kind_mismatch_keeps_existing() {
        let mut m = manager();
        m.find_or_create_attribute_sparse("s", 0u32).unwrap();
        let a = m.find_or_create_attribute_variable("s", 5u32).unwrap();
        assert_eq!(a.kind(), AttributeKind::Sparse);
        assert_eq!(*a.default_value(), 0);
    }

    #[test]
    fn new_attributes_span_all_elements() {
        let mut m = manager();
        let a = m.find_or_create_attribute_sparse("s", 2.0f32).unwrap();
        assert_eq!(a.len(), 10);
        m.resize(4);
        assert_eq!(m.find_attribute::<f32>("s").unwrap().len(), 4);
        m.validate_invariants().unwrap();
    }

    #[test]
    fn clear_attributes_keeps_count() {
        let mut m = manager();
        m.find_or_create_attribute_constant("c", true).unwrap();
        m.clear_attributes();
        assert_eq!(m.nb_attributes(), 0);
        assert_eq!(m.nb_elements(), 10);
        m.find_or_create_attribute_constant("c", true).unwrap();
        m.clear();
        assert_eq!(m.nb_elements(), 0);
        assert!(!m.attribute_exists("c"));
    }

    #[test]
    fn deletion_is_lock_step() {
        let mut m = manager();
        m.find_or_create_attribute_variable("v", 0i32).unwrap();
        m.find_or_create_attribute_sparse("s", 0i32).unwrap();
        m.find_or_create_attribute_constant("c", 1i32).unwrap();
        let mut mask = vec![false; 10];
        mask[0] = true;
        m.delete_elements(&mask).unwrap();
        assert_eq!(m.nb_elements(), 9);
        for name in ["v", "s", "c"] {
            assert_eq!(m.find_generic_attribute(name).unwrap().len(), 9);
        }
        assert!(matches!(
            m.delete_elements(&[true]),
            Err(MeshModelError::MaskLengthMismatch { expected: 9, found: 1 })
        ));
        assert_eq!(m.nb_elements(), 9);
    }

    #[test]
    fn assign_and_interpolate() {
        let mut m = manager();
        m.find_or_create_attribute_variable_with_properties(
            "d",
            0.0f64,
            AttributeProperties::new(true, true),
        )
        .unwrap();
        m.find_or_create_attribute_variable("i", 0i32).unwrap();
        {
            let d = m.find_attribute_mut::<f64>("d").unwrap();
            d.set_value(0, 2.0).unwrap();
            d.set_value(1, 4.0).unwrap();
        }
        m.find_attribute_mut::<i32>("i")
            .unwrap()
            .set_value(0, 7)
            .unwrap();
        m.assign_attribute_value(0, 5).unwrap();
        assert_eq!(*m.find_attribute::<i32>("i").unwrap().value(5).unwrap(), 7);
        assert_eq!(*m.find_attribute::<f64>("d").unwrap().value(5).unwrap(), 2.0);

        let interp = AttributeLinearInterpolation::new(vec![0, 1], vec![0.5, 0.5]).unwrap();
        m.interpolate_attribute_value(&interp, 6).unwrap();
        assert_eq!(*m.find_attribute::<f64>("d").unwrap().value(6).unwrap(), 3.0);
        // not interpolable by default
        assert_eq!(*m.find_attribute::<i32>("i").unwrap().value(6).unwrap(), 0);

        assert!(matches!(
            m.assign_attribute_value(0, 10),
            Err(MeshModelError::OutOfRange { index: 10, len: 10 })
        ));
    }

    #[test]
    fn copy_adopts_size_and_attributes() {
        let mut source = manager();
        source
            .find_or_create_attribute_variable("v", 0u32)
            .unwrap()
            .set_value(9, 9)
            .unwrap();
        source.find_or_create_attribute_constant("clash", 1u32).unwrap();

        let mut target = AttributeManager::with_elements(3);
        target.find_or_create_attribute_constant("clash", false).unwrap();
        target.copy(&source);
        assert_eq!(target.nb_elements(), 10);
        assert_eq!(*target.find_attribute::<u32>("v").unwrap().value(9).unwrap(), 9);
        assert_eq!(target.attribute_type("clash"), Some(ValueType::Bool));
        target.validate_invariants().unwrap();
    }

    #[test]
    fn import_through_mapping() {
        let mut source = AttributeManager::with_elements(3);
        {
            let s = source.find_or_create_attribute_sparse("s", 0i32).unwrap();
            s.set_value(0, 10).unwrap();
            s.set_value(2, 30).unwrap();
        }
        let mut target = AttributeManager::with_elements(2);
        target
            .import(&[Some(1), None, Some(0)], &source)
            .unwrap();
        let s = target.find_attribute::<i32>("s").unwrap();
        assert_eq!(s.kind(), AttributeKind::Sparse);
        assert_eq!(*s.value(0).unwrap(), 30);
        assert_eq!(*s.value(1).unwrap(), 10);
        assert!(target.import(&[Some(5)], &source).is_err());
    }

    #[test]
    fn import_keeps_constant_targets() {
        let mut source = AttributeManager::with_elements(2);
        source.find_or_create_attribute_variable("a", 1i32).unwrap();
        source
            .find_or_create_attribute_variable("c", 0i32)
            .unwrap()
            .set_value(1, 8)
            .unwrap();
        let mut target = AttributeManager::with_elements(2);
        target.find_or_create_attribute_constant("c", 4i32).unwrap();

        target.import(&[Some(0), Some(1)], &source).unwrap();
        assert_eq!(target.attribute_names().collect::<Vec<_>>(), vec!["c", "a"]);
        let c = target.find_attribute::<i32>("c").unwrap();
        assert_eq!(c.kind(), AttributeKind::Constant);
        assert_eq!(*c.value(1).unwrap(), 4);
        assert_eq!(*target.find_attribute::<i32>("a").unwrap().value(0).unwrap(), 1);
        target.validate_invariants().unwrap();
    }

    #[test]
    fn failed_import_leaves_target_untouched() {
        let mut source = AttributeManager::with_elements(3);
        source.find_or_create_attribute_variable("a", 1i32).unwrap();
        let mut target = AttributeManager::with_elements(2);
        target.find_or_create_attribute_constant("c", 4i32).unwrap();
        let before = target.clone();

        assert!(matches!(
            target.import(&[Some(0), None, Some(2)], &source),
            Err(MeshModelError::OutOfRange { index: 2, len: 2 })
        ));
        assert!(target.import(&[None, None, None, None], &source).is_err());
        assert_eq!(target, before);
    }

    #[test]
    fn serde_round_trip() {
        let mut m = manager();
        m.find_or_create_attribute_sparse("s", [0.0, 0.0, 0.0])
            .unwrap()
            .set_value(4, [1.0, 2.0, 3.0])
            .unwrap();
        m.find_or_create_attribute_variable("b", false).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: AttributeManager = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        let bytes = bincode::serialize(&m).unwrap();
        let back: AttributeManager = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back.attribute_names().collect::<Vec<_>>(), vec!["s", "b"]);
    }
}
