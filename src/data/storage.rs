//! Storage strategies backing an attribute.
//!
//! Three layouts implement [`AttributeStorage`]:
//! - [`ConstantStorage`]: one value shared by every element,
//! - [`VariableStorage`]: one value per element in a dense `Vec`,
//! - [`SparseStorage`]: explicit index → value entries over a default.
//!
//! All three track the element count so that resizing, deletion and
//! permutation can be applied in lock-step by the owning manager.

use core::fmt::Debug;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshModelError;

/// Storage layout of an attribute.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    Constant,
    Variable,
    Sparse,
}

/// Capability interface shared by the three storage layouts.
pub trait AttributeStorage<T>: Debug {
    /// Storage layout.
    fn kind(&self) -> AttributeKind;

    /// Current number of elements.
    fn len(&self) -> usize;

    /// True if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for the single-value layout.
    fn is_constant(&self) -> bool {
        self.kind() == AttributeKind::Constant
    }

    /// Value reported for elements without an explicit value.
    fn default_value(&self) -> &T;

    /// Value of element `index`.
    fn value(&self, index: usize) -> Result<&T, MeshModelError>;

    /// Overwrite the value of element `index`.
    fn set_value(&mut self, index: usize, value: T) -> Result<(), MeshModelError>;

    /// Set the element count; new elements read the default value.
    fn resize(&mut self, len: usize);

    /// Capacity hint for `capacity` elements.
    fn reserve(&mut self, capacity: usize);

    /// Remove every element flagged in `to_delete`, compacting survivors.
    fn delete_elements(&mut self, to_delete: &[bool]) -> Result<(), MeshModelError>;

    /// Reorder so that `new[i] = old[permutation[i]]`.
    fn permute_elements(&mut self, permutation: &[usize]) -> Result<(), MeshModelError>;
}

/// Old → new index mapping after removing the flagged elements.
///
/// Deleted indices map to `None`; survivors keep their relative order.
pub fn old_to_new_mapping(to_delete: &[bool]) -> Vec<Option<usize>> {
    let mut next = 0;
    to_delete
        .iter()
        .map(|&deleted| {
            if deleted {
                None
            } else {
                next += 1;
                Some(next - 1)
            }
        })
        .collect()
}

/// Check a deletion mask against `len`.
///
/// Returns `Ok(false)` when nothing is flagged, in which case the mask length
/// is irrelevant and the deletion is a no-op.
pub fn check_deletion_mask(to_delete: &[bool], len: usize) -> Result<bool, MeshModelError> {
    if !to_delete.iter().any(|&d| d) {
        return Ok(false);
    }
    if to_delete.len() != len {
        return Err(MeshModelError::MaskLengthMismatch {
            expected: len,
            found: to_delete.len(),
        });
    }
    Ok(true)
}

/// Check that `permutation` is a bijection of `0..len`.
pub fn validate_permutation(permutation: &[usize], len: usize) -> Result<(), MeshModelError> {
    if permutation.len() != len {
        return Err(MeshModelError::InvalidPermutation(format!(
            "length {} differs from element count {len}",
            permutation.len()
        )));
    }
    let mut seen = vec![false; len];
    for &p in permutation {
        match seen.get_mut(p) {
            None => {
                return Err(MeshModelError::InvalidPermutation(format!(
                    "index {p} out of range for {len} elements"
                )));
            }
            Some(true) => {
                return Err(MeshModelError::InvalidPermutation(format!(
                    "index {p} appears twice"
                )));
            }
            Some(slot) => *slot = true,
        }
    }
    Ok(())
}

fn check_index(index: usize, len: usize) -> Result<(), MeshModelError> {
    if index < len {
        Ok(())
    } else {
        Err(MeshModelError::OutOfRange { index, len })
    }
}

/// One value shared by all elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstantStorage<T> {
    value: T,
    len: usize,
}

impl<T> ConstantStorage<T> {
    pub fn new(value: T, len: usize) -> Self {
        Self { value, len }
    }

    pub fn constant_value(&self) -> &T {
        &self.value
    }

    pub fn set_constant_value(&mut self, value: T) {
        self.value = value;
    }
}

impl<T: Debug> AttributeStorage<T> for ConstantStorage<T> {
    fn kind(&self) -> AttributeKind {
        AttributeKind::Constant
    }

    fn len(&self) -> usize {
        self.len
    }

    fn default_value(&self) -> &T {
        &self.value
    }

    /// The index is ignored: every element reads the shared value.
    fn value(&self, _index: usize) -> Result<&T, MeshModelError> {
        Ok(&self.value)
    }

    fn set_value(&mut self, _index: usize, _value: T) -> Result<(), MeshModelError> {
        Err(MeshModelError::Unsupported {
            kind: AttributeKind::Constant,
            operation: "per-element set_value",
        })
    }

    fn resize(&mut self, len: usize) {
        self.len = len;
    }

    fn reserve(&mut self, _capacity: usize) {}

    fn delete_elements(&mut self, to_delete: &[bool]) -> Result<(), MeshModelError> {
        if check_deletion_mask(to_delete, self.len)? {
            self.len -= to_delete.iter().filter(|&&d| d).count();
        }
        Ok(())
    }

    fn permute_elements(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        validate_permutation(permutation, self.len)
    }
}

/// Dense per-element values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableStorage<T> {
    values: Vec<T>,
    default: T,
}

impl<T: Clone> VariableStorage<T> {
    pub fn new(default: T, len: usize) -> Self {
        Self {
            values: vec![default.clone(); len],
            default,
        }
    }

    /// All element values in index order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub(crate) fn value_mut(&mut self, index: usize) -> Result<&mut T, MeshModelError> {
        let len = self.values.len();
        self.values
            .get_mut(index)
            .ok_or(MeshModelError::OutOfRange { index, len })
    }
}

impl<T: Clone + Debug> AttributeStorage<T> for VariableStorage<T> {
    fn kind(&self) -> AttributeKind {
        AttributeKind::Variable
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn default_value(&self) -> &T {
        &self.default
    }

    fn value(&self, index: usize) -> Result<&T, MeshModelError> {
        self.values.get(index).ok_or(MeshModelError::OutOfRange {
            index,
            len: self.values.len(),
        })
    }

    fn set_value(&mut self, index: usize, value: T) -> Result<(), MeshModelError> {
        *self.value_mut(index)? = value;
        Ok(())
    }

    fn resize(&mut self, len: usize) {
        self.values.resize(len, self.default.clone());
    }

    fn reserve(&mut self, capacity: usize) {
        self.values
            .reserve(capacity.saturating_sub(self.values.len()));
    }

    fn delete_elements(&mut self, to_delete: &[bool]) -> Result<(), MeshModelError> {
        if check_deletion_mask(to_delete, self.values.len())? {
            let mut flags = to_delete.iter();
            self.values.retain(|_| !flags.next().copied().unwrap_or(false));
        }
        Ok(())
    }

    fn permute_elements(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        validate_permutation(permutation, self.values.len())?;
        let old = std::mem::take(&mut self.values);
        self.values = permutation.iter().map(|&p| old[p].clone()).collect();
        Ok(())
    }
}

/// Explicit entries over a default value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SparseStorage<T> {
    values: BTreeMap<usize, T>,
    default: T,
    len: usize,
}

impl<T> SparseStorage<T> {
    pub fn new(default: T, len: usize) -> Self {
        Self {
            values: BTreeMap::new(),
            default,
            len,
        }
    }

    /// Number of explicitly stored entries.
    pub fn nb_explicit_values(&self) -> usize {
        self.values.len()
    }

    /// Explicit entries in index order.
    pub fn explicit_values(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.values.iter().map(|(&i, v)| (i, v))
    }
}

impl<T: Clone> SparseStorage<T> {
    pub(crate) fn value_mut(&mut self, index: usize) -> Result<&mut T, MeshModelError> {
        check_index(index, self.len)?;
        Ok(self
            .values
            .entry(index)
            .or_insert_with(|| self.default.clone()))
    }
}

impl<T: Clone + Debug + PartialEq> AttributeStorage<T> for SparseStorage<T> {
    fn kind(&self) -> AttributeKind {
        AttributeKind::Sparse
    }

    fn len(&self) -> usize {
        self.len
    }

    fn default_value(&self) -> &T {
        &self.default
    }

    fn value(&self, index: usize) -> Result<&T, MeshModelError> {
        check_index(index, self.len)?;
        Ok(self.values.get(&index).unwrap_or(&self.default))
    }

    fn set_value(&mut self, index: usize, value: T) -> Result<(), MeshModelError> {
        check_index(index, self.len)?;
        self.values.insert(index, value);
        Ok(())
    }

    fn resize(&mut self, len: usize) {
        if len < self.len {
            self.values.retain(|&i, _| i < len);
        }
        self.len = len;
    }

    fn reserve(&mut self, _capacity: usize) {}

    fn delete_elements(&mut self, to_delete: &[bool]) -> Result<(), MeshModelError> {
        if !check_deletion_mask(to_delete, self.len)? {
            return Ok(());
        }
        let old2new = old_to_new_mapping(to_delete);
        let default = &self.default;
        self.values = std::mem::take(&mut self.values)
            .into_iter()
            .filter(|(_, v)| v != default)
            .filter_map(|(i, v)| old2new.get(i).copied().flatten().map(|n| (n, v)))
            .collect();
        self.len = old2new.iter().filter(|n| n.is_some()).count();
        Ok(())
    }

    fn permute_elements(&mut self, permutation: &[usize]) -> Result<(), MeshModelError> {
        validate_permutation(permutation, self.len)?;
        let mut new_of_old = vec![0; self.len];
        for (new, &old) in permutation.iter().enumerate() {
            new_of_old[old] = new;
        }
        self.values = std::mem::take(&mut self.values)
            .into_iter()
            .map(|(old, v)| (new_of_old[old], v))
            .collect();
        Ok(())
    }
}
