//! Element types that attributes may hold.
//!
//! The closed set of supported value types is tagged by [`ValueType`]; the
//! [`AttributeValue`] trait maps each concrete Rust type to its tag and to the
//! matching variant of [`TaggedAttribute`], in the same way typed section
//! accessors map scalars onto a tagged container.

use core::fmt;
use std::fmt::Debug;

use num_traits::{NumCast, ToPrimitive};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::data::attribute::{Attribute, TaggedAttribute};

/// Value type tag for attributes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Bool,
    Int,
    UInt,
    Float,
    Double,
    Array2,
    Array3,
}

impl ValueType {
    /// Returns a stable string label for the value type.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::UInt => "uint",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Array2 => "array2",
            ValueType::Array3 => "array3",
        }
    }

    /// Parse a value type from a string label.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "bool" => Some(ValueType::Bool),
            "int" => Some(ValueType::Int),
            "uint" => Some(ValueType::UInt),
            "float" => Some(ValueType::Float),
            "double" => Some(ValueType::Double),
            "array2" => Some(ValueType::Array2),
            "array3" => Some(ValueType::Array3),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Types that can be stored in an attribute.
///
/// Besides the tag, implementors describe how a value converts to a generic
/// `f32` (for type-erased reads) and whether it supports linear
/// interpolation.
pub trait AttributeValue:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Sized + 'static
{
    /// Value type tag for this concrete type.
    const VALUE_TYPE: ValueType;

    /// Whether values of this type have a meaningful generic `f32` reading.
    fn is_genericable() -> bool {
        true
    }

    /// Generic `f32` reading of the value.
    fn generic_value(&self) -> f32;

    /// Weighted sum of `values`, or `None` when the type does not interpolate.
    ///
    /// Callers guarantee `values.len() == lambdas.len()`.
    fn interpolate(values: &[&Self], lambdas: &[f64]) -> Option<Self> {
        let _ = (values, lambdas);
        None
    }

    /// Wrap a typed attribute into a tagged container.
    fn wrap(attribute: Attribute<Self>) -> TaggedAttribute;
    /// Borrow a typed attribute if the tag matches.
    fn unwrap(attribute: &TaggedAttribute) -> Option<&Attribute<Self>>;
    /// Mutably borrow a typed attribute if the tag matches.
    fn unwrap_mut(attribute: &mut TaggedAttribute) -> Option<&mut Attribute<Self>>;
}

macro_rules! impl_tagged {
    ($ty:ty, $variant:ident) => {
        fn wrap(attribute: Attribute<Self>) -> TaggedAttribute {
            TaggedAttribute::$variant(attribute)
        }

        fn unwrap(attribute: &TaggedAttribute) -> Option<&Attribute<Self>> {
            if let TaggedAttribute::$variant(attribute) = attribute {
                Some(attribute)
            } else {
                None
            }
        }

        fn unwrap_mut(attribute: &mut TaggedAttribute) -> Option<&mut Attribute<Self>> {
            if let TaggedAttribute::$variant(attribute) = attribute {
                Some(attribute)
            } else {
                None
            }
        }
    };
}

fn weighted_sum<T: ToPrimitive>(values: &[&T], lambdas: &[f64]) -> Option<f64> {
    values
        .iter()
        .zip(lambdas)
        .try_fold(0.0, |acc, (v, l)| Some(acc + v.to_f64()? * l))
}

macro_rules! impl_integer_value {
    ($ty:ty, $variant:ident) => {
        impl AttributeValue for $ty {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn generic_value(&self) -> f32 {
                self.to_f32().unwrap_or(f32::NAN)
            }

            impl_tagged!($ty, $variant);
        }
    };
}

macro_rules! impl_float_value {
    ($ty:ty, $variant:ident) => {
        impl AttributeValue for $ty {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn generic_value(&self) -> f32 {
                self.to_f32().unwrap_or(f32::NAN)
            }

            fn interpolate(values: &[&Self], lambdas: &[f64]) -> Option<Self> {
                weighted_sum(values, lambdas).and_then(<$ty as NumCast>::from)
            }

            impl_tagged!($ty, $variant);
        }
    };
}

macro_rules! impl_array_value {
    ($n:literal, $variant:ident) => {
        impl AttributeValue for [f64; $n] {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn is_genericable() -> bool {
                false
            }

            fn generic_value(&self) -> f32 {
                0.0
            }

            fn interpolate(values: &[&Self], lambdas: &[f64]) -> Option<Self> {
                let mut out = [0.0; $n];
                for (value, lambda) in values.iter().zip(lambdas) {
                    for (o, v) in out.iter_mut().zip(value.iter()) {
                        *o += v * lambda;
                    }
                }
                Some(out)
            }

            impl_tagged!([f64; $n], $variant);
        }
    };
}

impl AttributeValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn generic_value(&self) -> f32 {
        if *self { 1.0 } else { 0.0 }
    }

    impl_tagged!(bool, Bool);
}

impl_integer_value!(i32, Int);
impl_integer_value!(u32, UInt);
impl_float_value!(f32, Float);
impl_float_value!(f64, Double);
impl_array_value!(2, Array2);
impl_array_value!(3, Array3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for ty in [
            ValueType::Bool,
            ValueType::Int,
            ValueType::UInt,
            ValueType::Float,
            ValueType::Double,
            ValueType::Array2,
            ValueType::Array3,
        ] {
            assert_eq!(ValueType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(ValueType::parse("string"), None);
        assert_eq!(ValueType::Double.to_string(), "double");
    }

    #[test]
    fn generic_readings() {
        assert_eq!(true.generic_value(), 1.0);
        assert_eq!(false.generic_value(), 0.0);
        assert_eq!((-3i32).generic_value(), -3.0);
        assert_eq!(7u32.generic_value(), 7.0);
        assert_eq!(2.5f64.generic_value(), 2.5);
        assert!(!<[f64; 3]>::is_genericable());
        assert!(<u32>::is_genericable());
    }

    #[test]
    fn interpolation_only_for_floating_types() {
        let (a, b) = (1.0f64, 3.0f64);
        assert_eq!(f64::interpolate(&[&a, &b], &[0.5, 0.5]), Some(2.0));
        let (x, y) = (2i32, 4i32);
        assert_eq!(i32::interpolate(&[&x, &y], &[0.5, 0.5]), None);
        let (p, q) = ([0.0, 2.0], [2.0, 4.0]);
        assert_eq!(
            <[f64; 2]>::interpolate(&[&p, &q], &[0.25, 0.75]),
            Some([1.5, 3.5])
        );
    }
}
