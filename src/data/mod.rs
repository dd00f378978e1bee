//! Data module: attribute values, storages and managers

pub mod attribute;
pub mod attribute_manager;
pub mod storage;
pub mod value;

pub use attribute::{
    Attribute, AttributeKind, AttributeLinearInterpolation, AttributeProperties, TaggedAttribute,
};
pub use attribute_manager::AttributeManager;
pub use storage::{AttributeStorage, ConstantStorage, SparseStorage, VariableStorage};
pub use value::{AttributeValue, ValueType};
