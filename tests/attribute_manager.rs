use model_sieve::data::{AttributeKind, AttributeLinearInterpolation, AttributeManager, ValueType};
use model_sieve::mesh_error::MeshModelError;

fn populated_manager() -> AttributeManager {
    let mut manager = AttributeManager::new();
    manager.resize(10);
    assert_eq!(manager.nb_elements(), 10);

    let constant = manager
        .find_or_create_attribute_constant("bool", true)
        .unwrap();
    assert!(*constant.value(0).unwrap());

    let variable = manager.find_or_create_attribute_variable("int", 12i32).unwrap();
    variable.set_value(3, 3).unwrap();
    assert_eq!(*variable.value(3).unwrap(), 3);
    assert_eq!(*variable.value(6).unwrap(), 12);
    variable.set_value(3, 5).unwrap();

    let sparse = manager.find_or_create_attribute_sparse("double", 12.0f64).unwrap();
    sparse.set_value(3, 3.0).unwrap();
    sparse.set_value(7, 7.0).unwrap();
    sparse.set_value(3, 5.0).unwrap();
    manager
}

#[test]
fn attributes_are_registered_in_order() {
    let manager = populated_manager();
    assert_eq!(manager.nb_attributes(), 3);
    let names: Vec<_> = manager.attribute_names().collect();
    assert_eq!(names, ["bool", "int", "double"]);
    assert_eq!(manager.attribute_type("int"), Some(ValueType::Int));
    assert_eq!(manager.attribute_kind("double"), Some(AttributeKind::Sparse));
    assert_eq!(manager.attribute_kind("bool"), Some(AttributeKind::Constant));
    assert!(!manager.attribute_exists("missing"));
}

#[test]
fn deleting_elements_compacts_every_attribute() {
    let mut manager = populated_manager();
    let mut to_delete = vec![false; 10];
    to_delete[3] = true;
    to_delete[5] = true;
    manager.delete_elements(&to_delete).unwrap();
    assert_eq!(manager.nb_elements(), 8);

    let int = manager.find_attribute::<i32>("int").unwrap();
    assert_eq!(int.len(), 8);
    assert!((0..8).all(|i| *int.value(i).unwrap() == 12));

    let double = manager.find_attribute::<f64>("double").unwrap();
    assert_eq!(*double.value(0).unwrap(), 12.0);
    assert_eq!(*double.value(3).unwrap(), 12.0);
    assert_eq!(*double.value(5).unwrap(), 7.0);
    assert_eq!(*double.value(7).unwrap(), 12.0);

    let constant = manager.find_attribute::<bool>("bool").unwrap();
    assert_eq!(constant.len(), 8);
    assert!(*constant.value(7).unwrap());
}

#[test]
fn deleting_attributes() {
    let mut manager = populated_manager();
    assert!(manager.delete_attribute("bool"));
    assert!(!manager.delete_attribute("bool"));
    assert_eq!(manager.nb_attributes(), 2);
    assert!(matches!(
        manager.find_attribute::<bool>("bool"),
        Err(MeshModelError::AttributeNotFound { .. })
    ));

    manager.clear_attributes();
    assert_eq!(manager.nb_attributes(), 0);
    assert_eq!(manager.nb_elements(), 10);

    manager.clear();
    assert_eq!(manager.nb_elements(), 0);
}

#[test]
fn wrong_value_type_is_reported() {
    let mut manager = populated_manager();
    let err = manager.find_attribute::<f32>("int").unwrap_err();
    assert_eq!(
        err,
        MeshModelError::AttributeTypeMismatch {
            name: "int".into(),
            expected: ValueType::Float,
            found: ValueType::Int,
        }
    );
    assert!(
        manager
            .find_or_create_attribute_variable("double", 0u32)
            .is_err()
    );
    // A kind mismatch keeps the stored attribute.
    let existing = manager
        .find_or_create_attribute_variable("double", 0.0f64)
        .unwrap();
    assert_eq!(existing.kind(), AttributeKind::Sparse);
}

#[test]
fn constant_attributes_reject_element_writes() {
    let mut manager = populated_manager();
    let constant = manager.find_attribute_mut::<bool>("bool").unwrap();
    assert!(matches!(
        constant.set_value(0, false),
        Err(MeshModelError::Unsupported {
            kind: AttributeKind::Constant,
            ..
        })
    ));
    constant.set_constant_value(false).unwrap();
    assert!(!*constant.value(9).unwrap());
}

#[test]
fn out_of_range_reads_fail() {
    let manager = populated_manager();
    let int = manager.find_attribute::<i32>("int").unwrap();
    assert_eq!(
        int.value(10).unwrap_err(),
        MeshModelError::OutOfRange { index: 10, len: 10 }
    );
}

#[test]
fn generic_values_read_numbers_as_f32() {
    let manager = populated_manager();
    let int = manager.find_generic_attribute("int").unwrap();
    assert!(int.is_genericable());
    assert_eq!(int.generic_value(3).unwrap(), 5.0);
    let flag = manager.find_generic_attribute("bool").unwrap();
    assert_eq!(flag.generic_value(0).unwrap(), 1.0);
}

#[test]
fn assignment_and_interpolation_follow_properties() {
    let mut manager = AttributeManager::with_elements(4);
    manager
        .find_or_create_attribute_variable("speed", 0.0f64)
        .unwrap()
        .set_properties(model_sieve::data::AttributeProperties::new(true, true));
    manager
        .find_or_create_attribute_variable("label", 0i32)
        .unwrap()
        .set_properties(model_sieve::data::AttributeProperties::new(false, true));
    {
        let speed = manager.find_attribute_mut::<f64>("speed").unwrap();
        speed.set_value(0, 2.0).unwrap();
        speed.set_value(1, 4.0).unwrap();
    }
    manager
        .find_attribute_mut::<i32>("label")
        .unwrap()
        .set_value(0, 9)
        .unwrap();

    manager.assign_attribute_value(0, 3).unwrap();
    assert_eq!(*manager.find_attribute::<f64>("speed").unwrap().value(3).unwrap(), 2.0);
    assert_eq!(*manager.find_attribute::<i32>("label").unwrap().value(3).unwrap(), 0);

    let interpolation = AttributeLinearInterpolation::new(vec![0, 1], vec![0.25, 0.75]).unwrap();
    manager.interpolate_attribute_value(&interpolation, 2).unwrap();
    assert_eq!(*manager.find_attribute::<f64>("speed").unwrap().value(2).unwrap(), 3.5);
    // Integers never interpolate.
    assert_eq!(*manager.find_attribute::<i32>("label").unwrap().value(2).unwrap(), 0);

    assert!(matches!(
        AttributeLinearInterpolation::new(vec![0], vec![0.5, 0.5]),
        Err(MeshModelError::InterpolationLengthMismatch { indices: 1, lambdas: 2 })
    ));
}

#[test]
fn copy_and_import_between_managers() {
    let source = populated_manager();

    let mut copy = AttributeManager::new();
    copy.copy(&source);
    assert_eq!(copy, source);

    let mut target = AttributeManager::with_elements(2);
    let mut old2new = vec![None; 10];
    old2new[3] = Some(0);
    old2new[7] = Some(1);
    target.import(&old2new, &source).unwrap();
    assert_eq!(target.nb_attributes(), 3);
    assert_eq!(*target.find_attribute::<i32>("int").unwrap().value(0).unwrap(), 5);
    let double = target.find_attribute::<f64>("double").unwrap();
    assert_eq!(*double.value(0).unwrap(), 5.0);
    assert_eq!(*double.value(1).unwrap(), 7.0);
}

#[test]
fn permutation_moves_values() {
    let mut manager = populated_manager();
    let permutation: Vec<usize> = (0..10).rev().collect();
    manager.permute_elements(&permutation).unwrap();
    assert_eq!(*manager.find_attribute::<i32>("int").unwrap().value(6).unwrap(), 5);
    assert_eq!(*manager.find_attribute::<f64>("double").unwrap().value(2).unwrap(), 7.0);
    assert!(matches!(
        manager.permute_elements(&[0, 0, 1, 2, 3, 4, 5, 6, 7, 8]),
        Err(MeshModelError::InvalidPermutation(_))
    ));
}
