use std::path::PathBuf;

use model_sieve::data::AttributeManager;
use model_sieve::io::{load_attribute_manager, load_brep, save_attribute_manager, save_brep};
use model_sieve::mesh_error::MeshModelError;
use model_sieve::model::BRep;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}_{name}", std::process::id()))
}

#[test]
fn attribute_manager_file_round_trip() {
    let mut manager = AttributeManager::with_elements(5);
    manager
        .find_or_create_attribute_sparse("normal", [0.0, 0.0, 1.0])
        .unwrap()
        .set_value(4, [1.0, 0.0, 0.0])
        .unwrap();
    manager
        .find_or_create_attribute_constant("tag", 9i32)
        .unwrap();

    let path = scratch("attributes.og_attr");
    save_attribute_manager(&manager, &path).unwrap();
    let loaded = load_attribute_manager(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, manager);
    assert_eq!(
        *loaded
            .find_attribute::<[f64; 3]>("normal")
            .unwrap()
            .value(4)
            .unwrap(),
        [1.0, 0.0, 0.0]
    );
}

#[test]
fn extension_selects_the_archive_type() {
    let brep = BRep::new();
    let path = scratch("model.og_attr");
    assert_eq!(
        save_brep(&brep, &path).unwrap_err(),
        MeshModelError::UnknownExtension {
            expected: "og_brep",
            found: "og_attr".into(),
        }
    );
    assert!(!path.exists());
    assert!(matches!(
        load_brep(scratch("model")),
        Err(MeshModelError::UnknownExtension { .. })
    ));
}

#[test]
fn loading_another_archive_type_fails() {
    let manager = AttributeManager::with_elements(2);
    let attr_path = scratch("mismatch.og_attr");
    save_attribute_manager(&manager, &attr_path).unwrap();
    let brep_path = scratch("mismatch.og_brep");
    std::fs::rename(&attr_path, &brep_path).unwrap();
    let result = load_brep(&brep_path);
    std::fs::remove_file(&brep_path).unwrap();
    assert!(result.is_err());
}
