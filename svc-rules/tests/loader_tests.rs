use std::fs;
use std::path::{Path, PathBuf};
use svc_rules::loader::{load_catalog_from_file, load_project_from_file, parser_for_path};
use svc_rules::{KeywordSet, LoadError, PassType, ShaderId};
use tempfile::tempdir;

// Helper function to create the full path to test data
fn test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(filename);
    path
}

#[test]
fn test_load_valid_catalog() {
    let catalog = load_catalog_from_file(&test_data_path("valid_catalog.ron"))
        .expect("valid catalog should load");

    assert_eq!(catalog.len(), 2);
    let standard = catalog.get(&ShaderId::new("Standard")).unwrap();
    assert_eq!(
        standard.pass_types(),
        vec![
            PassType::ForwardBase,
            PassType::ForwardAdd,
            PassType::ShadowCaster,
            PassType::Meta
        ]
    );
    assert_eq!(standard.vocabulary().len(), 10);

    let forward = standard.pass(PassType::ForwardBase).unwrap();
    assert!(forward.accepts(&KeywordSet::empty()));
    assert!(forward.accepts(&KeywordSet::from_keywords(["_EMISSION", "FOG_EXP"])));
    assert!(!forward.accepts(&KeywordSet::from_keywords(["FOG_EXP", "FOG_LINEAR"])));

    let add = standard.pass(PassType::ForwardAdd).unwrap();
    assert!(!add.accepts(&KeywordSet::empty()));
    assert!(add.accepts(&KeywordSet::from_keywords(["SPOT"])));
}

#[test]
fn test_load_invalid_dup_shader() {
    match load_catalog_from_file(&test_data_path("invalid_dup_shader.ron")) {
        Err(LoadError::InvalidData(msg)) => assert!(msg.contains("Duplicate shader name: Standard")),
        other => panic!("Expected InvalidData error for duplicate shader, got {other:?}"),
    }
}

#[test]
fn test_load_invalid_empty_group() {
    match load_catalog_from_file(&test_data_path("invalid_empty_group.ron")) {
        Err(LoadError::InvalidData(msg)) => assert!(msg.contains("empty keyword group")),
        other => panic!("Expected InvalidData error for empty group, got {other:?}"),
    }
}

#[test]
fn test_load_invalid_format() {
    match load_catalog_from_file(&test_data_path("invalid_format.ron")) {
        Err(LoadError::ParseError(msg)) => assert!(msg.contains("RON deserialization failed")),
        other => panic!("Expected ParseError for unknown pass, got {other:?}"),
    }
}

#[test]
fn test_load_file_not_found() {
    let result = load_catalog_from_file(&test_data_path("non_existent_file.ron"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

#[test]
fn test_unsupported_extension() {
    let result = parser_for_path(Path::new("catalog.yaml"));
    assert!(matches!(result, Err(LoadError::UnsupportedFormat(_))));
}

#[test]
fn test_load_valid_project_json() {
    let project = load_project_from_file(&test_data_path("valid_project.json"))
        .expect("valid project should load");
    assert_eq!(project.materials().len(), 3);
    let floor = project.material("Floor").unwrap();
    // Raw live keywords are kept as authored, duplicates included.
    assert_eq!(floor.keywords.len(), 3);
    assert_eq!(project.scene_materials(true).len(), 2);
    assert_eq!(project.materials_under(&["Assets"]).len(), 2);
}

#[test]
fn test_load_invalid_project() {
    match load_project_from_file(&test_data_path("invalid_project.ron")) {
        Err(LoadError::InvalidData(msg)) => assert!(msg.contains("unknown material: Missing")),
        other => panic!("Expected InvalidData error for unknown scene material, got {other:?}"),
    }
}

#[test]
fn test_load_catalog_from_temp_file_without_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog");
    fs::write(&path, "(shaders: [(name: \"Blit\", passes: [(pass: Normal)])])").unwrap();
    let catalog = load_catalog_from_file(&path).unwrap();
    assert_eq!(catalog.shaders()[0].name.as_str(), "Blit");
}
