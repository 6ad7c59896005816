use std::path::PathBuf;

use pal_core::core_api::{CoreErrorCode, NameTable};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

#[test]
fn loads_fixture_dataset() {
    let table = NameTable::load(&workspace_root().join("tests/fixtures/pals.json"))
        .expect("fixture dataset should load");

    assert_eq!(table.len(), 5);
    assert_eq!(table.get("SheepBall"), Some("Lamball"));
    assert_eq!(table.get("kitsunebi"), Some("Foxparks"));
    assert_eq!(table.get("KITSUNEBI"), Some("Foxparks"));
    assert_eq!(table.get("Anubis"), None);
}

#[test]
fn bundled_dataset_loads() {
    let table = NameTable::load(&workspace_root().join("resources/pals.json"))
        .expect("bundled dataset should load");
    assert!(!table.is_empty());
    assert_eq!(table.get("SheepBall"), Some("Lamball"));
}

#[test]
fn missing_dataset_is_not_found() {
    let err = NameTable::load(&workspace_root().join("tests/fixtures/no_such_pals.json"))
        .expect_err("missing dataset must fail");
    assert_eq!(err.code, CoreErrorCode::NotFound);
}

#[test]
fn dataset_without_values_is_rejected() {
    let err = NameTable::from_slice(br#"{"items": []}"#).expect_err("must fail");
    assert_eq!(err.code, CoreErrorCode::ReferenceData);
}

#[test]
fn later_entries_win_on_case_collision() {
    let table = NameTable::from_slice(
        br#"{"values": [
            {"CodeName": "Anubis", "Name": "Old"},
            {"CodeName": "ANUBIS", "Name": "Anubis", "Rarity": 10}
        ]}"#,
    )
    .expect("dataset should parse");
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("anubis"), Some("Anubis"));
}
