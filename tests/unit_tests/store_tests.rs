// JsonFileStore on-disk format tests

use chrono::{TimeZone, Utc};
use ephemeral_wallets::services::wallet::{JsonFileStore, RegistrySnapshot, RegistryStore};
use std::fs;

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("wallet_data.json"));

    let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let mut snapshot = RegistrySnapshot::new();
    snapshot.insert("4First".to_string(), created);
    snapshot.insert("4Second".to_string(), created + chrono::Duration::minutes(5));
    store.save(&snapshot).unwrap();

    assert_eq!(store.load(), snapshot);
}

#[test]
fn test_file_format_is_keyed_by_address() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet_data.json");
    let store = JsonFileStore::new(&path);

    let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let mut snapshot = RegistrySnapshot::new();
    snapshot.insert("4First".to_string(), created);
    store.save(&snapshot).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["4First"]["created_at"], "2024-03-01T12:00:00+00:00");
    // Backend handles are never persisted
    assert_eq!(raw["4First"].as_object().unwrap().len(), 1);
}

#[test]
fn test_corrupt_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet_data.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(JsonFileStore::new(&path).load().is_empty());
}

#[test]
fn test_bad_entries_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet_data.json");
    fs::write(
        &path,
        r#"{
            "4Good": { "created_at": "2024-03-01T12:00:00Z" },
            "4Naive": { "created_at": "2024-03-01T12:00:00.123456" },
            "4NoTime": { },
            "4Garbage": { "created_at": "not a date" }
        }"#,
    )
    .unwrap();

    let loaded = JsonFileStore::new(&path).load();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.contains_key("4Good"));
    assert!(loaded.contains_key("4Naive"));
}

#[test]
fn test_failed_save_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet_data.json");
    // A directory in the target's place makes the final rename fail
    fs::create_dir(&path).unwrap();

    let mut snapshot = RegistrySnapshot::new();
    snapshot.insert("4Lost".to_string(), Utc::now());
    assert!(JsonFileStore::new(&path).save(&snapshot).is_err());

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["wallet_data.json".to_string()]);
}
