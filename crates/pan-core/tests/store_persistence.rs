//! Integration tests for configuration store persistence.
//!
//! These tests drive the public API end to end: register provider schemas,
//! mutate options, write the document to a temporary config home, and read
//! it back into a fresh store.

use std::fs;
use std::path::{Path, PathBuf};

use pan_core::{AppIdentity, ConfigurationStore, OptionTree, Value};
use serde_json::json;
use uuid::Uuid;

/// Creates a unique, empty config home under the system temp directory.
fn temp_home() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pan_it_{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp config home");
    dir
}

fn tree(value: Value) -> OptionTree {
    value.as_object().cloned().expect("fixture must be an object")
}

fn fresh_store(home: &Path) -> ConfigurationStore {
    let mut store = ConfigurationStore::new(AppIdentity::new(home, "0.9.1"));
    store
        .register_provider(
            "digitransit",
            tree(json!({"region": "hsl", "favorites": [], "limits": {"departures": 20}})),
        )
        .expect("register provider");
    store
}

#[test]
fn test_write_then_read_reproduces_option_values() {
    // Arrange
    let home = temp_home();
    let mut store = fresh_store(&home);
    store.set("departure_time_cutoff", 25).unwrap();
    store.set("units", "american").unwrap();
    store.add("providers.digitransit.favorites", "HSL:1").unwrap();
    store.add("providers.digitransit.favorites", "HSL:2").unwrap();
    store.set("providers.digitransit.limits.departures", 50).unwrap();

    // Act
    store.write(None);
    let mut restored = fresh_store(&home);
    restored.read(None);

    // Assert
    assert_eq!(restored.get("departure_time_cutoff").unwrap(), json!(25));
    assert_eq!(restored.get("units").unwrap(), json!("american"));
    assert_eq!(
        restored.get("providers.digitransit.favorites").unwrap(),
        json!(["HSL:1", "HSL:2"])
    );
    assert_eq!(
        restored.get("providers.digitransit.limits.departures").unwrap(),
        json!(50)
    );

    fs::remove_dir_all(&home).ok();
}

#[test]
fn test_written_file_drops_unknown_top_level_keys_and_has_version() {
    // Arrange
    let home = temp_home();
    let mut store = fresh_store(&home);
    store.set("obsolete_option", true).unwrap();

    // Act
    store.write(None);
    let text = fs::read_to_string(home.join("pan-transit.json")).unwrap();
    let on_disk: Value = serde_json::from_str(&text).unwrap();

    // Assert
    assert_eq!(on_disk["version"], json!("0.9.1"));
    assert!(on_disk.get("obsolete_option").is_none());
    assert_eq!(on_disk["provider"], json!("digitransit"));

    let mut restored = fresh_store(&home);
    restored.read(None);
    assert!(restored.get("obsolete_option").is_err());

    fs::remove_dir_all(&home).ok();
}

#[test]
fn test_read_coerces_hand_edited_values() {
    // Arrange: a hand-edited file with strings where integers are expected
    let home = temp_home();
    fs::write(
        home.join("pan-transit.json"),
        r#"{
            "departure_time_cutoff": "30",
            "favorite_highlight_radius": "far",
            "providers": {"digitransit": {"limits": {"departures": 12.8}}}
        }"#,
    )
    .unwrap();
    let mut store = fresh_store(&home);

    // Act
    store.read(None);

    // Assert
    assert_eq!(store.get("departure_time_cutoff").unwrap(), json!(30));
    assert_eq!(store.get("favorite_highlight_radius").unwrap(), json!(1000));
    assert_eq!(
        store.get("providers.digitransit.limits.departures").unwrap(),
        json!(12)
    );

    fs::remove_dir_all(&home).ok();
}

#[test]
fn test_read_malformed_file_never_panics_and_keeps_state() {
    let home = temp_home();
    fs::write(home.join("pan-transit.json"), "\u{0}\u{1} garbage").unwrap();
    let mut store = fresh_store(&home);
    let before = store.snapshot();

    store.read(None);

    assert_eq!(store.snapshot(), before);
    fs::remove_dir_all(&home).ok();
}

#[test]
fn test_read_before_registration_keeps_loaded_provider_values() {
    // Arrange: values for a provider exist on disk before it registers
    let home = temp_home();
    fs::write(
        home.join("pan-transit.json"),
        r#"{"providers": {"late": {"token": "abc"}}}"#,
    )
    .unwrap();
    let mut store = ConfigurationStore::new(AppIdentity::new(&home, "0.9.1"));
    store.read(None);

    // Act
    store
        .register_provider("late", tree(json!({"token": "", "retries": 3})))
        .unwrap();

    // Assert: the loaded value wins, the gap is filled, the default is recorded
    assert_eq!(store.get("providers.late.token").unwrap(), json!("abc"));
    assert_eq!(store.get("providers.late.retries").unwrap(), json!(3));
    assert_eq!(store.get_default("providers.late.token").unwrap(), json!(""));

    fs::remove_dir_all(&home).ok();
}

#[test]
fn test_explicit_path_overrides_config_home() {
    let home = temp_home();
    let explicit = home.join("elsewhere").join("custom.json");
    let mut store = fresh_store(&home);
    store.set("units", "imperial").unwrap();

    store.write(Some(&explicit));

    assert!(explicit.is_file());
    assert!(!home.join("pan-transit.json").exists());

    let mut restored = fresh_store(&home);
    restored.read(Some(&explicit));
    assert_eq!(restored.get("units").unwrap(), json!("imperial"));

    fs::remove_dir_all(&home).ok();
}
