/// Integration tests for loading and saving configuration files
use super::fixture;
use anyhow::Result;
use configurator::config::{ConfigStore, LoadError, SaveError, SaveMode};
use pretty_assertions::assert_eq;
use serde_yaml::Value;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_fixture_reveals_top_level_strings() -> Result<()> {
    let store = ConfigStore::load(fixture("config.yaml"))?;

    assert_eq!(
        store.keys().collect::<Vec<_>>(),
        vec!["name", "port", "debug", "motto", "hosts", "database", "empty", "nothing"]
    );
    assert_eq!(store.get("name"), Some(&Value::from("my-app")));
    assert_eq!(store.get("motto"), Some(&Value::from("hello world")));
    assert_eq!(store.get("port"), Some(&Value::from(8080)));
    assert_eq!(store.get("debug"), Some(&Value::from(false)));
    assert_eq!(store.get("empty"), Some(&Value::from("")));
    assert_eq!(store.get("nothing"), Some(&Value::Null));

    // Strings below the top level are stored as written
    let hosts = store.get("hosts").and_then(Value::as_sequence).unwrap();
    assert_eq!(hosts, &vec![Value::from("alpha"), Value::from("beta")]);
    let database = store.get("database").and_then(Value::as_mapping).unwrap();
    assert_eq!(database.get("user"), Some(&Value::from("admin")));

    Ok(())
}

#[test]
fn test_fixture_survives_load_then_save() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let copy = temp_dir.path().join("config.yaml");

    let original = ConfigStore::load(fixture("config.yaml"))?;
    original.save(&copy)?;
    let reloaded = ConfigStore::load(&copy)?;

    assert_eq!(reloaded, original);
    Ok(())
}

#[test]
fn test_load_then_save_preserves_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "x: a\ny: b\nz: c\n")?;

    let store = ConfigStore::load(&path)?;
    store.save(&path)?;

    assert_eq!(fs::read_to_string(&path)?, "x: a\ny: b\nz: c\n");
    assert_eq!(
        ConfigStore::load(&path)?.keys().collect::<Vec<_>>(),
        vec!["x", "y", "z"]
    );
    Ok(())
}

#[test]
fn test_save_writes_one_block_per_entry() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("out.yaml");

    let mut store = ConfigStore::new();
    store.set("user", "admin");
    store.set("retries", 3);
    store.set("verbose", true);
    store.save(&path)?;

    assert_eq!(
        fs::read_to_string(&path)?,
        "user: nimda\nretries: 3\nverbose: true\n"
    );
    Ok(())
}

#[test]
fn test_save_overwrites_existing_content() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, "old: eulav\nstale: 1\nmore: 2\n")?;

    let store: ConfigStore = [("new", "value")].into_iter().collect();
    store.save(&path)?;

    assert_eq!(fs::read_to_string(&path)?, "new: eulav\n");
    Ok(())
}

#[test]
fn test_atomic_save_matches_in_place() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let in_place = temp_dir.path().join("in_place.yaml");
    let atomic = temp_dir.path().join("atomic.yaml");
    fs::write(&atomic, "previous: tnetnoc\n")?;

    let store = ConfigStore::load(fixture("config.yaml"))?;
    store.save_with(&in_place, SaveMode::InPlace)?;
    store.save_with(&atomic, SaveMode::Atomic)?;

    assert_eq!(fs::read_to_string(&atomic)?, fs::read_to_string(&in_place)?);

    // No temporary files are left behind
    let names: Vec<_> = fs::read_dir(temp_dir.path())?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<_>>()?;
    assert_eq!(names.len(), 2);
    Ok(())
}

#[test]
fn test_empty_store_round_trips() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("empty.yaml");

    ConfigStore::new().save(&path)?;
    assert_eq!(fs::read_to_string(&path)?, "");
    assert!(ConfigStore::load(&path)?.is_empty());
    Ok(())
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigStore::load(temp_dir.path().join("missing.yaml")).unwrap_err();

    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("missing.yaml"));
}

#[test]
fn test_load_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.yaml");
    fs::write(&path, "key: [unclosed\n").unwrap();

    let err = ConfigStore::load(&path).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
}

#[test]
fn test_load_top_level_sequence() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("list.yaml");
    fs::write(&path, "- one\n- two\n").unwrap();

    let err = ConfigStore::load(&path).unwrap_err();
    assert!(matches!(err, LoadError::NotAMapping { .. }));
}

#[test]
fn test_save_into_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("no_such_dir").join("config.yaml");
    let store: ConfigStore = [("a", "b")].into_iter().collect();

    for mode in [SaveMode::InPlace, SaveMode::Atomic] {
        let err = store.save_with(&path, mode).unwrap_err();
        assert!(matches!(err, SaveError::Io { .. }), "{mode:?}: {err}");
    }
}
