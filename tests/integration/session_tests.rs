/// Integration tests for the edit session lifecycle
///
/// These drive the session the way the terminal front end does: every
/// save-triggering call passes the full list of visible rows.
use super::fixture;
use anyhow::Result;
use configurator::config::{obscure, ConfigStore, SaveMode};
use configurator::{EditSession, Row, SessionState, Signal, SENTINEL_KEY};
use pretty_assertions::assert_eq;
use serde_yaml::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(contents: &str) -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("config.yaml");
    fs::write(&path, contents)?;
    Ok((temp_dir, path))
}

fn rows(pairs: &[(&str, &str)]) -> Vec<Row> {
    pairs.iter().map(|&pair| Row::from(pair)).collect()
}

#[test]
fn test_placeholder_row_is_never_persisted() -> Result<()> {
    let (_temp_dir, path) = write_config("a: olleh\n")?;
    let mut session = EditSession::initialize(&path)?;

    session.reconcile_and_save(&rows(&[("a", "hello"), (SENTINEL_KEY, "")]), &path, true)?;

    assert_eq!(fs::read_to_string(&path)?, "a: olleh\n");
    let reloaded = ConfigStore::load(&path)?;
    assert_eq!(reloaded.keys().collect::<Vec<_>>(), vec!["a"]);
    assert_eq!(reloaded.get("a"), Some(&Value::from("hello")));
    Ok(())
}

#[test]
fn test_placeholder_with_value_is_still_dropped() -> Result<()> {
    let (_temp_dir, path) = write_config("a: b\n")?;
    let mut session = EditSession::initialize(&path)?;

    session.reconcile_and_save(&rows(&[("a", "b"), (SENTINEL_KEY, "typed")]), &path, false)?;

    assert!(!ConfigStore::load(&path)?.contains_key(SENTINEL_KEY));
    Ok(())
}

#[test]
fn test_quit_saves_without_notification() -> Result<()> {
    let (_temp_dir, path) = write_config("a: '0'\n")?;
    let mut session = EditSession::initialize(&path)?;

    session.quit(&rows(&[("a", "1")]), &path)?;

    assert_eq!(session.state(), SessionState::Terminated);
    assert!(session.drain_signals().is_empty());

    let raw: Value = serde_yaml::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(raw.get("a"), Some(&Value::from(obscure("1"))));
    Ok(())
}

#[test]
fn test_save_to_different_destination() -> Result<()> {
    let (temp_dir, path) = write_config("a: b\n")?;
    let destination = temp_dir.path().join("copy.yaml");
    let mut session = EditSession::initialize(&path)?;

    session.reconcile_and_save(&rows(&[("a", "changed")]), &destination, true)?;

    assert_eq!(fs::read_to_string(&path)?, "a: b\n");
    assert_eq!(fs::read_to_string(&destination)?, "a: degnahc\n");
    assert_eq!(session.source(), path.as_path());
    assert_eq!(
        session.drain_signals(),
        vec![Signal::Saved { path: destination }]
    );
    Ok(())
}

#[test]
fn test_full_editing_flow() -> Result<()> {
    let (_temp_dir, path) = write_config("host: tsohlacol\nport: 8080\n")?;
    let mut session = EditSession::initialize(&path)?;
    assert_eq!(
        session.rows(),
        rows(&[("host", "localhost"), ("port", "8080")])
    );

    // Add a row, then name it
    let visible = session.rows();
    session.add_placeholder_row(&visible, &path)?;
    assert_eq!(session.drain_signals(), vec![Signal::Rerender]);

    let mut visible = session.rows();
    assert_eq!(visible.last(), Some(&Row::new(SENTINEL_KEY, "")));
    *visible.last_mut().unwrap() = Row::new("user", "admin");

    // Remove "port" from the visible rows
    visible.retain(|row| row.key != "port");
    session.reconcile_and_save(&visible, &path, true)?;

    assert_eq!(session.displayed_keys(), ["host", "user"]);
    assert_eq!(fs::read_to_string(&path)?, "host: tsohlacol\nuser: nimda\n");

    // Values reconciled from rows are strings, so the port would now be text
    session.quit(&rows(&[("host", "localhost"), ("port", "9090")]), &path)?;
    let reloaded = ConfigStore::load(&path)?;
    assert_eq!(reloaded.get("port"), Some(&Value::from("9090")));
    Ok(())
}

#[test]
fn test_non_string_values_display_as_text() -> Result<()> {
    let session = EditSession::initialize(fixture("config.yaml"))?;

    let displayed = session.rows();
    let value_of = |key: &str| {
        displayed
            .iter()
            .find(|row| row.key == key)
            .map(|row| row.value.clone())
    };

    assert_eq!(value_of("name").as_deref(), Some("my-app"));
    assert_eq!(value_of("port").as_deref(), Some("8080"));
    assert_eq!(value_of("debug").as_deref(), Some("false"));
    assert_eq!(value_of("hosts").as_deref(), Some(r#"["alpha","beta"]"#));
    assert_eq!(value_of("nothing").as_deref(), Some("null"));
    Ok(())
}

#[test]
fn test_atomic_session_saves() -> Result<()> {
    let (_temp_dir, path) = write_config("a: b\n")?;
    let mut session = EditSession::initialize(&path)?.with_save_mode(SaveMode::Atomic);

    session.quit(&rows(&[("a", "c")]), &path)?;

    assert_eq!(fs::read_to_string(&path)?, "a: c\n");
    Ok(())
}

#[test]
fn test_initialize_rejects_invalid_file() -> Result<()> {
    let (_temp_dir, path) = write_config("- not\n- a mapping\n")?;
    assert!(EditSession::initialize(&path).is_err());
    Ok(())
}
