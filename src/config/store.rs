//! Ordered configuration store with YAML persistence
//!
//! A [`ConfigStore`] holds the top-level entries of one configuration file in
//! file order. String values are kept in plain form in memory and obscured on
//! disk (see [`super::obscure`]); every other value type is stored as-is.

use super::error::{kind_name, LoadError, SaveError};
use super::obscure::{obscure, reveal};
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// How a store is written to its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Truncate and rewrite the destination directly.
    ///
    /// A crash or I/O failure part way through can leave a partially
    /// written file.
    #[default]
    InPlace,

    /// Write a temporary file next to the destination, then rename it over
    /// the destination. The replaced file gets the temporary file's
    /// permissions.
    Atomic,
}

/// Ordered mapping of top-level configuration keys to values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    entries: IndexMap<String, Value>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a YAML file
    ///
    /// Top-level string values are revealed; all other values are kept
    /// unchanged. Entry order follows the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::parse(path, &text)?;
        info!("Loaded {} entries from {:?}", store.len(), path);
        Ok(store)
    }

    /// Parse a store from YAML text without touching the filesystem
    pub fn from_document(text: &str) -> Result<Self, LoadError> {
        Self::parse(Path::new("<document>"), text)
    }

    fn parse(path: &Path, text: &str) -> Result<Self, LoadError> {
        // An empty file is an empty mapping, so an empty store round-trips
        if text.trim().is_empty() {
            return Ok(Self::new());
        }

        let document: Value = serde_yaml::from_str(text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mapping = match document {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            other => {
                return Err(LoadError::NotAMapping {
                    path: path.to_path_buf(),
                    found: kind_name(&other),
                })
            }
        };

        let mut store = Self::new();
        for (key, value) in mapping {
            let key = match key {
                Value::String(key) => key,
                other => {
                    return Err(LoadError::NonStringKey {
                        path: path.to_path_buf(),
                        key: display_value(&other),
                    })
                }
            };

            let value = match value {
                Value::String(stored) => Value::String(reveal(&stored)),
                other => other,
            };
            store.set(key, value);
        }

        Ok(store)
    }

    /// Save the store, rewriting the destination in place
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        self.save_with(path, SaveMode::InPlace)
    }

    /// Save the store using the given write strategy
    pub fn save_with(&self, path: impl AsRef<Path>, mode: SaveMode) -> Result<(), SaveError> {
        let path = path.as_ref();
        let document = self.to_document()?;

        match mode {
            SaveMode::InPlace => write_in_place(path, &document)?,
            SaveMode::Atomic => write_atomic(path, &document)?,
        }

        info!(
            "Saved {} entries to {:?} ({:?})",
            self.len(),
            path,
            mode
        );
        Ok(())
    }

    /// Render the on-disk form of the store
    ///
    /// Each entry is emitted as its own single-entry mapping and the blocks
    /// are concatenated, which yields one top-level mapping document.
    pub fn to_document(&self) -> Result<String, SaveError> {
        let mut document = String::new();

        for (key, value) in &self.entries {
            let stored = match value {
                Value::String(plain) => Value::String(obscure(plain)),
                other => other.clone(),
            };

            let mut unit = Mapping::new();
            unit.insert(Value::String(key.clone()), stored);

            let block = serde_yaml::to_string(&unit).map_err(|source| SaveError::Serialize {
                key: key.clone(),
                source,
            })?;
            document.push_str(&block);
        }

        debug!("Rendered {} entries ({} bytes)", self.len(), document.len());
        Ok(document)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or update an entry
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove an entry, closing the gap in the order
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigStore
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (key, value) in iter {
            store.set(key, value);
        }
        store
    }
}

/// Render a value as a single line of text for display in an editable row
///
/// Strings are shown verbatim; everything else uses compact flow notation,
/// e.g. `8080`, `true`, `null`, `["a","b"]`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string(other)
            .or_else(|_| serde_yaml::to_string(other).map(|s| s.trim_end().to_string()))
            .unwrap_or_default(),
    }
}

fn write_in_place(path: &Path, document: &str) -> Result<(), SaveError> {
    fs::write(path, document).map_err(|source| SaveError::Io {
        operation: "writing",
        path: path.to_path_buf(),
        source,
    })
}

fn write_atomic(path: &Path, document: &str) -> Result<(), SaveError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut temp = NamedTempFile::new_in(&dir).map_err(|source| SaveError::Io {
        operation: "creating a temporary file in",
        path: dir.clone(),
        source,
    })?;

    temp.write_all(document.as_bytes())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|source| SaveError::Io {
            operation: "writing",
            path: temp.path().to_path_buf(),
            source,
        })?;

    temp.persist(path).map_err(|err| SaveError::Io {
        operation: "replacing",
        path: path.to_path_buf(),
        source: err.error,
    })?;

    Ok(())
}
