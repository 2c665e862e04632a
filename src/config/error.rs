use std::path::PathBuf;

use thiserror::Error;

/// Failure to read a configuration file into a store
///
/// Always fatal for an editing session: there is no fallback to an empty or
/// default configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("top level of {path} must be a mapping, found {found}")]
    NotAMapping { path: PathBuf, found: &'static str },

    #[error("top-level key {key} in {path} is not a string")]
    NonStringKey { path: PathBuf, key: String },
}

/// Failure to persist a store
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error while {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize entry '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A destination filename rejected by the path validator
///
/// Recoverable: the user corrects the filename and tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("filename must not be empty")]
    Empty,

    #[error("filename '{0}' may only contain letters, digits, '_', '-', '.' and spaces")]
    InvalidCharacters(String),

    #[error("directory '{0}' does not exist")]
    MissingDirectory(PathBuf),
}

/// Failure of an edit session operation
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("the editing session has already terminated")]
    Terminated,
}

/// Short name of a YAML value's kind, used in error messages
pub(crate) fn kind_name(value: &serde_yaml::Value) -> &'static str {
    use serde_yaml::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
