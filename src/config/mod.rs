/// Configuration file layer for configurator
///
/// This module owns everything that touches the edited file itself:
/// - The ordered in-memory store and its YAML persistence
/// - Reversible obfuscation of string values
/// - Destination filename validation
/// - Typed load/save/validation errors
///
/// On disk the file is a block-style YAML mapping written one entry at a
/// time, with top-level string values stored character-reversed.
pub mod error;
pub mod obscure;
pub mod store;
pub mod validation;

pub use error::{LoadError, SaveError, SessionError, ValidationError};
pub use obscure::{obscure, reveal};
pub use store::{display_value, ConfigStore, SaveMode};
pub use validation::{validate_destination, EmptyDirectoryPolicy};

/// File edited when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
