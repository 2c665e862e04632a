//! configurator - a terminal editor for one YAML configuration file
//!
//! The crate is layered so that everything except the terminal front end can
//! be used and tested without a terminal:
//! - [`config`]: ordered store, YAML persistence, value obfuscation, filename validation
//! - [`session`]: the edit session that reconciles displayed rows into the store
//! - [`settings`]: runtime options
//! - [`tui`]: the ratatui front end

pub mod config;
pub mod session;
pub mod settings;
pub mod tui;

pub use config::{ConfigStore, EmptyDirectoryPolicy, SaveMode};
pub use session::{EditSession, Row, SessionState, Signal, SENTINEL_KEY};
pub use settings::EditorSettings;
