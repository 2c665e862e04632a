//! Runtime settings for the editor

use crate::config::{EmptyDirectoryPolicy, SaveMode, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use std::time::Duration;

/// Options controlling one editor run
#[derive(Debug, Clone)]
pub struct EditorSettings {
    /// File loaded at startup and pre-filled as the save destination
    pub file: PathBuf,

    /// How the destination validator treats a bare filename
    pub empty_directory_policy: EmptyDirectoryPolicy,

    /// How saves are written to disk
    pub save_mode: SaveMode,

    /// How long a save notification stays on screen
    pub notification_timeout: Duration,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_CONFIG_FILE),
            empty_directory_policy: EmptyDirectoryPolicy::CurrentDirectory,
            save_mode: SaveMode::InPlace,
            notification_timeout: Duration::from_secs(3),
        }
    }
}
