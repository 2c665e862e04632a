//! Edit session: reconciles editable rows with the configuration store
//!
//! The presentation layer owns the editable rows. Whenever the user saves,
//! adds a row, or quits, it hands the session the full ordered list of rows
//! and the session rebuilds its store from them wholesale, persists it, and
//! queues [`Signal`]s for the presentation layer to act on.
//!
//! A freshly added row carries the reserved [`SENTINEL_KEY`]. Rows with that
//! key are never persisted; renaming the row before the next save is the only
//! way a new entry reaches the file.

use crate::config::{display_value, ConfigStore, LoadError, SaveMode, SessionError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Key given to a newly added, not yet named row
pub const SENTINEL_KEY: &str = "new_key";

/// One editable key/value row as shown by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub value: String,
}

impl Row {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.key == SENTINEL_KEY
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Row {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// Lifecycle state of an edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Saving,
    Terminated,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// A user-requested save completed.
    Saved { path: PathBuf },
    /// The displayed rows changed shape; rebuild them from [`EditSession::rows`].
    Rerender,
}

/// Interactive editing session over one configuration file
#[derive(Debug)]
pub struct EditSession {
    source: PathBuf,
    store: ConfigStore,
    displayed: Vec<String>,
    state: SessionState,
    save_mode: SaveMode,
    signals: Vec<Signal>,
}

impl EditSession {
    /// Load `path` and start editing it
    ///
    /// A load failure is fatal: no session is created.
    pub fn initialize(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let source = path.as_ref().to_path_buf();
        let store = ConfigStore::load(&source)?;
        let displayed = store.keys().map(str::to_string).collect();

        info!("Editing session started for {:?}", source);
        Ok(Self {
            source,
            store,
            displayed,
            state: SessionState::Editing,
            save_mode: SaveMode::default(),
            signals: Vec::new(),
        })
    }

    pub fn with_save_mode(mut self, mode: SaveMode) -> Self {
        self.save_mode = mode;
        self
    }

    /// Path the session was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Keys in display order, including an unnamed placeholder if present
    pub fn displayed_keys(&self) -> &[String] {
        &self.displayed
    }

    /// Rows to display, one per displayed key
    ///
    /// A displayed key missing from the store shows an empty value.
    pub fn rows(&self) -> Vec<Row> {
        self.displayed
            .iter()
            .map(|key| {
                let value = self.store.get(key).map(display_value).unwrap_or_default();
                Row::new(key.clone(), value)
            })
            .collect()
    }

    /// Take the signals queued since the last call
    pub fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    /// Save the visible rows silently, then append a placeholder row
    pub fn add_placeholder_row(
        &mut self,
        rows: &[Row],
        destination: impl AsRef<Path>,
    ) -> Result<(), SessionError> {
        self.reconcile_and_save(rows, destination, false)?;

        self.displayed.push(SENTINEL_KEY.to_string());
        self.signals.push(Signal::Rerender);
        debug!("Placeholder row added ({} rows displayed)", self.displayed.len());
        Ok(())
    }

    /// Rebuild the store from `rows` and persist it to `destination`
    ///
    /// Placeholder rows are dropped. A repeated key keeps the position of its
    /// first row and the value of its last. When `notify` is set, a
    /// [`Signal::Saved`] is queued once the write succeeds. If the write
    /// fails, the session keeps its previous store and display order.
    pub fn reconcile_and_save(
        &mut self,
        rows: &[Row],
        destination: impl AsRef<Path>,
        notify: bool,
    ) -> Result<(), SessionError> {
        self.ensure_active()?;
        let destination = destination.as_ref();

        let store: ConfigStore = rows
            .iter()
            .filter(|row| !row.is_placeholder())
            .map(|row| (row.key.clone(), row.value.clone()))
            .collect();

        self.state = SessionState::Saving;
        debug!("Saving {} rows to {:?}", store.len(), destination);

        if let Err(err) = store.save_with(destination, self.save_mode) {
            warn!("Save to {:?} failed: {}", destination, err);
            self.state = SessionState::Editing;
            return Err(err.into());
        }

        self.displayed = store.keys().map(str::to_string).collect();
        self.store = store;
        self.state = SessionState::Editing;

        if notify {
            self.signals.push(Signal::Saved {
                path: destination.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Save the visible rows and end the session
    ///
    /// There is no way to quit without saving. If the save fails the session
    /// stays open.
    pub fn quit(&mut self, rows: &[Row], destination: impl AsRef<Path>) -> Result<(), SessionError> {
        self.reconcile_and_save(rows, destination, false)?;
        self.state = SessionState::Terminated;
        info!("Editing session for {:?} terminated", self.source);
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Terminated {
            return Err(SessionError::Terminated);
        }
        Ok(())
    }
}
