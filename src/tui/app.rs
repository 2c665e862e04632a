//! Presentation adapter between the terminal and an [`EditSession`]
//!
//! The adapter owns the editable rows and the destination filename. Key
//! presses either edit the focused cell or map to a [`UiEvent`], which is
//! dispatched to the session together with the full list of visible rows.

use super::field::TextField;
use crate::config::{validate_destination, SessionError, ValidationError};
use crate::session::{EditSession, Row, Signal};
use crate::settings::EditorSettings;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// User commands that reach the edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    SaveRequested,
    QuitRequested,
    AddRowRequested,
}

/// Map a key press to a command, if it is bound to one
pub fn command_for(key: &KeyEvent) -> Option<UiEvent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => Some(UiEvent::SaveRequested),
        KeyCode::Char('n') if ctrl => Some(UiEvent::AddRowRequested),
        KeyCode::Char('q') if ctrl => Some(UiEvent::QuitRequested),
        KeyCode::Esc => Some(UiEvent::QuitRequested),
        _ => None,
    }
}

/// Which cell has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Filename,
    Key(usize),
    Value(usize),
}

/// Whether the event loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Message shown in the status line
#[derive(Debug, Clone)]
pub struct Status {
    pub kind: StatusKind,
    pub title: &'static str,
    pub message: String,
    pub shown_at: Instant,
}

/// One visible key/value row being edited
#[derive(Debug, Clone)]
pub struct EditableRow {
    pub key: TextField,
    pub value: TextField,
}

impl From<Row> for EditableRow {
    fn from(row: Row) -> Self {
        Self {
            key: TextField::new(row.key),
            value: TextField::new(row.value),
        }
    }
}

pub struct App {
    session: EditSession,
    settings: EditorSettings,
    filename: TextField,
    rows: Vec<EditableRow>,
    focus: Focus,
    status: Option<Status>,
}

impl App {
    pub fn new(session: EditSession, settings: EditorSettings) -> Self {
        let rows = session.rows().into_iter().map(EditableRow::from).collect();
        let filename = TextField::new(settings.file.to_string_lossy());
        let mut app = Self {
            session,
            settings,
            filename,
            rows,
            focus: Focus::Filename,
            status: None,
        };
        if !app.rows.is_empty() {
            app.focus = Focus::Value(0);
        }
        app
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn filename(&self) -> &TextField {
        &self.filename
    }

    pub fn editable_rows(&self) -> &[EditableRow] {
        &self.rows
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Snapshot of the visible rows, in display order
    pub fn rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .map(|row| Row::new(row.key.text(), row.value.text()))
            .collect()
    }

    /// Current validation problem with the destination filename, if any
    pub fn filename_error(&self) -> Option<ValidationError> {
        validate_destination(self.filename.text(), self.settings.empty_directory_policy).err()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if let Some(event) = command_for(&key) {
            return self.dispatch(event);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('d') if ctrl => self.delete_focused_row(),
            KeyCode::Up => self.move_vertical(-1),
            KeyCode::Down | KeyCode::Enter => self.move_vertical(1),
            KeyCode::Tab => self.move_horizontal(1),
            KeyCode::BackTab => self.move_horizontal(-1),
            _ => {
                if let Some(field) = self.focused_field() {
                    field.handle_key(&key);
                }
            }
        }
        Flow::Continue
    }

    /// Run a command against the session
    pub fn dispatch(&mut self, event: UiEvent) -> Flow {
        debug!("Dispatching {:?}", event);
        let flow = match event {
            UiEvent::SaveRequested => self.save(),
            UiEvent::AddRowRequested => self.add_row(),
            UiEvent::QuitRequested => self.quit(),
        };
        self.apply_signals();
        flow
    }

    /// Clear a success notification once it has been shown long enough
    pub fn tick(&mut self, now: Instant) {
        let expired = self.status.as_ref().is_some_and(|status| {
            status.kind == StatusKind::Success
                && now.duration_since(status.shown_at) >= self.settings.notification_timeout
        });
        if expired {
            self.status = None;
        }
    }

    fn save(&mut self) -> Flow {
        let Some(destination) = self.destination() else {
            return Flow::Continue;
        };
        let rows = self.rows();
        if let Err(err) = self.session.reconcile_and_save(&rows, &destination, true) {
            self.report_error(err);
        }
        Flow::Continue
    }

    fn add_row(&mut self) -> Flow {
        let Some(destination) = self.destination() else {
            return Flow::Continue;
        };
        let rows = self.rows();
        if let Err(err) = self.session.add_placeholder_row(&rows, &destination) {
            self.report_error(err);
        }
        Flow::Continue
    }

    fn quit(&mut self) -> Flow {
        let Some(destination) = self.destination() else {
            return Flow::Continue;
        };
        let rows = self.rows();
        match self.session.quit(&rows, &destination) {
            Ok(()) => Flow::Exit,
            Err(err) => {
                self.report_error(err);
                Flow::Continue
            }
        }
    }

    /// Validated save destination, or `None` after showing why it is invalid
    fn destination(&mut self) -> Option<PathBuf> {
        match self.filename_error() {
            None => Some(PathBuf::from(self.filename.text())),
            Some(err) => {
                self.set_status(StatusKind::Error, "Invalid filename", err.to_string());
                self.focus = Focus::Filename;
                None
            }
        }
    }

    fn apply_signals(&mut self) {
        for signal in self.session.drain_signals() {
            match signal {
                Signal::Saved { path } => self.set_status(
                    StatusKind::Success,
                    "Saved",
                    format!("Configuration saved to {} successfully.", path.display()),
                ),
                Signal::Rerender => {
                    self.rows = self
                        .session
                        .rows()
                        .into_iter()
                        .map(EditableRow::from)
                        .collect();
                    self.focus = match self.rows.len() {
                        0 => Focus::Filename,
                        len => Focus::Key(len - 1),
                    };
                }
            }
        }
    }

    fn report_error(&mut self, err: SessionError) {
        self.set_status(StatusKind::Error, "Save failed", err.to_string());
    }

    fn set_status(&mut self, kind: StatusKind, title: &'static str, message: String) {
        self.status = Some(Status {
            kind,
            title,
            message,
            shown_at: Instant::now(),
        });
    }

    fn focused_field(&mut self) -> Option<&mut TextField> {
        match self.focus {
            Focus::Filename => Some(&mut self.filename),
            Focus::Key(i) => self.rows.get_mut(i).map(|row| &mut row.key),
            Focus::Value(i) => self.rows.get_mut(i).map(|row| &mut row.value),
        }
    }

    /// Move between the filename field and the rows, keeping the column
    fn move_vertical(&mut self, delta: isize) {
        let last = self.rows.len() as isize - 1;
        let (line, on_key) = match self.focus {
            Focus::Filename => (-1, false),
            Focus::Key(i) => (i as isize, true),
            Focus::Value(i) => (i as isize, false),
        };

        let target = (line + delta).clamp(-1, last.max(-1));
        self.focus = match target {
            -1 => Focus::Filename,
            i if on_key => Focus::Key(i as usize),
            i => Focus::Value(i as usize),
        };
    }

    /// Step through cells in reading order: filename, then key/value pairs
    fn move_horizontal(&mut self, delta: isize) {
        let cells = 1 + 2 * self.rows.len() as isize;
        let current = match self.focus {
            Focus::Filename => 0,
            Focus::Key(i) => 1 + 2 * i as isize,
            Focus::Value(i) => 2 + 2 * i as isize,
        };

        let next = (current + delta).rem_euclid(cells);
        self.focus = match next {
            0 => Focus::Filename,
            n if n % 2 == 1 => Focus::Key(((n - 1) / 2) as usize),
            n => Focus::Value(((n - 2) / 2) as usize),
        };
    }

    /// Drop the focused row from the visible rows
    ///
    /// The entry leaves the file at the next save.
    fn delete_focused_row(&mut self) {
        let index = match self.focus {
            Focus::Filename => return,
            Focus::Key(i) | Focus::Value(i) => i,
        };
        if index >= self.rows.len() {
            return;
        }

        self.rows.remove(index);
        self.focus = if self.rows.is_empty() {
            Focus::Filename
        } else {
            let i = index.min(self.rows.len() - 1);
            match self.focus {
                Focus::Key(_) => Focus::Key(i),
                _ => Focus::Value(i),
            }
        };
    }
}
