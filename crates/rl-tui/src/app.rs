//! Application state and input handling.
//!
//! This module provides the [`App`] struct which owns the [`Viewer`] and
//! everything the renderer shows around it. It turns terminal input into
//! [`Action`]s, applies them, and folds bus and change events into the
//! viewer.
//!
//! # Architecture
//!
//! ```text
//! App
//!  ├── viewer: Viewer             # Lines, filter, search, scroll, focus
//!  ├── bus: Arc<EventBus>         # Restart requests go out here
//!  ├── state: ProcessState        # Mirrored from bus lifecycle events
//!  ├── watched: Vec<Utf8PathBuf>  # Shown in the header
//!  └── status: Option<StatusMessage>
//! ```

use std::sync::Arc;
use std::time::Instant;

use camino::Utf8PathBuf;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use rl_core::{BusEvent, EventBus};
use rl_runner::ProcessState;
use rl_watcher::{ChangeEvent, WatchError};
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::viewer::{FocusMode, Viewer, WHEEL_LINES};

/// A transient message for the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// The message text.
    pub text: String,

    /// When the message was created.
    pub timestamp: Instant,

    /// Whether this is an error message.
    pub is_error: bool,
}

impl StatusMessage {
    /// Creates a new info message.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Instant::now(),
            is_error: false,
        }
    }

    /// Creates a new error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Instant::now(),
            is_error: true,
        }
    }

    /// Returns `true` if the message should be auto-hidden.
    ///
    /// Messages are hidden after 5 seconds.
    #[must_use]
    pub fn should_hide(&self) -> bool {
        self.timestamp.elapsed().as_secs() > 5
    }
}

/// The main application state.
pub struct App {
    /// The output viewer.
    pub viewer: Viewer,

    /// Bus used to request restarts.
    bus: Arc<EventBus>,

    /// The command line, for the header.
    pub command: String,

    /// Last known state of the supervised process.
    pub state: ProcessState,

    /// Paths being watched, for the header.
    pub watched: Vec<Utf8PathBuf>,

    /// Status message to display.
    pub status: Option<StatusMessage>,

    /// Whether the application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the application for `command`, publishing restart requests
    /// on `bus`.
    #[must_use]
    pub fn new(command: impl Into<String>, bus: Arc<EventBus>) -> Self {
        Self {
            viewer: Viewer::default(),
            bus,
            command: command.into(),
            state: ProcessState::Idle,
            watched: Vec::new(),
            status: None,
            should_quit: false,
        }
    }

    /// Sets the watched paths shown in the header.
    #[must_use]
    pub fn with_watched(mut self, watched: Vec<Utf8PathBuf>) -> Self {
        self.watched = watched;
        self
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handles a key event and returns the resulting action.
    #[must_use]
    pub fn handle_key(&self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match self.viewer.focus() {
            FocusMode::Viewing => Self::handle_viewing_key(key, ctrl),
            FocusMode::EditingFilter | FocusMode::EditingSearch => {
                Self::handle_editing_key(key, ctrl)
            }
            FocusMode::HelpOverlay => Self::handle_help_key(key),
        }
    }

    fn handle_viewing_key(key: KeyEvent, ctrl: bool) -> Action {
        if ctrl {
            return match key.code {
                KeyCode::Char('r') => Action::Restart,
                KeyCode::Char('u') => Action::HalfPageUp,
                KeyCode::Char('d') => Action::HalfPageDown,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('f') => Action::EnterFilterMode,
            KeyCode::Char('/') => Action::EnterSearchMode,
            KeyCode::Char('n') => Action::NextMatch,
            KeyCode::Char('N') => Action::PreviousMatch,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp(1),
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown(1),
            KeyCode::PageUp => Action::PageUp,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::Char('g') | KeyCode::Home => Action::ScrollTop,
            KeyCode::Char('G') | KeyCode::End => Action::ScrollBottom,
            _ => Action::None,
        }
    }

    fn handle_editing_key(key: KeyEvent, ctrl: bool) -> Action {
        if ctrl {
            return match key.code {
                KeyCode::Char('r') => Action::Restart,
                KeyCode::Char('u') => Action::ClearField,
                KeyCode::Char('d') => Action::HalfPageDown,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Esc => Action::CancelEdit,
            KeyCode::Enter => Action::CommitEdit,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::None,
        }
    }

    fn handle_help_key(key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => Action::HideHelp,
            _ => Action::None,
        }
    }

    /// Handles a mouse event and returns the resulting action.
    #[must_use]
    pub fn handle_mouse(&self, event: MouseEvent) -> Action {
        if self.viewer.focus().is_overlay() {
            return Action::None;
        }
        match event.kind {
            MouseEventKind::ScrollUp => Action::ScrollUp(WHEEL_LINES),
            MouseEventKind::ScrollDown => Action::ScrollDown(WHEEL_LINES),
            _ => Action::None,
        }
    }

    /// Handles pasted text and returns the resulting action.
    #[must_use]
    pub fn handle_paste(&self, text: String) -> Action {
        if self.viewer.focus().is_editing() {
            Action::Paste(text)
        } else {
            Action::None
        }
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Updates the application state based on an action.
    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Restart => self.request_restart(),

            Action::ScrollUp(lines) => self.viewer.scroll_up(lines),
            Action::ScrollDown(lines) => self.viewer.scroll_down(lines),
            Action::HalfPageUp => self.viewer.half_page_up(),
            Action::HalfPageDown => self.viewer.half_page_down(),
            Action::PageUp => self.viewer.page_up(),
            Action::PageDown => self.viewer.page_down(),
            Action::ScrollTop => self.viewer.go_to_top(),
            Action::ScrollBottom => self.viewer.go_to_bottom(),

            Action::NextMatch => self.viewer.next_match(),
            Action::PreviousMatch => self.viewer.previous_match(),

            Action::EnterFilterMode => {
                self.viewer.start_filter();
            }
            Action::EnterSearchMode => {
                self.viewer.start_search();
            }
            Action::CancelEdit => self.viewer.cancel_edit(),
            Action::CommitEdit => self.viewer.commit_edit(),
            Action::InputChar(c) => self.viewer.insert_char(c),
            Action::Paste(text) => self.viewer.insert_str(&text),
            Action::Backspace => self.viewer.backspace(),
            Action::ClearField => self.viewer.clear_field(),

            Action::ToggleHelp => {
                self.viewer.toggle_help();
            }
            Action::HideHelp => self.viewer.hide_help(),

            Action::Tick => self.tick(),
            Action::Render | Action::None => {}
        }
    }

    /// Handles a tick event (periodic update).
    pub fn tick(&mut self) {
        if self.status.as_ref().is_some_and(StatusMessage::should_hide) {
            self.status = None;
        }
    }

    fn request_restart(&mut self) {
        info!("Manual restart requested");
        self.status = Some(StatusMessage::info("Restarting"));
        self.bus.request_restart();
    }

    // =========================================================================
    // External Events
    // =========================================================================

    /// Folds a bus event into the viewer.
    pub fn handle_bus_event(&mut self, event: BusEvent) {
        match event {
            BusEvent::Started(command) => {
                self.state = ProcessState::Running;
                self.viewer.clear();
                self.viewer.push_line(&format!("Starting {command}"));
            }
            BusEvent::Output(chunk) => self.viewer.append(&chunk),
            BusEvent::Error(message) => {
                self.state = ProcessState::Errored;
                self.viewer.push_line(&format!("Error: {message}"));
                self.status = Some(StatusMessage::error(message));
            }
            BusEvent::Killed => {
                self.state = ProcessState::Stopping;
                self.viewer.push_line("Killing process");
            }
            BusEvent::Stopped => {
                self.state = ProcessState::Stopped;
                self.viewer.push_line("Process exited");
            }
            BusEvent::RequestRestart => {}
            other => debug!(kind = other.kind(), "Ignoring bus event"),
        }
    }

    /// Turns a qualifying file change into a change line and a restart
    /// request.
    pub fn handle_change(&mut self, event: &ChangeEvent) {
        if !event.triggers_restart() {
            debug!(path = %event.path, kind = %event.kind, "Change does not trigger a restart");
            return;
        }

        info!(path = %event.path, kind = %event.kind, "Change detected");
        self.viewer
            .push_line(&format!("Change detected[{}]: {}", event.kind, event.path));
        self.bus.request_restart();
    }

    /// Reports watch paths that could not be watched.
    pub fn report_skipped(&mut self, skipped: &[WatchError]) {
        if skipped.is_empty() {
            return;
        }
        for err in skipped {
            warn!(error = %err, "Watch path skipped");
            self.viewer.push_line(&format!("Error: {err}"));
        }
        self.status = Some(StatusMessage::error(format!(
            "{} watch path(s) skipped",
            skipped.len()
        )));
    }

    /// Sizes the viewer to the body area.
    pub fn set_body_size(&mut self, width: u16, height: u16) {
        self.viewer
            .resize(usize::from(width), usize::from(height));
    }
}
