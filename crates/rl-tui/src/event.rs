//! Event types for the TUI event loop.
//!
//! This module provides the [`Event`] enum representing everything the
//! application loop reacts to.
//!
//! # Event Sources
//!
//! - **Terminal**: Key presses, mouse events, pastes, window resizing
//! - **Change source**: File change notifications from `rl-watcher`
//! - **Event bus**: Lifecycle and output events from the supervisor
//! - **Timer**: Periodic tick and render events

use crossterm::event::{KeyEvent, MouseEvent};
use rl_core::BusEvent;
use rl_watcher::ChangeEvent;

/// Events that can be processed by the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// A key press event from the terminal.
    Key(KeyEvent),

    /// A mouse event from the terminal.
    Mouse(MouseEvent),

    /// Text pasted into the terminal (bracketed paste).
    Paste(String),

    /// Terminal window was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// A watched file changed.
    FileChanged(ChangeEvent),

    /// An event published on the bus.
    Bus(BusEvent),

    /// Periodic tick for status expiry.
    ///
    /// The tick rate is configured via `TuiConfig::tick_rate_ms`.
    Tick,

    /// Signal to render a new frame.
    Render,

    /// Focus gained by the terminal window.
    FocusGained,

    /// Focus lost by the terminal window.
    FocusLost,
}

impl Event {
    /// Returns `true` if this is a key event.
    #[inline]
    #[must_use]
    pub const fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }

    /// Returns `true` if this is a file change event.
    #[inline]
    #[must_use]
    pub const fn is_file_changed(&self) -> bool {
        matches!(self, Self::FileChanged(_))
    }

    /// Returns `true` if this is a tick event.
    #[inline]
    #[must_use]
    pub const fn is_tick(&self) -> bool {
        matches!(self, Self::Tick)
    }

    /// Returns the key event if this is a Key variant.
    #[inline]
    #[must_use]
    pub const fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            Self::Key(key) => Some(key),
            _ => None,
        }
    }

    /// Returns the bus event if this is a Bus variant.
    #[inline]
    #[must_use]
    pub const fn as_bus(&self) -> Option<&BusEvent> {
        match self {
            Self::Bus(event) => Some(event),
            _ => None,
        }
    }
}

impl From<BusEvent> for Event {
    fn from(event: BusEvent) -> Self {
        Self::Bus(event)
    }
}

impl From<ChangeEvent> for Event {
    fn from(event: ChangeEvent) -> Self {
        Self::FileChanged(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use crossterm::event::{KeyCode, KeyModifiers};
    use rl_watcher::ChangeKind;

    #[test]
    fn test_event_is_key() {
        let key_event = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert!(key_event.is_key());
        assert!(!Event::Tick.is_key());
    }

    #[test]
    fn test_event_from_change() {
        let change = ChangeEvent::new(Utf8PathBuf::from("main.go"), ChangeKind::Write);
        let event = Event::from(change);
        assert!(event.is_file_changed());
        assert!(!Event::Tick.is_file_changed());
    }

    #[test]
    fn test_event_as_bus() {
        let event = Event::from(BusEvent::Stopped);
        assert_eq!(event.as_bus(), Some(&BusEvent::Stopped));
        assert!(Event::Render.as_bus().is_none());
    }

    #[test]
    fn test_event_as_key() {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let event = Event::Key(key);
        assert_eq!(event.as_key().map(|k| k.code), Some(KeyCode::Enter));
        assert!(Event::Tick.as_key().is_none());
        assert!(Event::Tick.is_tick());
    }
}
