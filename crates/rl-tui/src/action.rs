//! User actions for the TUI.
//!
//! This module defines the [`Action`] enum representing all user-initiated
//! actions. Actions are the result of processing input events and are used
//! to update application state.
//!
//! # Action Flow
//!
//! ```text
//! Key/Mouse/Paste Event → App::handle_* → Action → App::update → Viewer
//! ```

/// User-initiated actions in the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Action {
    // =========================================================================
    // Scrolling
    // =========================================================================
    /// Scroll up by a number of lines.
    ScrollUp(usize),

    /// Scroll down by a number of lines.
    ScrollDown(usize),

    /// Scroll up by half a page.
    HalfPageUp,

    /// Scroll down by half a page.
    HalfPageDown,

    /// Scroll up by a page.
    PageUp,

    /// Scroll down by a page.
    PageDown,

    /// Jump to the first line.
    ScrollTop,

    /// Jump to the last line.
    ScrollBottom,

    // =========================================================================
    // Search
    // =========================================================================
    /// Move to the next search match.
    NextMatch,

    /// Move to the previous search match.
    PreviousMatch,

    // =========================================================================
    // Field Editing
    // =========================================================================
    /// Start editing the filter pattern.
    EnterFilterMode,

    /// Start editing the search pattern.
    EnterSearchMode,

    /// Leave the field and clear its pattern.
    CancelEdit,

    /// Leave the field and keep its pattern.
    CommitEdit,

    /// Type a character.
    InputChar(char),

    /// Insert pasted text.
    Paste(String),

    /// Delete the last character.
    Backspace,

    /// Clear the whole field.
    ClearField,

    // =========================================================================
    // UI State
    // =========================================================================
    /// Toggle the help overlay.
    ToggleHelp,

    /// Hide the help overlay.
    HideHelp,

    // =========================================================================
    // Application Control
    // =========================================================================
    /// Restart the command.
    Restart,

    /// Stop the command and quit.
    Quit,

    /// Render the UI.
    Render,

    /// Tick (periodic update).
    Tick,

    /// No operation.
    #[default]
    None,
}

impl Action {
    /// Returns `true` if this action requires a re-render.
    #[must_use]
    pub const fn needs_render(&self) -> bool {
        !matches!(self, Self::None | Self::Tick)
    }

    /// Returns `true` if this is a scrolling action.
    #[must_use]
    pub const fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ScrollUp(_)
                | Self::ScrollDown(_)
                | Self::HalfPageUp
                | Self::HalfPageDown
                | Self::PageUp
                | Self::PageDown
                | Self::ScrollTop
                | Self::ScrollBottom
                | Self::NextMatch
                | Self::PreviousMatch
        )
    }

    /// Returns `true` if this action edits a pattern field.
    #[must_use]
    pub const fn is_edit(&self) -> bool {
        matches!(
            self,
            Self::EnterFilterMode
                | Self::EnterSearchMode
                | Self::CancelEdit
                | Self::CommitEdit
                | Self::InputChar(_)
                | Self::Paste(_)
                | Self::Backspace
                | Self::ClearField
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_needs_render() {
        assert!(Action::NextMatch.needs_render());
        assert!(Action::ToggleHelp.needs_render());
        assert!(!Action::None.needs_render());
        assert!(!Action::Tick.needs_render());
    }

    #[test]
    fn test_action_is_navigation() {
        assert!(Action::ScrollUp(3).is_navigation());
        assert!(Action::HalfPageDown.is_navigation());
        assert!(Action::PreviousMatch.is_navigation());

        assert!(!Action::Quit.is_navigation());
        assert!(!Action::ToggleHelp.is_navigation());
    }

    #[test]
    fn test_action_is_edit() {
        assert!(Action::EnterFilterMode.is_edit());
        assert!(Action::InputChar('x').is_edit());
        assert!(Action::Paste("abc".to_owned()).is_edit());

        assert!(!Action::ScrollTop.is_edit());
        assert!(!Action::Restart.is_edit());
    }

    #[test]
    fn test_action_default() {
        assert_eq!(Action::default(), Action::None);
    }
}
