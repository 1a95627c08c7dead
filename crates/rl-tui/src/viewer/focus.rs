//! Input focus of the viewer.

use std::fmt;

/// What keystrokes currently drive.
///
/// ```text
///            f            /
/// Editing ◄──── Viewing ────► Editing
/// Filter  ────►    │  ▲ ◄──── Search
///   Esc/Enter    ? │  │ Esc/?     Esc/Enter
///                  ▼  │
///              HelpOverlay
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FocusMode {
    /// Scrolling and navigating matches.
    #[default]
    Viewing,
    /// Typing a filter pattern.
    EditingFilter,
    /// Typing a search pattern.
    EditingSearch,
    /// The key binding overlay is shown.
    HelpOverlay,
}

impl FocusMode {
    /// Returns `true` while a pattern field has the keyboard.
    #[inline]
    pub const fn is_editing(self) -> bool {
        matches!(self, Self::EditingFilter | Self::EditingSearch)
    }

    /// Returns `true` while the help overlay is shown.
    #[inline]
    pub const fn is_overlay(self) -> bool {
        matches!(self, Self::HelpOverlay)
    }

    /// Short label for the footer.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Viewing => "VIEW",
            Self::EditingFilter => "FILTER",
            Self::EditingSearch => "SEARCH",
            Self::HelpOverlay => "HELP",
        }
    }
}

impl fmt::Display for FocusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_viewing() {
        assert_eq!(FocusMode::default(), FocusMode::Viewing);
    }

    #[test]
    fn test_predicates() {
        assert!(FocusMode::EditingFilter.is_editing());
        assert!(FocusMode::EditingSearch.is_editing());
        assert!(!FocusMode::HelpOverlay.is_editing());
        assert!(FocusMode::HelpOverlay.is_overlay());
        assert!(!FocusMode::Viewing.is_overlay());
    }
}
