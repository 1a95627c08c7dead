//! Theme and styling for the TUI.
//!
//! This module provides the [`Theme`] struct for managing colors and styles
//! throughout the terminal interface. It supports both dark and light color
//! schemes.
//!
//! # Example
//!
//! ```
//! use rl_tui::Theme;
//! use rl_runner::ProcessState;
//!
//! let theme = Theme::dark();
//! let style = theme.state_style(ProcessState::Running);
//! ```

use ratatui::style::{Color, Modifier, Style};
use rl_core::ColorScheme;
use rl_runner::ProcessState;

use crate::viewer::Segment;

/// Theme configuration for the TUI.
///
/// Use [`Theme::dark()`] or [`Theme::light()`] to get predefined themes,
/// or [`Theme::from_scheme()`] to create a theme based on configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // =========================================================================
    // Process State Colors
    // =========================================================================
    /// Foreground color while the command runs.
    pub running_fg: Color,

    /// Foreground color once the command exited.
    pub exited_fg: Color,

    /// Foreground color when the command failed to start.
    pub failed_fg: Color,

    // =========================================================================
    // Base Colors
    // =========================================================================
    /// Primary foreground color.
    pub fg: Color,

    /// Dimmed/secondary text color.
    pub dimmed_fg: Color,

    /// Accent color for highlights.
    pub accent: Color,

    /// Error/warning color.
    pub error_fg: Color,

    /// Background of the help overlay.
    pub overlay_bg: Color,

    // =========================================================================
    // Component Styles
    // =========================================================================
    /// Style for the title block of the header.
    pub title_style: Style,

    /// Style for the rest of the header bar.
    pub header_style: Style,

    /// Style for the status bar.
    pub status_bar_style: Style,

    /// Style for the filter/search prompt.
    pub prompt_style: Style,

    /// Style for a search match.
    pub match_style: Style,

    /// Style for the active search match.
    pub active_match_style: Style,

    /// Style for overlay borders.
    pub border_style: Style,
}

impl Theme {
    /// Creates a dark theme (light text on dark background).
    ///
    /// This is the default theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            running_fg: Color::Rgb(100, 220, 100),
            exited_fg: Color::Rgb(128, 128, 128),
            failed_fg: Color::Rgb(255, 80, 80),

            fg: Color::Rgb(220, 220, 220),
            dimmed_fg: Color::Rgb(128, 128, 128),
            accent: Color::Rgb(100, 150, 255),
            error_fg: Color::Rgb(255, 80, 80),
            overlay_bg: Color::Rgb(40, 40, 50),

            title_style: Style::default()
                .fg(Color::White)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            header_style: Style::default()
                .fg(Color::Rgb(220, 220, 220))
                .bg(Color::Rgb(40, 40, 50)),
            status_bar_style: Style::default()
                .fg(Color::Rgb(180, 180, 180))
                .bg(Color::Rgb(40, 40, 50)),
            prompt_style: Style::default()
                .fg(Color::Rgb(100, 150, 255))
                .add_modifier(Modifier::BOLD),
            match_style: Style::default().fg(Color::White).bg(Color::Rgb(215, 135, 0)),
            active_match_style: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(200, 40, 40))
                .add_modifier(Modifier::BOLD),
            border_style: Style::default().fg(Color::Rgb(100, 150, 255)),
        }
    }

    /// Creates a light theme (dark text on light background).
    #[must_use]
    pub fn light() -> Self {
        Self {
            running_fg: Color::Rgb(30, 130, 30),
            exited_fg: Color::Rgb(100, 100, 100),
            failed_fg: Color::Rgb(180, 50, 50),

            fg: Color::Rgb(30, 30, 30),
            dimmed_fg: Color::Rgb(100, 100, 100),
            accent: Color::Rgb(50, 100, 200),
            error_fg: Color::Rgb(180, 50, 50),
            overlay_bg: Color::Rgb(230, 230, 235),

            title_style: Style::default()
                .fg(Color::White)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            header_style: Style::default()
                .fg(Color::Rgb(30, 30, 30))
                .bg(Color::Rgb(220, 220, 230)),
            status_bar_style: Style::default()
                .fg(Color::Rgb(60, 60, 60))
                .bg(Color::Rgb(220, 220, 230)),
            prompt_style: Style::default()
                .fg(Color::Rgb(50, 100, 200))
                .add_modifier(Modifier::BOLD),
            match_style: Style::default().fg(Color::Black).bg(Color::Rgb(255, 190, 90)),
            active_match_style: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(190, 30, 30))
                .add_modifier(Modifier::BOLD),
            border_style: Style::default().fg(Color::Rgb(50, 100, 200)),
        }
    }

    /// Creates a theme from a [`ColorScheme`] configuration.
    ///
    /// If the scheme is [`ColorScheme::Auto`], defaults to dark theme.
    #[must_use]
    pub fn from_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Returns the style for a process state label.
    #[must_use]
    pub fn state_style(&self, state: ProcessState) -> Style {
        let color = match state {
            ProcessState::Running | ProcessState::Starting => self.running_fg,
            ProcessState::Errored => self.failed_fg,
            ProcessState::Idle | ProcessState::Stopping | ProcessState::Stopped => self.exited_fg,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Returns the style for a run of decorated output.
    #[must_use]
    pub fn segment_style(&self, segment: Segment) -> Style {
        match segment {
            Segment::Plain => self.base_style(),
            Segment::Match => self.match_style,
            Segment::Active => self.active_match_style,
        }
    }

    /// Returns a style with the base foreground color.
    #[must_use]
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Returns a style for dimmed/secondary text.
    #[must_use]
    pub fn dimmed_style(&self) -> Style {
        Style::default().fg(self.dimmed_fg)
    }

    /// Returns a style for error text.
    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error_fg)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
