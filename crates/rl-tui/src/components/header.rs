//! Header bar component.
//!
//! Displays the application title, the command, its state, and what is
//! being watched.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::app::App;
use crate::theme::Theme;

/// The header bar component.
///
/// Displays:
/// - Application title
/// - Command line
/// - Process state
/// - Watched path count
/// - Help indicator
pub struct HeaderBar<'a> {
    app: &'a App,
    theme: &'a Theme,
}

impl<'a> HeaderBar<'a> {
    /// Creates a new header bar.
    #[must_use]
    pub const fn new(app: &'a App, theme: &'a Theme) -> Self {
        Self { app, theme }
    }

    fn build_line(&self) -> Line<'a> {
        let mut spans = vec![
            Span::styled(" reloop ", self.theme.title_style),
            Span::raw(" "),
            Span::raw(self.app.command.as_str()),
            Span::raw(" │ "),
            Span::styled(
                self.app.state.label(),
                self.theme.state_style(self.app.state),
            ),
        ];

        if !self.app.watched.is_empty() {
            spans.push(Span::raw(" │ "));
            spans.push(Span::styled(
                watched_label(self.app.watched.len()),
                self.theme.dimmed_style(),
            ));
        }

        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("? help", self.theme.dimmed_style()));

        Line::from(spans)
    }
}

fn watched_label(count: usize) -> String {
    if count == 1 {
        "watching 1 path".to_owned()
    } else {
        format!("watching {count} paths")
    }
}

impl Widget for &HeaderBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_line())
            .style(self.theme.header_style)
            .render(area, buf);
    }
}
