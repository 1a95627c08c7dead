//! Status bar component.
//!
//! Displays the focus mode, status messages, and filter/search summaries.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::app::App;
use crate::theme::Theme;

/// The status bar component.
///
/// Displays:
/// - Current focus mode
/// - Status message (if any)
/// - Active filter and search patterns
/// - Visible line count and scroll position
pub struct StatusBar<'a> {
    app: &'a App,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    /// Creates a new status bar.
    #[must_use]
    pub const fn new(app: &'a App, theme: &'a Theme) -> Self {
        Self { app, theme }
    }

    fn build_line(&self) -> Line<'a> {
        let viewer = &self.app.viewer;
        let mut spans = vec![
            Span::styled(
                format!(" {} ", viewer.focus().label()),
                Style::default()
                    .fg(Color::Black)
                    .bg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ];

        if let Some(ref status) = self.app.status {
            let style = if status.is_error {
                self.theme.error_style()
            } else {
                self.theme.base_style()
            };
            spans.push(Span::styled(status.text.clone(), style));
            spans.push(Span::raw(" │ "));
        }

        let filter = viewer.filter();
        if !filter.is_empty() {
            let style = if filter.is_invalid() {
                self.theme.error_style()
            } else {
                self.theme.base_style()
            };
            spans.push(Span::styled("filter ", self.theme.dimmed_style()));
            spans.push(Span::styled(format!("/{}/", filter.as_str()), style));
            spans.push(Span::raw(" │ "));
        }

        let search = viewer.search();
        if !search.is_empty() {
            spans.push(Span::styled("search ", self.theme.dimmed_style()));
            spans.push(Span::styled(
                format!(
                    "{}/{}",
                    viewer.active_index().map_or(0, |a| a + 1),
                    viewer.matches().len()
                ),
                self.theme.base_style(),
            ));
            spans.push(Span::raw(" │ "));
        }

        let shown = viewer.filtered_indices().len();
        let total = viewer.rows().len();
        let position = if viewer.is_at_bottom() {
            "bottom".to_owned()
        } else {
            format!("line {}", viewer.scroll() + 1)
        };
        spans.push(Span::styled(
            format!("{shown}/{total} lines │ {position}"),
            self.theme.dimmed_style(),
        ));

        Line::from(spans)
    }
}

impl Widget for &StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_line())
            .style(self.theme.status_bar_style)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rl_core::{BusEvent, EventBus};

    use super::*;
    use crate::app::StatusMessage;

    fn text(bar: &StatusBar<'_>) -> String {
        bar.build_line()
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect()
    }

    fn app_with_output() -> App {
        let mut app = App::new("make", Arc::new(EventBus::new()));
        app.set_body_size(40, 2);
        app.handle_bus_event(BusEvent::Output("ok\nerror one\nok\nerror two\n".into()));
        app
    }

    #[test]
    fn test_idle_status() {
        let theme = Theme::dark();
        let app = app_with_output();
        let bar = StatusBar::new(&app, &theme);

        insta::assert_snapshot!(text(&bar).trim(), @"VIEW  4/4 lines │ bottom");
    }

    #[test]
    fn test_filter_and_search_summary() {
        let theme = Theme::dark();
        let mut app = app_with_output();
        app.viewer.set_filter("error");
        app.viewer.set_search("o");
        app.status = Some(StatusMessage::info("Restarting"));
        let bar = StatusBar::new(&app, &theme);

        let line = text(&bar);
        assert!(line.contains("Restarting"));
        assert!(line.contains("filter /error/"));
        assert!(line.contains("search 4/4"));
        assert!(line.contains("2/4 lines"));
    }

    #[test]
    fn test_scrolled_position() {
        let theme = Theme::dark();
        let mut app = app_with_output();
        app.viewer.go_to_top();
        let bar = StatusBar::new(&app, &theme);

        assert!(text(&bar).ends_with("line 1"));
    }
}
