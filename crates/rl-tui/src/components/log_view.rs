//! Log view component.
//!
//! Renders the viewer's visible rows, styling search matches.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::theme::Theme;
use crate::viewer::{Viewer, segments};

/// The scrolling output body.
pub struct LogView<'a> {
    viewer: &'a Viewer,
    theme: &'a Theme,
}

impl<'a> LogView<'a> {
    /// Creates a log view over `viewer`.
    #[must_use]
    pub const fn new(viewer: &'a Viewer, theme: &'a Theme) -> Self {
        Self { viewer, theme }
    }

    /// Styled lines for the rows inside the scroll window.
    pub fn lines(&self) -> Vec<Line<'static>> {
        self.viewer
            .visible_lines()
            .iter()
            .map(|decorated| {
                let spans: Vec<Span<'static>> = segments(decorated)
                    .into_iter()
                    .map(|(segment, text)| {
                        Span::styled(text.to_owned(), self.theme.segment_style(segment))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for &LogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines())
            .style(self.theme.base_style())
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    #[test]
    fn test_lines_follow_scroll_window() {
        let theme = Theme::dark();
        let mut viewer = Viewer::new(20, 2);
        viewer.append("one\ntwo\nthree\n");

        let view = LogView::new(&viewer, &theme);
        let lines = view.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "two");
        assert_eq!(lines[1].spans[0].content, "three");
    }

    #[test]
    fn test_matches_are_styled() {
        let theme = Theme::dark();
        let mut viewer = Viewer::new(20, 5);
        viewer.append("a err b err\n");
        viewer.set_search("err");

        let view = LogView::new(&viewer, &theme);
        let lines = view.lines();
        let styles: Vec<_> = lines[0]
            .spans
            .iter()
            .map(|s| (s.content.as_ref(), s.style))
            .collect();

        assert_eq!(
            styles,
            [
                ("a ", theme.base_style()),
                ("err", theme.match_style),
                (" b ", theme.base_style()),
                ("err", theme.active_match_style),
            ]
        );
    }

    #[test]
    fn test_render_to_buffer() {
        let theme = Theme::dark();
        let mut viewer = Viewer::new(10, 3);
        viewer.append("hello\nworld\n");

        let mut terminal = Terminal::new(TestBackend::new(10, 3)).unwrap();
        terminal
            .draw(|frame| frame.render_widget(&LogView::new(&viewer, &theme), frame.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..5).map(|x| buffer[(x, 1)].symbol()).collect();
        assert_eq!(row, "world");
    }
}
