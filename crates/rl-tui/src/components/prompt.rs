//! Prompt bar component.
//!
//! Shown in the footer while the filter or search field is being edited.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::theme::Theme;

/// Footer line with a prompt, the field text, and a cursor.
pub struct PromptBar<'a> {
    prompt: String,
    field: &'a str,
    invalid: bool,
    theme: &'a Theme,
}

impl<'a> PromptBar<'a> {
    /// Creates a prompt bar.
    ///
    /// `invalid` marks a field that does not compile as a regex.
    #[must_use]
    pub const fn new(prompt: String, field: &'a str, invalid: bool, theme: &'a Theme) -> Self {
        Self {
            prompt,
            field,
            invalid,
            theme,
        }
    }

    fn build_line(&self) -> Line<'_> {
        let field_style = if self.invalid {
            self.theme.error_style()
        } else {
            self.theme.base_style()
        };

        Line::from(vec![
            Span::styled(self.prompt.as_str(), self.theme.prompt_style),
            Span::styled(self.field, field_style),
            Span::styled("▌", self.theme.prompt_style),
        ])
    }
}

impl Widget for &PromptBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_line())
            .style(self.theme.status_bar_style)
            .render(area, buf);
    }
}
