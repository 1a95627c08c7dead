//! Help panel component.
//!
//! Displays a modal overlay with the key bindings.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Clear, Row, Table, Widget};

use crate::theme::Theme;

/// Key binding definition for the help panel.
struct KeyBinding {
    /// The key(s) to press.
    key: &'static str,
    /// Description of what the key does.
    description: &'static str,
}

/// Bindings available while viewing output.
const GENERAL: &[KeyBinding] = &[
    KeyBinding {
        key: "f",
        description: "filter",
    },
    KeyBinding {
        key: "/",
        description: "search",
    },
    KeyBinding {
        key: "ctrl+u",
        description: "scroll up",
    },
    KeyBinding {
        key: "ctrl+d",
        description: "scroll down",
    },
    KeyBinding {
        key: "ctrl+r",
        description: "restart the command",
    },
    KeyBinding {
        key: "ctrl+c",
        description: "quit",
    },
    KeyBinding {
        key: "n",
        description: "next match",
    },
    KeyBinding {
        key: "N",
        description: "previous match",
    },
    KeyBinding {
        key: "j / k",
        description: "scroll one line",
    },
    KeyBinding {
        key: "g / G",
        description: "top / bottom",
    },
];

/// Bindings available while editing the filter or search.
const EDITING: &[KeyBinding] = &[
    KeyBinding {
        key: "esc",
        description: "cancel",
    },
    KeyBinding {
        key: "enter",
        description: "accept",
    },
    KeyBinding {
        key: "ctrl+u",
        description: "clear field",
    },
    KeyBinding {
        key: "ctrl+d",
        description: "scroll down",
    },
];

/// A help panel overlay widget.
pub struct HelpPanel<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPanel<'a> {
    /// Creates a new help panel.
    #[must_use]
    pub const fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Rows needed to show every binding inside the border.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn height() -> u16 {
        // Two section titles, one gap, the footer, and the border.
        (GENERAL.len() + EDITING.len() + 6) as u16
    }

    fn section_row(&self, title: &'static str) -> Row<'static> {
        Row::new(vec![Cell::from(Span::styled(
            title,
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ))])
    }

    fn binding_rows(&self, bindings: &'static [KeyBinding]) -> impl Iterator<Item = Row<'static>> {
        let key_style = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let description_style = self.theme.base_style();

        bindings.iter().map(move |binding| {
            Row::new(vec![
                Cell::from(Span::styled(format!("[{}]", binding.key), key_style)),
                Cell::from(Span::styled(binding.description, description_style)),
            ])
        })
    }

    fn build_rows(&self) -> Vec<Row<'static>> {
        let mut rows = vec![self.section_row("General")];
        rows.extend(self.binding_rows(GENERAL));
        rows.push(Row::new(vec![Cell::from("")]));
        rows.push(self.section_row("Search/Filter"));
        rows.extend(self.binding_rows(EDITING));
        rows.push(Row::new(vec![
            Cell::from(Span::styled("This help", self.theme.dimmed_style())),
            Cell::from(Span::styled("[esc] exit", self.theme.dimmed_style())),
        ]));
        rows
    }
}

impl Widget for &HelpPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style)
            .title(Span::styled(" Help ", self.theme.title_style))
            .style(Style::default().bg(self.theme.overlay_bg));

        let widths = [Constraint::Length(12), Constraint::Min(20)];

        Table::new(self.build_rows(), widths)
            .block(block)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_key_bindings_not_empty() {
        assert!(!GENERAL.is_empty());
        assert!(!EDITING.is_empty());
    }

    #[test]
    fn test_height_fits_rows() {
        let theme = Theme::dark();
        let panel = HelpPanel::new(&theme);
        assert_eq!(usize::from(HelpPanel::height()), panel.build_rows().len() + 2);
    }

    #[test]
    fn test_render_lists_sections() {
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(40, HelpPanel::height())).unwrap();
        terminal
            .draw(|frame| frame.render_widget(&HelpPanel::new(&theme), frame.area()))
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("General"));
        assert!(text.contains("Search/Filter"));
        assert!(text.contains("[ctrl+r]"));
        assert!(text.contains("restart the command"));
        assert!(text.contains("[esc] exit"));
    }
}
