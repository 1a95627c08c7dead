//! Main UI layout and rendering orchestration.
//!
//! This module provides the main [`render`] function that orchestrates
//! rendering of all UI components based on the current application state.
//!
//! # Layout Structure
//!
//! ```text
//! +------------------------------------------------------------------+
//! | reloop  go run . | running | watching 2 paths | ? help            |
//! +------------------------------------------------------------------+
//! | Starting go run .                                                |
//! | listening on :8080                                               |
//! | ...                                                              |
//! +------------------------------------------------------------------+
//! | VIEW  filter /err/ | 12/240 lines | bottom    (or the prompt)    |
//! +------------------------------------------------------------------+
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::App;
use crate::components::{HeaderBar, HelpPanel, LogView, PromptBar, StatusBar};
use crate::theme::Theme;
use crate::viewer::FocusMode;

const HELP_WIDTH: u16 = 44;

/// Splits the terminal into header, body, and footer.
fn split(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Output
            Constraint::Length(1), // Footer
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// The area the output body gets for a terminal of `area`.
///
/// The viewer and the pseudo-terminal are both sized to this.
#[must_use]
pub fn body_area(area: Rect) -> Rect {
    split(area)[1]
}

/// Renders the entire UI based on the current application state.
pub fn render(app: &App, frame: &mut Frame, theme: &Theme) {
    let area = frame.area();
    let [header_area, body, footer] = split(area);

    frame.render_widget(&HeaderBar::new(app, theme), header_area);
    frame.render_widget(&LogView::new(&app.viewer, theme), body);

    match app.viewer.prompt() {
        Some(prompt) => {
            let invalid = match app.viewer.focus() {
                FocusMode::EditingFilter => app.viewer.filter().is_invalid(),
                FocusMode::EditingSearch => app.viewer.search().is_invalid(),
                FocusMode::Viewing | FocusMode::HelpOverlay => false,
            };
            let bar = PromptBar::new(prompt, app.viewer.field(), invalid, theme);
            frame.render_widget(&bar, footer);
        }
        None => frame.render_widget(&StatusBar::new(app, theme), footer),
    }

    if app.viewer.focus() == FocusMode::HelpOverlay {
        let help_area = centered_rect(HELP_WIDTH, HelpPanel::height(), body);
        frame.render_widget(&HelpPanel::new(theme), help_area);
    }
}

/// Creates a rectangle of at most `width` x `height` cells centered in
/// `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use rl_core::{BusEvent, EventBus};

    use super::*;
    use crate::action::Action;

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect::<String>()
            .trim_end()
            .to_owned()
    }

    fn draw(app: &App) -> Buffer {
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        terminal.draw(|frame| render(app, frame, &theme)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn app() -> App {
        let mut app = App::new("make run", Arc::new(EventBus::new()));
        let body = body_area(Rect::new(0, 0, 60, 8));
        app.set_body_size(body.width, body.height);
        app
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 100);
        let centered = centered_rect(50, 20, area);

        assert_eq!(centered, Rect::new(25, 40, 50, 20));
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 2, 30, 10);
        let centered = centered_rect(50, 20, area);

        assert_eq!(centered, area);
    }

    #[test]
    fn test_body_area() {
        let body = body_area(Rect::new(0, 0, 80, 24));
        assert_eq!(body, Rect::new(0, 1, 80, 22));
    }

    #[test]
    fn test_render_layout() {
        let mut app = app();
        app.handle_bus_event(BusEvent::Started("make run".into()));
        app.handle_bus_event(BusEvent::Output("compiling\n".into()));

        let buffer = draw(&app);
        assert!(row(&buffer, 0).starts_with(" reloop  make run │ running"));
        assert_eq!(row(&buffer, 1), "Starting make run");
        assert_eq!(row(&buffer, 2), "compiling");
        assert!(row(&buffer, 7).contains("VIEW"));
    }

    #[test]
    fn test_render_prompt_while_editing() {
        let mut app = app();
        app.update(Action::EnterFilterMode);
        app.update(Action::InputChar('x'));

        let buffer = draw(&app);
        assert_eq!(row(&buffer, 7), "Filter > x▌");
    }

    #[test]
    fn test_render_help_overlay() {
        let mut app = app();
        app.update(Action::ToggleHelp);

        let buffer = draw(&app);
        let text: String = (0..8).map(|y| row(&buffer, y)).collect::<Vec<_>>().join("\n");
        assert!(text.contains("Help"));
        assert!(text.contains("HELP"));
    }
}
