//! The interactive viewer engine.
//!
//! A [`Viewer`] is a single-threaded reducer: every operation mutates the
//! line buffer or the user's patterns and then derives a fresh snapshot of
//! the filtered indices, the search matches, and the active match pointer.
//! It knows nothing about terminals, so it is tested without one.
//!
//! ```text
//! append ─► sanitize ─► wrap ─► rows
//!                                │
//!                 filter pattern ▼
//!                          filtered indices ─► search pattern ─► matches
//!                                │                                  │
//!                                ▼                                  ▼
//!                        scroll window ─────────► decorate ─► visible lines
//! ```

pub mod buffer;
pub mod decorate;
pub mod focus;
pub mod matcher;
pub mod sanitize;

pub use buffer::ContentBuffer;
pub use decorate::{Segment, decorate, segments};
pub use focus::FocusMode;
pub use matcher::{Pattern, SearchMatch};
pub use sanitize::Sanitizer;

/// Lines moved per mouse wheel notch.
pub const WHEEL_LINES: usize = 3;

/// Live output buffer with filter, search, and scroll state.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    buffer: ContentBuffer,
    sanitizer: Sanitizer,
    filter: Pattern,
    search: Pattern,
    filtered: Vec<usize>,
    matches: Vec<SearchMatch>,
    active: Option<usize>,
    scroll: usize,
    height: usize,
    focus: FocusMode,
    field: String,
}

impl Viewer {
    /// Creates an empty viewer for a body of `width` x `height` cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: ContentBuffer::new(width),
            height,
            ..Self::default()
        }
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Appends a chunk of process output.
    ///
    /// A chunk that does not end in a line break leaves the last line open
    /// for the next chunk. If the view was at the bottom it stays there.
    pub fn append(&mut self, chunk: &str) {
        let follow = self.is_at_bottom();
        let text = self.sanitizer.feed(chunk);
        self.buffer.push_str(&text);
        self.recompute();
        if follow {
            self.go_to_bottom();
        }
    }

    /// Appends a complete line of our own, such as a lifecycle notice.
    ///
    /// An open output line is ended first.
    pub fn push_line(&mut self, line: &str) {
        let follow = self.is_at_bottom();
        self.buffer.close_line();
        self.buffer.push_str(&sanitize::sanitize(line));
        self.buffer.push_str("\n");
        self.recompute();
        if follow {
            self.go_to_bottom();
        }
    }

    /// Drops all content and derived state. Patterns are kept.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.sanitizer.reset();
        self.active = None;
        self.scroll = 0;
        self.recompute();
    }

    /// Changes the body size, re-wrapping the buffer for the new width.
    pub fn resize(&mut self, width: usize, height: usize) {
        let follow = self.is_at_bottom();
        self.height = height;
        self.buffer.set_width(width);
        self.recompute();
        if follow {
            self.go_to_bottom();
        }
    }

    // =========================================================================
    // Filter & Search
    // =========================================================================

    /// Sets the filter pattern. An empty or invalid pattern shows every line.
    pub fn set_filter(&mut self, pattern: &str) {
        self.filter = Pattern::new(pattern);
        self.recompute();
        self.go_to_bottom();
    }

    /// Sets the search pattern. An empty or invalid pattern has no matches.
    ///
    /// The active match is kept while it is still in range; otherwise it
    /// moves to the last match.
    pub fn set_search(&mut self, pattern: &str) {
        self.search = Pattern::new(pattern);
        self.recompute();
        self.reveal_active();
    }

    /// Moves to the next match (towards the top), wrapping around.
    pub fn next_match(&mut self) {
        self.active = matcher::step_down(self.active, self.matches.len());
        self.reveal_active();
    }

    /// Moves to the previous match (towards the bottom), wrapping around.
    pub fn previous_match(&mut self) {
        self.active = matcher::step_up(self.active, self.matches.len());
        self.reveal_active();
    }

    fn recompute(&mut self) {
        let rows = self.buffer.rows();
        self.filtered = matcher::filter_indices(rows, &self.filter);
        self.matches = matcher::find_matches(rows, &self.filtered, &self.search);
        self.active = matcher::clamp_pointer(self.active, self.matches.len());
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn reveal_active(&mut self) {
        if let Some(position) = self
            .active_match()
            .and_then(|m| self.position_of(m.line_index))
        {
            self.go_to_line(position);
        }
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Scrolls so that filtered position `target` is visible, moving as
    /// little as possible.
    pub fn go_to_line(&mut self, target: usize) {
        let height = self.height.max(1);
        if target < self.scroll {
            self.scroll = target;
        } else if target >= self.scroll + height {
            self.scroll = target + 1 - height;
        }
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Scrolls up by `lines`.
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scrolls down by `lines`.
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.max_scroll());
    }

    /// Scrolls up by half a page.
    pub fn half_page_up(&mut self) {
        self.scroll_up(self.half_page());
    }

    /// Scrolls down by half a page.
    pub fn half_page_down(&mut self) {
        self.scroll_down(self.half_page());
    }

    /// Scrolls up by a page.
    pub fn page_up(&mut self) {
        self.scroll_up(self.height.max(1));
    }

    /// Scrolls down by a page.
    pub fn page_down(&mut self) {
        self.scroll_down(self.height.max(1));
    }

    /// Scrolls to the first line.
    pub fn go_to_top(&mut self) {
        self.scroll = 0;
    }

    /// Scrolls so the last line is at the bottom of the body.
    pub fn go_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    /// Returns `true` if the last line is visible.
    pub fn is_at_bottom(&self) -> bool {
        self.scroll >= self.max_scroll()
    }

    fn max_scroll(&self) -> usize {
        self.filtered.len().saturating_sub(self.height)
    }

    fn half_page(&self) -> usize {
        (self.height / 2).max(1)
    }

    // =========================================================================
    // Focus & Field Editing
    // =========================================================================

    /// Starts editing the filter, loading the stored pattern into the field.
    ///
    /// Returns `false` unless the viewer was in [`FocusMode::Viewing`].
    pub fn start_filter(&mut self) -> bool {
        self.start_editing(FocusMode::EditingFilter)
    }

    /// Starts editing the search, loading the stored pattern into the field.
    ///
    /// Returns `false` unless the viewer was in [`FocusMode::Viewing`].
    pub fn start_search(&mut self) -> bool {
        self.start_editing(FocusMode::EditingSearch)
    }

    fn start_editing(&mut self, mode: FocusMode) -> bool {
        if self.focus != FocusMode::Viewing {
            return false;
        }
        self.field = match mode {
            FocusMode::EditingSearch => self.search.as_str().to_owned(),
            _ => self.filter.as_str().to_owned(),
        };
        self.focus = mode;
        true
    }

    /// Leaves the field, clearing the pattern being edited.
    pub fn cancel_edit(&mut self) {
        if !self.focus.is_editing() {
            return;
        }
        self.field.clear();
        self.apply_field();
        self.focus = FocusMode::Viewing;
    }

    /// Leaves the field, keeping the pattern.
    pub fn commit_edit(&mut self) {
        if self.focus.is_editing() {
            self.focus = FocusMode::Viewing;
        }
    }

    /// Types a character into the field.
    pub fn insert_char(&mut self, c: char) {
        if self.focus.is_editing() && !c.is_control() {
            self.field.push(c);
            self.apply_field();
        }
    }

    /// Inserts pasted text into the field. Line breaks are dropped.
    pub fn insert_str(&mut self, text: &str) {
        if !self.focus.is_editing() {
            return;
        }
        self.field.extend(text.chars().filter(|c| !c.is_control()));
        self.apply_field();
    }

    /// Deletes the last character of the field.
    pub fn backspace(&mut self) {
        if self.focus.is_editing() && self.field.pop().is_some() {
            self.apply_field();
        }
    }

    /// Empties the field.
    pub fn clear_field(&mut self) {
        if self.focus.is_editing() && !self.field.is_empty() {
            self.field.clear();
            self.apply_field();
        }
    }

    fn apply_field(&mut self) {
        let text = self.field.clone();
        match self.focus {
            FocusMode::EditingFilter => self.set_filter(&text),
            FocusMode::EditingSearch => self.set_search(&text),
            FocusMode::Viewing | FocusMode::HelpOverlay => {}
        }
    }

    /// Shows or hides the help overlay.
    ///
    /// Returns `false` while a field is being edited.
    pub fn toggle_help(&mut self) -> bool {
        self.focus = match self.focus {
            FocusMode::Viewing => FocusMode::HelpOverlay,
            FocusMode::HelpOverlay => FocusMode::Viewing,
            FocusMode::EditingFilter | FocusMode::EditingSearch => return false,
        };
        true
    }

    /// Hides the help overlay if it is shown.
    pub fn hide_help(&mut self) {
        if self.focus.is_overlay() {
            self.focus = FocusMode::Viewing;
        }
    }

    /// Footer prompt for the field being edited.
    pub fn prompt(&self) -> Option<String> {
        match self.focus {
            FocusMode::EditingFilter => Some("Filter > ".to_owned()),
            FocusMode::EditingSearch => Some(format!(
                "Search [{}/{}] > ",
                self.active.map_or(0, |a| a + 1),
                self.matches.len()
            )),
            FocusMode::Viewing | FocusMode::HelpOverlay => None,
        }
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Decorated text of the rows inside the scroll window.
    pub fn visible_lines(&self) -> Vec<String> {
        let end = (self.scroll + self.height).min(self.filtered.len());
        self.filtered
            .get(self.scroll..end)
            .unwrap_or_default()
            .iter()
            .map(|&index| self.decorated_line(index))
            .collect()
    }

    /// Decorated text of buffer row `index`.
    pub fn decorated_line(&self, index: usize) -> String {
        let row = self.buffer.rows().get(index).map_or("", String::as_str);
        decorate(row, self.matches_on(index), self.active)
    }

    /// Matches on buffer row `index`, in column order.
    pub fn matches_on(&self, index: usize) -> &[SearchMatch] {
        let start = self.matches.partition_point(|m| m.line_index < index);
        let end = self.matches.partition_point(|m| m.line_index <= index);
        self.matches.get(start..end).unwrap_or_default()
    }

    /// Position of buffer row `index` within the filtered rows.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.filtered.binary_search(&index).ok()
    }

    /// All wrapped rows.
    pub fn rows(&self) -> &[String] {
        self.buffer.rows()
    }

    /// Indices of rows passing the filter.
    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    /// Search matches over the filtered rows.
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// Index of the active match.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The active match.
    pub fn active_match(&self) -> Option<&SearchMatch> {
        self.active.and_then(|a| self.matches.get(a))
    }

    /// Top visible position within the filtered rows.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Body height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Current input focus.
    pub fn focus(&self) -> FocusMode {
        self.focus
    }

    /// Text of the field being edited.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The stored filter.
    pub fn filter(&self) -> &Pattern {
        &self.filter
    }

    /// The stored search.
    pub fn search(&self) -> &Pattern {
        &self.search
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn viewer_with(lines: &[&str]) -> Viewer {
        let mut viewer = Viewer::new(80, 10);
        for line in lines {
            viewer.append(&format!("{line}\n"));
        }
        viewer
    }

    #[test]
    fn test_filter_scenario() {
        let mut viewer = viewer_with(&["a", "b", "a"]);
        viewer.set_filter("a");
        assert_eq!(viewer.filtered_indices(), [0, 2]);
    }

    #[test]
    fn test_search_scenario() {
        let mut viewer = viewer_with(&["a", "b", "a"]);
        viewer.set_filter("a");
        viewer.set_search("a");

        let found: Vec<_> = viewer
            .matches()
            .iter()
            .map(|m| (m.id, m.line_index))
            .collect();
        assert_eq!(found, vec![(0, 0), (1, 2)]);
        assert_eq!(viewer.active_index(), Some(1));

        viewer.next_match();
        assert_eq!(viewer.active_index(), Some(0));
        viewer.next_match();
        assert_eq!(viewer.active_index(), Some(1));
    }

    #[test]
    fn test_invalid_filter_passes_through() {
        let mut viewer = viewer_with(&["a", "b", "a"]);
        viewer.set_filter("(");
        assert_eq!(viewer.filtered_indices(), [0, 1, 2]);
        assert!(viewer.filter().is_invalid());
    }

    #[test]
    fn test_invalid_search_has_no_matches() {
        let mut viewer = viewer_with(&["a(b"]);
        viewer.set_search("(");
        assert!(viewer.matches().is_empty());
        assert_eq!(viewer.active_index(), None);
    }

    #[test]
    fn test_search_never_sees_filtered_lines() {
        let mut viewer = viewer_with(&["error: x", "warn: y", "error: z"]);
        viewer.set_filter("warn");
        viewer.set_search("error|warn");

        assert!(
            viewer
                .matches()
                .iter()
                .all(|m| viewer.filtered_indices().contains(&m.line_index))
        );
        assert_eq!(viewer.matches().len(), 1);
    }

    #[test]
    fn test_pointer_kept_on_append() {
        let mut viewer = viewer_with(&["x", "x", "x"]);
        viewer.set_search("x");
        viewer.next_match();
        assert_eq!(viewer.active_index(), Some(1));

        viewer.append("x\n");
        assert_eq!(viewer.matches().len(), 4);
        assert_eq!(viewer.active_index(), Some(1));
    }

    #[test]
    fn test_pointer_reset_when_out_of_range() {
        let mut viewer = viewer_with(&["ab", "ab", "a"]);
        viewer.set_search("a");
        assert_eq!(viewer.active_index(), Some(2));

        viewer.set_filter("b");
        assert_eq!(viewer.matches().len(), 2);
        assert_eq!(viewer.active_index(), Some(1));

        viewer.set_filter("^x$");
        assert_eq!(viewer.active_index(), None);
    }

    #[test]
    fn test_pointer_kept_when_search_changes() {
        let mut viewer = viewer_with(&["ab", "ab", "ab", "a"]);
        viewer.set_search("a");
        assert_eq!(viewer.active_index(), Some(3));

        for _ in 0..3 {
            viewer.next_match();
        }
        assert_eq!(viewer.active_index(), Some(0));

        viewer.set_search("ab");
        assert_eq!(viewer.matches().len(), 3);
        assert_eq!(viewer.active_index(), Some(0));

        viewer.set_search("b");
        viewer.set_search("ab");
        assert_eq!(viewer.active_index(), Some(0));
    }

    #[test]
    fn test_wraparound_returns_to_start() {
        let mut viewer = viewer_with(&["a", "a", "a", "a", "a"]);
        viewer.set_search("a");
        let start = viewer.active_index();

        for _ in 0..5 {
            viewer.next_match();
        }
        assert_eq!(viewer.active_index(), start);

        for _ in 0..5 {
            viewer.previous_match();
        }
        assert_eq!(viewer.active_index(), start);
    }

    #[test]
    fn test_chunk_extends_open_line() {
        let mut viewer = Viewer::new(80, 10);
        viewer.append("compil");
        viewer.append("ing...\ndone");
        assert_eq!(viewer.rows(), ["compiling...", "done"]);
    }

    #[test]
    fn test_push_line_closes_open_line() {
        let mut viewer = Viewer::new(80, 10);
        viewer.append("no newline");
        viewer.push_line("Process exited");
        assert_eq!(viewer.rows(), ["no newline", "Process exited"]);
    }

    #[test]
    fn test_auto_follow_when_at_bottom() {
        let mut viewer = Viewer::new(80, 3);
        for i in 0..10 {
            viewer.append(&format!("line {i}\n"));
        }
        assert_eq!(viewer.scroll(), 7);
        assert!(viewer.is_at_bottom());
    }

    #[test]
    fn test_no_follow_when_scrolled_up() {
        let mut viewer = Viewer::new(80, 3);
        for i in 0..10 {
            viewer.append(&format!("line {i}\n"));
        }
        viewer.scroll_up(4);
        assert_eq!(viewer.scroll(), 3);

        viewer.append("more\n");
        assert_eq!(viewer.scroll(), 3);
        assert!(!viewer.is_at_bottom());
    }

    #[test]
    fn test_go_to_line_minimal_delta() {
        let mut viewer = Viewer::new(80, 4);
        for i in 0..20 {
            viewer.append(&format!("{i}\n"));
        }
        viewer.go_to_top();

        viewer.go_to_line(2);
        assert_eq!(viewer.scroll(), 0, "already visible");

        viewer.go_to_line(9);
        assert_eq!(viewer.scroll(), 6, "target lands on the last row");

        viewer.go_to_line(3);
        assert_eq!(viewer.scroll(), 3, "target lands on the first row");
    }

    #[test]
    fn test_next_match_scrolls_to_match() {
        let mut viewer = Viewer::new(80, 3);
        viewer.append("hit\n");
        for i in 0..10 {
            viewer.append(&format!("{i}\n"));
        }
        viewer.set_search("hit");
        assert_eq!(viewer.scroll(), 0);
    }

    #[test]
    fn test_paging() {
        let mut viewer = Viewer::new(80, 4);
        for i in 0..20 {
            viewer.append(&format!("{i}\n"));
        }
        viewer.go_to_top();

        viewer.half_page_down();
        assert_eq!(viewer.scroll(), 2);
        viewer.page_down();
        assert_eq!(viewer.scroll(), 6);
        viewer.page_up();
        viewer.half_page_up();
        assert_eq!(viewer.scroll(), 0);

        viewer.scroll_down(100);
        assert_eq!(viewer.scroll(), 16);
        viewer.go_to_top();
        viewer.go_to_bottom();
        assert!(viewer.is_at_bottom());
    }

    #[test]
    fn test_clear_resets_buffer_keeps_patterns() {
        let mut viewer = viewer_with(&["a", "b"]);
        viewer.set_filter("a");
        viewer.clear();

        assert!(viewer.rows().is_empty());
        assert!(viewer.filtered_indices().is_empty());
        assert_eq!(viewer.filter().as_str(), "a");
    }

    #[test]
    fn test_resize_rewraps() {
        let mut viewer = Viewer::new(10, 5);
        viewer.append("0123456789abcdef\n");
        assert_eq!(viewer.rows().len(), 2);

        viewer.resize(4, 5);
        assert_eq!(viewer.rows(), ["0123", "4567", "89ab", "cdef"]);
    }

    #[test]
    fn test_visible_lines_are_decorated() {
        let mut viewer = viewer_with(&["foo bar", "baz"]);
        viewer.set_search("ba");

        let lines = viewer.visible_lines();
        assert_eq!(lines[0], "foo \u{E000}ba\u{E002}r");
        assert_eq!(lines[1], "\u{E001}ba\u{E002}z");
    }

    #[test]
    fn test_filter_focus_transitions() {
        let mut viewer = viewer_with(&["apple", "banana"]);

        assert!(viewer.start_filter());
        assert_eq!(viewer.focus(), FocusMode::EditingFilter);
        assert!(!viewer.start_search(), "already editing");
        assert!(!viewer.toggle_help(), "no help while editing");

        viewer.insert_char('a');
        viewer.insert_char('p');
        assert_eq!(viewer.filtered_indices(), [0], "edits apply live");

        viewer.commit_edit();
        assert_eq!(viewer.focus(), FocusMode::Viewing);
        assert_eq!(viewer.filter().as_str(), "ap");

        assert!(viewer.start_filter());
        assert_eq!(viewer.field(), "ap", "stored pattern is loaded");
        viewer.cancel_edit();
        assert_eq!(viewer.filter().as_str(), "");
        assert_eq!(viewer.filtered_indices(), [0, 1]);
    }

    #[test]
    fn test_search_field_editing() {
        let mut viewer = viewer_with(&["one", "two"]);
        assert!(viewer.start_search());

        viewer.insert_str("o\nn");
        assert_eq!(viewer.field(), "on");
        assert_eq!(viewer.prompt().as_deref(), Some("Search [1/1] > "));

        viewer.backspace();
        assert_eq!(viewer.matches().len(), 2);

        viewer.clear_field();
        assert!(viewer.matches().is_empty());
        assert_eq!(viewer.prompt().as_deref(), Some("Search [0/0] > "));
    }

    #[test]
    fn test_help_overlay_blocks_editing() {
        let mut viewer = Viewer::new(80, 10);
        assert!(viewer.toggle_help());
        assert!(!viewer.start_filter());
        assert!(!viewer.start_search());

        viewer.hide_help();
        assert_eq!(viewer.focus(), FocusMode::Viewing);
        assert_eq!(viewer.prompt(), None);
    }

    #[test]
    fn test_lifecycle_lines_are_sanitized() {
        let mut viewer = Viewer::new(80, 10);
        viewer.push_line("Change detected[WRITE]: /src/\u{E000}main.go");
        assert_eq!(viewer.rows(), ["Change detected[WRITE]: /src/main.go"]);
    }

    fn feed_split(text: &str, cuts: &[usize]) -> Viewer {
        let mut viewer = Viewer::new(5, 4);
        viewer.set_filter("a|\\d");
        viewer.set_search("a+");

        let mut points: Vec<usize> = cuts.iter().map(|c| c % (text.len() + 1)).collect();
        points.sort_unstable();
        points.dedup();

        let mut last = 0;
        for point in points {
            viewer.append(&text[last..point]);
            last = point;
        }
        viewer.append(&text[last..]);

        // The pointer is user state; start both from the last match.
        viewer.set_search("");
        viewer.set_search("a+");
        viewer
    }

    proptest! {
        #[test]
        fn chunking_does_not_change_the_snapshot(
            text in "(\\x1b\\[3[12]m|[ab1 ]{1,7}|\\r?\\n|\\t){0,30}",
            cuts in prop::collection::vec(0usize..200, 0..6),
        ) {
            let whole = feed_split(&text, &[]);
            let split = feed_split(&text, &cuts);

            prop_assert_eq!(whole.rows(), split.rows());
            prop_assert_eq!(whole.filtered_indices(), split.filtered_indices());
            prop_assert_eq!(whole.matches(), split.matches());
            prop_assert_eq!(whole.visible_lines(), split.visible_lines());
        }

        #[test]
        fn filtered_indices_strictly_increase(
            lines in prop::collection::vec("[abc]{0,4}", 0..20),
            pattern in "[abc]|\\(|",
        ) {
            let mut viewer = Viewer::new(0, 10);
            for line in &lines {
                viewer.append(&format!("{line}\n"));
            }
            viewer.set_filter(&pattern);

            let indices = viewer.filtered_indices();
            prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(indices.iter().all(|&i| i < viewer.rows().len()));
        }
    }
}
