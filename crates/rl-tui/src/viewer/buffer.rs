//! Line storage with soft wrapping.

use unicode_width::UnicodeWidthChar;

/// Ordered display lines built from sanitized output.
///
/// Output arrives as chunks that do not respect line boundaries. The buffer
/// keeps the logical lines it was given and the wrapped rows derived from
/// them. A chunk that does not end in a line break leaves the last logical
/// line open, and the next chunk extends it (re-wrapping its rows).
#[derive(Debug, Clone, Default)]
pub struct ContentBuffer {
    /// Logical lines as received.
    logical: Vec<String>,
    /// Wrapped rows; filter and search run over these.
    rows: Vec<String>,
    /// First row of the last logical line.
    tail_start: usize,
    /// Whether the last logical line is still being written.
    open: bool,
    /// Wrap width in columns; zero disables wrapping.
    width: usize,
}

impl ContentBuffer {
    /// Creates an empty buffer wrapping at `width` columns.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Wrapped rows.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Number of wrapped rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if nothing has been appended since the last clear.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` if the last line has no line break yet.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current wrap width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Appends sanitized text.
    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let mut pieces = text.split('\n').peekable();
        while let Some(piece) = pieces.next() {
            let is_last = pieces.peek().is_none();
            if is_last && piece.is_empty() {
                // Text ended with a line break.
                self.open = false;
                break;
            }

            if self.open {
                if let Some(tail) = self.logical.last_mut() {
                    tail.push_str(piece);
                }
                self.rewrap_tail();
            } else {
                self.logical.push(piece.to_owned());
                self.tail_start = self.rows.len();
                let wrapped = wrap(piece, self.width);
                self.rows.extend(wrapped);
            }
            self.open = is_last;
        }
    }

    /// Ends the open line, if any.
    pub fn close_line(&mut self) {
        self.open = false;
    }

    /// Changes the wrap width and re-wraps everything.
    pub fn set_width(&mut self, width: usize) {
        if width == self.width {
            return;
        }
        self.width = width;
        self.rows.clear();
        self.tail_start = 0;
        for line in &self.logical {
            self.tail_start = self.rows.len();
            self.rows.extend(wrap(line, width));
        }
    }

    /// Drops all content.
    pub fn clear(&mut self) {
        self.logical.clear();
        self.rows.clear();
        self.tail_start = 0;
        self.open = false;
    }

    fn rewrap_tail(&mut self) {
        let Some(tail) = self.logical.last() else {
            return;
        };
        self.rows.truncate(self.tail_start);
        self.rows.extend(wrap(tail, self.width));
    }
}

/// Splits `line` into rows of at most `width` display columns.
///
/// Always yields at least one row. A zero width disables wrapping.
pub fn wrap(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![line.to_owned()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut used = 0;

    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += w;
    }
    rows.push(current);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split_on_newline() {
        let mut buffer = ContentBuffer::new(0);
        buffer.push_str("a\nb\n");

        assert_eq!(buffer.rows(), ["a", "b"]);
        assert!(!buffer.is_open());
    }

    #[test]
    fn test_open_line_is_extended() {
        let mut buffer = ContentBuffer::new(0);
        buffer.push_str("hel");
        assert!(buffer.is_open());
        buffer.push_str("lo\nwor");
        buffer.push_str("ld");

        assert_eq!(buffer.rows(), ["hello", "world"]);
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let mut buffer = ContentBuffer::new(0);
        buffer.push_str("a\n\nb\n");
        assert_eq!(buffer.rows(), ["a", "", "b"]);
    }

    #[test]
    fn test_close_line_starts_fresh() {
        let mut buffer = ContentBuffer::new(0);
        buffer.push_str("partial");
        buffer.close_line();
        buffer.push_str("next\n");
        assert_eq!(buffer.rows(), ["partial", "next"]);
    }

    #[test]
    fn test_wrap_by_width() {
        assert_eq!(wrap("abcdefg", 3), ["abc", "def", "g"]);
        assert_eq!(wrap("", 3), [""]);
        assert_eq!(wrap("abc", 0), ["abc"]);
    }

    #[test]
    fn test_wrap_wide_chars() {
        // Each CJK char is two columns wide.
        assert_eq!(wrap("日本語", 4), ["日本", "語"]);
    }

    #[test]
    fn test_open_line_rewraps() {
        let mut buffer = ContentBuffer::new(4);
        buffer.push_str("ab");
        buffer.push_str("cdef");
        assert_eq!(buffer.rows(), ["abcd", "ef"]);

        buffer.push_str("gh\nx\n");
        assert_eq!(buffer.rows(), ["abcd", "efgh", "x"]);
    }

    #[test]
    fn test_set_width_rewraps_everything() {
        let mut buffer = ContentBuffer::new(0);
        buffer.push_str("abcdef\nxy");
        buffer.set_width(3);
        assert_eq!(buffer.rows(), ["abc", "def", "xy"]);

        // The open line still extends after a re-wrap.
        buffer.push_str("z1");
        assert_eq!(buffer.rows(), ["abc", "def", "xyz", "1"]);
    }

    #[test]
    fn test_clear() {
        let mut buffer = ContentBuffer::new(0);
        buffer.push_str("a\nb");
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(!buffer.is_open());
    }
}
