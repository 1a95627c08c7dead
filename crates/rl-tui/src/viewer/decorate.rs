//! Search-match decoration.
//!
//! Decoration inserts private-use marker characters around every match of a
//! line. The renderer later splits the decorated text on those markers to
//! pick styles, so the viewer itself never deals with colors.

use super::matcher::SearchMatch;

/// Opens a normal match.
pub const MATCH_OPEN: char = '\u{E000}';

/// Opens the active match.
pub const ACTIVE_OPEN: char = '\u{E001}';

/// Closes either kind of match.
pub const CLOSE: char = '\u{E002}';

/// How a run of decorated text should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Regular output.
    Plain,
    /// A search match.
    Match,
    /// The active search match.
    Active,
}

/// Wraps every match of `line` in markers, left to right.
///
/// `matches` are the matches of this line in column order; `active` is the
/// id of the active match, if any. Each insertion shifts the rest of the
/// line, so one running byte offset maps raw columns to decorated ones.
pub fn decorate(line: &str, matches: &[SearchMatch], active: Option<usize>) -> String {
    let (decorated, _) = matches.iter().fold(
        (line.to_owned(), 0usize),
        |(mut text, offset), m| {
            let open_at = m.start_col + offset;
            let close_at = m.end_col + offset;
            if open_at > close_at
                || close_at > text.len()
                || !text.is_char_boundary(open_at)
                || !text.is_char_boundary(close_at)
            {
                return (text, offset);
            }

            let open = if Some(m.id) == active {
                ACTIVE_OPEN
            } else {
                MATCH_OPEN
            };
            text.insert(close_at, CLOSE);
            text.insert(open_at, open);
            (text, offset + open.len_utf8() + CLOSE.len_utf8())
        },
    );
    decorated
}

/// Splits decorated text into styled runs.
///
/// Empty runs are skipped.
pub fn segments(decorated: &str) -> Vec<(Segment, &str)> {
    let mut out = Vec::new();
    let mut kind = Segment::Plain;
    let mut start = 0;

    for (idx, c) in decorated.char_indices() {
        let next = match c {
            MATCH_OPEN => Segment::Match,
            ACTIVE_OPEN => Segment::Active,
            CLOSE => Segment::Plain,
            _ => continue,
        };
        if idx > start {
            out.push((kind, &decorated[start..idx]));
        }
        kind = next;
        start = idx + c.len_utf8();
    }
    if start < decorated.len() {
        out.push((kind, &decorated[start..]));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Removes all markers, giving back the raw line.
    fn strip_markers(decorated: &str) -> String {
        decorated
            .chars()
            .filter(|c| !matches!(*c, MATCH_OPEN | ACTIVE_OPEN | CLOSE))
            .collect()
    }

    fn m(id: usize, start: usize, end: usize, line: &str) -> SearchMatch {
        SearchMatch {
            id,
            line_index: 0,
            start_col: start,
            end_col: end,
            text: line[start..end].to_owned(),
        }
    }

    #[test]
    fn test_no_matches_is_identity() {
        assert_eq!(decorate("hello", &[], None), "hello");
    }

    #[test]
    fn test_offsets_shift_left_to_right() {
        let line = "foo bar foo";
        let matches = [m(0, 0, 3, line), m(1, 8, 11, line)];

        let out = decorate(line, &matches, Some(1));
        assert_eq!(out, "\u{E000}foo\u{E002} bar \u{E001}foo\u{E002}");
        assert_eq!(strip_markers(&out), line);
    }

    #[test]
    fn test_adjacent_matches() {
        let line = "aaa";
        let matches = [m(0, 0, 1, line), m(1, 1, 2, line), m(2, 2, 3, line)];

        let out = decorate(line, &matches, Some(0));
        assert_eq!(
            segments(&out),
            vec![
                (Segment::Active, "a"),
                (Segment::Match, "a"),
                (Segment::Match, "a"),
            ]
        );
    }

    #[test]
    fn test_multibyte_columns() {
        let line = "héllo wörld";
        let start = line.find("wörld").unwrap_or_default();
        let matches = [m(0, start, line.len(), line)];

        let out = decorate(line, &matches, None);
        assert_eq!(
            segments(&out),
            vec![(Segment::Plain, "héllo "), (Segment::Match, "wörld")]
        );
    }

    #[test]
    fn test_out_of_range_match_is_ignored() {
        let line = "short";
        let bogus = SearchMatch {
            id: 0,
            line_index: 0,
            start_col: 3,
            end_col: 40,
            text: String::new(),
        };
        assert_eq!(decorate(line, &[bogus], None), "short");
    }

    #[test]
    fn test_segments_plain_only() {
        assert_eq!(segments("plain"), vec![(Segment::Plain, "plain")]);
        assert!(segments("").is_empty());
    }
}
