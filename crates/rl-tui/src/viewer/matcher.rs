//! Filter and search over the line buffer.
//!
//! Both are derived from scratch on every change: the filter yields the
//! visible line indices, and the search scans only those lines.

use regex::Regex;

/// A user-edited regular expression.
///
/// The source text is kept even when it does not compile; an invalid or
/// empty pattern has no regex.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    source: String,
    regex: Option<Regex>,
}

impl Pattern {
    /// Compiles `source`, keeping the text either way.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let regex = if source.is_empty() {
            None
        } else {
            match Regex::new(&source) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracing::debug!(pattern = %source, error = %err, "Invalid pattern");
                    None
                }
            }
        };
        Self { source, regex }
    }

    /// The text as typed.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The compiled regex, if the pattern is non-empty and valid.
    pub fn regex(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    /// Returns `true` if nothing was typed.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Returns `true` if text was typed but does not compile.
    pub fn is_invalid(&self) -> bool {
        !self.source.is_empty() && self.regex.is_none()
    }
}

/// One search hit.
///
/// Columns are byte offsets into the raw line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Sequential id in scan order.
    pub id: usize,
    /// Index of the line in the buffer.
    pub line_index: usize,
    /// Start byte offset.
    pub start_col: usize,
    /// End byte offset (exclusive).
    pub end_col: usize,
    /// The matched text.
    pub text: String,
}

/// Indices of the lines matching `filter`, in order.
///
/// Without a usable filter every index is returned.
pub fn filter_indices<S: AsRef<str>>(lines: &[S], filter: &Pattern) -> Vec<usize> {
    match filter.regex() {
        Some(regex) => lines
            .iter()
            .enumerate()
            .filter(|(_, line)| regex.is_match(line.as_ref()))
            .map(|(idx, _)| idx)
            .collect(),
        None => (0..lines.len()).collect(),
    }
}

/// All matches of `search` over the lines listed in `indices`.
///
/// Ids are assigned in scan order. Zero-width matches are skipped since
/// there is nothing to highlight.
pub fn find_matches<S: AsRef<str>>(
    lines: &[S],
    indices: &[usize],
    search: &Pattern,
) -> Vec<SearchMatch> {
    let Some(regex) = search.regex() else {
        return Vec::new();
    };

    let mut matches = Vec::new();
    for &line_index in indices {
        let Some(line) = lines.get(line_index) else {
            continue;
        };
        for found in regex.find_iter(line.as_ref()) {
            if found.is_empty() {
                continue;
            }
            matches.push(SearchMatch {
                id: matches.len(),
                line_index,
                start_col: found.start(),
                end_col: found.end(),
                text: found.as_str().to_owned(),
            });
        }
    }
    matches
}

/// Keeps `previous` when it is still a valid match index, otherwise points
/// at the last match.
pub fn clamp_pointer(previous: Option<usize>, len: usize) -> Option<usize> {
    match (previous, len) {
        (_, 0) => None,
        (Some(pointer), len) if pointer < len => Some(pointer),
        (_, len) => Some(len - 1),
    }
}

/// Moves the pointer one step down, wrapping below zero to the last match.
pub fn step_down(pointer: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match pointer {
        Some(0) | None => len - 1,
        Some(p) => (p - 1).min(len - 1),
    })
}

/// Moves the pointer one step up, wrapping past the last match to zero.
pub fn step_up(pointer: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match pointer {
        Some(p) if p + 1 < len => p + 1,
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_states() {
        assert!(Pattern::new("").is_empty());
        assert!(Pattern::new("(").is_invalid());
        assert!(Pattern::new("a+").regex().is_some());
        assert_eq!(Pattern::new("(").as_str(), "(");
    }

    #[test]
    fn test_filter_selects_matching_lines() {
        let lines = ["a", "b", "a"];
        assert_eq!(filter_indices(&lines, &Pattern::new("a")), vec![0, 2]);
    }

    #[test]
    fn test_invalid_filter_passes_everything() {
        let lines = ["a", "b", "a"];
        assert_eq!(filter_indices(&lines, &Pattern::new("(")), vec![0, 1, 2]);
        assert_eq!(filter_indices(&lines, &Pattern::default()), vec![0, 1, 2]);
    }

    #[test]
    fn test_search_only_scans_filtered_lines() {
        let lines = ["error one", "ok", "error two"];
        let matches = find_matches(&lines, &[2], &Pattern::new("error"));

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line_index, 2);
        assert_eq!(matches[0].id, 0);
        assert_eq!((matches[0].start_col, matches[0].end_col), (0, 5));
    }

    #[test]
    fn test_search_ids_are_sequential() {
        let lines = ["aa", "b", "a"];
        let matches = find_matches(&lines, &[0, 1, 2], &Pattern::new("a"));

        let ids: Vec<_> = matches.iter().map(|m| m.id).collect();
        let rows: Vec<_> = matches.iter().map(|m| m.line_index).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(rows, vec![0, 0, 2]);
    }

    #[test]
    fn test_zero_width_matches_skipped() {
        let lines = ["abc"];
        assert!(find_matches(&lines, &[0], &Pattern::new("x*")).is_empty());
    }

    #[test]
    fn test_clamp_pointer() {
        assert_eq!(clamp_pointer(None, 0), None);
        assert_eq!(clamp_pointer(Some(3), 0), None);
        assert_eq!(clamp_pointer(None, 4), Some(3));
        assert_eq!(clamp_pointer(Some(1), 4), Some(1));
        assert_eq!(clamp_pointer(Some(9), 4), Some(3));
    }

    #[test]
    fn test_steps_wrap() {
        assert_eq!(step_down(Some(0), 3), Some(2));
        assert_eq!(step_down(Some(2), 3), Some(1));
        assert_eq!(step_up(Some(2), 3), Some(0));
        assert_eq!(step_up(Some(0), 3), Some(1));
        assert_eq!(step_up(None, 0), None);
    }

    #[test]
    fn test_k_steps_return_to_start() {
        for len in 1..6 {
            for start in 0..len {
                let mut down = Some(start);
                let mut up = Some(start);
                for _ in 0..len {
                    down = step_down(down, len);
                    up = step_up(up, len);
                }
                assert_eq!(down, Some(start));
                assert_eq!(up, Some(start));
            }
        }
    }
}
