//! Output sanitizing.
//!
//! Pty output is full of terminal control sequences. The viewer works on
//! plain text, so everything that would move the cursor, recolor, or retitle
//! the terminal is dropped before lines are stored.

use std::borrow::Cow;

use super::decorate::{ACTIVE_OPEN, CLOSE, MATCH_OPEN};

/// Spaces a tab expands to.
pub const TAB_WIDTH: usize = 4;

/// Longest escape sequence held back waiting for its terminator.
const MAX_PENDING: usize = 4096;

/// Incremental sanitizer for a stream of output chunks.
///
/// Sequences split across chunks (an escape sequence, or a `\r` whose `\n`
/// arrives in the next read) are held back until they can be decided, so the
/// result does not depend on where the stream was cut.
#[derive(Debug, Default, Clone)]
pub struct Sanitizer {
    pending: String,
}

impl Sanitizer {
    /// Creates a sanitizer with nothing held back.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops anything held back.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Returns `true` if part of a sequence is waiting for the next chunk.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Sanitizes one chunk.
    ///
    /// Returns the chunk unchanged when it is already plain text.
    pub fn feed<'a>(&mut self, chunk: &'a str) -> Cow<'a, str> {
        if self.pending.is_empty() && !chunk.chars().any(needs_work) {
            return Cow::Borrowed(chunk);
        }

        let input = if self.pending.is_empty() {
            Cow::Borrowed(chunk)
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.push_str(chunk);
            Cow::Owned(joined)
        };

        let (out, rest) = sanitize_prefix(&input);
        if rest.len() <= MAX_PENDING {
            self.pending.push_str(rest);
        }
        Cow::Owned(out)
    }
}

/// Sanitizes a complete string in one pass.
///
/// An unterminated trailing sequence is dropped.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    let mut sanitizer = Sanitizer::new();
    sanitizer.feed(text)
}

fn needs_work(c: char) -> bool {
    (c.is_control() && c != '\n') || is_marker(c)
}

fn is_marker(c: char) -> bool {
    matches!(c, MATCH_OPEN | ACTIVE_OPEN | CLOSE)
}

/// Sanitizes as much of `input` as can be decided.
///
/// Returns the clean text and the undecided tail.
fn sanitize_prefix(input: &str) -> (String, &str) {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\x1b' => {
                let Some(len) = escape_len(&input[idx..]) else {
                    return (out, &input[idx..]);
                };
                // Skip the rest of the sequence.
                while chars.next_if(|&(next, _)| next < idx + len).is_some() {}
            }
            '\r' if chars.peek().is_none() => return (out, &input[idx..]),
            '\t' => out.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
            '\n' => out.push('\n'),
            c if c.is_control() || is_marker(c) => {}
            c => out.push(c),
        }
    }

    (out, "")
}

/// Byte length of the escape sequence at the start of `s`, or `None` when
/// it is not terminated yet.
fn escape_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    match bytes.get(1).copied()? {
        // CSI: parameters and intermediates, then a final byte in 0x40..=0x7e.
        b'[' => bytes
            .iter()
            .skip(2)
            .position(|b| (0x40..=0x7e).contains(b))
            .map(|pos| pos + 3),
        // OSC: terminated by BEL or ST (ESC \).
        b']' => {
            let body = bytes.get(2..)?;
            body.iter().copied().enumerate().find_map(|(pos, b)| match b {
                0x07 => Some(pos + 3),
                0x1b if body.get(pos + 1) == Some(&b'\\') => Some(pos + 4),
                _ => None,
            })
        }
        // Character set designation takes one more byte.
        b'(' | b')' | b'*' | b'+' => bytes.get(2).map(|_| 3),
        // Any other two-byte escape. Anything else is left to the text.
        0x20..=0x7e => Some(2),
        _ => Some(1),
    }
}
