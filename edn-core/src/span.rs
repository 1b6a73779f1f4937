//! Source locations.
//!
//! The driver sees input one fragment at a time, so positions are tracked
//! incrementally rather than recomputed from a buffer.

use std::fmt;

/// A position in the logical input stream (across all fed chunks).
///
/// `line` and `column` are 1-based and count characters, not bytes.
/// `offset` is the byte offset from the start of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl Location {
    /// Location of the first character of a stream.
    pub const fn start() -> Self {
        Self { line: 1, column: 1, offset: 0 }
    }

    /// Step past one character.
    #[inline]
    pub fn advance(&mut self, ch: char) {
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// Step past a run of text that was skipped in bulk.
    pub fn advance_str(&mut self, run: &str) {
        self.offset += run.len();
        match memchr::memrchr(b'\n', run.as_bytes()) {
            Some(last_newline) => {
                self.line += memchr::memchr_iter(b'\n', run.as_bytes()).count() as u32;
                self.column = 1 + run[last_newline + 1..].chars().count() as u32;
            }
            None => self.column += run.chars().count() as u32,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}
