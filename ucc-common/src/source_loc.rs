//! Source location tracking for error reporting
//!
//! Positions throughout the compiler are byte offsets into the normalized
//! input text. This module maps them back to lines and columns for display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line and column pair (both 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open byte range `start..end` in the input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// An input source together with the start offsets of its lines.
///
/// The input must be the normalized text positions refer to, not the raw
/// bytes of a UTF-16 file.
/// The path is only used in diagnostics; `<stdin>` is used by convention
/// for standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: String,
    pub input: Vec<u8>,
    lines: Vec<usize>,
}

impl Source {
    pub fn new(path: impl Into<String>, input: impl Into<Vec<u8>>) -> Self {
        let input = input.into();
        let mut lines = vec![0];
        for (i, &b) in input.iter().enumerate() {
            if b == b'\n' && i + 1 < input.len() {
                lines.push(i + 1);
            }
        }
        Self {
            path: path.into(),
            input,
            lines,
        }
    }

    /// Number of lines in the input
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Map a byte offset to its line and column.
    ///
    /// Offsets past the end of input (such as the EOF position after a
    /// synthesized line terminator) land on the last line.
    pub fn position(&self, pos: usize) -> SourceLocation {
        let index = self.lines.partition_point(|&start| start <= pos) - 1;
        let column = pos - self.lines[index] + 1;
        SourceLocation::new(index as u32 + 1, column as u32)
    }

    /// 1-based column of a byte offset counted in displayed characters,
    /// as needed to place a caret under [`Source::line`]
    pub fn display_column(&self, pos: usize) -> usize {
        let index = self.lines.partition_point(|&start| start <= pos) - 1;
        let start = self.lines[index];
        let end = pos.min(self.input.len()).max(start);
        let shown = String::from_utf8_lossy(&self.input[start..end]).chars().count();
        shown + (pos - end) + 1
    }

    /// Text of the given 1-based line, with tabs replaced by spaces and the
    /// line terminator removed.
    pub fn line(&self, line: u32) -> String {
        let index = (line as usize).saturating_sub(1).min(self.lines.len() - 1);
        let start = self.lines[index];
        let end = self
            .lines
            .get(index + 1)
            .copied()
            .unwrap_or(self.input.len());
        String::from_utf8_lossy(&self.input[start..end])
            .replace('\t', " ")
            .trim_end_matches(&['\r', '\n'][..])
            .to_string()
    }
}
