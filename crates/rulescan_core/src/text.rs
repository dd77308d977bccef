//! Text span types for source location tracking.
//!
//! Rule sources are scanned as raw bytes, so every position here is a byte
//! offset from the start of the buffer.

use std::fmt;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    /// Create a new text span.
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

/// A map from byte offsets to 1-based line and column numbers.
///
/// The scanner tracks lines itself; this is for consumers that only kept a
/// byte offset, such as error spans.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl LineMap {
    /// Build a line map from source bytes.
    pub fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in source.iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// Get the 1-based line number for a byte offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32 + 1,
            Err(line) => line as u32,
        }
    }

    /// Get the 1-based (line, column) pair for a byte offset.
    pub fn line_and_column_of(&self, pos: TextPos) -> (u32, u32) {
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize - 1];
        (line, pos - line_start + 1)
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span() {
        let span = TextSpan::from_bounds(5, 15);
        assert_eq!(span, TextSpan::new(5, 10));
        assert_eq!(span.end(), 15);
        assert_eq!(format!("{:?}", span), "5..15");
    }

    #[test]
    fn test_line_map() {
        let map = LineMap::new(b"rule a\n{\n  condition: true\n}");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.line_of(0), 1);
        assert_eq!(map.line_of(6), 1); // newline byte
        assert_eq!(map.line_of(7), 2);
        assert_eq!(map.line_and_column_of(11), (3, 3));
    }
}
