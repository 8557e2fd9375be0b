//! Position and location types.
//!
//! Positions are 0-indexed and measure columns in UTF-16 code units,
//! matching the conventions of editor protocols. The engine itself
//! works in byte offsets; `LineMap` converts between the two.

use serde::{Deserialize, Serialize};

/// A position in a source file (0-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (UTF-16 code units)
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// A range in a source file. Half-open in character terms within a
/// line; `start == end` is a valid zero-width anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }

    /// The zero-width anchor at the very start of a file.
    pub fn start_of_file() -> Self {
        Range::new(Position::new(0, 0), Position::new(0, 0))
    }

    /// Whether this range is a zero-width anchor.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A resolved target: a file path plus a range inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "uri")]
    pub file_path: String,
    pub range: Range,
}

impl Location {
    pub fn new(file_path: String, range: Range) -> Self {
        Location { file_path, range }
    }
}

/// Line map for efficient offset <-> position conversion.
/// Stores the starting byte offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (line_starts[0] is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn build(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0u32];
        let mut pos = 0usize;

        while let Some(found) = memchr::memchr2(b'\n', b'\r', &bytes[pos..]) {
            let at = pos + found;
            // \r\n counts as a single line terminator
            let next = if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
                at + 2
            } else {
                at + 1
            };
            line_starts.push(next as u32);
            pos = next;
        }

        LineMap { line_starts }
    }

    /// Convert a byte offset to a Position. Columns are counted in
    /// UTF-16 code units.
    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };

        let line_start = self.line_starts.get(line).copied().unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let start = line_start.min(end);
        let slice = source.get(start..end).unwrap_or("");
        let character = slice.chars().map(|ch| ch.len_utf16() as u32).sum();

        Position {
            line: line as u32,
            character,
        }
    }

    /// Convert a Position to a byte offset. Returns `None` when the
    /// line does not exist; a column past the end of the line clamps
    /// to the line's last offset.
    pub fn position_to_offset(&self, position: Position, source: &str) -> Option<u32> {
        let line_idx = position.line as usize;
        let line_start = *self.line_starts.get(line_idx)?;
        let line_limit = self
            .line_starts
            .get(line_idx + 1)
            .copied()
            .unwrap_or(source.len() as u32);
        let slice = source
            .get(line_start as usize..line_limit as usize)
            .unwrap_or("");

        let mut utf16_count = 0u32;
        let mut byte_count = 0u32;
        for ch in slice.chars() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            let ch_utf16 = ch.len_utf16() as u32;
            if utf16_count + ch_utf16 > position.character {
                break;
            }
            utf16_count += ch_utf16;
            byte_count += ch.len_utf8() as u32;
            if utf16_count == position.character {
                break;
            }
        }

        Some(line_start + byte_count)
    }

    /// Convert a byte span to a Range.
    pub fn span_to_range(&self, start: u32, end: u32, source: &str) -> Range {
        Range::new(
            self.offset_to_position(start, source),
            self.offset_to_position(end, source),
        )
    }

    /// Get the number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the starting offset of a line.
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }
}

#[cfg(test)]
mod position_tests {
    use super::*;

    #[test]
    fn test_line_map_basic() {
        let source = "const a = 1\nconst b = 2\n";
        let map = LineMap::build(source);

        // Trailing newline opens a final empty line
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.offset_to_position(0, source), Position::new(0, 0));
        assert_eq!(map.offset_to_position(6, source), Position::new(0, 6));
        assert_eq!(map.offset_to_position(12, source), Position::new(1, 0));
        assert_eq!(map.offset_to_position(18, source), Position::new(1, 6));
    }

    #[test]
    fn test_line_map_crlf() {
        let source = "one\r\ntwo\r\nthree";
        let map = LineMap::build(source);

        assert_eq!(map.line_count(), 3);
        assert_eq!(map.offset_to_position(5, source), Position::new(1, 0));
        assert_eq!(map.offset_to_position(10, source), Position::new(2, 0));
    }

    #[test]
    fn test_lone_carriage_return() {
        let source = "one\rtwo";
        let map = LineMap::build(source);

        assert_eq!(map.line_count(), 2);
        assert_eq!(map.offset_to_position(4, source), Position::new(1, 0));
    }

    #[test]
    fn test_position_to_offset_roundtrip() {
        let source = "var mod = require('./mod')\nmod.run()\n";
        let map = LineMap::build(source);

        for offset in 0..source.len() as u32 {
            let pos = map.offset_to_position(offset, source);
            let back = map.position_to_offset(pos, source).unwrap();
            assert_eq!(offset, back, "roundtrip failed for offset {}", offset);
        }
    }

    #[test]
    fn test_missing_line() {
        let source = "only one line";
        let map = LineMap::build(source);

        assert!(map.position_to_offset(Position::new(3, 0), source).is_none());
    }

    #[test]
    fn test_utf16_columns() {
        let source = "let x = '🙂'\nx";
        let map = LineMap::build(source);

        // The emoji occupies two UTF-16 code units but four bytes
        let after_emoji = 9 + 4;
        let pos = map.offset_to_position(after_emoji as u32, source);
        assert_eq!(pos, Position::new(0, 11));

        let offset = map.position_to_offset(Position::new(0, 11), source).unwrap();
        assert_eq!(offset, after_emoji as u32);
    }

    #[test]
    fn test_start_of_file_anchor() {
        let anchor = Range::start_of_file();
        assert!(anchor.is_empty());
        assert_eq!(anchor.start, Position::new(0, 0));
    }
}
