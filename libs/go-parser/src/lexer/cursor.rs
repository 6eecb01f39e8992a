//! # Character Cursor
//!
//! Peekable character cursor for the lexer.
//! Tracks position (byte, line, column) as it advances and records
//! where every line starts.
//!
//! ## Example
//!
//! ```rust
//! use go_parser::lexer::Cursor;
//!
//! let mut cursor = Cursor::new("go");
//! assert_eq!(cursor.peek(), Some('g'));
//! cursor.advance();
//! assert_eq!(cursor.peek(), Some('o'));
//! ```

use crate::span::{Pos, Position};

// =============================================================================
// CURSOR
// =============================================================================

/// Character cursor with position tracking.
///
/// ## Example
///
/// ```rust
/// use go_parser::lexer::Cursor;
///
/// let mut cursor = Cursor::new("func");
/// assert_eq!(cursor.advance(), Some('f'));
/// assert_eq!(cursor.offset(), 1);
/// ```
pub struct Cursor<'a> {
    /// Source text.
    source: &'a str,
    /// Current byte offset.
    byte: usize,
    /// Current line (0-indexed).
    line: usize,
    /// Current column (0-indexed, in bytes).
    column: usize,
    /// Offsets of every line start seen so far.
    line_starts: Vec<usize>,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor for source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            byte: 0,
            line: 0,
            column: 0,
            line_starts: vec![0],
        }
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.byte
    }

    /// Current position as a tree position.
    pub fn pos(&self) -> Pos {
        Pos::from_offset(self.byte)
    }

    /// Current position with 1-based line and column.
    pub fn position(&self) -> Position {
        Position::new(self.byte, self.line + 1, self.column + 1)
    }

    /// Check if at end of file.
    pub fn is_eof(&self) -> bool {
        self.byte >= self.source.len()
    }

    /// Unconsumed source text.
    pub fn rest(&self) -> &'a str {
        &self.source[self.byte..]
    }

    /// Source text between `start` and the current offset.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.byte]
    }

    /// Peek at current character without consuming it.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use go_parser::lexer::Cursor;
    ///
    /// let cursor = Cursor::new("abc");
    /// assert_eq!(cursor.peek(), Some('a'));
    /// assert_eq!(cursor.peek(), Some('a'));
    /// ```
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek at next character (one ahead of current).
    pub fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next(); // Skip current
        chars.next()
    }

    /// Advance to next character.
    ///
    /// ## Returns
    ///
    /// Character that was consumed, or None if at EOF
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;

        self.byte += c.len_utf8();

        if c == '\n' {
            self.line += 1;
            self.column = 0;
            self.line_starts.push(self.byte);
        } else {
            self.column += c.len_utf8();
        }

        Some(c)
    }

    /// Consume `c` if it is the current character.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance while predicate is true.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use go_parser::lexer::Cursor;
    ///
    /// let mut cursor = Cursor::new("abc123");
    /// cursor.advance_while(|c| c.is_alphabetic());
    /// assert_eq!(cursor.peek(), Some('1'));
    /// ```
    pub fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
    }

    /// Line start offsets collected so far.
    pub fn into_line_starts(self) -> Vec<usize> {
        self.line_starts
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_empty() {
        let cursor = Cursor::new("");
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn test_cursor_peek_next() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
    }

    #[test]
    fn test_cursor_advance() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.advance(), Some('b'));
        assert_eq!(cursor.advance(), None);
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_cursor_newline_tracks_lines() {
        let mut cursor = Cursor::new("a\nb");
        cursor.advance(); // 'a'
        assert_eq!(cursor.position().line, 1);
        cursor.advance(); // '\n'
        assert_eq!(cursor.position().line, 2);
        assert_eq!(cursor.position().column, 1);
        cursor.advance();
        assert_eq!(cursor.into_line_starts(), vec![0, 2]);
    }

    #[test]
    fn test_cursor_eat() {
        let mut cursor = Cursor::new("=x");
        assert!(!cursor.eat('x'));
        assert!(cursor.eat('='));
        assert_eq!(cursor.slice_from(0), "=");
        assert_eq!(cursor.rest(), "x");
    }

    #[test]
    fn test_cursor_utf8() {
        let mut cursor = Cursor::new("é");
        assert_eq!(cursor.advance(), Some('é'));
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.pos(), Pos::from_offset(2));
    }
}
