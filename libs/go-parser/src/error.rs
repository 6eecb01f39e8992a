//! # Parse Errors
//!
//! Error types for the Go lexer and parser.
//!
//! ## Example
//!
//! ```rust
//! use go_parser::error::{ParseError, ParseErrorKind};
//! use go_parser::span::Position;
//!
//! let error = ParseError::new(
//!     "foo.go",
//!     Position::new(8, 1, 9),
//!     ParseErrorKind::UnexpectedToken {
//!         found: ")".to_string(),
//!         expected: "identifier".to_string(),
//!     },
//! );
//! assert_eq!(error.to_string(), "foo.go:1:9: expected identifier, found )");
//! ```

use crate::span::Position;
use thiserror::Error;

// =============================================================================
// PARSE ERROR
// =============================================================================

/// A parse error with location information.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{filename}:{position}: {kind}")]
pub struct ParseError {
    /// Name of the file being parsed.
    pub filename: String,
    /// Location of the offending token or character.
    pub position: Position,
    /// Error kind with details.
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(filename: &str, position: Position, kind: ParseErrorKind) -> Self {
        Self {
            filename: filename.to_string(),
            position,
            kind,
        }
    }
}

// =============================================================================
// PARSE ERROR KIND
// =============================================================================

/// Kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Unexpected token.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// Token that was found
        found: String,
        /// Description of expected token
        expected: String,
    },

    /// Character outside the Go alphabet.
    #[error("illegal character {0:?}")]
    IllegalChar(char),

    /// `/*` without matching `*/`.
    #[error("comment not terminated")]
    UnterminatedComment,

    /// String literal hit a newline or EOF.
    #[error("string literal not terminated")]
    UnterminatedString,

    /// Rune literal hit a newline or EOF.
    #[error("rune literal not terminated")]
    UnterminatedChar,

    /// Malformed construct with a free-form description.
    #[error("{0}")]
    Syntax(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_has_location() {
        let err = ParseError::new(
            "a.go",
            Position::new(3, 2, 1),
            ParseErrorKind::IllegalChar('#'),
        );
        assert_eq!(err.to_string(), "a.go:2:1: illegal character '#'");
    }

    #[test]
    fn test_syntax_kind_display() {
        let kind = ParseErrorKind::Syntax("missing function body".to_string());
        assert_eq!(kind.to_string(), "missing function body");
    }
}
