//! # Source Positions
//!
//! Compact positions for tree nodes and a line table to turn them back
//! into line/column pairs.
//!
//! A [`Pos`] is a 1-based byte offset so that the zero value can mean
//! "no position", which lets synthesized nodes omit source locations.
//!
//! ## Example
//!
//! ```rust
//! use go_parser::span::{LineTable, Pos};
//!
//! let lines = LineTable::from_source("package main\n\nfunc f() {}\n");
//! let pos = Pos::from_offset(14);
//! assert_eq!(lines.line(pos), 3);
//! assert_eq!(lines.line(Pos::NONE), 0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// POS
// =============================================================================

/// A position inside one source file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Pos(u32);

impl Pos {
    /// The absent position.
    pub const NONE: Pos = Pos(0);

    /// Position of the byte at `offset`.
    pub fn from_offset(offset: usize) -> Self {
        Pos(offset as u32 + 1)
    }

    /// Whether this position refers to source text.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Byte offset, or `None` for [`Pos::NONE`].
    pub fn offset(self) -> Option<usize> {
        self.0.checked_sub(1).map(|o| o as usize)
    }

    /// Position `n` bytes further; the absent position stays absent.
    pub fn advance(self, n: usize) -> Pos {
        if self.is_valid() {
            Pos(self.0 + n as u32)
        } else {
            self
        }
    }
}

// =============================================================================
// POSITION
// =============================================================================

/// Human readable location (1-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset (0-indexed).
    pub offset: usize,
    /// Line number (1-indexed, 0 when unknown).
    pub line: usize,
    /// Column in bytes (1-indexed, 0 when unknown).
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Whether the line is known.
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// =============================================================================
// LINE TABLE
// =============================================================================

/// Byte offsets of the first character of every line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineTable {
    starts: Vec<usize>,
}

impl LineTable {
    /// Build a table from known line start offsets.
    ///
    /// The first line always starts at offset 0.
    pub fn new(mut starts: Vec<usize>) -> Self {
        if starts.first() != Some(&0) {
            starts.insert(0, 0);
        }
        Self { starts }
    }

    /// Scan `source` for line starts.
    pub fn from_source(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Whether the table is empty (never true for a parsed file).
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Line (1-based) of `pos`, or 0 for an absent position.
    pub fn line(&self, pos: Pos) -> usize {
        self.position(pos).line
    }

    /// Resolve `pos` to a full [`Position`].
    pub fn position(&self, pos: Pos) -> Position {
        let Some(offset) = pos.offset() else {
            return Position::default();
        };
        let idx = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let start = self.starts.get(idx).copied().unwrap_or(0);
        Position::new(offset, idx + 1, offset - start + 1)
    }
}

// =============================================================================
// TESTS
// =============================================================================
