//! # Go+ Printer
//!
//! Renders a Go+ tree back to canonical source text. Layout follows the
//! gofmt conventions: tabs for indentation, aligned columns for runs of
//! similar lines, at most one blank line between items, and line breaks
//! kept where the source had them.
//!
//! ## Architecture
//!
//! ```text
//! File → Printer (cells + lines) → tabwriter (column alignment) → String
//! ```
//!
//! The printer writes text into cells. A vertical tab ends a cell, a
//! newline ends a line; indentation is fixed when the first text of a
//! line is written, so a pending unindent applies to the next line.
//! Comments of the file are interleaved by position: each list item
//! flushes the comments that precede it.
//!
//! ## Example
//!
//! ```rust
//! use gop_ast::fromgo::{ast_file, ConvertOptions};
//! use gop_ast::printer::format_file;
//!
//! let src = "package main\n\nvar x = 1\n";
//! let file = go_parser::parse_file("main.go", src).unwrap();
//! let out = format_file(&ast_file(Some(&file), ConvertOptions::empty())).unwrap();
//! assert_eq!(out, src);
//! ```

mod expressions;
mod nodes;
mod statements;
mod tabwriter;

use crate::ast::{CommentGroup, Expr, File};
use crate::token::{LineTable, Pos, Position};
use config::constants::MAX_NEWLINES;
use tabwriter::Line;
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while printing a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// The tree holds a placeholder node that has no source form.
    #[error("{position}: cannot print {kind}")]
    BadNode {
        kind: &'static str,
        position: Position,
    },
}

pub(crate) type FResult<T> = Result<T, FormatError>;

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Print a whole file, comments included.
///
/// ## Returns
///
/// The formatted source, ending with a newline.
///
/// ## Example
///
/// ```rust
/// use gop_ast::fromgo::{ast_file, ConvertOptions};
/// use gop_ast::printer::format_file;
///
/// let src = "package main\n\nfunc main()   {}\n";
/// let file = go_parser::parse_file("main.go", src).unwrap();
/// let out = format_file(&ast_file(Some(&file), ConvertOptions::empty())).unwrap();
/// assert_eq!(out, "package main\n\nfunc main() {}\n");
/// ```
pub fn format_file(file: &File) -> Result<String, FormatError> {
    let mut p = Printer::new(&file.lines, &file.comments);
    p.file(file)?;
    let mut out = p.finish();
    out.push('\n');
    tracing::trace!(bytes = out.len(), "formatted file");
    Ok(out)
}

/// Print a single expression.
///
/// `lines` maps the positions inside `expr`; synthesized nodes without
/// positions print on one line.
pub fn format_node(expr: &Expr, lines: &LineTable) -> Result<String, FormatError> {
    let mut p = Printer::new(lines, &[]);
    p.expr(expr)?;
    Ok(p.finish())
}

// =============================================================================
// PRINTER
// =============================================================================

pub(crate) struct Printer<'a> {
    lines: &'a LineTable,
    comments: &'a [CommentGroup],
    next_comment: usize,
    out: Vec<Line>,
    cur: Line,
    started: bool,
    indent: usize,
    /// Source line of the last printed position.
    last_line: usize,
}

impl<'a> Printer<'a> {
    fn new(lines: &'a LineTable, comments: &'a [CommentGroup]) -> Self {
        Self {
            lines,
            comments,
            next_comment: 0,
            out: Vec::new(),
            cur: Line::new(),
            started: false,
            indent: 0,
            last_line: 0,
        }
    }

    fn finish(mut self) -> String {
        if self.started {
            let line = std::mem::replace(&mut self.cur, Line::new());
            self.out.push(line);
        }
        tabwriter::render(&self.out)
    }

    // -------------------------------------------------------------------------
    // Output primitives
    // -------------------------------------------------------------------------

    pub(crate) fn line(&self, pos: Pos) -> usize {
        self.lines.line(pos)
    }

    pub(crate) fn set_pos(&mut self, pos: Pos) {
        if pos.is_valid() {
            self.last_line = self.line(pos);
        }
    }

    fn start_line(&mut self) {
        if !self.started {
            self.started = true;
            self.cur.indent = self.indent;
        }
    }

    pub(crate) fn text(&mut self, s: &str) {
        self.start_line();
        if let Some(cell) = self.cur.cells.last_mut() {
            cell.push_str(s);
        }
    }

    pub(crate) fn blank(&mut self) {
        self.text(" ");
    }

    pub(crate) fn vtab(&mut self) {
        self.start_line();
        self.cur.cells.push(String::new());
    }

    pub(crate) fn newline(&mut self, section_end: bool) {
        let mut line = std::mem::replace(&mut self.cur, Line::new());
        if !self.started {
            line.indent = 0;
        }
        line.section_end = section_end;
        self.out.push(line);
        self.started = false;
    }

    fn at_start(&self) -> bool {
        self.out.is_empty() && !self.started
    }

    /// Number of finished output lines, used to detect multi-line items.
    pub(crate) fn lines_out(&self) -> usize {
        self.out.len()
    }

    /// Break the line so that the next item starts on source line `line`.
    ///
    /// Prints between `min` and [`MAX_NEWLINES`] newlines; the first one
    /// ends a section when `section` is set. Returns the number of breaks,
    /// counting a section end twice.
    pub(crate) fn linebreak(&mut self, line: usize, min: usize, section: bool) -> usize {
        if self.at_start() {
            if line > 0 {
                self.last_line = line;
            }
            return 0;
        }
        let gap = if line > 0 && self.last_line > 0 {
            line.saturating_sub(self.last_line)
        } else {
            0
        };
        let n = gap.min(MAX_NEWLINES).max(min);
        for i in 0..n {
            self.newline(section && i == 0);
        }
        if line > 0 {
            self.last_line = line;
        }
        if section && n > 0 {
            n + 1
        } else {
            n
        }
    }

    /// Move to the item at `pos`, printing the comments before it first.
    pub(crate) fn break_to(&mut self, pos: Pos, min: usize, section: bool) {
        let line = self.line(pos);
        if self.comments_before(pos, min, section) {
            self.linebreak(line, 1, false);
        } else {
            self.linebreak(line, min, section);
        }
    }

    // -------------------------------------------------------------------------
    // Comments
    // -------------------------------------------------------------------------

    /// Print the pending comments located before `pos`.
    ///
    /// Comments on the line of the last printed item become trailing
    /// cells; the others go on their own lines, the first one separated
    /// by `min` newlines. Returns whether any comment got its own line.
    pub(crate) fn comments_before(&mut self, pos: Pos, min: usize, section: bool) -> bool {
        if !pos.is_valid() {
            return false;
        }
        let comments = self.comments;
        let mut own_line = false;
        while let Some(group) = comments.get(self.next_comment) {
            if group.pos() >= pos {
                break;
            }
            self.next_comment += 1;
            own_line |= self.comment_group(group, min, section, own_line);
        }
        own_line
    }

    /// Print every comment not printed yet.
    pub(crate) fn flush_comments(&mut self) {
        let comments = self.comments;
        let mut own_line = false;
        while let Some(group) = comments.get(self.next_comment) {
            self.next_comment += 1;
            own_line |= self.comment_group(group, 1, false, own_line);
        }
    }

    fn comment_group(
        &mut self,
        group: &CommentGroup,
        min: usize,
        section: bool,
        mut own_line: bool,
    ) -> bool {
        let mut printed_own_line = false;
        for c in &group.list {
            let cline = self.line(c.slash);
            if self.started && cline == self.last_line {
                if self.cur.cells.last().is_some_and(|cell| !cell.is_empty()) {
                    self.vtab();
                }
            } else {
                if own_line {
                    self.linebreak(cline, 1, false);
                } else {
                    self.linebreak(cline, min, section);
                }
                own_line = true;
                printed_own_line = true;
            }
            self.text(&c.text);
            self.set_pos(c.end());
        }
        printed_own_line
    }

    /// Whether an unprinted comment starts on the current source line.
    pub(crate) fn trailing_comment_follows(&self) -> bool {
        self.comments
            .get(self.next_comment)
            .is_some_and(|c| self.line(c.pos()) == self.last_line)
    }

    /// Whether an unprinted comment lies between `from` and `to`.
    pub(crate) fn comment_between(&self, from: Pos, to: Pos) -> bool {
        self.comments
            .get(self.next_comment)
            .is_some_and(|c| c.pos() > from && (!to.is_valid() || c.pos() < to))
    }

    // -------------------------------------------------------------------------
    // Measuring
    // -------------------------------------------------------------------------

    /// Width of `print` when rendered on one line, or `max + 1` if it
    /// needs more than one line or more than `max` columns.
    pub(crate) fn node_size<F>(&self, start: Pos, max: usize, print: F) -> usize
    where
        F: FnOnce(&mut Printer<'a>) -> FResult<()>,
    {
        let mut sub = Printer::new(self.lines, &[]);
        if start.is_valid() {
            sub.last_line = self.line(start);
        }
        if print(&mut sub).is_err() || !sub.out.is_empty() {
            return max + 1;
        }
        let cells = &sub.cur.cells;
        let size = cells.iter().map(|c| c.chars().count()).sum::<usize>() + cells.len() - 1;
        size.min(max + 1)
    }

    pub(crate) fn bad_node(&self, kind: &'static str, pos: Pos) -> FormatError {
        FormatError::BadNode {
            kind,
            position: self.lines.position(pos),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
