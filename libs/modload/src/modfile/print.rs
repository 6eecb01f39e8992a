//! # Manifest Printer
//!
//! Prints a [`FileSyntax`] in canonical layout: one blank line between
//! top-level statements, block lines indented by a tab, comments kept
//! where they were attached.

use super::syntax::{Comment, Expr, FileSyntax, Line};

/// Print a syntax tree.
///
/// ## Example
///
/// ```rust
/// use modload::modfile::{format, read};
///
/// let syntax = read("go.mod", "module   m\ngo 1.18\n").unwrap();
/// assert_eq!(format(&syntax), b"module m\n\ngo 1.18\n");
/// ```
pub fn format(syntax: &FileSyntax) -> Vec<u8> {
    let mut out = String::new();
    for (i, stmt) in syntax.stmts.iter().enumerate() {
        match stmt {
            Expr::Comment(block) => comments(&mut out, &block.comments, 0),
            Expr::Line(line) => print_line(&mut out, line, 0),
            Expr::Block(block) => {
                comments(&mut out, &block.comments.before, 0);
                out.push_str(&join_tokens(&block.token));
                out.push_str(" (");
                suffix(&mut out, &block.comments.suffix);
                out.push('\n');
                for line in &block.line {
                    print_line(&mut out, line, 1);
                }
                comments(&mut out, &block.rparen, 1);
                out.push_str(")\n");
            }
        }
        if i + 1 < syntax.stmts.len() {
            out.push('\n');
        }
    }
    out.into_bytes()
}

fn print_line(out: &mut String, line: &Line, indent: usize) {
    comments(out, &line.comments.before, indent);
    push_indent(out, indent);
    out.push_str(&join_tokens(&line.token));
    suffix(out, &line.comments.suffix);
    out.push('\n');
}

fn comments(out: &mut String, list: &[Comment], indent: usize) {
    for c in list {
        push_indent(out, indent);
        out.push_str(c.token.trim());
        out.push('\n');
    }
}

fn suffix(out: &mut String, list: &[Comment]) {
    for c in list {
        out.push(' ');
        out.push_str(c.token.trim());
    }
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push('\t');
    }
}

/// Tokens separated by single spaces; brackets and commas hug their
/// neighbours.
fn join_tokens(tokens: &[String]) -> String {
    let mut out = String::new();
    let mut prev: Option<&str> = None;
    for t in tokens {
        let glued = matches!(t.as_str(), "]" | ",") || prev == Some("[");
        if prev.is_some() && !glued {
            out.push(' ');
        }
        out.push_str(t);
        prev = Some(t.as_str());
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
