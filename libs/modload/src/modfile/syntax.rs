//! # Manifest Syntax Tree
//!
//! The line-oriented tree of a manifest file. Every directive is either a
//! single [`Line`] (`require a v1.0.0`) or a [`LineBlock`] factoring the
//! verb out of several lines (`require ( ... )`). Comments stay attached
//! to the statements they document so a manifest can be edited and
//! printed back without losing them.
//!
//! Tokens are stored exactly as written, quotes included.

use serde::{Deserialize, Serialize};

// =============================================================================
// POSITIONS AND COMMENTS
// =============================================================================

/// A location in a manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
    /// Byte offset.
    pub byte: usize,
}

/// A single `//` comment, including the slashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Where the comment starts.
    pub start: Position,
    /// Comment text.
    pub token: String,
}

/// Comments attached to a statement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comments {
    /// Whole-line comments directly above.
    pub before: Vec<Comment>,
    /// Comments at the end of the same line.
    pub suffix: Vec<Comment>,
}

// =============================================================================
// STATEMENTS
// =============================================================================

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// Comments separated from the next statement by a blank line.
    Comment(CommentBlock),
    /// A single-line directive.
    Line(Line),
    /// A parenthesized group of directives sharing a verb.
    Block(LineBlock),
}

/// A free-standing group of comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentBlock {
    /// Where the group starts.
    pub start: Position,
    /// The comments, in order.
    pub comments: Vec<Comment>,
}

/// One line of tokens.
///
/// Inside a block the verb belongs to the block, so `token` holds only the
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Line {
    /// Where the line starts.
    pub start: Position,
    /// Tokens, as written.
    pub token: Vec<String>,
    /// Attached comments.
    pub comments: Comments,
    /// Whether the line lives inside a [`LineBlock`].
    pub in_block: bool,
}

/// A factored block: `verb ( lines )`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBlock {
    /// Where the verb starts.
    pub start: Position,
    /// Factored tokens, normally just the verb.
    pub token: Vec<String>,
    /// Comments above the verb and after the `(`.
    pub comments: Comments,
    /// Lines inside the parentheses.
    pub line: Vec<Line>,
    /// Comments between the last line and the `)`.
    pub rparen: Vec<Comment>,
}

impl Line {
    /// Line made of tokens with no source location.
    pub fn new(token: Vec<String>) -> Self {
        Self {
            token,
            ..Self::default()
        }
    }
}

// =============================================================================
// FILE SYNTAX
// =============================================================================

/// The syntax tree of a whole manifest.
///
/// `Clone` copies every statement, so edits to a clone never reach the
/// original.
///
/// ## Example
///
/// ```rust
/// use modload::modfile::{Expr, FileSyntax, Line};
///
/// let mut syntax = FileSyntax::new("go.mod");
/// syntax.add_line("require", Line::new(vec!["a.example".into(), "v1.0.0".into()]));
/// syntax.add_line("require", Line::new(vec!["b.example".into(), "v1.0.0".into()]));
/// assert!(matches!(&syntax.stmts[..], [Expr::Block(_)]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSyntax {
    /// File name the tree was read from.
    pub name: String,
    /// Top-level statements.
    pub stmts: Vec<Expr>,
}

impl FileSyntax {
    /// Empty tree for `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stmts: Vec::new(),
        }
    }

    /// Append a directive next to the last statement with the same verb.
    ///
    /// The new line joins an existing block for that verb. A lone line
    /// with that verb is first turned into a block holding both lines.
    /// Without any statement for the verb the line goes at the end.
    ///
    /// ## Parameters
    ///
    /// - `verb`: directive name
    /// - `line`: the arguments, with any comments to attach
    pub fn add_line(&mut self, verb: &str, mut line: Line) {
        let hint = self.stmts.iter().rposition(|stmt| match stmt {
            Expr::Line(l) => l.token.first().map(String::as_str) == Some(verb),
            Expr::Block(b) => b.token.first().map(String::as_str) == Some(verb),
            Expr::Comment(_) => false,
        });
        let Some(i) = hint else {
            line.token.insert(0, verb.to_string());
            line.in_block = false;
            self.stmts.push(Expr::Line(line));
            return;
        };

        line.in_block = true;
        match &mut self.stmts[i] {
            Expr::Line(existing) => {
                let mut first = std::mem::take(existing);
                let verb = first.token.remove(0);
                first.in_block = true;
                let comments = Comments {
                    before: std::mem::take(&mut first.comments.before),
                    suffix: Vec::new(),
                };
                self.stmts[i] = Expr::Block(LineBlock {
                    start: first.start,
                    token: vec![verb],
                    comments,
                    line: vec![first, line],
                    rparen: Vec::new(),
                });
            }
            Expr::Block(block) => block.line.push(line),
            Expr::Comment(_) => {}
        }
    }

    /// Every directive line with its verb, in source order.
    pub fn lines(&self) -> impl Iterator<Item = (&str, &Line)> {
        self.stmts.iter().flat_map(|stmt| {
            let items: Vec<(&str, &Line)> = match stmt {
                Expr::Comment(_) => Vec::new(),
                Expr::Line(l) => match l.token.first() {
                    Some(verb) => vec![(verb.as_str(), l)],
                    None => Vec::new(),
                },
                Expr::Block(b) => {
                    let verb = b.token.first().map(String::as_str).unwrap_or("");
                    b.line.iter().map(|l| (verb, l)).collect()
                }
            };
            items
        })
    }

    /// Mutable access to every directive line with its verb.
    pub fn lines_mut(&mut self) -> Vec<(String, &mut Line)> {
        let mut out = Vec::new();
        for stmt in &mut self.stmts {
            match stmt {
                Expr::Comment(_) => {}
                Expr::Line(l) => {
                    if let Some(verb) = l.token.first().cloned() {
                        out.push((verb, l));
                    }
                }
                Expr::Block(b) => {
                    let verb = b.token.first().cloned().unwrap_or_default();
                    for l in &mut b.line {
                        out.push((verb.clone(), l));
                    }
                }
            }
        }
        out
    }
}

/// Arguments of a directive line, without the verb.
pub(crate) fn args_of(line: &Line) -> &[String] {
    if line.in_block {
        &line.token
    } else {
        line.token.get(1..).unwrap_or(&[])
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn add(syntax: &mut FileSyntax, tokens: &[&str]) {
        let args = tokens[1..].iter().map(|t| t.to_string()).collect();
        syntax.add_line(tokens[0], Line::new(args));
    }

    #[test]
    fn test_add_line_appends_when_verb_is_new() {
        let mut syntax = FileSyntax::new("go.mod");
        add(&mut syntax, &["module", "m"]);
        add(&mut syntax, &["require", "a", "v1.0.0"]);
        assert_eq!(syntax.stmts.len(), 2);
        let (verb, line) = syntax.lines().nth(1).unwrap();
        assert_eq!(verb, "require");
        assert_eq!(args_of(line), ["a", "v1.0.0"]);
    }

    #[test]
    fn test_add_line_converts_single_line_to_block() {
        let mut syntax = FileSyntax::new("go.mod");
        add(&mut syntax, &["require", "a", "v1.0.0"]);
        add(&mut syntax, &["module", "m"]);
        add(&mut syntax, &["require", "b", "v2.0.0"]);

        let Expr::Block(block) = &syntax.stmts[0] else {
            panic!("expected a block, got {:?}", syntax.stmts[0]);
        };
        assert_eq!(block.token, ["require"]);
        assert_eq!(block.line.len(), 2);
        assert!(block.line.iter().all(|l| l.in_block));
        assert_eq!(block.line[0].token, ["a", "v1.0.0"]);
        assert_eq!(block.line[1].token, ["b", "v2.0.0"]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut syntax = FileSyntax::new("go.mod");
        add(&mut syntax, &["require", "a", "v1.0.0"]);
        add(&mut syntax, &["require", "b", "v1.0.0"]);
        let mut copy = syntax.clone();
        add(&mut copy, &["require", "c", "v1.0.0"]);

        let Expr::Block(original) = &syntax.stmts[0] else {
            panic!("expected a block");
        };
        assert_eq!(original.line.len(), 2);
    }

    #[test]
    fn test_lines_flatten_blocks() {
        let mut syntax = FileSyntax::new("go.mod");
        add(&mut syntax, &["module", "m"]);
        add(&mut syntax, &["replace", "a", "=>", "../a"]);
        add(&mut syntax, &["replace", "b", "=>", "../b"]);
        let verbs: Vec<_> = syntax.lines().map(|(v, _)| v).collect();
        assert_eq!(verbs, ["module", "replace", "replace"]);
    }
}
