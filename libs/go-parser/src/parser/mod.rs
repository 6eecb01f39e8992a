//! # Go Parser
//!
//! Recursive descent parser for Go source files.
//! Produces the tree in [`crate::ast`]; identifier binding happens in a
//! separate pass (see [`crate::resolver`]).
//!
//! ## Example
//!
//! ```rust
//! use go_parser::lexer::Lexer;
//! use go_parser::parser::Parser;
//!
//! let src = "package main\n\nvar x = 1\n";
//! let lexed = Lexer::new("main.go", src).tokenize().unwrap();
//! let file = Parser::new("main.go", lexed).parse_file().unwrap();
//! assert_eq!(file.name.name, "main");
//! assert_eq!(file.decls.len(), 1);
//! ```

mod declarations;
mod expressions;
mod statements;
mod types;

use crate::ast::{Comment, CommentGroup, Decl, File, Ident, Spec};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Lexed, Token, TokenKind};
use crate::span::{LineTable, Pos};

/// Result type used throughout the parser.
pub(crate) type PResult<T> = Result<T, ParseError>;

// =============================================================================
// PARSER
// =============================================================================

/// Recursive descent parser for Go.
pub struct Parser<'a> {
    /// File name for error messages.
    filename: &'a str,
    /// Token stream including comments.
    tokens: Vec<Token>,
    /// Index of the current token (never a comment).
    current: usize,
    /// Line starts of the source.
    lines: LineTable,
    /// Every comment group seen so far.
    comments: Vec<CommentGroup>,
    /// Comment group ending on the line before the current token.
    lead_comment: Option<CommentGroup>,
    /// Comment group trailing the previous token on its line.
    line_comment: Option<CommentGroup>,
    /// Negative inside control clauses, where `T{` starts a block.
    expr_lev: i32,
}

impl<'a> Parser<'a> {
    /// Create a new parser over lexed tokens.
    ///
    /// ## Parameters
    ///
    /// - `filename`: Name used in error messages
    /// - `lexed`: Output of [`crate::lexer::Lexer::tokenize`]
    pub fn new(filename: &'a str, lexed: Lexed) -> Self {
        let mut parser = Self {
            filename,
            tokens: lexed.tokens,
            current: 0,
            lines: lexed.lines,
            comments: Vec::new(),
            lead_comment: None,
            line_comment: None,
            expr_lev: 0,
        };
        parser.collect_comments(Pos::NONE);
        parser
    }

    /// Parse a complete source file.
    ///
    /// ## Returns
    ///
    /// The file tree with unresolved identifiers left unbound, or the
    /// first syntax error.
    pub fn parse_file(mut self) -> PResult<File> {
        let doc = self.lead_comment.take();
        let package = self.expect(TokenKind::Package)?;
        let name = self.parse_ident()?;
        if name.name == "_" {
            return Err(self.error_at(name.name_pos, "invalid package name _"));
        }
        self.expect_semi()?;

        let mut decls = Vec::new();
        while self.tok() == TokenKind::Import {
            decls.push(Decl::Gen(self.parse_gen_decl(TokenKind::Import)?));
        }
        while self.tok() != TokenKind::Eof {
            decls.push(self.parse_decl()?);
        }

        let imports = decls
            .iter()
            .filter_map(|d| match d {
                Decl::Gen(g) => Some(g),
                _ => None,
            })
            .flat_map(|g| g.specs.iter())
            .filter_map(|s| match s {
                Spec::Import(i) => Some(i.clone()),
                _ => None,
            })
            .collect();

        Ok(File {
            doc,
            package,
            name,
            decls,
            imports,
            unresolved: Vec::new(),
            comments: self.comments,
            lines: self.lines,
        })
    }

    // =========================================================================
    // TOKEN ACCESS
    // =========================================================================

    /// Get current token.
    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// Get current token kind.
    fn tok(&self) -> TokenKind {
        self.peek().kind
    }

    /// Get current token position.
    fn pos(&self) -> Pos {
        self.peek().pos
    }

    /// Get current token text.
    fn lit(&self) -> &str {
        &self.peek().text
    }

    /// Line of a position.
    fn line(&self, pos: Pos) -> usize {
        self.lines.line(pos)
    }

    /// Step to the next raw token, comments included.
    fn next0(&mut self) {
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
    }

    /// Advance to the next non-comment token, grouping the comments
    /// skipped on the way into lead and line comments.
    fn next(&mut self) {
        let prev = self.pos();
        self.next0();
        self.collect_comments(prev);
    }

    fn collect_comments(&mut self, prev: Pos) {
        self.lead_comment = None;
        self.line_comment = None;
        if self.tok() != TokenKind::Comment {
            return;
        }

        let mut comment = None;
        if prev.is_valid() && self.line(self.pos()) == self.line(prev) {
            // Same line as the previous token: may be a line comment.
            let (group, endline) = self.consume_comment_group(0);
            if self.line(self.pos()) != endline
                || matches!(self.tok(), TokenKind::Semicolon | TokenKind::Eof)
            {
                self.line_comment = Some(group.clone());
            }
            comment = Some(group);
        }

        let mut endline: isize = -1;
        while self.tok() == TokenKind::Comment {
            let (group, end) = self.consume_comment_group(1);
            endline = end as isize;
            comment = Some(group);
        }

        if endline + 1 == self.line(self.pos()) as isize {
            self.lead_comment = comment;
        }
    }

    fn consume_comment(&mut self) -> (Comment, usize) {
        let token = self.peek();
        let comment = Comment {
            slash: token.pos,
            text: token.text.clone(),
        };
        let endline = self.line(comment.end());
        self.next0();
        (comment, endline)
    }

    fn consume_comment_group(&mut self, n: usize) -> (CommentGroup, usize) {
        let mut list = Vec::new();
        let mut endline = self.line(self.pos());
        while self.tok() == TokenKind::Comment && self.line(self.pos()) <= endline + n {
            let (comment, end) = self.consume_comment();
            endline = end;
            list.push(comment);
        }
        let group = CommentGroup { list };
        self.comments.push(group.clone());
        (group, endline)
    }

    /// Consume token if it matches expected kind.
    ///
    /// ## Returns
    ///
    /// Position of the consumed token, or a parse error
    fn expect(&mut self, kind: TokenKind) -> PResult<Pos> {
        let pos = self.pos();
        if self.tok() != kind {
            return Err(self.error_expected(&format!("'{}'", kind.display())));
        }
        self.next();
        Ok(pos)
    }

    /// Consume the closing token of a list, explaining a missing comma
    /// before a newline.
    fn expect_closing(&mut self, kind: TokenKind, context: &str) -> PResult<Pos> {
        if self.tok() != kind && self.tok() == TokenKind::Semicolon && self.lit() == "\n" {
            return Err(self.error(&format!("missing ',' before newline in {}", context)));
        }
        self.expect(kind)
    }

    /// Try to consume token if it matches.
    fn got(&mut self, kind: TokenKind) -> bool {
        if self.tok() == kind {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consume a statement terminator; `)` and `}` terminate implicitly.
    fn expect_semi(&mut self) -> PResult<()> {
        match self.tok() {
            TokenKind::Rparen | TokenKind::Rbrace => Ok(()),
            TokenKind::Semicolon => {
                self.next();
                Ok(())
            }
            _ => Err(self.error_expected("';'")),
        }
    }

    /// Whether a list continues with a comma before `follow`.
    fn at_comma(&self, context: &str, follow: TokenKind) -> PResult<bool> {
        if self.tok() == TokenKind::Comma {
            return Ok(true);
        }
        if self.tok() != follow {
            let mut msg = String::from("missing ','");
            if self.tok() == TokenKind::Semicolon && self.lit() == "\n" {
                msg.push_str(" before newline");
            }
            return Err(self.error(&format!("{} in {}", msg, context)));
        }
        Ok(false)
    }

    // =========================================================================
    // ERRORS
    // =========================================================================

    fn error_at(&self, pos: Pos, msg: &str) -> ParseError {
        ParseError::new(
            self.filename,
            self.lines.position(pos),
            ParseErrorKind::Syntax(msg.to_string()),
        )
    }

    fn error(&self, msg: &str) -> ParseError {
        self.error_at(self.pos(), msg)
    }

    fn error_expected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Semicolon if token.text == "\n" => "newline".to_string(),
            TokenKind::Eof => "EOF".to_string(),
            kind if kind.is_literal() => token.text.clone(),
            kind => format!("'{}'", kind.display()),
        };
        ParseError::new(
            self.filename,
            self.lines.position(token.pos),
            ParseErrorKind::UnexpectedToken {
                found,
                expected: expected.to_string(),
            },
        )
    }

    // =========================================================================
    // IDENTIFIERS
    // =========================================================================

    fn parse_ident(&mut self) -> PResult<Ident> {
        if self.tok() != TokenKind::Ident {
            return Err(self.error_expected("identifier"));
        }
        let ident = Ident::new(self.pos(), self.lit());
        self.next();
        Ok(ident)
    }

    fn parse_ident_list(&mut self) -> PResult<Vec<Ident>> {
        let mut list = vec![self.parse_ident()?];
        while self.got(TokenKind::Comma) {
            list.push(self.parse_ident()?);
        }
        Ok(list)
    }
}

// =============================================================================
// TESTS
// =============================================================================
