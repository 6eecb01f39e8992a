//! # Go Lexer
//!
//! Tokenizes Go source code into tokens, inserting semicolons at line
//! ends the way the Go grammar requires. Comments are kept in the
//! token stream so the parser can attach them to declarations.
//!
//! ## Example
//!
//! ```rust
//! use go_parser::lexer::{Lexer, TokenKind};
//!
//! let lexed = Lexer::new("a.go", "x++\n").tokenize().unwrap();
//! let kinds: Vec<_> = lexed.tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![TokenKind::Ident, TokenKind::Inc, TokenKind::Semicolon, TokenKind::Eof]
//! );
//! ```

mod cursor;
mod token;

pub use cursor::Cursor;
pub use token::{Token, TokenKind, HIGHEST_PREC, LOWEST_PREC, UNARY_PREC};

use crate::error::{ParseError, ParseErrorKind};
use crate::span::{LineTable, Pos};

// =============================================================================
// LEXER OUTPUT
// =============================================================================

/// Tokens of one file plus its line table.
#[derive(Debug, Clone)]
pub struct Lexed {
    /// Tokens including comments, ending with EOF.
    pub tokens: Vec<Token>,
    /// Line starts of the source.
    pub lines: LineTable,
}

// =============================================================================
// LEXER
// =============================================================================

/// Go lexer.
pub struct Lexer<'a> {
    /// File name used in error messages.
    filename: &'a str,
    /// Character cursor.
    cursor: Cursor<'a>,
    /// Collected tokens.
    tokens: Vec<Token>,
    /// Whether a newline here terminates a statement.
    insert_semi: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for source text.
    pub fn new(filename: &'a str, source: &'a str) -> Self {
        Self {
            filename,
            cursor: Cursor::new(source),
            tokens: Vec::new(),
            insert_semi: false,
        }
    }

    /// Tokenize the entire source.
    ///
    /// ## Returns
    ///
    /// All tokens including the final EOF, or the first lexical error.
    pub fn tokenize(mut self) -> Result<Lexed, ParseError> {
        loop {
            self.skip_whitespace();

            if self.cursor.is_eof() {
                let pos = self.cursor.pos();
                if self.insert_semi {
                    self.push(TokenKind::Semicolon, pos, "\n");
                }
                self.push(TokenKind::Eof, pos, "");
                break;
            }

            if self.insert_semi && self.cursor.peek() == Some('\n') {
                let pos = self.cursor.pos();
                self.cursor.advance();
                self.push(TokenKind::Semicolon, pos, "\n");
                self.insert_semi = false;
                continue;
            }

            self.scan_token()?;
        }

        Ok(Lexed {
            tokens: self.tokens,
            lines: LineTable::new(self.cursor.into_line_starts()),
        })
    }

    fn push(&mut self, kind: TokenKind, pos: Pos, text: &str) {
        self.tokens.push(Token::new(kind, pos, text.to_string()));
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.filename, self.cursor.position(), kind)
    }

    /// Skip blanks; newlines are only skipped when no semicolon is due.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.cursor.peek() {
            let skip = match c {
                ' ' | '\t' | '\r' => true,
                '\n' => !self.insert_semi,
                _ => false,
            };
            if !skip {
                break;
            }
            self.cursor.advance();
        }
    }

    /// Scan a single token.
    fn scan_token(&mut self) -> Result<(), ParseError> {
        let start = self.cursor.offset();
        let pos = self.cursor.pos();
        let position = self.cursor.position();
        let c = match self.cursor.peek() {
            Some(c) => c,
            None => return Ok(()),
        };

        if is_letter(c) {
            self.cursor.advance_while(|c| is_letter(c) || c.is_ascii_digit());
            let text = self.cursor.slice_from(start);
            let kind = TokenKind::lookup_keyword(text).unwrap_or(TokenKind::Ident);
            self.insert_semi = matches!(
                kind,
                TokenKind::Ident
                    | TokenKind::Break
                    | TokenKind::Continue
                    | TokenKind::Fallthrough
                    | TokenKind::Return
            );
            self.push(kind, pos, text);
            return Ok(());
        }

        if c.is_ascii_digit()
            || (c == '.' && self.cursor.peek_next().map_or(false, |n| n.is_ascii_digit()))
        {
            let kind = self.scan_number();
            self.insert_semi = true;
            let text = self.cursor.slice_from(start);
            self.push(kind, pos, text);
            return Ok(());
        }

        match c {
            '"' => {
                self.scan_string()?;
                self.literal(TokenKind::String, pos, start);
                return Ok(());
            }
            '`' => {
                self.scan_raw_string()?;
                self.literal(TokenKind::String, pos, start);
                return Ok(());
            }
            '\'' => {
                self.scan_char()?;
                self.literal(TokenKind::Char, pos, start);
                return Ok(());
            }
            '/' if matches!(self.cursor.peek_next(), Some('/') | Some('*')) => {
                if self.insert_semi && self.comment_ends_line() {
                    self.push(TokenKind::Semicolon, pos, "\n");
                    self.insert_semi = false;
                    return Ok(());
                }
                self.scan_comment()?;
                let text = self.cursor.slice_from(start);
                self.push(TokenKind::Comment, pos, text);
                self.insert_semi = false;
                return Ok(());
            }
            _ => {}
        }

        self.cursor.advance();
        let kind = match c {
            '(' => TokenKind::Lparen,
            ')' => TokenKind::Rparen,
            '[' => TokenKind::Lbrack,
            ']' => TokenKind::Rbrack,
            '{' => TokenKind::Lbrace,
            '}' => TokenKind::Rbrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => {
                if self.cursor.rest().starts_with("..") {
                    self.cursor.advance();
                    self.cursor.advance();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Period
                }
            }
            ':' => self.switch2(TokenKind::Colon, TokenKind::Define),
            '+' => self.switch3(TokenKind::Add, TokenKind::AddAssign, '+', TokenKind::Inc),
            '-' => self.switch3(TokenKind::Sub, TokenKind::SubAssign, '-', TokenKind::Dec),
            '*' => self.switch2(TokenKind::Mul, TokenKind::MulAssign),
            '/' => self.switch2(TokenKind::Quo, TokenKind::QuoAssign),
            '%' => self.switch2(TokenKind::Rem, TokenKind::RemAssign),
            '^' => self.switch2(TokenKind::Xor, TokenKind::XorAssign),
            '=' => self.switch2(TokenKind::Assign, TokenKind::Eql),
            '!' => self.switch2(TokenKind::Not, TokenKind::Neq),
            '|' => self.switch3(TokenKind::Or, TokenKind::OrAssign, '|', TokenKind::Lor),
            '<' => {
                if self.cursor.eat('-') {
                    TokenKind::Arrow
                } else {
                    self.switch4(
                        TokenKind::Lss,
                        TokenKind::Leq,
                        '<',
                        TokenKind::Shl,
                        TokenKind::ShlAssign,
                    )
                }
            }
            '>' => self.switch4(
                TokenKind::Gtr,
                TokenKind::Geq,
                '>',
                TokenKind::Shr,
                TokenKind::ShrAssign,
            ),
            '&' => {
                if self.cursor.eat('^') {
                    self.switch2(TokenKind::AndNot, TokenKind::AndNotAssign)
                } else {
                    self.switch3(TokenKind::And, TokenKind::AndAssign, '&', TokenKind::Land)
                }
            }
            other => {
                return Err(ParseError::new(
                    self.filename,
                    position,
                    ParseErrorKind::IllegalChar(other),
                ))
            }
        };

        self.insert_semi = matches!(
            kind,
            TokenKind::Rparen
                | TokenKind::Rbrack
                | TokenKind::Rbrace
                | TokenKind::Inc
                | TokenKind::Dec
        );
        let text = self.cursor.slice_from(start);
        self.push(kind, pos, text);
        Ok(())
    }

    fn literal(&mut self, kind: TokenKind, pos: Pos, start: usize) {
        self.insert_semi = true;
        let text = self.cursor.slice_from(start);
        self.push(kind, pos, text);
    }

    // =========================================================================
    // OPERATORS
    // =========================================================================

    /// `x` or `x=`.
    fn switch2(&mut self, plain: TokenKind, assign: TokenKind) -> TokenKind {
        if self.cursor.eat('=') {
            assign
        } else {
            plain
        }
    }

    /// `x`, `x=` or `xx`.
    fn switch3(&mut self, plain: TokenKind, assign: TokenKind, c: char, double: TokenKind) -> TokenKind {
        if self.cursor.eat('=') {
            assign
        } else if self.cursor.eat(c) {
            double
        } else {
            plain
        }
    }

    /// `x`, `x=`, `xx` or `xx=`.
    fn switch4(
        &mut self,
        plain: TokenKind,
        assign: TokenKind,
        c: char,
        double: TokenKind,
        double_assign: TokenKind,
    ) -> TokenKind {
        if self.cursor.eat('=') {
            assign
        } else if self.cursor.eat(c) {
            self.switch2(double, double_assign)
        } else {
            plain
        }
    }

    // =========================================================================
    // LITERALS
    // =========================================================================

    /// Scan an integer, floating-point or imaginary literal.
    fn scan_number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Int;
        let rest = self.cursor.rest();
        let prefix = rest.get(..2).map(|p| p.to_ascii_lowercase());

        match prefix.as_deref() {
            Some("0x") => {
                self.cursor.advance();
                self.cursor.advance();
                self.cursor.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
                if self.cursor.eat('.') {
                    kind = TokenKind::Float;
                    self.cursor.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
                }
                if matches!(self.cursor.peek(), Some('p') | Some('P')) {
                    kind = TokenKind::Float;
                    self.scan_exponent();
                }
            }
            Some("0b") | Some("0o") => {
                self.cursor.advance();
                self.cursor.advance();
                self.cursor.advance_while(|c| c.is_ascii_digit() || c == '_');
            }
            _ => {
                self.cursor.advance_while(|c| c.is_ascii_digit() || c == '_');
                if self.cursor.peek() == Some('.') {
                    kind = TokenKind::Float;
                    self.cursor.advance();
                    self.cursor.advance_while(|c| c.is_ascii_digit() || c == '_');
                }
                if matches!(self.cursor.peek(), Some('e') | Some('E')) {
                    kind = TokenKind::Float;
                    self.scan_exponent();
                }
            }
        }

        if self.cursor.eat('i') {
            kind = TokenKind::Imag;
        }
        kind
    }

    fn scan_exponent(&mut self) {
        self.cursor.advance();
        if matches!(self.cursor.peek(), Some('+') | Some('-')) {
            self.cursor.advance();
        }
        self.cursor.advance_while(|c| c.is_ascii_digit() || c == '_');
    }

    /// Scan an interpreted string literal including quotes.
    fn scan_string(&mut self) -> Result<(), ParseError> {
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.peek() {
                None | Some('\n') => return Err(self.error(ParseErrorKind::UnterminatedString)),
                Some('"') => {
                    self.cursor.advance();
                    return Ok(());
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Scan a raw string literal including backquotes.
    fn scan_raw_string(&mut self) -> Result<(), ParseError> {
        self.cursor.advance(); // opening backquote
        self.cursor.advance_while(|c| c != '`');
        if self.cursor.eat('`') {
            Ok(())
        } else {
            Err(self.error(ParseErrorKind::UnterminatedString))
        }
    }

    /// Scan a rune literal including quotes.
    fn scan_char(&mut self) -> Result<(), ParseError> {
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.peek() {
                None | Some('\n') => return Err(self.error(ParseErrorKind::UnterminatedChar)),
                Some('\'') => {
                    self.cursor.advance();
                    return Ok(());
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    /// Scan a `//` or `/* */` comment. Line comments stop before the newline.
    fn scan_comment(&mut self) -> Result<(), ParseError> {
        self.cursor.advance(); // /
        if self.cursor.eat('/') {
            self.cursor.advance_while(|c| c != '\n');
            return Ok(());
        }
        self.cursor.advance(); // *
        loop {
            if self.cursor.is_eof() {
                return Err(self.error(ParseErrorKind::UnterminatedComment));
            }
            if self.cursor.rest().starts_with("*/") {
                self.cursor.advance();
                self.cursor.advance();
                return Ok(());
            }
            self.cursor.advance();
        }
    }

    /// Whether the comments starting here run to the end of the line,
    /// so a pending semicolon belongs before them.
    fn comment_ends_line(&self) -> bool {
        let mut rest = self.cursor.rest();
        loop {
            if rest.starts_with("//") {
                return true;
            }
            if !rest.starts_with("/*") {
                return false;
            }
            let Some(end) = rest[2..].find("*/") else {
                return true;
            };
            if rest[2..2 + end].contains('\n') {
                return true;
            }
            rest = rest[2 + end + 2..].trim_start_matches([' ', '\t', '\r']);
            if rest.is_empty() || rest.starts_with('\n') {
                return true;
            }
        }
    }
}

fn is_letter(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new("t.go", src)
            .tokenize()
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_semicolon_insertion() {
        use TokenKind::*;
        assert_eq!(
            kinds("return\nx)\n"),
            vec![Return, Semicolon, Ident, Rparen, Semicolon, Eof]
        );
        assert_eq!(kinds("a +\nb"), vec![Ident, Add, Ident, Semicolon, Eof]);
    }

    #[test]
    fn test_semicolon_before_line_comment() {
        let lexed = Lexer::new("t.go", "x // note\ny").tokenize().unwrap();
        let tokens = &lexed.tokens;
        assert_eq!(tokens[1].kind, TokenKind::Semicolon);
        assert_eq!(tokens[1].text, "\n");
        assert_eq!(tokens[1].pos, Pos::from_offset(2));
        assert_eq!(tokens[2].kind, TokenKind::Comment);
        assert_eq!(tokens[2].text, "// note");
    }

    #[test]
    fn test_block_comment_inside_line() {
        use TokenKind::*;
        assert_eq!(
            kinds("a /* c */ + b"),
            vec![Ident, Comment, Add, Ident, Semicolon, Eof]
        );
    }

    #[test]
    fn test_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("<- <<= &^= &^ && ... := !="),
            vec![Arrow, ShlAssign, AndNotAssign, AndNot, Land, Ellipsis, Define, Neq, Eof]
        );
    }

    #[test]
    fn test_numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds("10 0x1F 1.5 .5 1e9 2i 0b1_0"),
            vec![Int, Int, Float, Float, Float, Imag, Int, Semicolon, Eof]
        );
    }

    #[test]
    fn test_strings_and_chars() {
        let lexed = Lexer::new("t.go", "\"a\\\"b\" `raw\nline` 'x'")
            .tokenize()
            .unwrap();
        assert_eq!(lexed.tokens[0].text, "\"a\\\"b\"");
        assert_eq!(lexed.tokens[1].text, "`raw\nline`");
        assert_eq!(lexed.tokens[2].kind, TokenKind::Char);
        assert_eq!(lexed.lines.len(), 2);
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("t.go", "\"abc\n").tokenize().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!(err.position.line, 1);
    }

    #[test]
    fn test_illegal_char() {
        let err = Lexer::new("t.go", "a # b").tokenize().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::IllegalChar('#'));
        assert_eq!(err.to_string(), "t.go:1:3: illegal character '#'");
    }
}
