//! # Tokens
//!
//! Token types for the Go lexer.
//!
//! ## Example
//!
//! ```rust
//! use go_parser::lexer::{Token, TokenKind};
//! use go_parser::span::Pos;
//!
//! let token = Token::new(TokenKind::Int, Pos::from_offset(0), "10".to_string());
//! assert_eq!(token.kind, TokenKind::Int);
//! assert_eq!(TokenKind::Illegal.display(), "ILLEGAL");
//! ```

use crate::span::Pos;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// TOKEN
// =============================================================================

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token type.
    pub kind: TokenKind,
    /// Start position.
    pub pos: Pos,
    /// Token text. Literal spelling for literals and comments,
    /// `"\n"` for automatically inserted semicolons.
    pub text: String,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, pos: Pos, text: String) -> Self {
        Self { kind, pos, text }
    }

    /// Check if token is EOF.
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

// =============================================================================
// TOKEN KIND
// =============================================================================

/// Lowest binary operator precedence.
pub const LOWEST_PREC: u8 = 0;
/// Precedence of unary operators.
pub const UNARY_PREC: u8 = 6;
/// Precedence of selectors, indexing and calls.
pub const HIGHEST_PREC: u8 = 7;

/// Types of tokens.
///
/// Follows the Go grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TokenKind {
    // Special
    /// Invalid token; also the zero value of a group keyword
    #[default]
    Illegal,
    /// End of input
    Eof,
    /// `// ...` or `/* ... */`
    Comment,

    // Literals
    /// Identifier like `main`
    Ident,
    /// Integer literal like `12345`
    Int,
    /// Floating-point literal like `123.45`
    Float,
    /// Imaginary literal like `123.45i`
    Imag,
    /// Rune literal like `'a'`
    Char,
    /// String literal like `"abc"` or `` `abc` ``
    String,

    // Operators
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Quo,
    /// `%`
    Rem,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `&^`
    AndNot,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    QuoAssign,
    /// `%=`
    RemAssign,
    /// `&=`
    AndAssign,
    /// `|=`
    OrAssign,
    /// `^=`
    XorAssign,
    /// `<<=`
    ShlAssign,
    /// `>>=`
    ShrAssign,
    /// `&^=`
    AndNotAssign,
    /// `&&`
    Land,
    /// `||`
    Lor,
    /// `<-`
    Arrow,
    /// `++`
    Inc,
    /// `--`
    Dec,
    /// `==`
    Eql,
    /// `<`
    Lss,
    /// `>`
    Gtr,
    /// `=`
    Assign,
    /// `!`
    Not,
    /// `!=`
    Neq,
    /// `<=`
    Leq,
    /// `>=`
    Geq,
    /// `:=`
    Define,
    /// `...`
    Ellipsis,

    // Delimiters
    /// `(`
    Lparen,
    /// `[`
    Lbrack,
    /// `{`
    Lbrace,
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `)`
    Rparen,
    /// `]`
    Rbrack,
    /// `}`
    Rbrace,
    /// `;`
    Semicolon,
    /// `:`
    Colon,

    // Keywords
    /// `break`
    Break,
    /// `case`
    Case,
    /// `chan`
    Chan,
    /// `const`
    Const,
    /// `continue`
    Continue,
    /// `default`
    Default,
    /// `defer`
    Defer,
    /// `else`
    Else,
    /// `fallthrough`
    Fallthrough,
    /// `for`
    For,
    /// `func`
    Func,
    /// `go`
    Go,
    /// `goto`
    Goto,
    /// `if`
    If,
    /// `import`
    Import,
    /// `interface`
    Interface,
    /// `map`
    Map,
    /// `package`
    Package,
    /// `range`
    Range,
    /// `return`
    Return,
    /// `select`
    Select,
    /// `struct`
    Struct,
    /// `switch`
    Switch,
    /// `type`
    Type,
    /// `var`
    Var,
}

impl TokenKind {
    /// Source spelling of operators and keywords, upper-case class name
    /// for the rest (`IDENT`, `INT`, `ILLEGAL`, ...).
    pub fn display(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Illegal => "ILLEGAL",
            Eof => "EOF",
            Comment => "COMMENT",
            Ident => "IDENT",
            Int => "INT",
            Float => "FLOAT",
            Imag => "IMAG",
            Char => "CHAR",
            String => "STRING",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Quo => "/",
            Rem => "%",
            And => "&",
            Or => "|",
            Xor => "^",
            Shl => "<<",
            Shr => ">>",
            AndNot => "&^",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            QuoAssign => "/=",
            RemAssign => "%=",
            AndAssign => "&=",
            OrAssign => "|=",
            XorAssign => "^=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            AndNotAssign => "&^=",
            Land => "&&",
            Lor => "||",
            Arrow => "<-",
            Inc => "++",
            Dec => "--",
            Eql => "==",
            Lss => "<",
            Gtr => ">",
            Assign => "=",
            Not => "!",
            Neq => "!=",
            Leq => "<=",
            Geq => ">=",
            Define => ":=",
            Ellipsis => "...",
            Lparen => "(",
            Lbrack => "[",
            Lbrace => "{",
            Comma => ",",
            Period => ".",
            Rparen => ")",
            Rbrack => "]",
            Rbrace => "}",
            Semicolon => ";",
            Colon => ":",
            Break => "break",
            Case => "case",
            Chan => "chan",
            Const => "const",
            Continue => "continue",
            Default => "default",
            Defer => "defer",
            Else => "else",
            Fallthrough => "fallthrough",
            For => "for",
            Func => "func",
            Go => "go",
            Goto => "goto",
            If => "if",
            Import => "import",
            Interface => "interface",
            Map => "map",
            Package => "package",
            Range => "range",
            Return => "return",
            Select => "select",
            Struct => "struct",
            Switch => "switch",
            Type => "type",
            Var => "var",
        }
    }

    /// Keyword for an identifier spelling, if it is one.
    pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
        use TokenKind::*;
        let kind = match ident {
            "break" => Break,
            "case" => Case,
            "chan" => Chan,
            "const" => Const,
            "continue" => Continue,
            "default" => Default,
            "defer" => Defer,
            "else" => Else,
            "fallthrough" => Fallthrough,
            "for" => For,
            "func" => Func,
            "go" => Go,
            "goto" => Goto,
            "if" => If,
            "import" => Import,
            "interface" => Interface,
            "map" => Map,
            "package" => Package,
            "range" => Range,
            "return" => Return,
            "select" => Select,
            "struct" => Struct,
            "switch" => Switch,
            "type" => Type,
            "var" => Var,
            _ => return None,
        };
        Some(kind)
    }

    /// Binary operator precedence, [`LOWEST_PREC`] for non-operators.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use go_parser::lexer::TokenKind;
    ///
    /// assert!(TokenKind::Mul.precedence() > TokenKind::Add.precedence());
    /// assert_eq!(TokenKind::Lparen.precedence(), 0);
    /// ```
    pub fn precedence(&self) -> u8 {
        use TokenKind::*;
        match self {
            Lor => 1,
            Land => 2,
            Eql | Neq | Lss | Leq | Gtr | Geq => 3,
            Add | Sub | Or | Xor => 4,
            Mul | Quo | Rem | Shl | Shr | And | AndNot => 5,
            _ => LOWEST_PREC,
        }
    }

    /// Whether this is a literal class token.
    pub fn is_literal(&self) -> bool {
        use TokenKind::*;
        matches!(self, Ident | Int | Float | Imag | Char | String)
    }

    /// Whether this is a reserved word.
    pub fn is_keyword(&self) -> bool {
        Self::lookup_keyword(self.display()) == Some(*self)
    }

    /// Whether this is an assignment operator (`=`, `:=`, `op=`).
    pub fn is_assign_op(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Assign
                | Define
                | AddAssign
                | SubAssign
                | MulAssign
                | QuoAssign
                | RemAssign
                | AndAssign
                | OrAssign
                | XorAssign
                | ShlAssign
                | ShrAssign
                | AndNotAssign
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_classes_and_operators() {
        assert_eq!(TokenKind::Illegal.to_string(), "ILLEGAL");
        assert_eq!(TokenKind::AndNotAssign.display(), "&^=");
        assert_eq!(TokenKind::Interface.display(), "interface");
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::lookup_keyword("func"), Some(TokenKind::Func));
        assert_eq!(TokenKind::lookup_keyword("fun"), None);
        assert!(TokenKind::Var.is_keyword());
        assert!(!TokenKind::Ident.is_keyword());
    }

    #[test]
    fn test_precedence_levels() {
        assert_eq!(TokenKind::Lor.precedence(), 1);
        assert_eq!(TokenKind::Land.precedence(), 2);
        assert_eq!(TokenKind::Leq.precedence(), 3);
        assert_eq!(TokenKind::Xor.precedence(), 4);
        assert_eq!(TokenKind::AndNot.precedence(), 5);
        assert!(UNARY_PREC > TokenKind::Mul.precedence());
    }

    #[test]
    fn test_assign_ops() {
        assert!(TokenKind::Define.is_assign_op());
        assert!(TokenKind::ShlAssign.is_assign_op());
        assert!(!TokenKind::Eql.is_assign_op());
    }
}
