//! # Tokens and Positions
//!
//! Go+ shares its operator set and position model with Go, so the
//! lexer's token kinds and the parser's positions are reused as is.

pub use go_parser::lexer::{TokenKind, HIGHEST_PREC, LOWEST_PREC, UNARY_PREC};
pub use go_parser::span::{LineTable, Pos, Position};
