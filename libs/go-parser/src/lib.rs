//! # Go Parser Crate
//!
//! Parses Go source files into a typed syntax tree modelled on `go/ast`.
//! Every node carries positions so the tree can be printed back with its
//! original line structure.
//!
//! ## Architecture
//!
//! ```text
//! Go Source → lexer (tokens + comments) → parser (File) → resolver (bound idents)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use go_parser::parse_file;
//!
//! let file = parse_file("main.go", "package main\n\nfunc main() {}\n").unwrap();
//! assert_eq!(file.name.name, "main");
//! assert_eq!(file.decls.len(), 1);
//! ```
//!
//! ## Design Principles
//!
//! - **Typed Tree**: expressions, statements and declarations are Rust enums
//! - **Positions**: 1-based [`span::Pos`] offsets with a [`span::LineTable`]
//! - **Syntax Only**: no type checking; the resolver binds names lexically

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod span;

pub use ast::File;
pub use error::{ParseError, ParseErrorKind};

use lexer::Lexer;
use parser::Parser;

/// Parse one Go source file and resolve its identifiers.
///
/// ## Parameters
///
/// - `filename`: Name used in error messages
/// - `src`: Source text
///
/// ## Returns
///
/// The syntax tree, or the first syntax error encountered.
pub fn parse_file(filename: &str, src: &str) -> Result<File, ParseError> {
    let lexed = Lexer::new(filename, src).tokenize()?;
    let mut file = Parser::new(filename, lexed).parse_file()?;
    resolver::resolve_file(&mut file);

    tracing::debug!(
        file = filename,
        decls = file.decls.len(),
        unresolved = file.unresolved.len(),
        "parsed file"
    );
    Ok(file)
}
