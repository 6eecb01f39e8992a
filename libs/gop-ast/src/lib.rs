//! # Go+ AST Crate
//!
//! The Go+ syntax tree, a source printer for it, and a transducer that
//! turns parsed Go files into Go+ trees.
//!
//! ## Architecture
//!
//! ```text
//! Go Source → go-parser (Go AST) → fromgo (Go+ AST) → printer (Go+ Source)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use gop_ast::fromgo::{ast_file, ConvertOptions};
//! use gop_ast::format_file;
//!
//! let src = "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}\n";
//! let file = go_parser::parse_file("main.go", src).unwrap();
//! let gop = ast_file(Some(&file), ConvertOptions::empty());
//! assert_eq!(format_file(&gop).unwrap(), src);
//! ```
//!
//! ## Design Principles
//!
//! - **Same Shape**: Go+ nodes mirror Go nodes field for field
//! - **Positions Kept**: Every converted node keeps its source positions
//! - **Back-links**: Converted identifiers keep a link to the Go node
//!   they were made from, see [`fromgo::check_ident`]

pub mod ast;
pub mod fromgo;
pub mod printer;
pub mod token;

// Re-exports for convenience
pub use ast::File;
pub use printer::{format_file, format_node, FormatError};
