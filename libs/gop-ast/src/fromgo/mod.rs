//! # Go to Go+ Conversion
//!
//! Re-encodes a parsed Go file as a Go+ tree so Go+ tooling can consume
//! plain Go sources without re-parsing them.
//!
//! ## Architecture
//!
//! ```text
//! go::File → ast_file → gop_decl → gop_expr / gop_stmt → gop::File
//! ```
//!
//! The conversion is total over the Go grammar. Placeholder nodes
//! (`BadDecl`, `BadExpr`, `BadStmt`) and unsupported options abort the
//! whole conversion with a panic naming the offending construct; they
//! indicate a caller bug, never a user error.
//!
//! ## Usage
//!
//! ```rust
//! use gop_ast::fromgo::{ast_file, ConvertOptions};
//!
//! let src = "package main\n\nvar x = 1\n";
//! let file = go_parser::parse_file("main.go", src).unwrap();
//! let gop = ast_file(Some(&file), ConvertOptions::empty());
//! assert_eq!(gop.name.name, "main");
//! assert_eq!(gop.decls.len(), 1);
//! ```

mod declarations;
mod expressions;
mod ident;
mod statements;

pub use declarations::{gop_decl, gop_gen_decl};
pub use expressions::gop_expr;
pub use ident::{check_ident, gop_ident};
pub use statements::gop_stmt;

use crate::ast::File;
use bitflags::bitflags;
use config::constants::{ERR_KEEP_CGO, ERR_KEEP_FUNC_BODY, OPTION_KEEP_CGO, OPTION_KEEP_FUNC_BODY};
use declarations::{gop_comment_group, gop_import_spec};
use go_parser::ast as go;

bitflags! {
    /// Optional conversion behaviors.
    ///
    /// Both flags are recognized but not supported yet: requesting
    /// either one aborts [`ast_file`]. Other bits are reserved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConvertOptions: u32 {
        /// Keep cgo preambles.
        const KEEP_CGO = OPTION_KEEP_CGO;
        /// Keep function bodies verbatim.
        const KEEP_FUNC_BODY = OPTION_KEEP_FUNC_BODY;
    }
}

/// Convert a Go file into a Go+ file.
///
/// ## Parameters
///
/// - `f`: Parsed Go file; `None` is only meaningful for probing option
///   validation, which runs before the file is touched
/// - `opts`: Conversion options
///
/// ## Returns
///
/// A fresh Go+ tree with the same package name, declaration order,
/// comments and positions as `f`.
///
/// # Panics
///
/// - `ASTFile: doesn't support keeping cgo now` for
///   [`ConvertOptions::KEEP_CGO`]
/// - `ASTFile: doesn't support keeping func body now` for
///   [`ConvertOptions::KEEP_FUNC_BODY`]
/// - `ASTFile: nil file` when `f` is `None` and no option failed first
/// - any conversion panic of [`gop_decl`], [`gop_expr`] or [`gop_stmt`]
pub fn ast_file(f: Option<&go::File>, opts: ConvertOptions) -> File {
    if opts.contains(ConvertOptions::KEEP_CGO) {
        panic!("{}\n", ERR_KEEP_CGO);
    }
    if opts.contains(ConvertOptions::KEEP_FUNC_BODY) {
        panic!("{}\n", ERR_KEEP_FUNC_BODY);
    }
    let Some(f) = f else {
        panic!("ASTFile: nil file\n");
    };

    let decls: Vec<_> = f.decls.iter().map(|d| gop_decl(Some(d))).collect();
    tracing::debug!(
        package = %f.name.name,
        decls = decls.len(),
        comments = f.comments.len(),
        "converted go file"
    );

    File {
        doc: gop_comment_group(f.doc.as_ref()),
        package: f.package,
        name: gop_ident(&f.name),
        decls,
        imports: f.imports.iter().map(gop_import_spec).collect(),
        unresolved: f.unresolved.iter().map(gop_ident).collect(),
        comments: f
            .comments
            .iter()
            .filter_map(|c| gop_comment_group(Some(c)))
            .collect(),
        lines: f.lines.clone(),
        no_pkg_decl: false,
    }
}

// =============================================================================
// TESTS
// =============================================================================
