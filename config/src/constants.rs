//! # Configuration Constants
//!
//! Centralized constants for the conversion pipeline.
//!
//! ## Categories
//!
//! - **Conversion**: Option bits and fatal diagnostics of the transducer
//! - **Manifest**: Module file names, self module path and toolchain version
//! - **Printer**: Tab width and blank line limits

// =============================================================================
// CONVERSION CONSTANTS
// =============================================================================

/// Option bit requesting that cgo preambles be kept.
///
/// Recognized but unsupported: requesting it aborts the conversion.
///
/// # Example
///
/// ```rust
/// use config::constants::{OPTION_KEEP_CGO, OPTION_KEEP_FUNC_BODY};
///
/// assert_eq!(OPTION_KEEP_CGO & OPTION_KEEP_FUNC_BODY, 0);
/// ```
pub const OPTION_KEEP_CGO: u32 = 1 << 0;

/// Option bit requesting that function bodies be kept verbatim.
///
/// Recognized but unsupported: requesting it aborts the conversion.
pub const OPTION_KEEP_FUNC_BODY: u32 = 1 << 1;

/// Diagnostic raised when [`OPTION_KEEP_CGO`] is requested.
pub const ERR_KEEP_CGO: &str = "ASTFile: doesn't support keeping cgo now";

/// Diagnostic raised when [`OPTION_KEEP_FUNC_BODY`] is requested.
pub const ERR_KEEP_FUNC_BODY: &str = "ASTFile: doesn't support keeping func body now";

// =============================================================================
// MANIFEST CONSTANTS
// =============================================================================

/// Manifest file of a Go+ module.
///
/// Takes precedence over [`GO_MOD_FILE`] when both live in one directory.
///
/// # Example
///
/// ```rust
/// use config::constants::{GOP_MOD_FILE, GO_MOD_FILE};
/// use std::path::Path;
///
/// let dir = Path::new("/work/hello");
/// assert_eq!(dir.join(GOP_MOD_FILE), Path::new("/work/hello/gop.mod"));
/// assert_eq!(dir.join(GO_MOD_FILE), Path::new("/work/hello/go.mod"));
/// ```
pub const GOP_MOD_FILE: &str = "gop.mod";

/// Manifest file of a plain Go module.
pub const GO_MOD_FILE: &str = "go.mod";

/// Module path of the Go+ toolchain itself.
///
/// Synthesized `go.mod` files require this module and replace it
/// with the local toolchain root.
pub const GOP_MODULE_PATH: &str = "github.com/goplus/gop";

/// Version of the toolchain written into synthesized requirements.
///
/// # Example
///
/// ```rust
/// use config::constants::GOP_VERSION;
///
/// assert!(GOP_VERSION.starts_with('v'));
/// assert_eq!(GOP_VERSION.split('.').count(), 3);
/// ```
pub const GOP_VERSION: &str = "v1.1.0";

/// Environment variable naming the toolchain root directory.
pub const GOPROOT_ENV: &str = "GOPROOT";

// =============================================================================
// PRINTER CONSTANTS
// =============================================================================

/// Width of a tab stop when aligning columns.
///
/// Alignment cells are padded with spaces; the width is only used to
/// measure leading tabs inside a cell.
pub const TAB_WIDTH: usize = 8;

/// Minimum number of spaces separating aligned columns.
pub const CELL_PADDING: usize = 1;

/// Maximum number of consecutive newlines kept between two items.
///
/// Two newlines means at most one blank line survives formatting.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_NEWLINES;
///
/// let source_gap = 5;
/// assert_eq!(source_gap.min(MAX_NEWLINES), 2);
/// ```
pub const MAX_NEWLINES: usize = 2;
