//! # Manifest Errors
//!
//! Every error names the file and line it comes from.
//!
//! ## Example
//!
//! ```rust
//! use modload::modfile::{ModfileError, ModfileErrorKind};
//!
//! let err = ModfileError::new("go.mod", 3, ModfileErrorKind::UnknownDirective("bogus".into()));
//! assert_eq!(err.to_string(), "go.mod:3: unknown directive: bogus");
//! ```

use thiserror::Error;

// =============================================================================
// MODFILE ERROR
// =============================================================================

/// A manifest read or validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{filename}:{line}: {kind}")]
pub struct ModfileError {
    /// Name of the manifest.
    pub filename: String,
    /// 1-based line of the offending text.
    pub line: usize,
    /// What went wrong.
    pub kind: ModfileErrorKind,
}

impl ModfileError {
    /// Create a new manifest error.
    pub fn new(filename: &str, line: usize, kind: ModfileErrorKind) -> Self {
        Self {
            filename: filename.to_string(),
            line,
            kind,
        }
    }
}

// =============================================================================
// MODFILE ERROR KIND
// =============================================================================

/// Kinds of manifest errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModfileErrorKind {
    /// The file is not UTF-8.
    #[error("invalid UTF-8 encoding")]
    InvalidUtf8,

    /// A `"` string hit a newline or the end of the file.
    #[error("unterminated quoted string")]
    UnterminatedString,

    /// A token that does not fit the line structure.
    #[error("syntax error: unexpected {0}")]
    Unexpected(String),

    /// A verb this grammar does not know.
    #[error("unknown directive: {0}")]
    UnknownDirective(String),

    /// A verb that cannot be factored into a block.
    #[error("{0} block is not supported")]
    BlockNotAllowed(String),

    /// A directive that may appear once showed up again.
    #[error("repeated {0} statement")]
    Repeated(&'static str),

    /// Wrong number or shape of arguments.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// A quoted token with a bad escape.
    #[error("invalid quoted string: {0}")]
    InvalidQuoted(String),

    /// A module version that is not semantic.
    #[error("version {0:?} invalid: must be of the form v1.2.3")]
    InvalidVersion(String),

    /// A `go` directive version that is not a release number.
    #[error("invalid go version '{0}': must match format 1.23")]
    InvalidGoVersion(String),

    /// A replacement target that breaks the path/version rules.
    #[error("{0}")]
    Replace(&'static str),

    /// The version fixer refused a version.
    #[error("{path}@{version}: {message}")]
    Fix {
        /// Module path
        path: String,
        /// Version as written
        version: String,
        /// Fixer message
        message: String,
    },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_quoted_in_message() {
        let kind = ModfileErrorKind::InvalidVersion("latest".to_string());
        assert_eq!(
            kind.to_string(),
            "version \"latest\" invalid: must be of the form v1.2.3"
        );
    }

    #[test]
    fn test_error_display_has_location() {
        let err = ModfileError::new("gop.mod", 7, ModfileErrorKind::Repeated("module"));
        assert_eq!(err.to_string(), "gop.mod:7: repeated module statement");
    }
}
