//! # Loader Errors
//!
//! Errors raised while locating, reading and updating manifests.
//!
//! ## Example
//!
//! ```rust
//! use modload::ModloadError;
//!
//! assert_eq!(
//!     ModloadError::NoModDecl.to_string(),
//!     "no module declaration in gop.mod (or go.mod)"
//! );
//! ```

use crate::modfile::ModfileError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// MODLOAD ERROR
// =============================================================================

/// A manifest loading or update error.
#[derive(Debug, Error)]
pub enum ModloadError {
    /// The manifest has no `module` directive.
    #[error("no module declaration in gop.mod (or go.mod)")]
    NoModDecl,

    /// No manifest in the directory or any parent.
    #[error("gop.mod or go.mod file not found in current directory or any parent directory")]
    NoModRoot,

    /// Reading or writing a file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// The manifest does not parse.
    #[error(transparent)]
    Parse(#[from] ModfileError),
}

impl ModloadError {
    /// Wrap an I/O failure on `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modfile::ModfileErrorKind;

    #[test]
    fn test_no_mod_root_message() {
        assert_eq!(
            ModloadError::NoModRoot.to_string(),
            "gop.mod or go.mod file not found in current directory or any parent directory"
        );
    }

    #[test]
    fn test_io_message_names_the_file() {
        let err = ModloadError::io("/x/go.mod", io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.to_string(), "/x/go.mod: denied");
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let err: ModloadError = ModfileError::new("gop.mod", 2, ModfileErrorKind::Usage("go 1.23")).into();
        assert_eq!(err.to_string(), "gop.mod:2: usage: go 1.23");
    }
}
