//! # Module Manifest Crate
//!
//! Manifest handling for Go+ modules: a grammar for `go.mod`-style files
//! and a loader that finds a module's manifest and synthesizes the
//! companion `go.mod` the standard toolchain needs.
//!
//! ## Architecture
//!
//! ```text
//! dir → find_mod_file → modfile::parse → Module → update_go_mod → go.mod
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use modload::{Env, Module};
//! use std::path::PathBuf;
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("gop.mod"), "module hello\n\ngo 1.18\n").unwrap();
//!
//! let module = Module::load(dir.path()).unwrap();
//! let env = Env { version: "v1.1.0".into(), gop_root: PathBuf::from("/opt/gop") };
//! assert!(module.update_go_mod_with(&env, false).unwrap());
//!
//! let go_mod = std::fs::read_to_string(dir.path().join("go.mod")).unwrap();
//! assert_eq!(
//!     go_mod,
//!     "module hello\n\ngo 1.18\n\nrequire github.com/goplus/gop v1.1.0\n\nreplace github.com/goplus/gop => /opt/gop\n"
//! );
//! ```

pub mod error;
pub mod modfile;
pub mod module;

// Re-exports for convenience
pub use error::ModloadError;
pub use module::{find_mod_file, Env, Module};
