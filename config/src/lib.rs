//! # Config Crate
//!
//! Centralized configuration constants for the Go to Go+ AST toolchain.
//! Option bits, fixed diagnostics, manifest file names and printer
//! layout parameters are defined here so every crate agrees on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{GOP_MOD_FILE, GO_MOD_FILE, OPTION_KEEP_CGO};
//!
//! let candidates = [GOP_MOD_FILE, GO_MOD_FILE];
//! assert_eq!(candidates[0], "gop.mod");
//! assert_eq!(OPTION_KEEP_CGO, 1);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Toolchain Compatible**: Names and diagnostics match the Go+ toolchain

pub mod constants;
