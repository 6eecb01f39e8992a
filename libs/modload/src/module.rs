//! # Module Loader
//!
//! Locates the manifest governing a directory, loads it, and keeps a
//! companion `go.mod` in sync with a `gop.mod` manifest.
//!
//! ## Companion Manifest
//!
//! The standard toolchain only understands `go.mod`, so a Go+ module gets
//! one synthesized from its `gop.mod`: the same directives plus a
//! requirement on the Go+ toolchain module and a replacement pointing it
//! at the local toolchain root.

use crate::error::ModloadError;
use crate::modfile::{self, File};
use config::constants::{GOPROOT_ENV, GOP_MODULE_PATH, GOP_MOD_FILE, GOP_VERSION, GO_MOD_FILE};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Toolchain facts written into synthesized manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Env {
    /// Version of the toolchain module to require.
    pub version: String,
    /// Directory the toolchain module is replaced with.
    pub gop_root: PathBuf,
}

impl Env {
    /// Capture the toolchain version and `GOPROOT` from the process.
    ///
    /// Without `GOPROOT` the current directory is used. A relative
    /// `GOPROOT` is resolved against the current directory.
    pub fn from_process() -> Self {
        let cwd = std::env::current_dir().ok();
        let gop_root = match (std::env::var_os(GOPROOT_ENV).map(PathBuf::from), cwd) {
            (Some(root), Some(cwd)) if root.is_relative() => cwd.join(root),
            (Some(root), _) => root,
            (None, Some(cwd)) => cwd,
            (None, None) => PathBuf::from("."),
        };
        Self {
            version: GOP_VERSION.to_string(),
            gop_root,
        }
    }
}

// =============================================================================
// MANIFEST DISCOVERY
// =============================================================================

/// Find the manifest governing `dir`.
///
/// Walks from `dir` towards the filesystem root. In each directory a
/// `gop.mod` wins over a `go.mod`.
///
/// ## Returns
///
/// The manifest path, or [`ModloadError::NoModRoot`].
pub fn find_mod_file(dir: &Path) -> Result<PathBuf, ModloadError> {
    let start = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ModloadError::io(dir, e))?
            .join(dir)
    };
    for ancestor in start.ancestors() {
        for name in [GOP_MOD_FILE, GO_MOD_FILE] {
            let candidate = ancestor.join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    Err(ModloadError::NoModRoot)
}

// =============================================================================
// MODULE
// =============================================================================

/// A loaded module manifest.
#[derive(Debug, Clone)]
pub struct Module {
    file: File,
}

impl Module {
    /// Load the manifest governing `dir`.
    ///
    /// ## Errors
    ///
    /// - [`ModloadError::NoModRoot`] when no manifest is found
    /// - [`ModloadError::Parse`] for a malformed manifest, prefixed `file:line:`
    /// - [`ModloadError::NoModDecl`] when the manifest lacks `module`
    ///
    /// ## Example
    ///
    /// ```rust
    /// use modload::Module;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// std::fs::write(dir.path().join("gop.mod"), "module hello\n").unwrap();
    /// let module = Module::load(dir.path()).unwrap();
    /// assert!(module.modfile().ends_with("gop.mod"));
    /// ```
    pub fn load(dir: &Path) -> Result<Self, ModloadError> {
        let path = find_mod_file(dir)?;
        let data = fs::read(&path).map_err(|e| ModloadError::io(&path, e))?;
        let name = path.to_string_lossy();
        let keep = |_: &str, vers: &str| -> Result<String, String> { Ok(vers.to_string()) };
        let file = modfile::parse(&name, &data, Some(&keep))?;
        if file.module.is_none() {
            return Err(ModloadError::NoModDecl);
        }
        tracing::debug!(manifest = %name, requires = file.require.len(), "loaded module manifest");
        Ok(Self { file })
    }

    /// Path of the manifest this module was loaded from.
    pub fn modfile(&self) -> &Path {
        Path::new(&self.file.syntax.name)
    }

    /// The parsed manifest.
    pub fn file(&self) -> &File {
        &self.file
    }

    /// Update the companion `go.mod` using the process environment.
    ///
    /// See [`Module::update_go_mod_with`].
    pub fn update_go_mod(&self, check_dirty: bool) -> Result<bool, ModloadError> {
        self.update_go_mod_with(&Env::from_process(), check_dirty)
    }

    /// Write the companion `go.mod` next to a `gop.mod` manifest.
    ///
    /// Nothing happens when the manifest is itself a `go.mod`, or when
    /// `check_dirty` is set and the existing `go.mod` is newer than the
    /// `gop.mod`.
    ///
    /// ## Returns
    ///
    /// Whether `go.mod` was written.
    pub fn update_go_mod_with(&self, env: &Env, check_dirty: bool) -> Result<bool, ModloadError> {
        let gopmod = self.modfile();
        if gopmod.file_name().and_then(|n| n.to_str()) == Some(GO_MOD_FILE) {
            return Ok(false);
        }
        let gomod = gopmod.with_file_name(GO_MOD_FILE);
        if check_dirty && is_updated(&gomod, gopmod) {
            tracing::debug!(target_file = %gomod.display(), "go.mod is up to date");
            return Ok(false);
        }

        let data = self.to_go_mod(env).format();
        if let Err(e) = write_manifest(&gomod, &data) {
            tracing::warn!(target_file = %gomod.display(), error = %e, "cannot write go.mod");
            return Err(ModloadError::io(gomod, e));
        }
        tracing::debug!(target_file = %gomod.display(), bytes = data.len(), "wrote go.mod");
        Ok(true)
    }

    /// The manifest plus the toolchain requirement and replacement.
    fn to_go_mod(&self, env: &Env) -> File {
        let mut file = self.file.clone();
        if !file.require.iter().any(|r| r.module.path == GOP_MODULE_PATH) {
            file.add_new_require(GOP_MODULE_PATH, &env.version, false);
        }
        if !file.replace.iter().any(|r| r.old.path == GOP_MODULE_PATH) {
            file.add_replace(GOP_MODULE_PATH, "", &local_path(&env.gop_root), "");
        }
        file
    }
}

/// Render `root` as a replacement target the manifest grammar reads as a
/// directory: relative paths get a leading `./`.
fn local_path(root: &Path) -> String {
    let text = root.to_string_lossy();
    let marked = text == "." || text == ".." || text.starts_with("./") || text.starts_with("../");
    if root.has_root() || marked {
        text.into_owned()
    } else {
        format!("./{text}")
    }
}

/// Whether `target` was modified after `src`; false when either is missing.
fn is_updated(target: &Path, src: &Path) -> bool {
    let modified = |p: &Path| fs::metadata(p).and_then(|m| m.modified()).ok();
    match (modified(target), modified(src)) {
        (Some(t), Some(s)) => t > s,
        _ => false,
    }
}

fn write_manifest(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path)?.write_all(data)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_updated_with_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        assert!(!is_updated(&a, &b));
        fs::write(&a, "x").unwrap();
        assert!(!is_updated(&a, &b));
        assert!(!is_updated(&b, &a));
    }

    #[test]
    fn test_to_go_mod_leaves_the_original_alone() {
        let file = modfile::parse("gop.mod", b"module m\n", None).unwrap();
        let module = Module { file };
        let env = Env {
            version: "v1.1.0".to_string(),
            gop_root: PathBuf::from("/opt/gop"),
        };
        let go_mod = module.to_go_mod(&env);
        assert_eq!(go_mod.require.len(), 1);
        assert_eq!(go_mod.replace.len(), 1);
        assert!(module.file().require.is_empty());
        assert_eq!(module.file().syntax.stmts.len(), 1);
    }

    #[test]
    fn test_to_go_mod_keeps_existing_entries() {
        let src = b"module m\n\nrequire github.com/goplus/gop v1.0.0\n\nreplace github.com/goplus/gop => ../gop\n";
        let module = Module {
            file: modfile::parse("gop.mod", src, None).unwrap(),
        };
        let env = Env {
            version: "v9.9.9".to_string(),
            gop_root: PathBuf::from("/opt/gop"),
        };
        assert_eq!(module.to_go_mod(&env).format(), src.to_vec());
    }

    #[test]
    fn test_local_path_marks_relative_roots() {
        assert_eq!(local_path(Path::new("gop")), "./gop");
        assert_eq!(local_path(Path::new("tools/gop")), "./tools/gop");
        assert_eq!(local_path(Path::new("./gop")), "./gop");
        assert_eq!(local_path(Path::new("../gop")), "../gop");
        assert_eq!(local_path(Path::new("/opt/gop")), "/opt/gop");
    }

    #[test]
    fn test_to_go_mod_with_relative_root_reparses() {
        let module = Module {
            file: modfile::parse("gop.mod", b"module m\n", None).unwrap(),
        };
        let env = Env {
            version: "v1.1.0".to_string(),
            gop_root: PathBuf::from("gop"),
        };
        let data = module.to_go_mod(&env).format();
        let parsed = modfile::parse("go.mod", &data, None).unwrap();
        assert_eq!(parsed.replace[0].new.path, "./gop");
    }
}
