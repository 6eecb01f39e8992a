//! # Module Manifest Grammar
//!
//! Reads, edits and prints module manifests (`go.mod` and `gop.mod`).
//!
//! ## Architecture
//!
//! ```text
//! text → read (FileSyntax) → directives (File) → edits → format → text
//! ```
//!
//! The [`File`] view holds the parsed directives; its `syntax` field is
//! the tree that gets printed. Edits update both.
//!
//! ## Example
//!
//! ```rust
//! use modload::modfile::parse;
//!
//! let mut file = parse("go.mod", b"module example.com/m\n\ngo 1.18\n", None).unwrap();
//! file.add_new_require("golang.org/x/mod", "v0.9.0", false);
//! assert_eq!(
//!     String::from_utf8(file.format()).unwrap(),
//!     "module example.com/m\n\ngo 1.18\n\nrequire golang.org/x/mod v0.9.0\n"
//! );
//! ```

mod error;
mod print;
mod read;
mod syntax;

pub use error::{ModfileError, ModfileErrorKind};
pub use print::format;
pub use read::read;
pub use syntax::{Comment, CommentBlock, Comments, Expr, FileSyntax, Line, LineBlock, Position};

use serde::{Deserialize, Serialize};
use syntax::args_of;

/// Rewrites a version as written into a canonical one.
///
/// Called with the module path and the version; an `Err` message aborts
/// parsing.
pub type VersionFixer<'a> = &'a dyn Fn(&str, &str) -> Result<String, String>;

// =============================================================================
// DIRECTIVES
// =============================================================================

/// A module path at a version.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Version {
    /// Module path.
    pub path: String,
    /// Semantic version, empty when absent.
    pub version: String,
}

/// The `module` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDecl {
    /// Declared module path.
    pub path: String,
}

/// The `go` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoDecl {
    /// Language version, e.g. `1.18`.
    pub version: String,
}

/// A `require` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Require {
    /// Required module.
    pub module: Version,
    /// Marked `// indirect`.
    pub indirect: bool,
}

/// A `replace` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replace {
    /// Replaced module; an empty version replaces every version.
    pub old: Version,
    /// Replacement module or directory.
    pub new: Version,
}

/// An `exclude` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclude {
    /// Excluded module version.
    pub module: Version,
}

/// A `retract` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retract {
    /// First retracted version.
    pub low: String,
    /// Last retracted version; equal to `low` for a single version.
    pub high: String,
    /// Text of the attached comments.
    pub rationale: String,
}

// =============================================================================
// FILE
// =============================================================================

/// A parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Module declaration, if any.
    pub module: Option<ModuleDecl>,
    /// Language version, if any.
    pub go: Option<GoDecl>,
    pub require: Vec<Require>,
    pub replace: Vec<Replace>,
    pub exclude: Vec<Exclude>,
    pub retract: Vec<Retract>,
    /// The tree the directives were read from.
    pub syntax: FileSyntax,
}

/// Parse a manifest.
///
/// ## Parameters
///
/// - `file`: name used in errors and stored in the syntax tree
/// - `data`: manifest bytes
/// - `fix`: optional rewrite applied to every module version
///
/// ## Returns
///
/// The manifest, or the first error. Error messages begin with
/// `file:line:`.
///
/// ## Example
///
/// ```rust
/// use modload::modfile::parse;
///
/// let err = parse("gop.mod", b"module m\nrequire a latest\n", None).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "gop.mod:2: version \"latest\" invalid: must be of the form v1.2.3"
/// );
/// ```
pub fn parse(file: &str, data: &[u8], fix: Option<VersionFixer>) -> Result<File, ModfileError> {
    let src = std::str::from_utf8(data)
        .map_err(|_| ModfileError::new(file, 1, ModfileErrorKind::InvalidUtf8))?;
    from_syntax(read(file, src)?, fix)
}

/// Build the directive view of an already read tree.
fn from_syntax(syntax: FileSyntax, fix: Option<VersionFixer>) -> Result<File, ModfileError> {
    let name = syntax.name.clone();
    let file = name.as_str();
    let mut f = File {
        module: None,
        go: None,
        require: Vec::new(),
        replace: Vec::new(),
        exclude: Vec::new(),
        retract: Vec::new(),
        syntax: FileSyntax::new(file),
    };

    for stmt in &syntax.stmts {
        match stmt {
            Expr::Comment(_) => {}
            Expr::Line(line) => {
                let verb = line.token.first().map(String::as_str).unwrap_or("");
                f.add_directive(verb, line, fix)
                    .map_err(|kind| ModfileError::new(file, line.start.line, kind))?;
            }
            Expr::Block(block) => {
                let verb = block.token.first().map(String::as_str).unwrap_or("");
                if let Some(extra) = block.token.get(1) {
                    return Err(ModfileError::new(
                        file,
                        block.start.line,
                        ModfileErrorKind::Unexpected(extra.clone()),
                    ));
                }
                if !matches!(verb, "require" | "exclude" | "replace" | "retract") {
                    return Err(ModfileError::new(
                        file,
                        block.start.line,
                        ModfileErrorKind::BlockNotAllowed(verb.to_string()),
                    ));
                }
                for line in &block.line {
                    f.add_directive(verb, line, fix)
                        .map_err(|kind| ModfileError::new(file, line.start.line, kind))?;
                }
            }
        }
    }
    f.syntax = syntax;
    Ok(f)
}

impl File {
    fn add_directive(
        &mut self,
        verb: &str,
        line: &Line,
        fix: Option<VersionFixer>,
    ) -> Result<(), ModfileErrorKind> {
        let args = args_of(line);
        match verb {
            "module" => {
                if self.module.is_some() {
                    return Err(ModfileErrorKind::Repeated("module"));
                }
                let [path] = args else {
                    return Err(ModfileErrorKind::Usage("module module/path"));
                };
                let path = unquote(path)?;
                if path.is_empty() {
                    return Err(ModfileErrorKind::Usage("module module/path"));
                }
                self.module = Some(ModuleDecl { path });
            }
            "go" => {
                if self.go.is_some() {
                    return Err(ModfileErrorKind::Repeated("go"));
                }
                let [version] = args else {
                    return Err(ModfileErrorKind::Usage("go 1.23"));
                };
                if !is_go_version(version) {
                    return Err(ModfileErrorKind::InvalidGoVersion(version.clone()));
                }
                self.go = Some(GoDecl {
                    version: version.clone(),
                });
            }
            "require" | "exclude" => {
                let [path, version] = args else {
                    return Err(ModfileErrorKind::Usage(if verb == "require" {
                        "require module/path v1.2.3"
                    } else {
                        "exclude module/path v1.2.3"
                    }));
                };
                let path = unquote(path)?;
                let version = parse_version(&path, version, fix)?;
                let module = Version { path, version };
                if verb == "require" {
                    let indirect = line.comments.suffix.iter().any(|c| is_indirect(&c.token));
                    self.require.push(Require { module, indirect });
                } else {
                    self.exclude.push(Exclude { module });
                }
            }
            "replace" => self.replace.push(parse_replace(args, fix)?),
            "retract" => {
                let (low, high) = match args {
                    [v] => (v.clone(), v.clone()),
                    [open, low, comma, high, close]
                        if open == "[" && comma == "," && close == "]" =>
                    {
                        (low.clone(), high.clone())
                    }
                    _ => {
                        return Err(ModfileErrorKind::Usage(
                            "retract v1.2.3 or retract [v1.2.3, v1.3.0]",
                        ))
                    }
                };
                let low = canonical_version(&unquote(&low)?)
                    .ok_or(ModfileErrorKind::InvalidVersion(low))?;
                let high = canonical_version(&unquote(&high)?)
                    .ok_or(ModfileErrorKind::InvalidVersion(high))?;
                let rationale = line
                    .comments
                    .before
                    .iter()
                    .chain(&line.comments.suffix)
                    .map(|c| c.token.trim_start_matches("//").trim())
                    .collect::<Vec<_>>()
                    .join("\n");
                self.retract.push(Retract {
                    low,
                    high,
                    rationale,
                });
            }
            other => return Err(ModfileErrorKind::UnknownDirective(other.to_string())),
        }
        Ok(())
    }

    /// Require `path` at `vers`, next to the existing requirements.
    ///
    /// ## Parameters
    ///
    /// - `path`: module path
    /// - `vers`: version
    /// - `indirect`: mark the line `// indirect`
    pub fn add_new_require(&mut self, path: &str, vers: &str, indirect: bool) {
        let mut line = Line::new(vec![auto_quote(path), auto_quote(vers)]);
        if indirect {
            line.comments.suffix.push(Comment {
                start: Position::default(),
                token: "// indirect".to_string(),
            });
        }
        self.syntax.add_line("require", line);
        self.require.push(Require {
            module: Version {
                path: path.to_string(),
                version: vers.to_string(),
            },
            indirect,
        });
    }

    /// Replace `old_path` (at `old_vers`, or every version when empty)
    /// with `new_path` at `new_vers`.
    ///
    /// An existing replacement of the same module version is rewritten in
    /// place; otherwise a line is added next to the other replacements.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use modload::modfile::parse;
    ///
    /// let mut file = parse("go.mod", b"module m\n\nreplace a => ../a\n", None).unwrap();
    /// file.add_replace("a", "", "../b", "");
    /// assert_eq!(file.replace.len(), 1);
    /// assert_eq!(file.format(), b"module m\n\nreplace a => ../b\n");
    /// ```
    pub fn add_replace(&mut self, old_path: &str, old_vers: &str, new_path: &str, new_vers: &str) {
        let mut args = vec![auto_quote(old_path)];
        if !old_vers.is_empty() {
            args.push(old_vers.to_string());
        }
        args.push("=>".to_string());
        args.push(auto_quote(new_path));
        if !new_vers.is_empty() {
            args.push(new_vers.to_string());
        }
        let new = Version {
            path: new_path.to_string(),
            version: new_vers.to_string(),
        };

        if let Some(r) = self
            .replace
            .iter_mut()
            .find(|r| r.old.path == old_path && r.old.version == old_vers)
        {
            r.new = new;
            for (verb, line) in self.syntax.lines_mut() {
                if verb != "replace" || !replaces(args_of(line), old_path, old_vers) {
                    continue;
                }
                if line.in_block {
                    line.token = args.clone();
                } else {
                    line.token = std::iter::once(verb).chain(args.iter().cloned()).collect();
                }
            }
            return;
        }

        self.syntax.add_line("replace", Line::new(args));
        self.replace.push(Replace {
            old: Version {
                path: old_path.to_string(),
                version: old_vers.to_string(),
            },
            new,
        });
    }

    /// Print the manifest.
    pub fn format(&self) -> Vec<u8> {
        format(&self.syntax)
    }
}

/// Whether replace arguments name `path` at `vers` on their left side.
fn replaces(args: &[String], path: &str, vers: &str) -> bool {
    let Some(arrow) = args.iter().position(|a| a == "=>") else {
        return false;
    };
    let old_path = args.first().and_then(|a| unquote(a).ok());
    let old_vers = if arrow == 2 { args[1].as_str() } else { "" };
    old_path.as_deref() == Some(path) && old_vers == vers
}

fn parse_replace(args: &[String], fix: Option<VersionFixer>) -> Result<Replace, ModfileErrorKind> {
    const USAGE: &str = "replace module/path [v1.2.3] => other/module v1.4 or ../local/directory";
    let arrow = match args.iter().position(|a| a == "=>") {
        Some(i @ (1 | 2)) => i,
        _ => return Err(ModfileErrorKind::Usage(USAGE)),
    };
    let old_path = unquote(&args[0])?;
    let old_version = if arrow == 2 {
        parse_version(&old_path, &args[1], fix)?
    } else {
        String::new()
    };

    let new = &args[arrow + 1..];
    let (new_path, new_version) = match new {
        [path] => {
            let path = unquote(path)?;
            if !is_directory_path(&path) {
                return Err(ModfileErrorKind::Replace(
                    "replacement module without version must be directory path (rooted or starting with ./ or ../)",
                ));
            }
            (path, String::new())
        }
        [path, version] => {
            let path = unquote(path)?;
            if is_directory_path(&path) {
                return Err(ModfileErrorKind::Replace(
                    "replacement module directory path must not have version",
                ));
            }
            let version = parse_version(&path, version, fix)?;
            (path, version)
        }
        _ => return Err(ModfileErrorKind::Usage(USAGE)),
    };
    Ok(Replace {
        old: Version {
            path: old_path,
            version: old_version,
        },
        new: Version {
            path: new_path,
            version: new_version,
        },
    })
}

fn is_indirect(comment: &str) -> bool {
    let text = comment.trim_start_matches("//").trim();
    text == "indirect" || text.starts_with("indirect;")
}

// =============================================================================
// TOKENS AND VERSIONS
// =============================================================================

/// Quote `s` when it would not read back as a single bare token.
///
/// ## Example
///
/// ```rust
/// use modload::modfile::auto_quote;
///
/// assert_eq!(auto_quote("github.com/goplus/gop"), "github.com/goplus/gop");
/// assert_eq!(auto_quote("/opt/go plus"), "\"/opt/go plus\"");
/// ```
pub fn auto_quote(s: &str) -> String {
    let must_quote = s.is_empty()
        || s.contains("//")
        || s.contains("/*")
        || s.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '`' | '(' | ')' | '[' | ']' | '{' | '}' | ',')
        });
    if must_quote {
        format!("{:?}", s)
    } else {
        s.to_string()
    }
}

/// Strip the quotes from a token.
fn unquote(token: &str) -> Result<String, ModfileErrorKind> {
    if let Some(raw) = token.strip_prefix('`') {
        return Ok(raw.strip_suffix('`').unwrap_or(raw).to_string());
    }
    let Some(inner) = token.strip_prefix('"') else {
        return Ok(token.to_string());
    };
    let invalid = || ModfileErrorKind::InvalidQuoted(token.to_string());
    let inner = inner.strip_suffix('"').ok_or_else(invalid)?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(c @ ('\\' | '"' | '\'')) => out.push(c),
            _ => return Err(invalid()),
        }
    }
    Ok(out)
}

fn parse_version(path: &str, token: &str, fix: Option<VersionFixer>) -> Result<String, ModfileErrorKind> {
    let mut version = unquote(token)?;
    if let Some(fix) = fix {
        version = fix(path, &version).map_err(|message| ModfileErrorKind::Fix {
            path: path.to_string(),
            version: version.clone(),
            message,
        })?;
    }
    canonical_version(&version).ok_or(ModfileErrorKind::InvalidVersion(version))
}

/// Canonical form of a semantic version, or `None` when `v` is not one.
///
/// Shorthands gain zero components and build metadata is dropped, except
/// for `+incompatible`.
///
/// ## Example
///
/// ```rust
/// use modload::modfile::canonical_version;
///
/// assert_eq!(canonical_version("v1.2").as_deref(), Some("v1.2.0"));
/// assert_eq!(canonical_version("v2.0.0-rc.1+meta").as_deref(), Some("v2.0.0-rc.1"));
/// assert_eq!(canonical_version("1.2.3"), None);
/// ```
pub fn canonical_version(v: &str) -> Option<String> {
    let rest = v.strip_prefix('v')?;
    let (core, build) = match rest.split_once('+') {
        Some((core, build)) => (core, Some(build)),
        None => (rest, None),
    };
    let (nums, pre) = match core.split_once('-') {
        Some((nums, pre)) => (nums, Some(pre)),
        None => (core, None),
    };
    let parts: Vec<&str> = nums.split('.').collect();
    if parts.len() > 3 || !parts.iter().all(|p| is_number(p)) {
        return None;
    }
    if parts.len() < 3 && (pre.is_some() || build.is_some()) {
        return None;
    }
    let idents_ok = |s: &str| {
        s.split('.')
            .all(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
    };
    if !pre.map_or(true, idents_ok) || !build.map_or(true, idents_ok) {
        return None;
    }

    let mut out = format!(
        "v{}.{}.{}",
        parts[0],
        parts.get(1).unwrap_or(&"0"),
        parts.get(2).unwrap_or(&"0")
    );
    if let Some(pre) = pre {
        out.push('-');
        out.push_str(pre);
    }
    if build == Some("incompatible") {
        out.push_str("+incompatible");
    }
    Some(out)
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) && (s == "0" || !s.starts_with('0'))
}

/// `1.21`, `1.21.3` or `1.21rc1`.
fn is_go_version(v: &str) -> bool {
    let mut parts = v.split('.');
    let major = parts.next().unwrap_or("");
    if !is_number(major) || major == "0" {
        return false;
    }
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() || rest.len() > 2 {
        return false;
    }
    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return false,
    };
    if !middle.iter().all(|p| is_number(p)) {
        return false;
    }
    let digits = last.find(|c: char| !c.is_ascii_digit()).unwrap_or(last.len());
    let (num, suffix) = last.split_at(digits);
    if !is_number(num) {
        return false;
    }
    if suffix.is_empty() {
        return true;
    }
    let letters = suffix.find(|c: char| !c.is_ascii_lowercase()).unwrap_or(suffix.len());
    let (word, tail) = suffix.split_at(letters);
    !word.is_empty() && !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit())
}

/// Local directory paths: rooted or starting with `./` or `../`.
fn is_directory_path(path: &str) -> bool {
    path == "."
        || path == ".."
        || path.starts_with("./")
        || path.starts_with("../")
        || path.starts_with(".\\")
        || path.starts_with("..\\")
        || path.starts_with('/')
        || path.starts_with('\\')
        || (path.len() >= 3 && path.as_bytes()[1] == b':' && matches!(path.as_bytes()[2], b'\\' | b'/'))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"module example.com/hello

go 1.18

require (
	github.com/a/b v1.2.3
	github.com/c/d v0.1.0 // indirect
)

exclude github.com/a/b v1.2.2

replace github.com/a/b v1.2.3 => ../b

// broken build
retract [v0.1.0, v0.2.0]
"#;

    #[test]
    fn test_parse_directives() {
        let f = parse("go.mod", SAMPLE.as_bytes(), None).unwrap();
        assert_eq!(f.module.unwrap().path, "example.com/hello");
        assert_eq!(f.go.unwrap().version, "1.18");
        assert_eq!(f.require.len(), 2);
        assert!(!f.require[0].indirect);
        assert!(f.require[1].indirect);
        assert_eq!(f.exclude[0].module.version, "v1.2.2");
        assert_eq!(f.replace[0].old.version, "v1.2.3");
        assert_eq!(f.replace[0].new.path, "../b");
        assert_eq!(f.retract[0].low, "v0.1.0");
        assert_eq!(f.retract[0].high, "v0.2.0");
        assert_eq!(f.retract[0].rationale, "broken build");
    }

    #[test]
    fn test_format_round_trips() {
        let f = parse("go.mod", SAMPLE.as_bytes(), None).unwrap();
        assert_eq!(String::from_utf8(f.format()).unwrap(), SAMPLE);
    }

    #[test]
    fn test_syntax_dumps_as_json() {
        let f = parse("go.mod", SAMPLE.as_bytes(), None).unwrap();
        let json = serde_json::to_value(&f.syntax).unwrap();
        assert_eq!(json["name"], "go.mod");
        assert_eq!(json["stmts"][0]["Line"]["token"][1], "example.com/hello");
        assert_eq!(json["stmts"][2]["Block"]["line"][1]["comments"]["suffix"][0]["token"], "// indirect");
    }

    #[test]
    fn test_missing_module_is_not_a_parse_error() {
        let f = parse("gop.mod", b"go 1.18\n", None).unwrap();
        assert!(f.module.is_none());
    }

    #[test]
    fn test_fixer_rewrites_versions() {
        let fix = |_: &str, v: &str| -> Result<String, String> {
            Ok(if v == "master" { "v0.0.1".to_string() } else { v.to_string() })
        };
        let f = parse("go.mod", b"module m\nrequire a master\n", Some(&fix)).unwrap();
        assert_eq!(f.require[0].module.version, "v0.0.1");
    }

    #[test]
    fn test_fixer_error_is_reported() {
        let fix = |_: &str, _: &str| -> Result<String, String> { Err("unknown revision".to_string()) };
        let err = parse("go.mod", b"module m\nrequire a v1.0.0\n", Some(&fix)).unwrap_err();
        assert_eq!(err.to_string(), "go.mod:2: a@v1.0.0: unknown revision");
    }

    #[test]
    fn test_directive_errors() {
        let cases: &[(&str, &str)] = &[
            ("module a\nmodule b\n", "go.mod:2: repeated module statement"),
            ("module a b\n", "go.mod:1: usage: module module/path"),
            ("go 1\n", "go.mod:1: invalid go version '1': must match format 1.23"),
            ("toolchain go1.21\n", "go.mod:1: unknown directive: toolchain"),
            ("module (\n\tm\n)\n", "go.mod:1: module block is not supported"),
            (
                "replace a => b\n",
                "go.mod:1: replacement module without version must be directory path (rooted or starting with ./ or ../)",
            ),
            (
                "replace a => ../b v1.0.0\n",
                "go.mod:1: replacement module directory path must not have version",
            ),
        ];
        for (src, want) in cases {
            let err = parse("go.mod", src.as_bytes(), None).unwrap_err();
            assert_eq!(err.to_string(), *want, "source {:?}", src);
        }
    }

    #[test]
    fn test_add_new_require_joins_block() {
        let mut f = parse("go.mod", SAMPLE.as_bytes(), None).unwrap();
        f.add_new_require("github.com/e/f", "v1.0.0", true);
        let out = String::from_utf8(f.format()).unwrap();
        assert!(out.contains("\tgithub.com/c/d v0.1.0 // indirect\n\tgithub.com/e/f v1.0.0 // indirect\n)"));
        assert_eq!(f.require.len(), 3);
    }

    #[test]
    fn test_add_replace_quotes_paths_with_spaces() {
        let mut f = parse("go.mod", b"module m\n", None).unwrap();
        f.add_replace("github.com/goplus/gop", "", "/opt/go plus", "");
        assert_eq!(
            String::from_utf8(f.format()).unwrap(),
            "module m\n\nreplace github.com/goplus/gop => \"/opt/go plus\"\n"
        );
        let again = parse("go.mod", &f.format(), None).unwrap();
        assert_eq!(again.replace[0].new.path, "/opt/go plus");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"a\\\"b\"").unwrap(), "a\"b");
        assert_eq!(unquote("`raw\\n`").unwrap(), "raw\\n");
        assert!(unquote("\"bad\\q\"").is_err());
    }

    #[test]
    fn test_go_versions() {
        for ok in ["1.18", "1.21.3", "1.21rc1", "1.0"] {
            assert!(is_go_version(ok), "{}", ok);
        }
        for bad in ["1", "01.2", "1.2.3.4", "1.21rc", "go1.21"] {
            assert!(!is_go_version(bad), "{}", bad);
        }
    }

    #[test]
    fn test_canonical_versions() {
        assert_eq!(canonical_version("v1").as_deref(), Some("v1.0.0"));
        assert_eq!(canonical_version("v2.0.0+incompatible").as_deref(), Some("v2.0.0+incompatible"));
        assert_eq!(canonical_version("v1.02.0"), None);
        assert_eq!(canonical_version("v1.2-pre"), None);
    }

    fn block(token: &[&str]) -> Expr {
        Expr::Block(LineBlock {
            start: Position { line: 4, ..Position::default() },
            token: token.iter().map(|t| t.to_string()).collect(),
            comments: Comments::default(),
            line: vec![Line {
                in_block: true,
                ..Line::new(vec!["a.example".into(), "v1.0.0".into()])
            }],
            rparen: Vec::new(),
        })
    }

    #[test]
    fn test_block_without_verb_is_rejected() {
        let mut syntax = FileSyntax::new("go.mod");
        syntax.stmts.push(block(&[]));
        let err = from_syntax(syntax, None).unwrap_err();
        assert_eq!(err.to_string(), "go.mod:4:  block is not supported");
    }

    #[test]
    fn test_block_with_extra_tokens_is_rejected() {
        let mut syntax = FileSyntax::new("go.mod");
        syntax.stmts.push(block(&["require", "x"]));
        let err = from_syntax(syntax, None).unwrap_err();
        assert_eq!(err.to_string(), "go.mod:4: syntax error: unexpected x");
    }

    #[test]
    fn test_hand_built_block_is_read() {
        let mut syntax = FileSyntax::new("go.mod");
        syntax.stmts.push(block(&["require"]));
        let f = from_syntax(syntax, None).unwrap();
        assert_eq!(f.require.len(), 1);
        assert_eq!(f.require[0].module.path, "a.example");
    }
}
