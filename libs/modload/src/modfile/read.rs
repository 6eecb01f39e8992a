//! # Manifest Reader
//!
//! Turns manifest text into a [`FileSyntax`]. Reading happens in two
//! steps: the text is split into physical lines of tokens, then the lines
//! are grouped into statements, blocks and comment groups.
//!
//! A comment line attaches to the next directive unless a blank line
//! separates them, in which case it becomes a free-standing group.

use super::error::{ModfileError, ModfileErrorKind};
use super::syntax::{Comment, CommentBlock, Comments, Expr, FileSyntax, Line, LineBlock, Position};

// =============================================================================
// RAW LINES
// =============================================================================

/// One physical line: its tokens and an optional trailing comment.
#[derive(Debug)]
struct RawLine {
    start: Position,
    tokens: Vec<String>,
    comment: Option<Comment>,
}

impl RawLine {
    fn is_blank(&self) -> bool {
        self.tokens.is_empty() && self.comment.is_none()
    }

    fn is_token(&self, token: &str) -> bool {
        self.tokens.len() == 1 && self.tokens[0] == token
    }
}

fn is_punct(c: char) -> bool {
    matches!(c, '(' | ')' | '[' | ']' | ',')
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !is_punct(c) && c != '"' && c != '`'
}

/// Scanner splitting text into [`RawLine`]s.
struct Scanner<'a> {
    filename: &'a str,
    src: &'a str,
    byte: usize,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    fn new(filename: &'a str, src: &'a str) -> Self {
        Self {
            filename,
            src,
            byte: 0,
            line: 1,
            column: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.byte..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn pos(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            byte: self.byte,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.byte += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, kind: ModfileErrorKind) -> ModfileError {
        ModfileError::new(self.filename, self.line, kind)
    }

    fn lines(mut self) -> Result<Vec<RawLine>, ModfileError> {
        let mut out = Vec::new();
        while self.peek().is_some() {
            out.push(self.line_tokens()?);
        }
        Ok(out)
    }

    /// Scan up to and including the next newline.
    fn line_tokens(&mut self) -> Result<RawLine, ModfileError> {
        let mut raw = RawLine {
            start: self.pos(),
            tokens: Vec::new(),
            comment: None,
        };
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.advance();
                    break;
                }
                c if c.is_whitespace() => {
                    self.advance();
                }
                '/' if self.rest().starts_with("//") => {
                    let start = self.pos();
                    let text = self.rest().split('\n').next().unwrap_or("");
                    let text = text.trim_end();
                    for _ in text.chars() {
                        self.advance();
                    }
                    raw.comment = Some(Comment {
                        start,
                        token: text.to_string(),
                    });
                }
                c if is_punct(c) => {
                    self.advance();
                    raw.tokens.push(c.to_string());
                }
                '"' => raw.tokens.push(self.quoted()?),
                '`' => raw.tokens.push(self.raw_quoted()?),
                _ => {
                    let begin = self.byte;
                    while let Some(c) = self.peek() {
                        if !is_word_char(c) || self.rest().starts_with("//") {
                            break;
                        }
                        self.advance();
                    }
                    raw.tokens.push(self.src[begin..self.byte].to_string());
                }
            }
        }
        if raw.tokens.is_empty() {
            if let Some(comment) = &raw.comment {
                raw.start = comment.start;
            }
        }
        Ok(raw)
    }

    fn quoted(&mut self) -> Result<String, ModfileError> {
        let begin = self.byte;
        self.advance();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(self.error(ModfileErrorKind::UnterminatedString)),
                Some('\\') => {
                    self.advance();
                    if matches!(self.peek(), None | Some('\n')) {
                        return Err(self.error(ModfileErrorKind::UnterminatedString));
                    }
                    self.advance();
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        Ok(self.src[begin..self.byte].to_string())
    }

    fn raw_quoted(&mut self) -> Result<String, ModfileError> {
        let begin = self.byte;
        let line = self.line;
        self.advance();
        loop {
            match self.advance() {
                None => {
                    return Err(ModfileError::new(
                        self.filename,
                        line,
                        ModfileErrorKind::UnterminatedString,
                    ))
                }
                Some('`') => break,
                Some(_) => {}
            }
        }
        Ok(self.src[begin..self.byte].to_string())
    }
}

// =============================================================================
// STATEMENT GROUPING
// =============================================================================

/// Read manifest text into a syntax tree.
///
/// ## Parameters
///
/// - `filename`: name used in the tree and in errors
/// - `src`: manifest text
///
/// ## Example
///
/// ```rust
/// use modload::modfile::{read, Expr};
///
/// let syntax = read("go.mod", "module m\n\nrequire (\n\ta v1.0.0\n)\n").unwrap();
/// assert!(matches!(syntax.stmts[1], Expr::Block(_)));
/// ```
pub fn read(filename: &str, src: &str) -> Result<FileSyntax, ModfileError> {
    let lines = Scanner::new(filename, src).lines()?;
    let mut syntax = FileSyntax::new(filename);
    let mut before: Vec<Comment> = Vec::new();
    let mut iter = lines.into_iter();

    while let Some(raw) = iter.next() {
        if raw.tokens.is_empty() {
            match raw.comment {
                Some(c) => before.push(c),
                None => flush_comments(&mut syntax, &mut before),
            }
            continue;
        }

        let error = |kind| ModfileError::new(filename, raw.start.line, kind);
        if raw.tokens.last().map(String::as_str) == Some("(") {
            let token = raw.tokens[..raw.tokens.len() - 1].to_vec();
            if token.is_empty() {
                return Err(error(ModfileErrorKind::Unexpected("(".to_string())));
            }
            check_plain(&token).map_err(error)?;
            let mut block = LineBlock {
                start: raw.start,
                token,
                comments: Comments {
                    before: std::mem::take(&mut before),
                    suffix: raw.comment.into_iter().collect(),
                },
                line: Vec::new(),
                rparen: Vec::new(),
            };
            read_block(filename, &mut iter, &mut block)?;
            syntax.stmts.push(Expr::Block(block));
        } else {
            check_plain(&raw.tokens).map_err(error)?;
            syntax.stmts.push(Expr::Line(Line {
                start: raw.start,
                token: raw.tokens,
                comments: Comments {
                    before: std::mem::take(&mut before),
                    suffix: raw.comment.into_iter().collect(),
                },
                in_block: false,
            }));
        }
    }
    flush_comments(&mut syntax, &mut before);
    Ok(syntax)
}

/// Read block lines up to the closing `)`.
fn read_block(
    filename: &str,
    iter: &mut impl Iterator<Item = RawLine>,
    block: &mut LineBlock,
) -> Result<(), ModfileError> {
    let mut before = Vec::new();
    for raw in iter.by_ref() {
        if raw.is_blank() {
            continue;
        }
        if raw.tokens.is_empty() {
            before.extend(raw.comment);
            continue;
        }
        if raw.is_token(")") {
            before.extend(raw.comment);
            block.rparen = before;
            return Ok(());
        }
        check_plain(&raw.tokens).map_err(|kind| ModfileError::new(filename, raw.start.line, kind))?;
        block.line.push(Line {
            start: raw.start,
            token: raw.tokens,
            comments: Comments {
                before: std::mem::take(&mut before),
                suffix: raw.comment.into_iter().collect(),
            },
            in_block: true,
        });
    }
    Err(ModfileError::new(
        filename,
        block.start.line,
        ModfileErrorKind::Unexpected("EOF".to_string()),
    ))
}

/// Parentheses only open and close blocks.
fn check_plain(tokens: &[String]) -> Result<(), ModfileErrorKind> {
    match tokens.iter().find(|t| *t == "(" || *t == ")") {
        Some(t) => Err(ModfileErrorKind::Unexpected(t.clone())),
        None => Ok(()),
    }
}

fn flush_comments(syntax: &mut FileSyntax, before: &mut Vec<Comment>) {
    if before.is_empty() {
        return;
    }
    let comments = std::mem::take(before);
    syntax.stmts.push(Expr::Comment(CommentBlock {
        start: comments[0].start,
        comments,
    }));
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_lines_and_comments() {
        let syntax = read("go.mod", "// doc\nmodule m // name\n\ngo 1.18\n").unwrap();
        assert_eq!(syntax.stmts.len(), 2);
        let Expr::Line(module) = &syntax.stmts[0] else {
            panic!("expected a line");
        };
        assert_eq!(module.token, ["module", "m"]);
        assert_eq!(module.comments.before[0].token, "// doc");
        assert_eq!(module.comments.suffix[0].token, "// name");
        assert_eq!(module.start.line, 2);
    }

    #[test]
    fn test_blank_line_detaches_comments() {
        let syntax = read("go.mod", "// header\n\nmodule m\n").unwrap();
        assert!(matches!(&syntax.stmts[0], Expr::Comment(c) if c.comments.len() == 1));
        let Expr::Line(module) = &syntax.stmts[1] else {
            panic!("expected a line");
        };
        assert!(module.comments.before.is_empty());
    }

    #[test]
    fn test_block_lines() {
        let src = "require (\n\t// first\n\ta v1.0.0\n\n\tb v1.2.0 // indirect\n\t// end\n)\n";
        let syntax = read("go.mod", src).unwrap();
        let Expr::Block(block) = &syntax.stmts[0] else {
            panic!("expected a block");
        };
        assert_eq!(block.token, ["require"]);
        assert_eq!(block.line.len(), 2);
        assert_eq!(block.line[0].comments.before[0].token, "// first");
        assert_eq!(block.line[1].token, ["b", "v1.2.0"]);
        assert_eq!(block.line[1].comments.suffix[0].token, "// indirect");
        assert_eq!(block.rparen[0].token, "// end");
    }

    #[test]
    fn test_quoted_tokens_are_kept_verbatim() {
        let syntax = read("go.mod", "replace \"a b\" => `../x y`\n").unwrap();
        let (_, line) = syntax.lines().next().unwrap();
        assert_eq!(line.token, ["replace", "\"a b\"", "=>", "`../x y`"]);
    }

    #[test]
    fn test_slashes_inside_words_start_comments() {
        let syntax = read("go.mod", "module m//c\n").unwrap();
        let (_, line) = syntax.lines().next().unwrap();
        assert_eq!(line.token, ["module", "m"]);
        assert_eq!(line.comments.suffix[0].token, "//c");
    }

    #[test]
    fn test_interval_tokens() {
        let syntax = read("go.mod", "retract [v1.0.0, v1.1.0]\n").unwrap();
        let (_, line) = syntax.lines().next().unwrap();
        assert_eq!(line.token, ["retract", "[", "v1.0.0", ",", "v1.1.0", "]"]);
    }

    #[test]
    fn test_unclosed_block_is_an_error() {
        let err = read("go.mod", "module m\n\nrequire (\n\ta v1.0.0\n").unwrap_err();
        assert_eq!(err.to_string(), "go.mod:3: syntax error: unexpected EOF");
    }

    #[test]
    fn test_unterminated_string() {
        let err = read("go.mod", "module \"m\n").unwrap_err();
        assert_eq!(err.kind, ModfileErrorKind::UnterminatedString);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_stray_paren() {
        let err = read("go.mod", "module m )\n").unwrap_err();
        assert_eq!(err.to_string(), "go.mod:1: syntax error: unexpected )");
    }
}
