//! # Statement Layout
//!
//! Blocks, statement lists and control clauses. Case bodies are indented
//! one level below their `case` line, which itself sits at the level of
//! the `switch`.

use super::expressions::strip_parens;
use super::{FResult, Printer};
use crate::ast::{BlockStmt, Expr, Stmt};
use crate::token::Pos;

impl<'a> Printer<'a> {
    /// Print `{`, the statements indented by `nindent`, and `}`.
    pub(crate) fn block(&mut self, b: &BlockStmt, nindent: usize) -> FResult<()> {
        self.text("{");
        self.set_pos(b.lbrace);
        self.indent += nindent;
        self.stmt_items(&b.list, nindent, true)?;
        self.comments_before(b.rbrace, 1, true);
        self.indent -= nindent;
        if b.rbrace.is_valid() {
            self.linebreak(self.line(b.rbrace), 1, true);
        } else {
            self.newline(true);
        }
        self.text("}");
        self.set_pos(b.rbrace);
        Ok(())
    }

    /// Print the body of a case clause.
    fn stmt_list(&mut self, list: &[Stmt], nindent: usize, next_is_rbrace: bool) -> FResult<()> {
        self.indent += nindent;
        self.stmt_items(list, nindent, next_is_rbrace)?;
        self.indent -= nindent;
        Ok(())
    }

    fn stmt_items(&mut self, list: &[Stmt], nindent: usize, next_is_rbrace: bool) -> FResult<()> {
        let mut start = 0;
        let mut printed = 0;
        let last = list.len().saturating_sub(1);
        for (i, s) in list.iter().enumerate() {
            if let Stmt::Empty(_) = s {
                continue;
            }
            let section = printed == 0 || nindent == 0 || self.lines_out() > start;
            self.break_to(s.pos(), 1, section);
            start = self.lines_out();
            self.stmt(s, next_is_rbrace && i == last)?;

            let mut inner = s;
            while let Stmt::Labeled(l) = inner {
                start += 1;
                inner = &l.stmt;
            }
            self.set_pos(s.end());
            printed += 1;
        }
        Ok(())
    }

    pub(crate) fn stmt(&mut self, s: &Stmt, next_is_rbrace: bool) -> FResult<()> {
        match s {
            Stmt::Bad(b) => return Err(self.bad_node(s.kind_name(), b.from)),
            Stmt::Decl(d) => self.decl(&d.decl)?,
            Stmt::Empty(_) => {}
            Stmt::Labeled(l) => {
                let indent = self.indent;
                self.indent = indent.saturating_sub(1);
                self.text(&l.label.name);
                self.text(":");
                self.indent = indent;
                self.set_pos(l.colon);
                match l.stmt.as_ref() {
                    Stmt::Empty(_) if next_is_rbrace => {}
                    Stmt::Empty(_) => {
                        self.newline(false);
                        self.text(";");
                        return Ok(());
                    }
                    inner => {
                        self.linebreak(self.line(inner.pos()), 1, true);
                    }
                }
                self.stmt(&l.stmt, next_is_rbrace)?;
            }
            Stmt::Expr(e) => self.expr0(&e.x, 1)?,
            Stmt::Send(e) => {
                self.expr0(&e.chan, 1)?;
                self.blank();
                self.text("<-");
                self.blank();
                self.expr0(&e.value, 1)?;
            }
            Stmt::IncDec(e) => {
                self.expr0(&e.x, 2)?;
                self.text(e.tok.display());
            }
            Stmt::Assign(a) => {
                let depth = if a.lhs.len() > 1 && a.rhs.len() > 1 { 2 } else { 1 };
                self.expr_list(s.pos(), &a.lhs, depth, false, a.tok_pos)?;
                self.blank();
                self.text(a.tok.display());
                self.blank();
                self.expr_list(a.tok_pos, &a.rhs, depth, false, Pos::NONE)?;
            }
            Stmt::Go(g) => {
                self.text("go");
                self.blank();
                self.call_expr(&g.call, 1)?;
            }
            Stmt::Defer(d) => {
                self.text("defer");
                self.blank();
                self.call_expr(&d.call, 1)?;
            }
            Stmt::Return(r) => {
                self.text("return");
                if !r.results.is_empty() {
                    self.blank();
                    self.expr_list(Pos::NONE, &r.results, 1, false, Pos::NONE)?;
                }
            }
            Stmt::Branch(b) => {
                self.text(b.tok.display());
                if let Some(label) = &b.label {
                    self.blank();
                    self.text(&label.name);
                }
            }
            Stmt::Block(b) => self.block(b, 1)?,
            Stmt::If(i) => {
                self.text("if");
                self.control_clause(false, i.init.as_deref(), Some(&i.cond), None)?;
                self.block(&i.body, 1)?;
                if let Some(alt) = &i.else_branch {
                    self.blank();
                    self.text("else");
                    self.blank();
                    match alt.as_ref() {
                        Stmt::Block(_) | Stmt::If(_) => self.stmt(alt, next_is_rbrace)?,
                        other => {
                            self.text("{");
                            self.indent += 1;
                            self.newline(true);
                            self.stmt(other, true)?;
                            self.indent -= 1;
                            self.newline(true);
                            self.text("}");
                        }
                    }
                }
            }
            Stmt::CaseClause(c) => {
                if c.list.is_empty() {
                    self.text("default");
                } else {
                    self.text("case");
                    self.blank();
                    self.expr_list(c.case, &c.list, 1, false, c.colon)?;
                }
                self.text(":");
                self.set_pos(c.colon);
                self.stmt_list(&c.body, 1, next_is_rbrace)?;
            }
            Stmt::Switch(sw) => {
                self.text("switch");
                self.control_clause(false, sw.init.as_deref(), sw.tag.as_ref(), None)?;
                self.block(&sw.body, 0)?;
            }
            Stmt::TypeSwitch(ts) => {
                self.text("switch");
                if let Some(init) = &ts.init {
                    self.blank();
                    self.stmt(init, false)?;
                    self.text(";");
                }
                self.blank();
                self.stmt(&ts.assign, false)?;
                self.blank();
                self.block(&ts.body, 0)?;
            }
            Stmt::CommClause(c) => {
                match &c.comm {
                    Some(comm) => {
                        self.text("case");
                        self.blank();
                        self.stmt(comm, false)?;
                    }
                    None => self.text("default"),
                }
                self.text(":");
                self.set_pos(c.colon);
                self.stmt_list(&c.body, 1, next_is_rbrace)?;
            }
            Stmt::Select(sel) => {
                self.text("select");
                self.blank();
                let body = &sel.body;
                if body.list.is_empty() && !self.comment_between(body.lbrace, body.rbrace) {
                    self.text("{}");
                    self.set_pos(body.rbrace);
                } else {
                    self.block(body, 0)?;
                }
            }
            Stmt::For(f) => {
                self.text("for");
                self.control_clause(
                    true,
                    f.init.as_deref(),
                    f.cond.as_ref(),
                    f.post.as_deref(),
                )?;
                self.block(&f.body, 1)?;
            }
            Stmt::Range(r) => {
                self.text("for");
                self.blank();
                if let Some(key) = &r.key {
                    self.expr(key)?;
                    if let Some(value) = &r.value {
                        self.text(",");
                        self.blank();
                        self.expr(value)?;
                    }
                    self.blank();
                    self.text(r.tok.display());
                    self.blank();
                }
                self.text("range");
                self.blank();
                self.expr(strip_parens(&r.x))?;
                self.blank();
                self.block(&r.body, 1)?;
            }
        }
        Ok(())
    }

    /// Print the header of an `if`, `switch` or `for` statement, up to
    /// the blank before the opening brace.
    fn control_clause(
        &mut self,
        is_for: bool,
        init: Option<&Stmt>,
        expr: Option<&Expr>,
        post: Option<&Stmt>,
    ) -> FResult<()> {
        self.blank();
        let mut needs_blank = false;
        if init.is_none() && post.is_none() {
            if let Some(x) = expr {
                self.expr(strip_parens(x))?;
                needs_blank = true;
            }
        } else {
            if let Some(s) = init {
                self.stmt(s, false)?;
            }
            self.text(";");
            self.blank();
            if let Some(x) = expr {
                self.expr(strip_parens(x))?;
                needs_blank = true;
            }
            if is_for {
                self.text(";");
                self.blank();
                needs_blank = false;
                if let Some(s) = post {
                    self.stmt(s, false)?;
                    needs_blank = true;
                }
            }
        }
        if needs_blank {
            self.blank();
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::fromgo::{ast_file, ConvertOptions};
    use crate::printer::format_file;

    fn reformat(body: &str) -> String {
        let src = format!("package p\n\nfunc f() {{\n{}}}\n", body);
        let file = go_parser::parse_file("x.go", &src).unwrap();
        let out = format_file(&ast_file(Some(&file), ConvertOptions::empty())).unwrap();
        out.strip_prefix("package p\n\nfunc f() {\n")
            .and_then(|s| s.strip_suffix("}\n"))
            .unwrap_or(&out)
            .to_string()
    }

    #[test]
    fn test_simple_statements_round_trip() {
        let body = "\tx := 1\n\tx++\n\tx += 2\n\tch <- x\n\tgo g(x)\n\tdefer g(x)\n\treturn\n";
        assert_eq!(reformat(body), body);
    }

    #[test]
    fn test_if_else_chain() {
        let body = "\tif x := g(); x > 0 {\n\t\treturn\n\t} else if x < 0 {\n\t\tpanic(x)\n\t} else {\n\t\tx = 0\n\t}\n";
        assert_eq!(reformat(body), body);
    }

    #[test]
    fn test_control_clause_parens_are_dropped() {
        assert_eq!(reformat("\tif (ok) {\n\t}\n"), "\tif ok {\n\t}\n");
    }

    #[test]
    fn test_for_loops() {
        let body = "\tfor i := 0; i < n; i++ {\n\t}\n\tfor {\n\t}\n\tfor k, v := range m {\n\t\t_, _ = k, v\n\t}\n\tfor range ch {\n\t}\n";
        assert_eq!(reformat(body), body);
    }

    #[test]
    fn test_switch_cases_sit_at_switch_level() {
        let body = "\tswitch x {\n\tcase 1, 2:\n\t\tg()\n\tdefault:\n\t}\n";
        assert_eq!(reformat(body), body);
    }

    #[test]
    fn test_type_switch_and_select() {
        let body = "\tswitch t := v.(type) {\n\tcase int:\n\t\t_ = t\n\t}\n\tselect {\n\tcase x := <-ch:\n\t\t_ = x\n\tcase ch <- 1:\n\t}\n\tselect {}\n";
        assert_eq!(reformat(body), body);
    }

    #[test]
    fn test_labels_are_outdented() {
        let body = "outer:\n\tfor {\n\t\tbreak outer\n\t}\n";
        assert_eq!(reformat(body), body);
    }

    #[test]
    fn test_comments_inside_blocks() {
        let body = "\t// leading\n\tx := 1 // trailing\n\t_ = x\n\t// closing\n";
        assert_eq!(reformat(body), body);
    }

    #[test]
    fn test_blank_line_between_statements_is_kept() {
        let body = "\tg()\n\n\tg()\n";
        assert_eq!(reformat(body), body);
    }
}
