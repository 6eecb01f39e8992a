//! # Declaration Layout
//!
//! Files, declaration groups, function headers and field lists.

use super::expressions::strip_parens_always;
use super::{FResult, Printer};
use crate::ast::{
    BlockStmt, Decl, Expr, FieldList, File, FuncDecl, GenDecl, Ident, Spec, ValueSpec,
};
use crate::token::TokenKind;

const INFINITY: usize = 1_000_000;

impl<'a> Printer<'a> {
    pub(crate) fn file(&mut self, f: &File) -> FResult<()> {
        if !f.no_pkg_decl {
            self.break_to(f.package, 1, false);
            self.text("package");
            self.blank();
            self.text(&f.name.name);
            self.set_pos(f.name.name_pos);
        }
        self.decl_list(&f.decls)?;
        self.flush_comments();
        Ok(())
    }

    fn decl_list(&mut self, decls: &[Decl]) -> FResult<()> {
        let mut tok = TokenKind::Illegal;
        for d in decls {
            let prev = tok;
            tok = decl_token(d);
            let min = if prev != tok || d.doc().is_some() { 2 } else { 1 };
            let section = tok == TokenKind::Func && self.num_lines(d) > 1;
            self.break_to(d.pos(), min, section);
            self.decl(d)?;
            self.set_pos(d.end());
        }
        Ok(())
    }

    fn num_lines(&self, d: &Decl) -> usize {
        let from = self.line(d.pos());
        let to = self.line(d.end());
        if from > 0 && to >= from {
            to - from + 1
        } else {
            0
        }
    }

    pub(crate) fn decl(&mut self, d: &Decl) -> FResult<()> {
        match d {
            Decl::Bad(b) => Err(self.bad_node(d.kind_name(), b.from)),
            Decl::Gen(g) => self.gen_decl(g),
            Decl::Func(f) => self.func_decl(f),
        }
    }

    // -------------------------------------------------------------------------
    // Generic declarations
    // -------------------------------------------------------------------------

    fn gen_decl(&mut self, d: &GenDecl) -> FResult<()> {
        self.text(d.tok.display());
        self.blank();

        if !d.lparen.is_valid() && d.specs.len() <= 1 {
            if let Some(s) = d.specs.first() {
                self.spec(s, 1)?;
            }
            return Ok(());
        }

        self.text("(");
        self.set_pos(d.lparen);
        let n = d.specs.len();
        if n > 0 {
            self.indent += 1;
            let values = n > 1 && matches!(d.tok, TokenKind::Const | TokenKind::Var);
            let keep_type = if values {
                keep_type_column(&d.specs)
            } else {
                vec![false; n]
            };
            let mut start = 0;
            for (i, s) in d.specs.iter().enumerate() {
                let section = i == 0 || self.lines_out() > start;
                self.break_to(s.pos(), 1, section);
                start = self.lines_out();
                match s {
                    Spec::Value(v) if values => self.value_spec(v, keep_type[i])?,
                    _ => self.spec(s, n)?,
                }
                self.set_pos(s.end());
            }
            self.comments_before(d.rparen, 1, true);
            self.indent -= 1;
            self.linebreak(self.line(d.rparen), 1, true);
        }
        self.text(")");
        self.set_pos(d.rparen);
        Ok(())
    }

    /// Print a spec of a group with `n` specs.
    fn spec(&mut self, s: &Spec, n: usize) -> FResult<()> {
        match s {
            Spec::Import(s) => {
                if let Some(name) = &s.name {
                    self.text(&name.name);
                    self.blank();
                }
                self.text(&s.path.value);
            }
            Spec::Value(s) => {
                self.ident_list(&s.names);
                if let Some(ty) = &s.ty {
                    self.blank();
                    self.expr(ty)?;
                }
                if !s.values.is_empty() {
                    self.blank();
                    self.text("=");
                    self.blank();
                    self.expr_list(Default::default(), &s.values, 1, false, Default::default())?;
                }
            }
            Spec::Type(s) => {
                self.text(&s.name.name);
                if n == 1 {
                    self.blank();
                } else {
                    self.vtab();
                }
                if s.assign.is_valid() {
                    self.text("=");
                    self.blank();
                }
                self.expr(&s.ty)?;
            }
        }
        Ok(())
    }

    /// Print a `const` or `var` spec as aligned columns:
    /// names, type, values, comment.
    fn value_spec(&mut self, s: &ValueSpec, keep_type: bool) -> FResult<()> {
        self.ident_list(&s.names);
        let mut extra_tabs = 3;
        if s.ty.is_some() || keep_type {
            self.vtab();
            extra_tabs -= 1;
        }
        if let Some(ty) = &s.ty {
            self.expr(ty)?;
        }
        if !s.values.is_empty() {
            self.vtab();
            self.text("=");
            self.blank();
            self.expr_list(Default::default(), &s.values, 1, false, Default::default())?;
            extra_tabs -= 1;
        }
        self.set_pos(s.end());
        if self.trailing_comment_follows() {
            for _ in 0..extra_tabs {
                self.vtab();
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Functions
    // -------------------------------------------------------------------------

    fn func_decl(&mut self, d: &FuncDecl) -> FResult<()> {
        let header = self.node_size(d.ty.pos(), INFINITY, |p| p.func_header(d));
        self.func_header(d)?;
        if let Some(body) = &d.body {
            self.func_body(header, true, body)?;
        }
        Ok(())
    }

    fn func_header(&mut self, d: &FuncDecl) -> FResult<()> {
        self.text("func");
        self.blank();
        if let Some(recv) = &d.recv {
            self.parameters(recv)?;
            self.blank();
        }
        self.text(&d.name.name);
        self.signature(&d.ty)
    }

    /// Print a function body, on the header line when header and body
    /// fit in 100 columns.
    ///
    /// `vtab_sep` separates a one-line body from the header with an
    /// alignment cell, so adjacent one-line functions line up.
    pub(crate) fn func_body(
        &mut self,
        header_size: usize,
        vtab_sep: bool,
        b: &BlockStmt,
    ) -> FResult<()> {
        const MAX_SIZE: usize = 100;
        if header_size + self.body_size(b, MAX_SIZE) <= MAX_SIZE {
            if vtab_sep {
                self.vtab();
            } else {
                self.blank();
            }
            self.text("{");
            if !b.list.is_empty() {
                self.blank();
                for (i, s) in b.list.iter().enumerate() {
                    if i > 0 {
                        self.text(";");
                        self.blank();
                    }
                    self.stmt(s, i == b.list.len() - 1)?;
                }
                self.blank();
            }
            self.text("}");
            self.set_pos(b.rbrace);
            return Ok(());
        }
        self.blank();
        self.block(b, 1)
    }

    fn body_size(&self, b: &BlockStmt, max_size: usize) -> usize {
        let (open, close) = (b.lbrace, b.rbrace);
        if open.is_valid() && close.is_valid() && self.line(open) != self.line(close) {
            return max_size + 1;
        }
        if b.list.len() > 5 {
            return max_size + 1;
        }
        if open.is_valid() && self.comment_between(open, close) {
            return max_size + 1;
        }
        let mut size = 0;
        for (i, s) in b.list.iter().enumerate() {
            if size > max_size {
                break;
            }
            if i > 0 {
                size += 2;
            }
            size += self.node_size(s.pos(), max_size, |p| p.stmt(s, false));
        }
        size
    }

    /// Print a parameter or result list in parentheses.
    ///
    /// Parameters keep their source lines; a list whose `)` sits on a
    /// later line gets a trailing comma.
    pub(crate) fn parameters(&mut self, fields: &FieldList) -> FResult<()> {
        self.text("(");
        self.set_pos(fields.opening);
        let mut indented = false;
        if !fields.list.is_empty() {
            let mut prev_line = self.line(fields.opening);
            for (i, par) in fields.list.iter().enumerate() {
                let begin = self.line(par.pos());
                let end = self.line(par.ty.pos());
                if i > 0 {
                    self.text(",");
                }
                let mut broke = false;
                if 0 < prev_line && prev_line < begin {
                    if !indented {
                        self.indent += 1;
                        indented = true;
                    }
                    broke = self.linebreak(begin, 0, true) > 0;
                }
                if !broke && i > 0 {
                    self.blank();
                }
                if !par.names.is_empty() {
                    self.ident_list(&par.names);
                    self.blank();
                }
                self.expr(strip_parens_always(&par.ty))?;
                prev_line = end;
            }
            let closing = self.line(fields.closing);
            if 0 < prev_line && prev_line < closing {
                self.text(",");
                self.linebreak(closing, 0, true);
            }
        }
        if indented {
            self.indent -= 1;
        }
        self.text(")");
        self.set_pos(fields.closing);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Struct and interface bodies
    // -------------------------------------------------------------------------

    pub(crate) fn field_list(
        &mut self,
        fields: &FieldList,
        is_struct: bool,
        incomplete: bool,
    ) -> FResult<()> {
        let (lbrace, rbrace) = (fields.opening, fields.closing);
        let list = &fields.list;
        let has_comments =
            incomplete || (lbrace.is_valid() && self.comment_between(lbrace, rbrace));
        let one_line_src =
            lbrace.is_valid() && rbrace.is_valid() && self.line(lbrace) == self.line(rbrace);

        if !has_comments && one_line_src {
            if list.is_empty() {
                self.text("{}");
                self.set_pos(rbrace);
                return Ok(());
            }
            if self.is_one_line_field_list(fields) {
                self.text("{");
                self.blank();
                let f = &list[0];
                if is_struct {
                    if !f.names.is_empty() {
                        self.ident_list(&f.names);
                        self.blank();
                    }
                    self.expr(&f.ty)?;
                } else {
                    self.interface_entry(&f.names, &f.ty)?;
                }
                self.blank();
                self.text("}");
                self.set_pos(rbrace);
                return Ok(());
            }
        }

        self.blank();
        self.text("{");
        self.set_pos(lbrace);
        self.indent += 1;

        let vtab_sep = list.len() != 1;
        let mut start = 0;
        for (i, f) in list.iter().enumerate() {
            let section = i == 0 || self.lines_out() > start;
            self.break_to(f.pos(), 1, section);
            start = self.lines_out();

            if is_struct {
                let mut extra_tabs = if f.names.is_empty() { 2 } else { 1 };
                if !f.names.is_empty() {
                    self.ident_list(&f.names);
                    self.field_sep(vtab_sep);
                }
                self.expr(&f.ty)?;
                if let Some(tag) = &f.tag {
                    if !f.names.is_empty() && vtab_sep {
                        self.field_sep(vtab_sep);
                    }
                    self.field_sep(vtab_sep);
                    self.text(&tag.value);
                    extra_tabs = 0;
                }
                self.set_pos(f.end());
                if vtab_sep && self.trailing_comment_follows() {
                    for _ in 0..extra_tabs {
                        self.vtab();
                    }
                }
            } else {
                self.interface_entry(&f.names, &f.ty)?;
                self.set_pos(f.end());
            }
        }

        self.comments_before(rbrace, 1, true);
        self.indent -= 1;
        if rbrace.is_valid() {
            self.linebreak(self.line(rbrace), 1, true);
        } else {
            self.newline(true);
        }
        self.text("}");
        self.set_pos(rbrace);
        Ok(())
    }

    fn field_sep(&mut self, vtab: bool) {
        if vtab {
            self.vtab();
        } else {
            self.blank();
        }
    }

    fn interface_entry(&mut self, names: &[Ident], ty: &Expr) -> FResult<()> {
        match (names.first(), ty) {
            (Some(name), Expr::FuncType(sig)) => {
                self.text(&name.name);
                self.signature(sig)
            }
            _ => self.expr(ty),
        }
    }

    fn is_one_line_field_list(&self, fields: &FieldList) -> bool {
        let [f] = fields.list.as_slice() else {
            return false;
        };
        if f.tag.is_some() || f.comment.is_some() {
            return false;
        }
        const MAX_SIZE: usize = 30;
        let names_size = usize::from(!f.names.is_empty());
        let type_size = self.node_size(f.ty.pos(), MAX_SIZE, |p| p.expr(&f.ty));
        names_size + type_size <= MAX_SIZE
    }

    pub(crate) fn ident_list(&mut self, names: &[Ident]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.text(",");
                self.blank();
            }
            self.text(&name.name);
        }
    }
}

fn decl_token(d: &Decl) -> TokenKind {
    match d {
        Decl::Bad(_) => TokenKind::Illegal,
        Decl::Gen(g) => g.tok,
        Decl::Func(_) => TokenKind::Func,
    }
}

/// Decide per spec whether the type column is kept.
///
/// Within a run of specs that all have values, the type column stays
/// when any spec of the run has a type, so values line up.
fn keep_type_column(specs: &[Spec]) -> Vec<bool> {
    let mut keep = vec![false; specs.len()];
    let mut run_start: Option<usize> = None;
    let mut keep_type = false;

    for (i, s) in specs.iter().enumerate() {
        let Spec::Value(v) = s else {
            if let Some(start) = run_start.take() {
                keep[start..i].fill(keep_type);
            }
            continue;
        };
        if !v.values.is_empty() {
            if run_start.is_none() {
                run_start = Some(i);
                keep_type = false;
            }
        } else if let Some(start) = run_start.take() {
            keep[start..i].fill(keep_type);
        }
        if v.ty.is_some() {
            keep_type = true;
        }
    }
    if let Some(start) = run_start {
        keep[start..].fill(keep_type);
    }
    keep
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fromgo::{ast_file, ConvertOptions};
    use crate::printer::format_file;

    fn reformat(src: &str) -> String {
        let file = go_parser::parse_file("x.go", src).unwrap();
        format_file(&ast_file(Some(&file), ConvertOptions::empty())).unwrap()
    }

    #[test]
    fn test_keep_type_column_runs() {
        let file = go_parser::parse_file(
            "x.go",
            "package p\n\nvar (\n\ta int = 1\n\tb = 2\n\tc string\n\td = 4\n)\n",
        )
        .unwrap();
        let out = ast_file(Some(&file), ConvertOptions::empty());
        let Decl::Gen(g) = &out.decls[0] else {
            panic!("expected a var group");
        };
        assert_eq!(keep_type_column(&g.specs), vec![true, true, false, false]);
    }

    #[test]
    fn test_value_group_aligns_columns() {
        let src = "package p\n\nconst (\n\ta int = 1\n\tbcd = 2\n)\n";
        assert_eq!(
            reformat(src),
            "package p\n\nconst (\n\ta   int = 1\n\tbcd     = 2\n)\n"
        );
    }

    #[test]
    fn test_type_group_aligns_types() {
        let src = "package p\n\ntype (\n\tA int\n\tBcd string\n)\n";
        assert_eq!(
            reformat(src),
            "package p\n\ntype (\n\tA   int\n\tBcd string\n)\n"
        );
    }

    #[test]
    fn test_struct_tags_and_comments() {
        let src = "package p\n\ntype T struct {\n\tA int `json:\"a\"`\n\tBcd string // name\n}\n";
        assert_eq!(
            reformat(src),
            "package p\n\ntype T struct {\n\tA   int    `json:\"a\"`\n\tBcd string // name\n}\n"
        );
    }

    #[test]
    fn test_small_struct_stays_on_one_line() {
        let src = "package p\n\nvar v struct{ a int }\n";
        assert_eq!(reformat(src), src);
    }

    #[test]
    fn test_interface_methods() {
        let src = "package p\n\ntype I interface {\n\tfmt.Stringer\n\tRead(p []byte) (n int, err error)\n}\n";
        assert_eq!(reformat(src), src);
    }

    #[test]
    fn test_parameters_keep_line_breaks() {
        let src = "package p\n\nfunc f(\n\ta int,\n\tb string,\n) {\n}\n";
        assert_eq!(reformat(src), src);
    }

    #[test]
    fn test_long_function_is_not_a_one_liner() {
        let src = "package p\n\nfunc f() { return }\n\nfunc g() {\n\treturn\n}\n";
        assert_eq!(reformat(src), src);
    }

    #[test]
    fn test_blank_lines_are_collapsed() {
        let src = "package p\n\n\n\nvar a = 1\nvar b = 2\n";
        assert_eq!(reformat(src), "package p\n\nvar a = 1\nvar b = 2\n");
    }

    #[test]
    fn test_doc_comments_stay_attached() {
        let src = "// Package p does things.\npackage p\n\n// A is a value.\nvar A = 1 // trailing\n";
        assert_eq!(reformat(src), src);
    }
}
