//! # Expression Layout
//!
//! Binary expressions get blanks around operators depending on nesting
//! depth and precedence, so `a*b + c` keeps the tighter binding visible.
//! Lists break where the source broke them and align `key: value` pairs.

use super::{FResult, Printer};
use crate::ast::{BinaryExpr, CallExpr, ChanDir, Expr, FuncType};
use crate::token::{Pos, TokenKind, HIGHEST_PREC, LOWEST_PREC, UNARY_PREC};

const INFINITY: usize = 1_000_000;

impl<'a> Printer<'a> {
    pub(crate) fn expr(&mut self, x: &Expr) -> FResult<()> {
        self.expr1(x, LOWEST_PREC, 1)
    }

    pub(crate) fn expr0(&mut self, x: &Expr, depth: usize) -> FResult<()> {
        self.expr1(x, LOWEST_PREC, depth)
    }

    pub(crate) fn expr1(&mut self, x: &Expr, prec1: u8, depth: usize) -> FResult<()> {
        match x {
            Expr::Bad(_) => return Err(self.bad_node(x.kind_name(), x.pos())),
            Expr::Ident(id) => self.text(&id.name),
            Expr::BasicLit(lit) => self.text(&lit.value),
            Expr::Binary(b) => {
                let depth = depth.max(1);
                self.binary_expr(b, prec1, cutoff(b, depth), depth)?;
            }
            Expr::KeyValue(kv) => {
                self.expr(&kv.key)?;
                self.text(":");
                self.blank();
                self.expr(&kv.value)?;
            }
            Expr::Star(s) => {
                if UNARY_PREC < prec1 {
                    self.text("(*");
                    self.expr(&s.x)?;
                    self.text(")");
                } else {
                    self.text("*");
                    self.expr(&s.x)?;
                }
            }
            Expr::Unary(u) => {
                if UNARY_PREC < prec1 {
                    self.text("(");
                    self.text(u.op.display());
                    self.expr1(&u.x, UNARY_PREC, depth)?;
                    self.text(")");
                } else {
                    self.text(u.op.display());
                    self.expr1(&u.x, UNARY_PREC, depth)?;
                }
            }
            Expr::FuncLit(f) => {
                let header = self.node_size(f.ty.pos(), INFINITY, |p| {
                    p.text("func");
                    p.signature(&f.ty)
                });
                self.text("func");
                self.signature(&f.ty)?;
                self.func_body(header, false, &f.body)?;
            }
            Expr::Paren(p) => {
                if let Expr::Paren(_) = p.x.as_ref() {
                    self.expr0(&p.x, depth)?;
                } else {
                    self.text("(");
                    self.expr0(&p.x, reduce_depth(depth))?;
                    self.text(")");
                }
            }
            Expr::Selector(s) => {
                self.expr1(&s.x, HIGHEST_PREC, depth)?;
                self.text(".");
                let line = self.line(s.sel.name_pos);
                if self.last_line > 0 && self.last_line < line {
                    self.indent += 1;
                    self.newline(false);
                    self.text(&s.sel.name);
                    self.indent -= 1;
                } else {
                    self.text(&s.sel.name);
                }
            }
            Expr::TypeAssert(t) => {
                self.expr1(&t.x, HIGHEST_PREC, depth)?;
                self.text(".(");
                match &t.ty {
                    Some(ty) => self.expr(ty)?,
                    None => self.text("type"),
                }
                self.text(")");
            }
            Expr::Index(i) => {
                self.expr1(&i.x, HIGHEST_PREC, 1)?;
                self.text("[");
                self.expr0(&i.index, depth + 1)?;
                self.text("]");
            }
            Expr::Slice(s) => {
                self.expr1(&s.x, HIGHEST_PREC, 1)?;
                self.text("[");
                let mut indices = vec![s.low.as_deref(), s.high.as_deref()];
                if s.slice3 {
                    indices.push(s.max.as_deref());
                }
                let present = indices.iter().flatten().count();
                let spaced = depth <= 1
                    && present > 1
                    && indices.iter().flatten().any(|x| matches!(x, Expr::Binary(_)));
                for (i, index) in indices.iter().enumerate() {
                    if i > 0 {
                        if indices[i - 1].is_some() && spaced {
                            self.blank();
                        }
                        self.text(":");
                        if index.is_some() && spaced {
                            self.blank();
                        }
                    }
                    if let Some(x) = index {
                        self.expr0(x, depth + 1)?;
                    }
                }
                self.text("]");
            }
            Expr::Call(c) => self.call_expr(c, depth)?,
            Expr::CompositeLit(c) => {
                if let Some(ty) = &c.ty {
                    self.expr1(ty, HIGHEST_PREC, depth)?;
                }
                self.text("{");
                self.set_pos(c.lbrace);
                self.expr_list(c.lbrace, &c.elts, 1, true, c.rbrace)?;
                self.text("}");
            }
            Expr::Ellipsis(e) => {
                self.text("...");
                if let Some(elt) = &e.elt {
                    self.expr(elt)?;
                }
            }
            Expr::ArrayType(a) => {
                self.text("[");
                if let Some(len) = &a.len {
                    self.expr(len)?;
                }
                self.text("]");
                self.expr(&a.elt)?;
            }
            Expr::StructType(s) => {
                self.text("struct");
                self.field_list(&s.fields, true, s.incomplete)?;
            }
            Expr::FuncType(f) => {
                self.text("func");
                self.signature(f)?;
            }
            Expr::InterfaceType(i) => {
                self.text("interface");
                self.field_list(&i.methods, false, i.incomplete)?;
            }
            Expr::MapType(m) => {
                self.text("map[");
                self.expr(&m.key)?;
                self.text("]");
                self.expr(&m.value)?;
            }
            Expr::ChanType(c) => {
                match c.dir {
                    ChanDir::Both => self.text("chan"),
                    ChanDir::Recv => self.text("<-chan"),
                    ChanDir::Send => self.text("chan<-"),
                }
                self.blank();
                self.expr(&c.value)?;
            }
        }
        self.set_pos(x.end());
        Ok(())
    }

    pub(crate) fn call_expr(&mut self, c: &CallExpr, depth: usize) -> FResult<()> {
        let depth = if c.args.len() > 1 { depth + 1 } else { depth };
        if let Expr::FuncType(_) = c.fun.as_ref() {
            self.text("(");
            self.expr1(&c.fun, HIGHEST_PREC, depth)?;
            self.text(")");
        } else {
            self.expr1(&c.fun, HIGHEST_PREC, depth)?;
        }
        self.text("(");
        self.set_pos(c.lparen);
        if c.ellipsis.is_valid() {
            self.expr_list(c.lparen, &c.args, depth, false, c.ellipsis)?;
            self.text("...");
            if c.rparen.is_valid() && self.line(c.ellipsis) < self.line(c.rparen) {
                self.text(",");
                self.newline(true);
            }
        } else {
            self.expr_list(c.lparen, &c.args, depth, true, c.rparen)?;
        }
        self.text(")");
        self.set_pos(c.rparen);
        Ok(())
    }

    fn binary_expr(&mut self, x: &BinaryExpr, prec1: u8, cut: u8, depth: usize) -> FResult<()> {
        let prec = x.op.precedence();
        if prec < prec1 {
            let depth = reduce_depth(depth);
            self.text("(");
            self.binary_expr(x, LOWEST_PREC, cutoff(x, depth), depth)?;
            self.text(")");
            return Ok(());
        }

        let mut print_blank = prec < cut;
        self.expr1(&x.x, prec, depth + diff_prec(&x.x, prec))?;
        if print_blank {
            self.blank();
        }
        let xline = self.last_line;
        let yline = self.line(x.y.pos());
        self.text(x.op.display());
        let mut indented = false;
        if xline > 0 && yline > 0 && xline != yline {
            self.indent += 1;
            indented = true;
            if self.linebreak(yline, 1, true) > 0 {
                print_blank = false;
            }
        }
        if print_blank {
            self.blank();
        }
        self.expr1(&x.y, prec + 1, depth + 1)?;
        if indented {
            self.indent -= 1;
        }
        Ok(())
    }

    /// Print a comma separated list.
    ///
    /// `prev` and `next` are the positions of the tokens around the list;
    /// when both are valid and on the list's line the list stays on one
    /// line. Otherwise the source line breaks are kept and the list is
    /// indented after the first break. With `comma_term`, a list whose
    /// closing token sits on a later line gets a trailing comma.
    pub(crate) fn expr_list(
        &mut self,
        prev: Pos,
        list: &[Expr],
        depth: usize,
        comma_term: bool,
        next: Pos,
    ) -> FResult<()> {
        let Some(first) = list.first() else {
            return Ok(());
        };

        let mut prev_line = self.line(prev);
        let mut line = self.line(first.pos());
        let end_line = self.line(next);

        if prev.is_valid() && prev_line == line && line == end_line {
            for (i, x) in list.iter().enumerate() {
                if i > 0 {
                    self.text(",");
                    self.blank();
                }
                self.expr0(x, depth)?;
            }
            return Ok(());
        }

        let mut indented = false;
        let mut prev_break: Option<usize> = None;
        if prev.is_valid() && prev_line < line {
            self.indent += 1;
            indented = true;
            self.comments_before(first.pos(), 1, true);
            if self.linebreak(line, 0, true) > 0 {
                prev_break = Some(0);
            }
        }

        let measure = prev.is_valid() && next.is_valid();
        let mut size = 0;
        let mut lnsum = 0.0f64;
        let mut count = 0usize;

        for (i, x) in list.iter().enumerate() {
            line = self.line(x.pos());

            let prev_size = size;
            let pair = match x {
                Expr::KeyValue(kv) => Some(kv),
                _ => None,
            };
            size = 0;
            if measure {
                size = self.node_size(x.pos(), INFINITY, |p| p.expr(x));
                if size > INFINITY {
                    size = 0;
                } else if let Some(kv) = pair {
                    size = self.node_size(kv.key.pos(), INFINITY, |p| p.expr(&kv.key));
                }
            }

            let mut use_ff = true;
            if prev_size > 0 && size > 0 {
                const SMALL_SIZE: usize = 40;
                if count == 0 || (prev_size <= SMALL_SIZE && size <= SMALL_SIZE) {
                    use_ff = false;
                } else {
                    const R: f64 = 2.5;
                    let geomean = (lnsum / count as f64).exp();
                    let ratio = size as f64 / geomean;
                    use_ff = R * ratio <= 1.0 || R <= ratio;
                }
            }

            let needs_linebreak = 0 < prev_line && prev_line < line;
            if i > 0 {
                self.text(",");
                let mut needs_blank = true;
                if needs_linebreak {
                    if !indented {
                        self.indent += 1;
                        indented = true;
                    }
                    let crowded = prev_break.map_or(true, |b| b + 1 < i);
                    let section = use_ff || crowded;
                    let own_line = self.comments_before(x.pos(), 1, section);
                    let min = if own_line { 1 } else { 0 };
                    let breaks = self.linebreak(line, min, section && !own_line);
                    if breaks > 0 {
                        prev_break = Some(i);
                        needs_blank = false;
                    }
                    if breaks > 1 {
                        lnsum = 0.0;
                        count = 0;
                    }
                }
                if needs_blank {
                    self.blank();
                }
            }

            match pair {
                Some(kv) if list.len() > 1 && size > 0 && needs_linebreak => {
                    self.expr(&kv.key)?;
                    self.text(":");
                    self.vtab();
                    self.expr(&kv.value)?;
                }
                _ => self.expr0(x, depth)?,
            }

            if size > 0 {
                lnsum += (size as f64).ln();
                count += 1;
            }
            prev_line = self.line(x.end());
        }

        if comma_term && next.is_valid() && self.last_line < end_line {
            self.text(",");
            self.comments_before(next, 1, true);
            if indented {
                self.indent -= 1;
            }
            self.newline(true);
            self.last_line = end_line;
            return Ok(());
        }
        if indented {
            self.indent -= 1;
        }
        Ok(())
    }

    pub(crate) fn signature(&mut self, sig: &FuncType) -> FResult<()> {
        self.parameters(&sig.params)?;
        let Some(results) = &sig.results else {
            return Ok(());
        };
        if results.num_fields() == 0 {
            return Ok(());
        }
        self.blank();
        match results.list.as_slice() {
            [only] if only.names.is_empty() && !results.opening.is_valid() => {
                self.expr(strip_parens_always(&only.ty))
            }
            _ => self.parameters(results),
        }
    }
}

// =============================================================================
// PRECEDENCE HELPERS
// =============================================================================

/// Scan a binary expression for the operator mix that decides spacing.
///
/// Returns whether precedence 4 and 5 operators occur, and the highest
/// precedence at which a blank is needed to keep tokens apart.
fn walk_binary(e: &BinaryExpr) -> (bool, bool, u8) {
    let prec = e.op.precedence();
    let mut has4 = prec == 4;
    let mut has5 = prec == 5;
    let mut max_problem = 0;

    if let Expr::Binary(l) = e.x.as_ref() {
        if l.op.precedence() >= prec {
            let (h4, h5, mp) = walk_binary(l);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(mp);
        }
    }

    match e.y.as_ref() {
        Expr::Binary(r) => {
            if r.op.precedence() > prec {
                let (h4, h5, mp) = walk_binary(r);
                has4 |= h4;
                has5 |= h5;
                max_problem = max_problem.max(mp);
            }
        }
        Expr::Star(_) => {
            if e.op == TokenKind::Quo {
                max_problem = 5;
            }
        }
        Expr::Unary(r) => match (e.op, r.op) {
            (TokenKind::And, TokenKind::And) | (TokenKind::And, TokenKind::Xor) => {
                max_problem = 5;
            }
            (TokenKind::Add, TokenKind::Add) | (TokenKind::Sub, TokenKind::Sub) => {
                max_problem = max_problem.max(4);
            }
            _ => {}
        },
        _ => {}
    }
    (has4, has5, max_problem)
}

fn cutoff(e: &BinaryExpr, depth: usize) -> u8 {
    let (has4, has5, max_problem) = walk_binary(e);
    if max_problem > 0 {
        return max_problem + 1;
    }
    match (has4 && has5, depth == 1) {
        (true, true) => 5,
        (true, false) => 4,
        (false, true) => 6,
        (false, false) => 4,
    }
}

fn diff_prec(x: &Expr, prec: u8) -> usize {
    match x {
        Expr::Binary(b) if b.op.precedence() == prec => 0,
        _ => 1,
    }
}

fn reduce_depth(depth: usize) -> usize {
    depth.saturating_sub(1).max(1)
}

pub(crate) fn strip_parens_always(x: &Expr) -> &Expr {
    match x {
        Expr::Paren(p) => strip_parens_always(&p.x),
        _ => x,
    }
}

/// Drop redundant parentheses around a control clause expression.
///
/// Parentheses stay when they protect a composite literal whose type is
/// a name, since `if x == T{} {` would not parse.
pub(crate) fn strip_parens(x: &Expr) -> &Expr {
    match x {
        Expr::Paren(p) if !has_named_composite(&p.x) => strip_parens(&p.x),
        _ => x,
    }
}

fn has_named_composite(x: &Expr) -> bool {
    match x {
        Expr::CompositeLit(c) => c.ty.as_deref().is_some_and(is_type_name),
        Expr::Paren(_) => false,
        Expr::Binary(b) => has_named_composite(&b.x) || has_named_composite(&b.y),
        Expr::Unary(u) => has_named_composite(&u.x),
        Expr::Star(s) => has_named_composite(&s.x),
        Expr::Selector(s) => has_named_composite(&s.x),
        Expr::Index(i) => has_named_composite(&i.x) || has_named_composite(&i.index),
        Expr::Slice(s) => has_named_composite(&s.x),
        Expr::TypeAssert(t) => has_named_composite(&t.x),
        Expr::KeyValue(kv) => has_named_composite(&kv.key) || has_named_composite(&kv.value),
        Expr::Call(c) => has_named_composite(&c.fun) || c.args.iter().any(has_named_composite),
        _ => false,
    }
}

fn is_type_name(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) => true,
        Expr::Selector(s) => is_type_name(&s.x),
        _ => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fromgo::gop_expr;
    use crate::printer::format_node;
    use crate::token::LineTable;

    fn reformat(src: &str) -> String {
        let file = go_parser::parse_file("x.go", &format!("package p\n\nvar _ = {}\n", src)).unwrap();
        let go_parser::ast::Decl::Gen(g) = &file.decls[0] else {
            panic!("expected a var group");
        };
        let go_parser::ast::Spec::Value(v) = &g.specs[0] else {
            panic!("expected a value spec");
        };
        format_node(&gop_expr(&v.values[0]), &file.lines).unwrap()
    }

    #[test]
    fn test_binary_spacing_follows_precedence() {
        assert_eq!(reformat("a+b"), "a + b");
        assert_eq!(reformat("a*b+c"), "a*b + c");
        assert_eq!(reformat("(10+20)*2"), "(10 + 20) * 2");
        assert_eq!(reformat("x == y && z"), "x == y && z");
    }

    #[test]
    fn test_nested_arguments_compact_operators() {
        assert_eq!(reformat("f(a+b, c)"), "f(a+b, c)");
        assert_eq!(reformat("f(a+b)"), "f(a + b)");
    }

    #[test]
    fn test_unary_operators_stay_apart() {
        assert_eq!(reformat("a - -b"), "a - -b");
        assert_eq!(reformat("x & ^y"), "x & ^y");
    }

    #[test]
    fn test_slices_and_indexes() {
        assert_eq!(reformat("s[1:n]"), "s[1:n]");
        assert_eq!(reformat("s[a+1 : b]"), "s[a+1 : b]");
        assert_eq!(reformat("s[:]"), "s[:]");
        assert_eq!(reformat("s[i][j]"), "s[i][j]");
    }

    #[test]
    fn test_type_expressions() {
        assert_eq!(reformat("map[string][]*T{}"), "map[string][]*T{}");
        assert_eq!(reformat("make(<-chan int)"), "make(<-chan int)");
        assert_eq!(reformat("make(chan<- int, 1)"), "make(chan<- int, 1)");
        assert_eq!(reformat("[...]int{1, 2}"), "[...]int{1, 2}");
    }

    #[test]
    fn test_func_literal_one_liner() {
        assert_eq!(reformat("func(x int) int { return x }"), "func(x int) int { return x }");
        assert_eq!(reformat("func() (int) {}"), "func() (int) {}");
    }

    #[test]
    fn test_type_assertion() {
        assert_eq!(reformat("v.(fmt.Stringer)"), "v.(fmt.Stringer)");
    }

    #[test]
    fn test_multi_line_composite_gets_trailing_comma() {
        assert_eq!(reformat("[]int{1,\n2,\n}"), "[]int{1,\n\t2,\n}");
    }

    #[test]
    fn test_closing_brace_on_last_line_has_no_comma() {
        assert_eq!(reformat("[]int{\n\t1,\n\t2}"), "[]int{\n\t1,\n\t2}");
    }

    #[test]
    fn test_key_value_pairs_align() {
        assert_eq!(
            reformat("map[string]int{\n\"a\": 1,\n\"bcd\": 2,\n}"),
            "map[string]int{\n\t\"a\":   1,\n\t\"bcd\": 2,\n}"
        );
    }

    #[test]
    fn test_synthesized_list_stays_on_one_line() {
        let lines = LineTable::default();
        let lit = Expr::CompositeLit(crate::ast::CompositeLit {
            ty: Some(Box::new(Expr::Ident(crate::ast::Ident::new("T")))),
            lbrace: Pos::NONE,
            elts: vec![
                Expr::Ident(crate::ast::Ident::new("a")),
                Expr::Ident(crate::ast::Ident::new("b")),
            ],
            rbrace: Pos::NONE,
            incomplete: false,
        });
        assert_eq!(format_node(&lit, &lines).unwrap(), "T{a, b}");
    }

    #[test]
    fn test_strip_parens_keeps_named_literals() {
        let lit = Expr::Paren(crate::ast::ParenExpr {
            lparen: Pos::NONE,
            x: Box::new(Expr::CompositeLit(crate::ast::CompositeLit {
                ty: Some(Box::new(Expr::Ident(crate::ast::Ident::new("T")))),
                lbrace: Pos::NONE,
                elts: vec![],
                rbrace: Pos::NONE,
                incomplete: false,
            })),
            rparen: Pos::NONE,
        });
        assert!(matches!(strip_parens(&lit), Expr::Paren(_)));
        let name = Expr::Paren(crate::ast::ParenExpr {
            lparen: Pos::NONE,
            x: Box::new(Expr::Ident(crate::ast::Ident::new("ok"))),
            rparen: Pos::NONE,
        });
        assert!(matches!(strip_parens(&name), Expr::Ident(_)));
    }
}
