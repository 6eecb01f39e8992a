//! # Statement Parsing
//!
//! Simple statements, blocks and control flow. Control clauses run with
//! a negative expression level so that `if x == T {` opens the block
//! instead of a composite literal.

use super::{PResult, Parser};
use crate::ast::{
    AssignStmt, BlockStmt, BranchStmt, CallExpr, CaseClause, CommClause, Decl, DeclStmt,
    DeferStmt, EmptyStmt, Expr, ExprStmt, ForStmt, GoStmt, IfStmt, IncDecStmt, LabeledStmt,
    RangeStmt, ReturnStmt, SelectStmt, SendStmt, Stmt, SwitchStmt, TypeSwitchStmt, UnaryExpr,
};
use crate::lexer::TokenKind;
use crate::span::Pos;

/// What a simple statement may turn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimpleMode {
    Basic,
    LabelOk,
    RangeOk,
}

impl<'a> Parser<'a> {
    // =========================================================================
    // BLOCKS
    // =========================================================================

    pub(super) fn parse_block_stmt(&mut self) -> PResult<BlockStmt> {
        let lbrace = self.expect(TokenKind::Lbrace)?;
        let list = self.parse_stmt_list()?;
        let rbrace = self.expect_closing(TokenKind::Rbrace, "block")?;
        Ok(BlockStmt {
            lbrace,
            list,
            rbrace,
        })
    }

    fn parse_stmt_list(&mut self) -> PResult<Vec<Stmt>> {
        let mut list = Vec::new();
        while !matches!(
            self.tok(),
            TokenKind::Case | TokenKind::Default | TokenKind::Rbrace | TokenKind::Eof
        ) {
            list.push(self.parse_stmt()?);
        }
        Ok(list)
    }

    // =========================================================================
    // STATEMENT DISPATCH
    // =========================================================================

    pub(super) fn parse_stmt(&mut self) -> PResult<Stmt> {
        match self.tok() {
            TokenKind::Const | TokenKind::Type | TokenKind::Var => {
                let decl = self.parse_gen_decl(self.tok())?;
                Ok(Stmt::Decl(Box::new(DeclStmt {
                    decl: Decl::Gen(decl),
                })))
            }
            TokenKind::Ident
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Char
            | TokenKind::String
            | TokenKind::Func
            | TokenKind::Lparen
            | TokenKind::Lbrack
            | TokenKind::Struct
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Interface
            | TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Mul
            | TokenKind::And
            | TokenKind::Xor
            | TokenKind::Arrow
            | TokenKind::Not => {
                let (stmt, _) = self.parse_simple_stmt(SimpleMode::LabelOk)?;
                if !matches!(stmt, Stmt::Labeled(_)) {
                    self.expect_semi()?;
                }
                Ok(stmt)
            }
            TokenKind::Go => self.parse_go_stmt(),
            TokenKind::Defer => self.parse_defer_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break | TokenKind::Continue | TokenKind::Goto | TokenKind::Fallthrough => {
                self.parse_branch_stmt()
            }
            TokenKind::Lbrace => {
                let block = self.parse_block_stmt()?;
                self.expect_semi()?;
                Ok(Stmt::Block(block))
            }
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Switch => self.parse_switch_stmt(),
            TokenKind::Select => self.parse_select_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Semicolon => {
                let stmt = EmptyStmt {
                    semicolon: self.pos(),
                    implicit: self.lit() == "\n",
                };
                self.next();
                Ok(Stmt::Empty(stmt))
            }
            TokenKind::Rbrace => Ok(Stmt::Empty(EmptyStmt {
                semicolon: self.pos(),
                implicit: true,
            })),
            _ => Err(self.error_expected("statement")),
        }
    }

    // =========================================================================
    // SIMPLE STATEMENTS
    // =========================================================================

    /// Returns the statement and whether it is a `range` clause.
    fn parse_simple_stmt(&mut self, mode: SimpleMode) -> PResult<(Stmt, bool)> {
        let mut lhs = self.parse_expr_list()?;

        if self.tok().is_assign_op() {
            let tok_pos = self.pos();
            let tok = self.tok();
            self.next();
            let mut is_range = false;
            let rhs = if mode == SimpleMode::RangeOk
                && self.tok() == TokenKind::Range
                && matches!(tok, TokenKind::Define | TokenKind::Assign)
            {
                let op_pos = self.pos();
                self.next();
                let x = self.parse_rhs()?;
                is_range = true;
                vec![Expr::Unary(UnaryExpr {
                    op_pos,
                    op: TokenKind::Range,
                    x: Box::new(x),
                })]
            } else {
                self.parse_expr_list()?
            };
            let stmt = Stmt::Assign(AssignStmt {
                lhs,
                tok_pos,
                tok,
                rhs,
            });
            return Ok((stmt, is_range));
        }

        if lhs.len() > 1 {
            return Err(self.error_expected("1 expression"));
        }
        let x = lhs.remove(0);

        let stmt = match (self.tok(), x) {
            (TokenKind::Colon, Expr::Ident(label)) if mode == SimpleMode::LabelOk => {
                let colon = self.pos();
                self.next();
                let stmt = self.parse_stmt()?;
                Stmt::Labeled(LabeledStmt {
                    label,
                    colon,
                    stmt: Box::new(stmt),
                })
            }
            (TokenKind::Arrow, chan) => {
                let arrow = self.pos();
                self.next();
                let value = self.parse_rhs()?;
                Stmt::Send(SendStmt {
                    chan,
                    arrow,
                    value,
                })
            }
            (TokenKind::Inc | TokenKind::Dec, x) => {
                let stmt = IncDecStmt {
                    x,
                    tok_pos: self.pos(),
                    tok: self.tok(),
                };
                self.next();
                Stmt::IncDec(stmt)
            }
            (_, x) => Stmt::Expr(ExprStmt { x }),
        };
        Ok((stmt, false))
    }

    fn parse_call_expr(&mut self, context: &str) -> PResult<CallExpr> {
        let x = self.parse_unary_expr()?;
        match x {
            Expr::Call(call) => Ok(call),
            other => Err(self.error_at(
                other.pos(),
                &format!("function must be invoked in {} statement", context),
            )),
        }
    }

    fn parse_go_stmt(&mut self) -> PResult<Stmt> {
        let go = self.expect(TokenKind::Go)?;
        let call = self.parse_call_expr("go")?;
        self.expect_semi()?;
        Ok(Stmt::Go(GoStmt { go, call }))
    }

    fn parse_defer_stmt(&mut self) -> PResult<Stmt> {
        let defer = self.expect(TokenKind::Defer)?;
        let call = self.parse_call_expr("defer")?;
        self.expect_semi()?;
        Ok(Stmt::Defer(DeferStmt { defer, call }))
    }

    fn parse_return_stmt(&mut self) -> PResult<Stmt> {
        let ret = self.expect(TokenKind::Return)?;
        let results = if !matches!(self.tok(), TokenKind::Semicolon | TokenKind::Rbrace) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        self.expect_semi()?;
        Ok(Stmt::Return(ReturnStmt { ret, results }))
    }

    fn parse_branch_stmt(&mut self) -> PResult<Stmt> {
        let tok_pos = self.pos();
        let tok = self.tok();
        self.next();
        let label = if tok != TokenKind::Fallthrough && self.tok() == TokenKind::Ident {
            Some(self.parse_ident()?)
        } else {
            None
        };
        self.expect_semi()?;
        Ok(Stmt::Branch(BranchStmt {
            tok_pos,
            tok,
            label,
        }))
    }

    // =========================================================================
    // CONTROL FLOW
    // =========================================================================

    fn parse_if_stmt(&mut self) -> PResult<Stmt> {
        let if_pos = self.expect(TokenKind::If)?;
        let (init, cond) = self.parse_if_header()?;
        let body = self.parse_block_stmt()?;

        let else_branch = if self.tok() == TokenKind::Else {
            self.next();
            match self.tok() {
                TokenKind::If => Some(Box::new(self.parse_if_stmt()?)),
                TokenKind::Lbrace => {
                    let block = self.parse_block_stmt()?;
                    self.expect_semi()?;
                    Some(Box::new(Stmt::Block(block)))
                }
                _ => return Err(self.error_expected("if statement or block")),
            }
        } else {
            self.expect_semi()?;
            None
        };

        Ok(Stmt::If(IfStmt {
            if_pos,
            init,
            cond,
            body,
            else_branch,
        }))
    }

    fn parse_if_header(&mut self) -> PResult<(Option<Box<Stmt>>, Expr)> {
        if self.tok() == TokenKind::Lbrace {
            return Err(self.error("missing condition in if statement"));
        }

        let prev_lev = self.expr_lev;
        self.expr_lev = -1;

        let mut init = None;
        if self.tok() != TokenKind::Semicolon {
            init = Some(self.parse_simple_stmt(SimpleMode::Basic)?.0);
        }

        let cond_stmt = if self.tok() == TokenKind::Semicolon {
            self.next();
            if self.tok() == TokenKind::Lbrace {
                return Err(self.error("missing condition in if statement"));
            }
            Some(self.parse_simple_stmt(SimpleMode::Basic)?.0)
        } else {
            init.take()
        };

        self.expr_lev = prev_lev;

        let cond = match cond_stmt {
            Some(Stmt::Expr(s)) => s.x,
            Some(other) => {
                return Err(self.error_at(other.pos(), "cannot use statement as value"));
            }
            None => return Err(self.error("missing condition in if statement")),
        };
        Ok((init.map(Box::new), cond))
    }

    fn parse_switch_stmt(&mut self) -> PResult<Stmt> {
        let switch = self.expect(TokenKind::Switch)?;
        let mut s1 = None;
        let mut s2 = None;

        if self.tok() != TokenKind::Lbrace {
            let prev_lev = self.expr_lev;
            self.expr_lev = -1;
            if self.tok() != TokenKind::Semicolon {
                s2 = Some(self.parse_simple_stmt(SimpleMode::Basic)?.0);
            }
            if self.tok() == TokenKind::Semicolon {
                self.next();
                s1 = s2.take();
                if self.tok() != TokenKind::Lbrace {
                    s2 = Some(self.parse_simple_stmt(SimpleMode::Basic)?.0);
                }
            }
            self.expr_lev = prev_lev;
        }

        let type_switch = s2.as_ref().map_or(false, is_type_switch_guard);
        let lbrace = self.expect(TokenKind::Lbrace)?;
        let mut list = Vec::new();
        while matches!(self.tok(), TokenKind::Case | TokenKind::Default) {
            list.push(self.parse_case_clause(type_switch)?);
        }
        let rbrace = self.expect(TokenKind::Rbrace)?;
        self.expect_semi()?;
        let body = BlockStmt {
            lbrace,
            list,
            rbrace,
        };
        let init = s1.map(Box::new);

        let tag = match s2 {
            Some(assign) if type_switch => {
                return Ok(Stmt::TypeSwitch(TypeSwitchStmt {
                    switch,
                    init,
                    assign: Box::new(assign),
                    body,
                }));
            }
            Some(Stmt::Expr(s)) => Some(s.x),
            Some(other) => {
                return Err(self.error_at(other.pos(), "switch expression must be an expression"));
            }
            None => None,
        };
        Ok(Stmt::Switch(SwitchStmt {
            switch,
            init,
            tag,
            body,
        }))
    }

    fn parse_case_clause(&mut self, type_switch: bool) -> PResult<Stmt> {
        let case = self.pos();
        let list = if self.tok() == TokenKind::Case {
            self.next();
            if type_switch {
                let mut list = vec![self.parse_type()?];
                while self.got(TokenKind::Comma) {
                    list.push(self.parse_type()?);
                }
                list
            } else {
                self.parse_expr_list()?
            }
        } else {
            self.expect(TokenKind::Default)?;
            Vec::new()
        };
        let colon = self.expect(TokenKind::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(Stmt::CaseClause(CaseClause {
            case,
            list,
            colon,
            body,
        }))
    }

    fn parse_select_stmt(&mut self) -> PResult<Stmt> {
        let select = self.expect(TokenKind::Select)?;
        let lbrace = self.expect(TokenKind::Lbrace)?;
        let mut list = Vec::new();
        while matches!(self.tok(), TokenKind::Case | TokenKind::Default) {
            list.push(self.parse_comm_clause()?);
        }
        let rbrace = self.expect(TokenKind::Rbrace)?;
        self.expect_semi()?;
        Ok(Stmt::Select(SelectStmt {
            select,
            body: BlockStmt {
                lbrace,
                list,
                rbrace,
            },
        }))
    }

    fn parse_comm_clause(&mut self) -> PResult<Stmt> {
        let case = self.pos();
        let comm = if self.tok() == TokenKind::Case {
            self.next();
            let mut lhs = self.parse_expr_list()?;
            let stmt = if self.tok() == TokenKind::Arrow {
                if lhs.len() > 1 {
                    return Err(self.error_expected("1 expression"));
                }
                let arrow = self.pos();
                self.next();
                let value = self.parse_rhs()?;
                Stmt::Send(SendStmt {
                    chan: lhs.remove(0),
                    arrow,
                    value,
                })
            } else if matches!(self.tok(), TokenKind::Assign | TokenKind::Define) {
                let tok_pos = self.pos();
                let tok = self.tok();
                self.next();
                let rhs = self.parse_rhs()?;
                Stmt::Assign(AssignStmt {
                    lhs,
                    tok_pos,
                    tok,
                    rhs: vec![rhs],
                })
            } else {
                if lhs.len() > 1 {
                    return Err(self.error_expected("1 expression"));
                }
                Stmt::Expr(ExprStmt { x: lhs.remove(0) })
            };
            Some(Box::new(stmt))
        } else {
            self.expect(TokenKind::Default)?;
            None
        };
        let colon = self.expect(TokenKind::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(Stmt::CommClause(CommClause {
            case,
            comm,
            colon,
            body,
        }))
    }

    fn parse_for_stmt(&mut self) -> PResult<Stmt> {
        let for_pos = self.expect(TokenKind::For)?;
        let mut s1 = None;
        let mut s2 = None;
        let mut s3 = None;
        let mut is_range = false;

        if self.tok() != TokenKind::Lbrace {
            let prev_lev = self.expr_lev;
            self.expr_lev = -1;
            if self.tok() != TokenKind::Semicolon {
                if self.tok() == TokenKind::Range {
                    // `for range x`
                    let op_pos = self.pos();
                    self.next();
                    let x = self.parse_rhs()?;
                    s2 = Some(Stmt::Assign(AssignStmt {
                        lhs: Vec::new(),
                        tok_pos: Pos::NONE,
                        tok: TokenKind::Illegal,
                        rhs: vec![Expr::Unary(UnaryExpr {
                            op_pos,
                            op: TokenKind::Range,
                            x: Box::new(x),
                        })],
                    }));
                    is_range = true;
                } else {
                    let (stmt, range) = self.parse_simple_stmt(SimpleMode::RangeOk)?;
                    s2 = Some(stmt);
                    is_range = range;
                }
            }
            if !is_range && self.tok() == TokenKind::Semicolon {
                self.next();
                s1 = s2.take();
                if self.tok() != TokenKind::Semicolon {
                    s2 = Some(self.parse_simple_stmt(SimpleMode::Basic)?.0);
                }
                self.expect_semi()?;
                if self.tok() != TokenKind::Lbrace {
                    s3 = Some(self.parse_simple_stmt(SimpleMode::Basic)?.0);
                }
            }
            self.expr_lev = prev_lev;
        }

        let body = self.parse_block_stmt()?;
        self.expect_semi()?;

        let cond = match s2 {
            Some(Stmt::Assign(assign)) if is_range => {
                return self.make_range_stmt(for_pos, assign, body);
            }
            Some(Stmt::Expr(s)) => Some(s.x),
            Some(other) => {
                return Err(self.error_at(other.pos(), "cannot use statement as value"));
            }
            None => None,
        };
        Ok(Stmt::For(ForStmt {
            for_pos,
            init: s1.map(Box::new),
            cond,
            post: s3.map(Box::new),
            body,
        }))
    }

    fn make_range_stmt(&self, for_pos: Pos, assign: AssignStmt, body: BlockStmt) -> PResult<Stmt> {
        let AssignStmt {
            lhs,
            tok_pos,
            tok,
            rhs,
        } = assign;
        if lhs.len() > 2 {
            return Err(self.error_at(lhs[2].pos(), "range clause permits at most two iteration variables"));
        }
        let mut lhs = lhs.into_iter();
        let key = lhs.next();
        let value = lhs.next();
        let x = match rhs.into_iter().next() {
            Some(Expr::Unary(u)) => *u.x,
            _ => return Err(self.error_at(tok_pos, "expected range clause")),
        };
        Ok(Stmt::Range(RangeStmt {
            for_pos,
            key,
            value,
            tok_pos,
            tok,
            x,
            body,
        }))
    }
}

/// `x.(type)` or `v := x.(type)`.
fn is_type_switch_guard(stmt: &Stmt) -> bool {
    let is_guard = |x: &Expr| matches!(x, Expr::TypeAssert(t) if t.ty.is_none());
    match stmt {
        Stmt::Expr(s) => is_guard(&s.x),
        Stmt::Assign(a) => {
            a.tok == TokenKind::Define && a.lhs.len() == 1 && a.rhs.len() == 1 && is_guard(&a.rhs[0])
        }
        _ => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::ast::{Decl, Stmt};
    use crate::lexer::TokenKind;
    use crate::parse_file;

    fn body_of(src: &str) -> Vec<Stmt> {
        let file = parse_file("t.go", &format!("package p\n\nfunc f() {{\n{}\n}}\n", src)).unwrap();
        match &file.decls[0] {
            Decl::Func(f) => f.body.as_ref().unwrap().list.clone(),
            other => panic!("unexpected decl {:?}", other),
        }
    }

    #[test]
    fn test_assignments() {
        let list = body_of("a, b := 1, 2\nx += 3\ni++");
        assert!(matches!(&list[0], Stmt::Assign(a) if a.tok == TokenKind::Define && a.lhs.len() == 2));
        assert!(matches!(&list[1], Stmt::Assign(a) if a.tok == TokenKind::AddAssign));
        assert!(matches!(&list[2], Stmt::IncDec(s) if s.tok == TokenKind::Inc));
    }

    #[test]
    fn test_if_else_chain() {
        let list = body_of("if x := f(); x > 0 {\n} else if y {\n} else {\n}");
        let Stmt::If(s) = &list[0] else {
            panic!("not if");
        };
        assert!(s.init.is_some());
        let Some(els) = s.else_branch.as_deref() else {
            panic!("no else");
        };
        assert!(matches!(els, Stmt::If(inner) if inner.else_branch.is_some()));
    }

    #[test]
    fn test_composite_literal_in_condition_needs_parens() {
        let list = body_of("if x == (T{}) {\n}");
        assert!(matches!(&list[0], Stmt::If(_)));
    }

    #[test]
    fn test_for_forms() {
        let list = body_of("for {\n}\nfor x < 3 {\n}\nfor i := 0; i < 3; i++ {\n}\nfor k, v := range m {\n}\nfor range ch {\n}");
        assert!(matches!(&list[0], Stmt::For(f) if f.cond.is_none()));
        assert!(matches!(&list[1], Stmt::For(f) if f.cond.is_some() && f.init.is_none()));
        assert!(matches!(&list[2], Stmt::For(f) if f.init.is_some() && f.post.is_some()));
        assert!(matches!(&list[3], Stmt::Range(r) if r.key.is_some() && r.value.is_some()));
        assert!(matches!(&list[4], Stmt::Range(r) if r.key.is_none() && r.tok == TokenKind::Illegal));
    }

    #[test]
    fn test_switches() {
        let list = body_of("switch x {\ncase 1, 2:\ndefault:\n}\nswitch v := y.(type) {\ncase int, nil:\n}");
        let Stmt::Switch(s) = &list[0] else {
            panic!("not switch");
        };
        assert_eq!(s.body.list.len(), 2);
        assert!(matches!(&list[1], Stmt::TypeSwitch(_)));
    }

    #[test]
    fn test_select_and_channels() {
        let list = body_of("select {\ncase v := <-ch:\n\t_ = v\ncase out <- 1:\ndefault:\n}\nch <- 2\ngo f()\ndefer g()");
        let Stmt::Select(s) = &list[0] else {
            panic!("not select");
        };
        assert_eq!(s.body.list.len(), 3);
        assert!(matches!(&list[1], Stmt::Send(_)));
        assert!(matches!(&list[2], Stmt::Go(_)));
        assert!(matches!(&list[3], Stmt::Defer(_)));
    }

    #[test]
    fn test_labels_and_branches() {
        let list = body_of("outer:\n\tfor {\n\t\tbreak outer\n\t}\nreturn");
        let Stmt::Labeled(l) = &list[0] else {
            panic!("not labeled");
        };
        assert_eq!(l.label.name, "outer");
        assert!(matches!(&list[1], Stmt::Return(r) if r.results.is_empty()));
    }

    #[test]
    fn test_go_requires_call() {
        let err = parse_file("t.go", "package p\n\nfunc f() {\n\tgo x\n}\n").unwrap_err();
        assert!(err.to_string().contains("function must be invoked in go statement"));
    }
}
