//! # Statement Conversion
//!
//! Maps function body statements, recursing into nested blocks and
//! clauses.

use super::declarations::gop_gen_decl;
use super::expressions::{gop_call_expr, gop_expr, gop_exprs};
use super::ident::gop_ident;
use crate::ast::{
    AssignStmt, BlockStmt, BranchStmt, CaseClause, CommClause, Decl, DeclStmt, DeferStmt,
    EmptyStmt, ExprStmt, ForStmt, GoStmt, IfStmt, IncDecStmt, LabeledStmt, RangeStmt, ReturnStmt,
    SelectStmt, SendStmt, Stmt, SwitchStmt, TypeSwitchStmt,
};
use go_parser::ast as go;

/// Convert a statement.
///
/// # Panics
///
/// Panics with `gopStmt: unknown stmt - <kind>` for placeholder
/// statements (`BadStmt`) and for declaration statements that hold
/// anything but a `const`, `type` or `var` group.
pub fn gop_stmt(v: &go::Stmt) -> Stmt {
    match v {
        go::Stmt::Decl(s) => match &s.decl {
            go::Decl::Gen(d) => Stmt::Decl(Box::new(DeclStmt {
                decl: Decl::Gen(gop_gen_decl(d)),
            })),
            _ => panic!("gopStmt: unknown stmt - {}\n", v.kind_name()),
        },
        go::Stmt::Empty(s) => Stmt::Empty(EmptyStmt {
            semicolon: s.semicolon,
            implicit: s.implicit,
        }),
        go::Stmt::Labeled(s) => Stmt::Labeled(LabeledStmt {
            label: gop_ident(&s.label),
            colon: s.colon,
            stmt: gop_boxed(&s.stmt),
        }),
        go::Stmt::Expr(s) => Stmt::Expr(ExprStmt { x: gop_expr(&s.x) }),
        go::Stmt::Send(s) => Stmt::Send(SendStmt {
            chan: gop_expr(&s.chan),
            arrow: s.arrow,
            value: gop_expr(&s.value),
        }),
        go::Stmt::IncDec(s) => Stmt::IncDec(IncDecStmt {
            x: gop_expr(&s.x),
            tok_pos: s.tok_pos,
            tok: s.tok,
        }),
        go::Stmt::Assign(s) => Stmt::Assign(AssignStmt {
            lhs: gop_exprs(&s.lhs),
            tok_pos: s.tok_pos,
            tok: s.tok,
            rhs: gop_exprs(&s.rhs),
        }),
        go::Stmt::Go(s) => Stmt::Go(GoStmt {
            go: s.go,
            call: gop_call_expr(&s.call),
        }),
        go::Stmt::Defer(s) => Stmt::Defer(DeferStmt {
            defer: s.defer,
            call: gop_call_expr(&s.call),
        }),
        go::Stmt::Return(s) => Stmt::Return(ReturnStmt {
            ret: s.ret,
            results: gop_exprs(&s.results),
        }),
        go::Stmt::Branch(s) => Stmt::Branch(BranchStmt {
            tok_pos: s.tok_pos,
            tok: s.tok,
            label: s.label.as_ref().map(gop_ident),
        }),
        go::Stmt::Block(s) => Stmt::Block(gop_block_stmt(s)),
        go::Stmt::If(s) => Stmt::If(IfStmt {
            if_pos: s.if_pos,
            init: gop_stmt_opt(s.init.as_deref()),
            cond: gop_expr(&s.cond),
            body: gop_block_stmt(&s.body),
            else_branch: gop_stmt_opt(s.else_branch.as_deref()),
        }),
        go::Stmt::CaseClause(s) => Stmt::CaseClause(CaseClause {
            case: s.case,
            list: gop_exprs(&s.list),
            colon: s.colon,
            body: gop_stmts(&s.body),
        }),
        go::Stmt::Switch(s) => Stmt::Switch(SwitchStmt {
            switch: s.switch,
            init: gop_stmt_opt(s.init.as_deref()),
            tag: s.tag.as_ref().map(gop_expr),
            body: gop_block_stmt(&s.body),
        }),
        go::Stmt::TypeSwitch(s) => Stmt::TypeSwitch(TypeSwitchStmt {
            switch: s.switch,
            init: gop_stmt_opt(s.init.as_deref()),
            assign: gop_boxed(&s.assign),
            body: gop_block_stmt(&s.body),
        }),
        go::Stmt::CommClause(s) => Stmt::CommClause(CommClause {
            case: s.case,
            comm: gop_stmt_opt(s.comm.as_deref()),
            colon: s.colon,
            body: gop_stmts(&s.body),
        }),
        go::Stmt::Select(s) => Stmt::Select(SelectStmt {
            select: s.select,
            body: gop_block_stmt(&s.body),
        }),
        go::Stmt::For(s) => Stmt::For(ForStmt {
            for_pos: s.for_pos,
            init: gop_stmt_opt(s.init.as_deref()),
            cond: s.cond.as_ref().map(gop_expr),
            post: gop_stmt_opt(s.post.as_deref()),
            body: gop_block_stmt(&s.body),
        }),
        go::Stmt::Range(s) => Stmt::Range(RangeStmt {
            for_pos: s.for_pos,
            key: s.key.as_ref().map(gop_expr),
            value: s.value.as_ref().map(gop_expr),
            tok_pos: s.tok_pos,
            tok: s.tok,
            x: gop_expr(&s.x),
            body: gop_block_stmt(&s.body),
        }),
        go::Stmt::Bad(_) => panic!("gopStmt: unknown stmt - {}\n", v.kind_name()),
    }
}

pub(crate) fn gop_block_stmt(v: &go::BlockStmt) -> BlockStmt {
    BlockStmt {
        lbrace: v.lbrace,
        list: gop_stmts(&v.list),
        rbrace: v.rbrace,
    }
}

fn gop_stmts(list: &[go::Stmt]) -> Vec<Stmt> {
    list.iter().map(gop_stmt).collect()
}

fn gop_stmt_opt(v: Option<&go::Stmt>) -> Option<Box<Stmt>> {
    v.map(gop_boxed)
}

fn gop_boxed(v: &go::Stmt) -> Box<Stmt> {
    Box::new(gop_stmt(v))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use go_parser::span::Pos;

    fn body_of(src: &str) -> go::BlockStmt {
        let file = go_parser::parse_file("s.go", src).unwrap();
        match file.decls.into_iter().last() {
            Some(go::Decl::Func(f)) => f.body.unwrap(),
            other => panic!("unexpected decl {:?}", other),
        }
    }

    #[test]
    fn test_body_keeps_statement_kinds() {
        let body = body_of(
            "package p\n\nfunc f(xs []int) {\n\tvar n int\n\tfor _, x := range xs {\n\t\tn += x\n\t}\n\tgo g(n)\n\tdefer g(n)\n\tn++\n}\n",
        );
        let out = gop_block_stmt(&body);
        let kinds: Vec<_> = out.list.iter().map(Stmt::kind_name).collect();
        assert_eq!(
            kinds,
            vec!["DeclStmt", "RangeStmt", "GoStmt", "DeferStmt", "IncDecStmt"]
        );
        assert_eq!(out.rbrace, body.rbrace);
    }

    #[test]
    fn test_nested_clauses() {
        let body = body_of(
            "package p\n\nfunc f(c chan int, v interface{}) {\n\tselect {\n\tcase x := <-c:\n\t\t_ = x\n\tdefault:\n\t}\n\tswitch t := v.(type) {\n\tcase int:\n\t\t_ = t\n\t}\n}\n",
        );
        let out = gop_block_stmt(&body);
        let Stmt::Select(sel) = &out.list[0] else {
            panic!("expected a select");
        };
        let Stmt::CommClause(first) = &sel.body.list[0] else {
            panic!("expected a comm clause");
        };
        assert!(first.comm.is_some());
        let Stmt::TypeSwitch(ts) = &out.list[1] else {
            panic!("expected a type switch");
        };
        assert_eq!(ts.assign.kind_name(), "AssignStmt");
    }

    #[test]
    fn test_labels_and_branches() {
        let body = body_of(
            "package p\n\nfunc f() {\nouter:\n\tfor {\n\t\tbreak outer\n\t}\n}\n",
        );
        let out = gop_block_stmt(&body);
        let Stmt::Labeled(l) = &out.list[0] else {
            panic!("expected a labeled statement");
        };
        assert_eq!(l.label.name, "outer");
        let Stmt::For(f) = l.stmt.as_ref() else {
            panic!("expected a for loop");
        };
        let Stmt::Branch(b) = &f.body.list[0] else {
            panic!("expected a branch");
        };
        assert_eq!(b.label.as_ref().map(|l| l.name.as_str()), Some("outer"));
    }

    #[test]
    #[should_panic(expected = "gopStmt: unknown stmt - BadStmt\n")]
    fn test_bad_stmt_panics() {
        gop_stmt(&go::Stmt::Bad(go::BadStmt {
            from: Pos::NONE,
            to: Pos::NONE,
        }));
    }
}
