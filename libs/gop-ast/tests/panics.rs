use go_parser::ast as go;
use go_parser::span::Pos;
use gop_ast::fromgo::{ast_file, gop_decl, gop_expr, gop_gen_decl, gop_stmt, ConvertOptions};
use gop_ast::token::TokenKind;

fn single_var() -> go::GenDecl {
    let file = go_parser::parse_file("foo.go", "package main\n\nvar x = 1\n").unwrap();
    match file.decls.into_iter().next() {
        Some(go::Decl::Gen(g)) => g,
        other => panic!("unexpected decl {:?}", other),
    }
}

#[test]
#[should_panic(expected = "ASTFile: doesn't support keeping cgo now\n")]
fn keep_cgo_is_rejected() {
    ast_file(None, ConvertOptions::KEEP_CGO);
}

#[test]
#[should_panic(expected = "ASTFile: doesn't support keeping func body now\n")]
fn keep_func_body_is_rejected() {
    ast_file(None, ConvertOptions::KEEP_FUNC_BODY);
}

#[test]
#[should_panic(expected = "ASTFile: doesn't support keeping cgo now\n")]
fn keep_cgo_is_checked_first() {
    ast_file(None, ConvertOptions::all());
}

#[test]
#[should_panic(expected = "ASTFile: doesn't support keeping cgo now\n")]
fn options_are_checked_before_the_file() {
    let file = go_parser::parse_file("foo.go", "package main\n").unwrap();
    ast_file(Some(&file), ConvertOptions::KEEP_CGO);
}

#[test]
#[should_panic(expected = "ASTFile: nil file\n")]
fn missing_file_is_rejected() {
    ast_file(None, ConvertOptions::empty());
}

#[test]
#[should_panic(expected = "gopDecl: unkown decl - <nil>\n")]
fn missing_decl() {
    gop_decl(None);
}

#[test]
#[should_panic(expected = "gopGenDecl: unknown spec - ILLEGAL\n")]
fn spec_of_illegal_group() {
    let mut group = single_var();
    group.tok = TokenKind::Illegal;
    gop_gen_decl(&group);
}

#[test]
#[should_panic(expected = "gopExpr: unknown expr - BadExpr\n")]
fn bad_expr() {
    gop_expr(&go::Expr::Bad(go::BadExpr {
        from: Pos::NONE,
        to: Pos::NONE,
    }));
}

#[test]
#[should_panic(expected = "gopStmt: unknown stmt - BadStmt\n")]
fn bad_stmt() {
    gop_stmt(&go::Stmt::Bad(go::BadStmt {
        from: Pos::NONE,
        to: Pos::NONE,
    }));
}

#[test]
#[should_panic(expected = "gopDecl: unkown decl - BadDecl\n")]
fn bad_decl_inside_a_file() {
    let mut file = go_parser::parse_file("foo.go", "package main\n").unwrap();
    file.decls.push(go::Decl::Bad(go::BadDecl {
        from: Pos::NONE,
        to: Pos::NONE,
    }));
    ast_file(Some(&file), ConvertOptions::empty());
}
