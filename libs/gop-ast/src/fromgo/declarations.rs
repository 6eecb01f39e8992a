//! # Declaration Conversion
//!
//! Top-level declarations, grouped specs, field lists and comments.

use super::expressions::{gop_basic_lit, gop_expr, gop_exprs, gop_func_type};
use super::ident::{gop_ident, gop_idents};
use super::statements::gop_block_stmt;
use crate::ast::{
    Comment, CommentGroup, Decl, Field, FieldList, FuncDecl, GenDecl, ImportSpec, Spec, TypeSpec,
    ValueSpec,
};
use crate::token::TokenKind;
use go_parser::ast as go;

/// Convert a top-level declaration.
///
/// `None` stands for a missing declaration slot.
///
/// # Panics
///
/// Panics with `gopDecl: unkown decl - <kind>` for `None` (reported as
/// `<nil>`) and for placeholder declarations (`BadDecl`).
pub fn gop_decl(v: Option<&go::Decl>) -> Decl {
    match v {
        Some(go::Decl::Gen(d)) => Decl::Gen(gop_gen_decl(d)),
        Some(go::Decl::Func(d)) => Decl::Func(gop_func_decl(d)),
        other => panic!(
            "gopDecl: unkown decl - {}\n",
            other.map_or("<nil>", go::Decl::kind_name)
        ),
    }
}

/// Convert an `import`, `const`, `var` or `type` declaration.
///
/// Each spec is converted on its own, so elided types and values in
/// constant groups stay elided.
///
/// # Panics
///
/// Panics with `gopGenDecl: unknown spec - <TOK>` when a spec does not
/// belong to the group keyword, which includes every spec of a group
/// whose keyword is `ILLEGAL`.
pub fn gop_gen_decl(v: &go::GenDecl) -> GenDecl {
    GenDecl {
        doc: gop_comment_group(v.doc.as_ref()),
        tok_pos: v.tok_pos,
        tok: v.tok,
        lparen: v.lparen,
        specs: v.specs.iter().map(|spec| gop_spec(v.tok, spec)).collect(),
        rparen: v.rparen,
    }
}

fn gop_spec(tok: TokenKind, spec: &go::Spec) -> Spec {
    match (tok, spec) {
        (TokenKind::Import, go::Spec::Import(s)) => Spec::Import(gop_import_spec(s)),
        (TokenKind::Const | TokenKind::Var, go::Spec::Value(s)) => Spec::Value(ValueSpec {
            doc: gop_comment_group(s.doc.as_ref()),
            names: gop_idents(&s.names),
            ty: s.ty.as_ref().map(gop_expr),
            values: gop_exprs(&s.values),
            comment: gop_comment_group(s.comment.as_ref()),
        }),
        (TokenKind::Type, go::Spec::Type(s)) => Spec::Type(TypeSpec {
            doc: gop_comment_group(s.doc.as_ref()),
            name: gop_ident(&s.name),
            assign: s.assign,
            ty: gop_expr(&s.ty),
            comment: gop_comment_group(s.comment.as_ref()),
        }),
        _ => panic!("gopGenDecl: unknown spec - {}\n", tok.display()),
    }
}

pub(crate) fn gop_import_spec(s: &go::ImportSpec) -> ImportSpec {
    ImportSpec {
        doc: gop_comment_group(s.doc.as_ref()),
        name: s.name.as_ref().map(gop_ident),
        path: gop_basic_lit(&s.path),
        comment: gop_comment_group(s.comment.as_ref()),
    }
}

fn gop_func_decl(v: &go::FuncDecl) -> FuncDecl {
    FuncDecl {
        doc: gop_comment_group(v.doc.as_ref()),
        recv: v.recv.as_ref().map(gop_field_list),
        name: gop_ident(&v.name),
        ty: gop_func_type(&v.ty),
        body: v.body.as_ref().map(gop_block_stmt),
    }
}

// =============================================================================
// FIELDS AND COMMENTS
// =============================================================================

pub(crate) fn gop_field_list(v: &go::FieldList) -> FieldList {
    FieldList {
        opening: v.opening,
        list: v.list.iter().map(gop_field).collect(),
        closing: v.closing,
    }
}

fn gop_field(v: &go::Field) -> Field {
    Field {
        doc: gop_comment_group(v.doc.as_ref()),
        names: gop_idents(&v.names),
        ty: gop_expr(&v.ty),
        tag: v.tag.as_ref().map(gop_basic_lit),
        comment: gop_comment_group(v.comment.as_ref()),
    }
}

pub(crate) fn gop_comment_group(v: Option<&go::CommentGroup>) -> Option<CommentGroup> {
    v.map(|group| CommentGroup {
        list: group
            .list
            .iter()
            .map(|c| Comment {
                slash: c.slash,
                text: c.text.clone(),
            })
            .collect(),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use go_parser::span::Pos;

    fn const_group() -> go::GenDecl {
        let file = go_parser::parse_file(
            "c.go",
            "package p\n\nconst (\n\ta int = iota\n\tb\n\tc = 3\n)\n",
        )
        .unwrap();
        match file.decls.into_iter().next() {
            Some(go::Decl::Gen(g)) => g,
            other => panic!("unexpected decl {:?}", other),
        }
    }

    #[test]
    fn test_group_specs_keep_elision() {
        let out = gop_gen_decl(&const_group());
        assert_eq!(out.tok, TokenKind::Const);
        let shapes: Vec<_> = out
            .specs
            .iter()
            .map(|s| match s {
                Spec::Value(v) => (v.ty.is_some(), v.values.len()),
                other => panic!("unexpected spec {:?}", other),
            })
            .collect();
        assert_eq!(shapes, vec![(true, 1), (false, 0), (false, 1)]);
    }

    #[test]
    fn test_group_keeps_parens() {
        let group = const_group();
        let out = gop_gen_decl(&group);
        assert_eq!(out.lparen, group.lparen);
        assert_eq!(out.rparen, group.rparen);
        assert!(out.lparen.is_valid());
    }

    #[test]
    #[should_panic(expected = "gopGenDecl: unknown spec - ILLEGAL\n")]
    fn test_illegal_group_panics() {
        let mut group = const_group();
        group.tok = TokenKind::Illegal;
        gop_gen_decl(&group);
    }

    #[test]
    #[should_panic(expected = "gopGenDecl: unknown spec - type\n")]
    fn test_mismatched_spec_panics() {
        let mut group = const_group();
        group.tok = TokenKind::Type;
        gop_gen_decl(&group);
    }

    #[test]
    #[should_panic(expected = "gopDecl: unkown decl - <nil>\n")]
    fn test_missing_decl_panics() {
        gop_decl(None);
    }

    #[test]
    #[should_panic(expected = "gopDecl: unkown decl - BadDecl\n")]
    fn test_bad_decl_panics() {
        gop_decl(Some(&go::Decl::Bad(go::BadDecl {
            from: Pos::NONE,
            to: Pos::NONE,
        })));
    }

    #[test]
    fn test_comment_group_is_copied() {
        let group = go::CommentGroup {
            list: vec![go::Comment {
                slash: Pos::from_offset(0),
                text: "// hi".into(),
            }],
        };
        let out = gop_comment_group(Some(&group)).unwrap();
        assert_eq!(out.list[0].text, "// hi");
        assert_eq!(out.end(), Pos::from_offset(5));
        assert!(gop_comment_group(None).is_none());
    }
}
