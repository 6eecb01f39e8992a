//! # Expression Conversion
//!
//! Maps every Go expression and type expression onto its Go+ node.
//! Shapes are kept exactly: nothing is folded, simplified or reordered.

use super::declarations::gop_field_list;
use super::ident::gop_ident;
use super::statements::gop_block_stmt;
use crate::ast::{
    ArrayType, BasicLit, BinaryExpr, CallExpr, ChanDir, ChanType, CompositeLit, Ellipsis, Expr,
    FuncLit, FuncType, IndexExpr, InterfaceType, KeyValueExpr, LitKind, MapType, ParenExpr,
    SelectorExpr, SliceExpr, StarExpr, StructType, TypeAssertExpr, UnaryExpr,
};
use go_parser::ast as go;

/// Convert an expression.
///
/// # Panics
///
/// Panics with `gopExpr: unknown expr - <kind>` for placeholder
/// expressions (`BadExpr`).
pub fn gop_expr(v: &go::Expr) -> Expr {
    match v {
        go::Expr::Ident(x) => Expr::Ident(gop_ident(x)),
        go::Expr::BasicLit(x) => Expr::BasicLit(gop_basic_lit(x)),
        go::Expr::Ellipsis(x) => Expr::Ellipsis(Ellipsis {
            ellipsis: x.ellipsis,
            elt: gop_expr_opt(x.elt.as_deref()),
        }),
        go::Expr::FuncLit(x) => Expr::FuncLit(Box::new(FuncLit {
            ty: gop_func_type(&x.ty),
            body: gop_block_stmt(&x.body),
        })),
        go::Expr::CompositeLit(x) => Expr::CompositeLit(CompositeLit {
            ty: gop_expr_opt(x.ty.as_deref()),
            lbrace: x.lbrace,
            elts: gop_exprs(&x.elts),
            rbrace: x.rbrace,
            incomplete: x.incomplete,
        }),
        go::Expr::Paren(x) => Expr::Paren(ParenExpr {
            lparen: x.lparen,
            x: gop_boxed(&x.x),
            rparen: x.rparen,
        }),
        go::Expr::Selector(x) => Expr::Selector(SelectorExpr {
            x: gop_boxed(&x.x),
            sel: gop_ident(&x.sel),
        }),
        go::Expr::Index(x) => Expr::Index(IndexExpr {
            x: gop_boxed(&x.x),
            lbrack: x.lbrack,
            index: gop_boxed(&x.index),
            rbrack: x.rbrack,
        }),
        go::Expr::Slice(x) => Expr::Slice(SliceExpr {
            x: gop_boxed(&x.x),
            lbrack: x.lbrack,
            low: gop_expr_opt(x.low.as_deref()),
            high: gop_expr_opt(x.high.as_deref()),
            max: gop_expr_opt(x.max.as_deref()),
            slice3: x.slice3,
            rbrack: x.rbrack,
        }),
        go::Expr::TypeAssert(x) => Expr::TypeAssert(TypeAssertExpr {
            x: gop_boxed(&x.x),
            lparen: x.lparen,
            ty: gop_expr_opt(x.ty.as_deref()),
            rparen: x.rparen,
        }),
        go::Expr::Call(x) => Expr::Call(gop_call_expr(x)),
        go::Expr::Star(x) => Expr::Star(StarExpr {
            star: x.star,
            x: gop_boxed(&x.x),
        }),
        go::Expr::Unary(x) => Expr::Unary(UnaryExpr {
            op_pos: x.op_pos,
            op: x.op,
            x: gop_boxed(&x.x),
        }),
        go::Expr::Binary(x) => Expr::Binary(BinaryExpr {
            x: gop_boxed(&x.x),
            op_pos: x.op_pos,
            op: x.op,
            y: gop_boxed(&x.y),
        }),
        go::Expr::KeyValue(x) => Expr::KeyValue(KeyValueExpr {
            key: gop_boxed(&x.key),
            colon: x.colon,
            value: gop_boxed(&x.value),
        }),
        go::Expr::ArrayType(x) => Expr::ArrayType(ArrayType {
            lbrack: x.lbrack,
            len: gop_expr_opt(x.len.as_deref()),
            elt: gop_boxed(&x.elt),
        }),
        go::Expr::StructType(x) => Expr::StructType(StructType {
            struct_pos: x.struct_pos,
            fields: gop_field_list(&x.fields),
            incomplete: x.incomplete,
        }),
        go::Expr::FuncType(x) => Expr::FuncType(gop_func_type(x)),
        go::Expr::InterfaceType(x) => Expr::InterfaceType(InterfaceType {
            interface: x.interface,
            methods: gop_field_list(&x.methods),
            incomplete: x.incomplete,
        }),
        go::Expr::MapType(x) => Expr::MapType(MapType {
            map: x.map,
            key: gop_boxed(&x.key),
            value: gop_boxed(&x.value),
        }),
        go::Expr::ChanType(x) => Expr::ChanType(ChanType {
            begin: x.begin,
            arrow: x.arrow,
            dir: match x.dir {
                go::ChanDir::Both => ChanDir::Both,
                go::ChanDir::Send => ChanDir::Send,
                go::ChanDir::Recv => ChanDir::Recv,
            },
            value: gop_boxed(&x.value),
        }),
        go::Expr::Bad(_) => panic!("gopExpr: unknown expr - {}\n", v.kind_name()),
    }
}

pub(crate) fn gop_exprs(list: &[go::Expr]) -> Vec<Expr> {
    list.iter().map(gop_expr).collect()
}

pub(crate) fn gop_expr_opt(v: Option<&go::Expr>) -> Option<Box<Expr>> {
    v.map(gop_boxed)
}

fn gop_boxed(v: &go::Expr) -> Box<Expr> {
    Box::new(gop_expr(v))
}

pub(crate) fn gop_basic_lit(v: &go::BasicLit) -> BasicLit {
    BasicLit {
        value_pos: v.value_pos,
        kind: match v.kind {
            go::LitKind::Int => LitKind::Int,
            go::LitKind::Float => LitKind::Float,
            go::LitKind::Imag => LitKind::Imag,
            go::LitKind::Char => LitKind::Char,
            go::LitKind::String => LitKind::String,
        },
        value: v.value.clone(),
    }
}

pub(crate) fn gop_func_type(v: &go::FuncType) -> FuncType {
    FuncType {
        func: v.func,
        params: gop_field_list(&v.params),
        results: v.results.as_ref().map(gop_field_list),
    }
}

pub(crate) fn gop_call_expr(v: &go::CallExpr) -> CallExpr {
    CallExpr {
        fun: gop_boxed(&v.fun),
        lparen: v.lparen,
        args: gop_exprs(&v.args),
        ellipsis: v.ellipsis,
        rparen: v.rparen,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use go_parser::span::Pos;

    fn go_ident(offset: usize, name: &str) -> go::Expr {
        go::Expr::Ident(go::Ident::new(Pos::from_offset(offset), name))
    }

    #[test]
    fn test_slice_keeps_missing_bounds() {
        let slice = go::Expr::Slice(go::SliceExpr {
            x: Box::new(go_ident(0, "s")),
            lbrack: Pos::from_offset(1),
            low: None,
            high: Some(Box::new(go_ident(3, "n"))),
            max: None,
            slice3: false,
            rbrack: Pos::from_offset(4),
        });
        let Expr::Slice(out) = gop_expr(&slice) else {
            panic!("expected a slice");
        };
        assert!(out.low.is_none());
        assert!(out.max.is_none());
        assert_eq!(out.high.as_ref().map(|h| h.kind_name()), Some("Ident"));
        assert_eq!(out.rbrack, Pos::from_offset(4));
    }

    #[test]
    fn test_binary_keeps_operator_and_positions() {
        let sum = go::Expr::Binary(go::BinaryExpr {
            x: Box::new(go_ident(0, "a")),
            op_pos: Pos::from_offset(2),
            op: go_parser::lexer::TokenKind::Add,
            y: Box::new(go_ident(4, "b")),
        });
        let out = gop_expr(&sum);
        assert_eq!(out.pos(), sum.pos());
        assert_eq!(out.end(), sum.end());
        let Expr::Binary(b) = out else {
            panic!("expected a binary expression");
        };
        assert_eq!(b.op, go_parser::lexer::TokenKind::Add);
    }

    #[test]
    fn test_type_switch_guard_has_no_type() {
        let guard = go::Expr::TypeAssert(go::TypeAssertExpr {
            x: Box::new(go_ident(0, "v")),
            lparen: Pos::from_offset(2),
            ty: None,
            rparen: Pos::from_offset(7),
        });
        let Expr::TypeAssert(out) = gop_expr(&guard) else {
            panic!("expected a type assertion");
        };
        assert!(out.ty.is_none());
    }

    #[test]
    fn test_channel_direction() {
        let chan = go::Expr::ChanType(go::ChanType {
            begin: Pos::from_offset(0),
            arrow: Pos::from_offset(0),
            dir: go::ChanDir::Recv,
            value: Box::new(go_ident(7, "int")),
        });
        let Expr::ChanType(out) = gop_expr(&chan) else {
            panic!("expected a channel type");
        };
        assert_eq!(out.dir, ChanDir::Recv);
        assert_eq!(out.arrow, Pos::from_offset(0));
    }

    #[test]
    #[should_panic(expected = "gopExpr: unknown expr - BadExpr\n")]
    fn test_bad_expr_panics() {
        gop_expr(&go::Expr::Bad(go::BadExpr {
            from: Pos::NONE,
            to: Pos::NONE,
        }));
    }
}
