//! # Expression Parsing
//!
//! Operands, primary expressions (selectors, indexing, slicing, type
//! assertions, calls, composite literals), unary and binary expressions.
//!
//! Binary expressions use precedence climbing over
//! [`TokenKind::precedence`].

use super::{PResult, Parser};
use crate::ast::{
    BasicLit, BinaryExpr, CallExpr, CompositeLit, Expr, FuncLit, IndexExpr, KeyValueExpr,
    LitKind, ParenExpr, SelectorExpr, SliceExpr, StarExpr, TypeAssertExpr, UnaryExpr, ChanDir,
};
use crate::lexer::TokenKind;
use crate::span::Pos;

impl<'a> Parser<'a> {
    // =========================================================================
    // EXPRESSION LISTS
    // =========================================================================

    pub(super) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_binary_expr(1)
    }

    pub(super) fn parse_rhs(&mut self) -> PResult<Expr> {
        self.parse_expr()
    }

    pub(super) fn parse_expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut list = vec![self.parse_expr()?];
        while self.got(TokenKind::Comma) {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    // =========================================================================
    // BINARY AND UNARY
    // =========================================================================

    fn parse_binary_expr(&mut self, prec1: u8) -> PResult<Expr> {
        let mut x = self.parse_unary_expr()?;
        loop {
            let op = self.tok();
            let oprec = op.precedence();
            if oprec < prec1 {
                return Ok(x);
            }
            let op_pos = self.pos();
            self.next();
            let y = self.parse_binary_expr(oprec + 1)?;
            x = Expr::Binary(BinaryExpr {
                x: Box::new(x),
                op_pos,
                op,
                y: Box::new(y),
            });
        }
    }

    pub(super) fn parse_unary_expr(&mut self) -> PResult<Expr> {
        match self.tok() {
            TokenKind::Add | TokenKind::Sub | TokenKind::Not | TokenKind::Xor | TokenKind::And => {
                let op_pos = self.pos();
                let op = self.tok();
                self.next();
                let x = self.parse_unary_expr()?;
                Ok(Expr::Unary(UnaryExpr {
                    op_pos,
                    op,
                    x: Box::new(x),
                }))
            }
            TokenKind::Arrow => {
                let arrow = self.pos();
                self.next();
                let x = self.parse_unary_expr()?;
                match x {
                    // `<-chan T` in expression position is a type.
                    Expr::ChanType(mut ct) if ct.dir == ChanDir::Both => {
                        ct.begin = arrow;
                        ct.arrow = arrow;
                        ct.dir = ChanDir::Recv;
                        Ok(Expr::ChanType(ct))
                    }
                    Expr::ChanType(_) => Err(self.error_at(arrow, "expected 'chan'")),
                    x => Ok(Expr::Unary(UnaryExpr {
                        op_pos: arrow,
                        op: TokenKind::Arrow,
                        x: Box::new(x),
                    })),
                }
            }
            TokenKind::Mul => {
                let star = self.pos();
                self.next();
                let x = self.parse_unary_expr()?;
                Ok(Expr::Star(StarExpr {
                    star,
                    x: Box::new(x),
                }))
            }
            _ => self.parse_primary_expr(),
        }
    }

    // =========================================================================
    // OPERANDS
    // =========================================================================

    fn parse_operand(&mut self) -> PResult<Expr> {
        match self.tok() {
            TokenKind::Ident => Ok(Expr::Ident(self.parse_ident()?)),
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Char
            | TokenKind::String => {
                let kind = match self.tok() {
                    TokenKind::Int => LitKind::Int,
                    TokenKind::Float => LitKind::Float,
                    TokenKind::Imag => LitKind::Imag,
                    TokenKind::Char => LitKind::Char,
                    _ => LitKind::String,
                };
                let lit = BasicLit {
                    value_pos: self.pos(),
                    kind,
                    value: self.lit().to_string(),
                };
                self.next();
                Ok(Expr::BasicLit(lit))
            }
            TokenKind::Lparen => {
                let lparen = self.pos();
                self.next();
                self.expr_lev += 1;
                let x = self.parse_expr()?;
                self.expr_lev -= 1;
                let rparen = self.expect(TokenKind::Rparen)?;
                Ok(Expr::Paren(ParenExpr {
                    lparen,
                    x: Box::new(x),
                    rparen,
                }))
            }
            TokenKind::Func => self.parse_func_type_or_lit(),
            _ => match self.try_ident_or_type()? {
                Some(ty) => Ok(ty),
                None => Err(self.error_expected("operand")),
            },
        }
    }

    fn parse_func_type_or_lit(&mut self) -> PResult<Expr> {
        let ty = self.parse_func_type()?;
        if self.tok() != TokenKind::Lbrace {
            return Ok(Expr::FuncType(ty));
        }
        self.expr_lev += 1;
        let body = self.parse_block_stmt()?;
        self.expr_lev -= 1;
        Ok(Expr::FuncLit(Box::new(FuncLit { ty, body })))
    }

    // =========================================================================
    // PRIMARY EXPRESSIONS
    // =========================================================================

    fn parse_primary_expr(&mut self) -> PResult<Expr> {
        let mut x = self.parse_operand()?;
        loop {
            x = match self.tok() {
                TokenKind::Period => {
                    self.next();
                    match self.tok() {
                        TokenKind::Ident => {
                            let sel = self.parse_ident()?;
                            Expr::Selector(SelectorExpr {
                                x: Box::new(x),
                                sel,
                            })
                        }
                        TokenKind::Lparen => self.parse_type_assertion(x)?,
                        _ => return Err(self.error_expected("selector or type assertion")),
                    }
                }
                TokenKind::Lbrack => self.parse_index_or_slice(x)?,
                TokenKind::Lparen => self.parse_call(x)?,
                TokenKind::Lbrace => {
                    if is_literal_type(&x) && (self.expr_lev >= 0 || !is_type_name(&x)) {
                        self.parse_literal_value(Some(x))?
                    } else {
                        return Ok(x);
                    }
                }
                _ => return Ok(x),
            };
        }
    }

    /// `x.(T)` or the switch guard `x.(type)`; the `.` is consumed.
    fn parse_type_assertion(&mut self, x: Expr) -> PResult<Expr> {
        let lparen = self.expect(TokenKind::Lparen)?;
        let ty = if self.tok() == TokenKind::Type {
            self.next();
            None
        } else {
            Some(Box::new(self.parse_type()?))
        };
        let rparen = self.expect(TokenKind::Rparen)?;
        Ok(Expr::TypeAssert(TypeAssertExpr {
            x: Box::new(x),
            lparen,
            ty,
            rparen,
        }))
    }

    fn parse_index_or_slice(&mut self, x: Expr) -> PResult<Expr> {
        let lbrack = self.expect(TokenKind::Lbrack)?;
        self.expr_lev += 1;
        let mut index: [Option<Expr>; 3] = [None, None, None];
        let mut colons = [Pos::NONE; 2];
        let mut ncolons = 0;
        if self.tok() != TokenKind::Colon {
            index[0] = Some(self.parse_rhs()?);
        }
        while self.tok() == TokenKind::Colon && ncolons < 2 {
            colons[ncolons] = self.pos();
            ncolons += 1;
            self.next();
            if !matches!(
                self.tok(),
                TokenKind::Colon | TokenKind::Rbrack | TokenKind::Eof
            ) {
                index[ncolons] = Some(self.parse_rhs()?);
            }
        }
        self.expr_lev -= 1;
        let rbrack = self.expect(TokenKind::Rbrack)?;

        let [low, high, max] = index;
        if ncolons == 0 {
            let index = match low {
                Some(index) => index,
                None => return Err(self.error_at(rbrack, "expected operand")),
            };
            return Ok(Expr::Index(IndexExpr {
                x: Box::new(x),
                lbrack,
                index: Box::new(index),
                rbrack,
            }));
        }

        let slice3 = ncolons == 2;
        if slice3 {
            if high.is_none() {
                return Err(self.error_at(colons[1], "middle index required in 3-index slice"));
            }
            if max.is_none() {
                return Err(self.error_at(rbrack, "final index required in 3-index slice"));
            }
        }
        Ok(Expr::Slice(SliceExpr {
            x: Box::new(x),
            lbrack,
            low: low.map(Box::new),
            high: high.map(Box::new),
            max: max.map(Box::new),
            slice3,
            rbrack,
        }))
    }

    fn parse_call(&mut self, fun: Expr) -> PResult<Expr> {
        let lparen = self.expect(TokenKind::Lparen)?;
        self.expr_lev += 1;
        let mut args = Vec::new();
        let mut ellipsis = Pos::NONE;
        while self.tok() != TokenKind::Rparen && self.tok() != TokenKind::Eof && !ellipsis.is_valid()
        {
            args.push(self.parse_expr()?);
            if self.tok() == TokenKind::Ellipsis {
                ellipsis = self.pos();
                self.next();
            }
            if !self.at_comma("argument list", TokenKind::Rparen)? {
                break;
            }
            self.next();
        }
        self.expr_lev -= 1;
        let rparen = self.expect_closing(TokenKind::Rparen, "argument list")?;
        Ok(Expr::Call(CallExpr {
            fun: Box::new(fun),
            lparen,
            args,
            ellipsis,
            rparen,
        }))
    }

    // =========================================================================
    // COMPOSITE LITERALS
    // =========================================================================

    fn parse_literal_value(&mut self, ty: Option<Expr>) -> PResult<Expr> {
        let lbrace = self.expect(TokenKind::Lbrace)?;
        self.expr_lev += 1;
        let mut elts = Vec::new();
        while self.tok() != TokenKind::Rbrace && self.tok() != TokenKind::Eof {
            elts.push(self.parse_element()?);
            if !self.at_comma("composite literal", TokenKind::Rbrace)? {
                break;
            }
            self.next();
        }
        self.expr_lev -= 1;
        let rbrace = self.expect_closing(TokenKind::Rbrace, "composite literal")?;
        Ok(Expr::CompositeLit(CompositeLit {
            ty: ty.map(Box::new),
            lbrace,
            elts,
            rbrace,
            incomplete: false,
        }))
    }

    fn parse_element(&mut self) -> PResult<Expr> {
        let x = self.parse_value()?;
        if self.tok() != TokenKind::Colon {
            return Ok(x);
        }
        let colon = self.pos();
        self.next();
        let value = self.parse_value()?;
        Ok(Expr::KeyValue(KeyValueExpr {
            key: Box::new(x),
            colon,
            value: Box::new(value),
        }))
    }

    fn parse_value(&mut self) -> PResult<Expr> {
        if self.tok() == TokenKind::Lbrace {
            return self.parse_literal_value(None);
        }
        self.parse_expr()
    }
}

/// Whether `x` may be the type of a composite literal.
fn is_literal_type(x: &Expr) -> bool {
    match x {
        Expr::Bad(_) | Expr::Ident(_) | Expr::ArrayType(_) | Expr::StructType(_) | Expr::MapType(_) => {
            true
        }
        Expr::Selector(s) => matches!(*s.x, Expr::Ident(_)),
        _ => false,
    }
}

/// Whether `x` is a (possibly qualified) type name.
fn is_type_name(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) => true,
        Expr::Selector(s) => matches!(*s.x, Expr::Ident(_)),
        _ => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::ast::{Decl, Expr, Spec};
    use crate::lexer::TokenKind;
    use crate::parse_file;

    fn expr_of(src: &str) -> Expr {
        let file = parse_file("t.go", &format!("package p\n\nvar v = {}\n", src)).unwrap();
        match &file.decls[0] {
            Decl::Gen(g) => match &g.specs[0] {
                Spec::Value(v) => v.values[0].clone(),
                other => panic!("unexpected spec {:?}", other),
            },
            other => panic!("unexpected decl {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let Expr::Binary(b) = expr_of("a + b*c") else {
            panic!("not binary");
        };
        assert_eq!(b.op, TokenKind::Add);
        assert!(matches!(*b.y, Expr::Binary(ref m) if m.op == TokenKind::Mul));
    }

    #[test]
    fn test_left_associative() {
        let Expr::Binary(b) = expr_of("a - b - c") else {
            panic!("not binary");
        };
        assert!(matches!(*b.x, Expr::Binary(_)));
        assert!(matches!(*b.y, Expr::Ident(_)));
    }

    #[test]
    fn test_slices() {
        let Expr::Slice(s) = expr_of("x[:1]") else {
            panic!("not slice");
        };
        assert!(s.low.is_none());
        assert!(s.high.is_some());
        assert!(!s.slice3);
        let Expr::Slice(s3) = expr_of("x[1:2:3]") else {
            panic!("not slice");
        };
        assert!(s3.slice3);
        assert!(s3.max.is_some());
    }

    #[test]
    fn test_three_index_slice_needs_max() {
        let err = crate::parse_file("t.go", "package p\n\nvar v = x[1:2:]\n").unwrap_err();
        assert!(err.to_string().contains("final index required in 3-index slice"));
    }

    #[test]
    fn test_type_assertion_call() {
        let Expr::Call(call) = expr_of("a.i.(func() (int))()") else {
            panic!("not call");
        };
        let Expr::TypeAssert(ta) = *call.fun else {
            panic!("not type assertion");
        };
        assert!(matches!(ta.ty.as_deref(), Some(Expr::FuncType(_))));
    }

    #[test]
    fn test_variadic_call() {
        let Expr::Call(call) = expr_of("f(a, b...)") else {
            panic!("not call");
        };
        assert_eq!(call.args.len(), 2);
        assert!(call.ellipsis.is_valid());
    }

    #[test]
    fn test_composite_literal_elements() {
        let Expr::Unary(u) = expr_of("&T{a: 1, b: []int{2}}") else {
            panic!("not unary");
        };
        let Expr::CompositeLit(lit) = *u.x else {
            panic!("not composite");
        };
        assert_eq!(lit.elts.len(), 2);
        assert!(lit.elts.iter().all(|e| matches!(e, Expr::KeyValue(_))));
    }

    #[test]
    fn test_elided_element_types() {
        let Expr::CompositeLit(lit) = expr_of("[][]int{{1}, {2, 3}}") else {
            panic!("not composite");
        };
        assert!(lit.elts.iter().all(|e| matches!(e, Expr::CompositeLit(c) if c.ty.is_none())));
    }

    #[test]
    fn test_receive_and_recv_chan_type() {
        assert!(matches!(expr_of("<-ch"), Expr::Unary(u) if u.op == TokenKind::Arrow));
        let Expr::Call(call) = expr_of("make(<-chan int)") else {
            panic!("not call");
        };
        assert!(matches!(&call.args[0], Expr::ChanType(_)));
    }

    #[test]
    fn test_func_literal() {
        assert!(matches!(expr_of("func() {}"), Expr::FuncLit(_)));
    }
}
