//! # Type Parsing
//!
//! Type expressions: names, arrays and slices, structs, pointers,
//! function signatures, interfaces, maps and channels.

use super::{PResult, Parser};
use crate::ast::{
    ArrayType, ChanDir, ChanType, Ellipsis, Expr, Field, FieldList, FuncType, Ident,
    InterfaceType, LitKind, BasicLit, MapType, ParenExpr, SelectorExpr, StarExpr, StructType,
};
use crate::lexer::TokenKind;
use crate::span::Pos;

impl<'a> Parser<'a> {
    // =========================================================================
    // TYPE ENTRY POINTS
    // =========================================================================

    /// Parse a type, failing when none is present.
    pub(super) fn parse_type(&mut self) -> PResult<Expr> {
        match self.try_ident_or_type()? {
            Some(ty) => Ok(ty),
            None => Err(self.error_expected("type")),
        }
    }

    /// Parse a type if the current token can start one.
    pub(super) fn try_ident_or_type(&mut self) -> PResult<Option<Expr>> {
        let ty = match self.tok() {
            TokenKind::Ident => self.parse_type_name()?,
            TokenKind::Lbrack => {
                let lbrack = self.expect(TokenKind::Lbrack)?;
                self.parse_array_type(lbrack)?
            }
            TokenKind::Struct => self.parse_struct_type()?,
            TokenKind::Mul => self.parse_pointer_type()?,
            TokenKind::Func => Expr::FuncType(self.parse_func_type()?),
            TokenKind::Interface => self.parse_interface_type()?,
            TokenKind::Map => self.parse_map_type()?,
            TokenKind::Chan | TokenKind::Arrow => self.parse_chan_type()?,
            TokenKind::Lparen => {
                let lparen = self.pos();
                self.next();
                let x = self.parse_type()?;
                let rparen = self.expect(TokenKind::Rparen)?;
                Expr::Paren(ParenExpr {
                    lparen,
                    x: Box::new(x),
                    rparen,
                })
            }
            _ => return Ok(None),
        };
        Ok(Some(ty))
    }

    /// `T` or `pkg.T`.
    pub(super) fn parse_type_name(&mut self) -> PResult<Expr> {
        let ident = self.parse_ident()?;
        self.parse_qualified(ident)
    }

    fn parse_qualified(&mut self, ident: Ident) -> PResult<Expr> {
        if self.tok() != TokenKind::Period {
            return Ok(Expr::Ident(ident));
        }
        self.next();
        let sel = self.parse_ident()?;
        Ok(Expr::Selector(SelectorExpr {
            x: Box::new(Expr::Ident(ident)),
            sel,
        }))
    }

    // =========================================================================
    // COMPOSITE TYPES
    // =========================================================================

    /// `[N]T`, `[...]T` or `[]T`; the `[` is already consumed.
    pub(super) fn parse_array_type(&mut self, lbrack: Pos) -> PResult<Expr> {
        let len = if self.tok() == TokenKind::Ellipsis {
            let ellipsis = self.pos();
            self.next();
            Some(Box::new(Expr::Ellipsis(Ellipsis {
                ellipsis,
                elt: None,
            })))
        } else if self.tok() != TokenKind::Rbrack {
            self.expr_lev += 1;
            let len = self.parse_rhs()?;
            self.expr_lev -= 1;
            Some(Box::new(len))
        } else {
            None
        };
        self.expect(TokenKind::Rbrack)?;
        let elt = self.parse_type()?;
        Ok(Expr::ArrayType(ArrayType {
            lbrack,
            len,
            elt: Box::new(elt),
        }))
    }

    fn parse_struct_type(&mut self) -> PResult<Expr> {
        let struct_pos = self.expect(TokenKind::Struct)?;
        let opening = self.expect(TokenKind::Lbrace)?;
        let mut list = Vec::new();
        while matches!(
            self.tok(),
            TokenKind::Ident | TokenKind::Mul | TokenKind::Lparen
        ) {
            list.push(self.parse_field_decl()?);
        }
        let closing = self.expect(TokenKind::Rbrace)?;
        Ok(Expr::StructType(StructType {
            struct_pos,
            fields: FieldList {
                opening,
                list,
                closing,
            },
            incomplete: false,
        }))
    }

    fn parse_field_decl(&mut self) -> PResult<Field> {
        let doc = self.lead_comment.take();

        let (names, ty) = match self.tok() {
            TokenKind::Ident => {
                let name = self.parse_ident()?;
                if matches!(
                    self.tok(),
                    TokenKind::Period | TokenKind::String | TokenKind::Semicolon | TokenKind::Rbrace
                ) {
                    // Embedded type.
                    (Vec::new(), self.parse_qualified(name)?)
                } else {
                    let mut names = vec![name];
                    while self.got(TokenKind::Comma) {
                        names.push(self.parse_ident()?);
                    }
                    (names, self.parse_type()?)
                }
            }
            TokenKind::Mul => {
                let star = self.pos();
                self.next();
                let x = self.parse_type_name()?;
                (
                    Vec::new(),
                    Expr::Star(StarExpr {
                        star,
                        x: Box::new(x),
                    }),
                )
            }
            _ => {
                return Err(self.error_expected("field name or embedded type"));
            }
        };

        let tag = if self.tok() == TokenKind::String {
            let tag = BasicLit {
                value_pos: self.pos(),
                kind: LitKind::String,
                value: self.lit().to_string(),
            };
            self.next();
            Some(tag)
        } else {
            None
        };

        self.expect_semi()?;
        Ok(Field {
            doc,
            names,
            ty,
            tag,
            comment: self.line_comment.take(),
        })
    }

    fn parse_pointer_type(&mut self) -> PResult<Expr> {
        let star = self.expect(TokenKind::Mul)?;
        let x = self.parse_type()?;
        Ok(Expr::Star(StarExpr {
            star,
            x: Box::new(x),
        }))
    }

    fn parse_interface_type(&mut self) -> PResult<Expr> {
        let interface = self.expect(TokenKind::Interface)?;
        let opening = self.expect(TokenKind::Lbrace)?;
        let mut list = Vec::new();
        while self.tok() == TokenKind::Ident {
            list.push(self.parse_method_spec()?);
        }
        let closing = self.expect(TokenKind::Rbrace)?;
        Ok(Expr::InterfaceType(InterfaceType {
            interface,
            methods: FieldList {
                opening,
                list,
                closing,
            },
            incomplete: false,
        }))
    }

    /// `Name(params) results` or an embedded interface name.
    fn parse_method_spec(&mut self) -> PResult<Field> {
        let doc = self.lead_comment.take();
        let ident = self.parse_ident()?;

        let (names, ty) = if self.tok() == TokenKind::Lparen {
            let (params, results) = self.parse_signature()?;
            let ty = Expr::FuncType(FuncType {
                func: Pos::NONE,
                params,
                results,
            });
            (vec![ident], ty)
        } else {
            (Vec::new(), self.parse_qualified(ident)?)
        };

        self.expect_semi()?;
        Ok(Field {
            doc,
            names,
            ty,
            tag: None,
            comment: self.line_comment.take(),
        })
    }

    fn parse_map_type(&mut self) -> PResult<Expr> {
        let map = self.expect(TokenKind::Map)?;
        self.expect(TokenKind::Lbrack)?;
        let key = self.parse_type()?;
        self.expect(TokenKind::Rbrack)?;
        let value = self.parse_type()?;
        Ok(Expr::MapType(MapType {
            map,
            key: Box::new(key),
            value: Box::new(value),
        }))
    }

    fn parse_chan_type(&mut self) -> PResult<Expr> {
        let begin = self.pos();
        let (arrow, dir) = if self.tok() == TokenKind::Chan {
            self.next();
            if self.tok() == TokenKind::Arrow {
                let arrow = self.pos();
                self.next();
                (arrow, ChanDir::Send)
            } else {
                (Pos::NONE, ChanDir::Both)
            }
        } else {
            let arrow = self.expect(TokenKind::Arrow)?;
            self.expect(TokenKind::Chan)?;
            (arrow, ChanDir::Recv)
        };
        let value = self.parse_type()?;
        Ok(Expr::ChanType(ChanType {
            begin,
            arrow,
            dir,
            value: Box::new(value),
        }))
    }

    // =========================================================================
    // SIGNATURES
    // =========================================================================

    pub(super) fn parse_func_type(&mut self) -> PResult<FuncType> {
        let func = self.expect(TokenKind::Func)?;
        let (params, results) = self.parse_signature()?;
        Ok(FuncType {
            func,
            params,
            results,
        })
    }

    pub(super) fn parse_signature(&mut self) -> PResult<(FieldList, Option<FieldList>)> {
        let params = self.parse_parameters(true)?;
        let results = self.parse_result()?;
        Ok((params, results))
    }

    /// `(a, b int, c ...string)` or `(int, string)`.
    pub(super) fn parse_parameters(&mut self, ellipsis_ok: bool) -> PResult<FieldList> {
        let opening = self.expect(TokenKind::Lparen)?;
        let list = if self.tok() != TokenKind::Rparen {
            self.parse_parameter_list(ellipsis_ok)?
        } else {
            Vec::new()
        };
        let closing = self.expect(TokenKind::Rparen)?;
        Ok(FieldList {
            opening,
            list,
            closing,
        })
    }

    fn parse_parameter_list(&mut self, ellipsis_ok: bool) -> PResult<Vec<Field>> {
        // A list of identifiers looks like a list of type names until a
        // type follows it.
        let mut list = Vec::new();
        loop {
            list.push(self.parse_var_type(ellipsis_ok)?);
            if self.tok() != TokenKind::Comma {
                break;
            }
            self.next();
            if self.tok() == TokenKind::Rparen {
                break;
            }
        }

        if let Some(ty) = self.try_var_type(ellipsis_ok)? {
            let names = self.make_ident_list(list)?;
            let mut params = vec![plain_field(names, ty)];
            if !self.at_comma("parameter list", TokenKind::Rparen)? {
                return Ok(params);
            }
            self.next();
            while self.tok() != TokenKind::Rparen && self.tok() != TokenKind::Eof {
                let names = self.parse_ident_list()?;
                let ty = self.parse_var_type(ellipsis_ok)?;
                params.push(plain_field(names, ty));
                if !self.at_comma("parameter list", TokenKind::Rparen)? {
                    break;
                }
                self.next();
            }
            return Ok(params);
        }

        Ok(list
            .into_iter()
            .map(|ty| plain_field(Vec::new(), ty))
            .collect())
    }

    fn parse_var_type(&mut self, ellipsis_ok: bool) -> PResult<Expr> {
        match self.try_var_type(ellipsis_ok)? {
            Some(ty) => Ok(ty),
            None => Err(self.error_expected("type")),
        }
    }

    fn try_var_type(&mut self, ellipsis_ok: bool) -> PResult<Option<Expr>> {
        if ellipsis_ok && self.tok() == TokenKind::Ellipsis {
            let ellipsis = self.pos();
            self.next();
            let elt = match self.try_ident_or_type()? {
                Some(elt) => elt,
                None => return Err(self.error_at(ellipsis, "'...' parameter is missing type")),
            };
            return Ok(Some(Expr::Ellipsis(Ellipsis {
                ellipsis,
                elt: Some(Box::new(elt)),
            })));
        }
        self.try_ident_or_type()
    }

    fn make_ident_list(&self, list: Vec<Expr>) -> PResult<Vec<Ident>> {
        list.into_iter()
            .map(|x| match x {
                Expr::Ident(ident) => Ok(ident),
                other => Err(self.error_at(other.pos(), "expected identifier")),
            })
            .collect()
    }

    fn parse_result(&mut self) -> PResult<Option<FieldList>> {
        if self.tok() == TokenKind::Lparen {
            return Ok(Some(self.parse_parameters(false)?));
        }
        Ok(self.try_ident_or_type()?.map(|ty| FieldList {
            opening: Pos::NONE,
            list: vec![plain_field(Vec::new(), ty)],
            closing: Pos::NONE,
        }))
    }
}

fn plain_field(names: Vec<Ident>, ty: Expr) -> Field {
    Field {
        doc: None,
        names,
        ty,
        tag: None,
        comment: None,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::ast::{ChanDir, Decl, Expr, Spec};
    use crate::parse_file;

    fn type_of(src: &str) -> Expr {
        let file = parse_file("t.go", &format!("package p\n\ntype T {}\n", src)).unwrap();
        match &file.decls[0] {
            Decl::Gen(g) => match &g.specs[0] {
                Spec::Type(t) => t.ty.clone(),
                other => panic!("unexpected spec {:?}", other),
            },
            other => panic!("unexpected decl {:?}", other),
        }
    }

    #[test]
    fn test_struct_fields() {
        let ty = type_of("struct {\n\ta, b int\n\tio.Reader\n\t*T\n\tc string `json:\"c\"`\n}");
        let Expr::StructType(st) = ty else {
            panic!("not a struct");
        };
        assert_eq!(st.fields.list.len(), 4);
        assert_eq!(st.fields.list[0].names.len(), 2);
        assert!(st.fields.list[1].names.is_empty());
        assert!(matches!(st.fields.list[1].ty, Expr::Selector(_)));
        assert!(matches!(st.fields.list[2].ty, Expr::Star(_)));
        assert_eq!(st.fields.list[3].tag.as_ref().unwrap().value, "`json:\"c\"`");
        assert_eq!(st.fields.num_fields(), 5);
    }

    #[test]
    fn test_channel_directions() {
        let Expr::ChanType(send) = type_of("chan<- int") else {
            panic!("not a chan");
        };
        assert_eq!(send.dir, ChanDir::Send);
        let Expr::ChanType(recv) = type_of("<-chan int") else {
            panic!("not a chan");
        };
        assert_eq!(recv.dir, ChanDir::Recv);
        assert_eq!(recv.begin, recv.arrow);
    }

    #[test]
    fn test_parameter_grouping() {
        let Expr::FuncType(ft) = type_of("func(a, b int, c ...string) (n int, err error)") else {
            panic!("not a func");
        };
        assert_eq!(ft.params.list.len(), 2);
        assert_eq!(ft.params.list[0].names.len(), 2);
        assert!(matches!(ft.params.list[1].ty, Expr::Ellipsis(_)));
        assert_eq!(ft.results.unwrap().list.len(), 2);
    }

    #[test]
    fn test_anonymous_parameters() {
        let Expr::FuncType(ft) = type_of("func(int, string) error") else {
            panic!("not a func");
        };
        assert_eq!(ft.params.list.len(), 2);
        assert!(ft.params.list.iter().all(|f| f.names.is_empty()));
        let results = ft.results.unwrap();
        assert!(!results.opening.is_valid());
    }

    #[test]
    fn test_interface_methods() {
        let Expr::InterfaceType(it) = type_of("interface {\n\tfmt.Stringer\n\tLen() int\n}") else {
            panic!("not an interface");
        };
        assert_eq!(it.methods.list.len(), 2);
        assert!(it.methods.list[0].names.is_empty());
        assert_eq!(it.methods.list[1].names[0].name, "Len");
    }

    #[test]
    fn test_array_lengths() {
        let Expr::ArrayType(at) = type_of("[...]int") else {
            panic!("not an array");
        };
        assert!(matches!(at.len.as_deref(), Some(Expr::Ellipsis(_))));
        let Expr::ArrayType(slice) = type_of("[]map[string]bool") else {
            panic!("not a slice");
        };
        assert!(slice.len.is_none());
        assert!(matches!(*slice.elt, Expr::MapType(_)));
    }
}
