//! # Declaration Parsing
//!
//! Top-level and grouped declarations: imports, constants, variables,
//! types, functions and methods.

use super::{PResult, Parser};
use crate::ast::{
    BasicLit, CommentGroup, Decl, FuncDecl, FuncType, GenDecl, Ident, ImportSpec, LitKind, Spec,
    TypeSpec, ValueSpec,
};
use crate::lexer::TokenKind;
use crate::span::Pos;

impl<'a> Parser<'a> {
    /// Parse one top-level declaration.
    pub(super) fn parse_decl(&mut self) -> PResult<Decl> {
        match self.tok() {
            TokenKind::Const | TokenKind::Var | TokenKind::Type => {
                Ok(Decl::Gen(self.parse_gen_decl(self.tok())?))
            }
            TokenKind::Func => Ok(Decl::Func(self.parse_func_decl()?)),
            TokenKind::Import => Err(self.error("imports must appear before other declarations")),
            _ => Err(self.error_expected("declaration")),
        }
    }

    /// Parse `keyword spec` or `keyword ( spec; spec; ... )`.
    ///
    /// ## Parameters
    ///
    /// - `keyword`: One of `import`, `const`, `var`, `type`
    pub(super) fn parse_gen_decl(&mut self, keyword: TokenKind) -> PResult<GenDecl> {
        let doc = self.lead_comment.take();
        let tok_pos = self.expect(keyword)?;

        let mut specs = Vec::new();
        let (lparen, rparen) = if self.tok() == TokenKind::Lparen {
            let lparen = self.pos();
            self.next();
            let mut iota = 0;
            while self.tok() != TokenKind::Rparen && self.tok() != TokenKind::Eof {
                let doc = self.lead_comment.take();
                specs.push(self.parse_spec(keyword, doc, iota)?);
                iota += 1;
            }
            let rparen = self.expect(TokenKind::Rparen)?;
            self.expect_semi()?;
            (lparen, rparen)
        } else {
            specs.push(self.parse_spec(keyword, None, 0)?);
            (Pos::NONE, Pos::NONE)
        };

        Ok(GenDecl {
            doc,
            tok_pos,
            tok: keyword,
            lparen,
            specs,
            rparen,
        })
    }

    fn parse_spec(
        &mut self,
        keyword: TokenKind,
        doc: Option<CommentGroup>,
        iota: usize,
    ) -> PResult<Spec> {
        match keyword {
            TokenKind::Import => self.parse_import_spec(doc).map(Spec::Import),
            TokenKind::Type => self.parse_type_spec(doc).map(Spec::Type),
            _ => self.parse_value_spec(doc, keyword, iota).map(Spec::Value),
        }
    }

    fn parse_import_spec(&mut self, doc: Option<CommentGroup>) -> PResult<ImportSpec> {
        let name = match self.tok() {
            TokenKind::Period => {
                let ident = Ident::new(self.pos(), ".");
                self.next();
                Some(ident)
            }
            TokenKind::Ident => Some(self.parse_ident()?),
            _ => None,
        };

        if self.tok() != TokenKind::String {
            return Err(self.error_expected("import path"));
        }
        let path = BasicLit {
            value_pos: self.pos(),
            kind: LitKind::String,
            value: self.lit().to_string(),
        };
        self.next();
        self.expect_semi()?;

        Ok(ImportSpec {
            doc,
            name,
            path,
            comment: self.line_comment.take(),
        })
    }

    fn parse_value_spec(
        &mut self,
        doc: Option<CommentGroup>,
        keyword: TokenKind,
        iota: usize,
    ) -> PResult<ValueSpec> {
        let pos = self.pos();
        let names = self.parse_ident_list()?;
        let ty = self.try_ident_or_type()?;
        let values = if self.got(TokenKind::Assign) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        self.expect_semi()?;

        if values.is_empty() {
            if keyword == TokenKind::Var && ty.is_none() {
                return Err(self.error_at(pos, "missing variable type or initialization"));
            }
            if keyword == TokenKind::Const && (iota == 0 || ty.is_some()) {
                return Err(self.error_at(pos, "missing constant value"));
            }
        }

        Ok(ValueSpec {
            doc,
            names,
            ty,
            values,
            comment: self.line_comment.take(),
        })
    }

    fn parse_type_spec(&mut self, doc: Option<CommentGroup>) -> PResult<TypeSpec> {
        let name = self.parse_ident()?;
        let assign = if self.tok() == TokenKind::Assign {
            let pos = self.pos();
            self.next();
            pos
        } else {
            Pos::NONE
        };
        let ty = self.parse_type()?;
        self.expect_semi()?;

        Ok(TypeSpec {
            doc,
            name,
            assign,
            ty,
            comment: self.line_comment.take(),
        })
    }

    fn parse_func_decl(&mut self) -> PResult<FuncDecl> {
        let doc = self.lead_comment.take();
        let func = self.expect(TokenKind::Func)?;

        let recv = if self.tok() == TokenKind::Lparen {
            Some(self.parse_parameters(false)?)
        } else {
            None
        };
        let name = self.parse_ident()?;
        let (params, results) = self.parse_signature()?;

        let body = if self.tok() == TokenKind::Lbrace {
            self.expr_lev += 1;
            let body = self.parse_block_stmt()?;
            self.expr_lev -= 1;
            Some(body)
        } else {
            None
        };
        self.expect_semi()?;

        Ok(FuncDecl {
            doc,
            recv,
            name,
            ty: FuncType {
                func,
                params,
                results,
            },
            body,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::ast::{Decl, Spec};
    use crate::lexer::TokenKind;
    use crate::parse_file;

    #[test]
    fn test_import_forms() {
        let src = "package p\n\nimport (\n\t\"fmt\"\n\tstr \"strings\"\n\t. \"math\"\n)\n";
        let file = parse_file("t.go", src).unwrap();
        assert_eq!(file.imports.len(), 3);
        assert!(file.imports[0].name.is_none());
        assert_eq!(file.imports[1].name.as_ref().unwrap().name, "str");
        assert_eq!(file.imports[2].name.as_ref().unwrap().name, ".");
    }

    #[test]
    fn test_grouped_consts_keep_elision() {
        let src = "package p\n\nconst (\n\ta int = iota\n\tb\n\tc = \"x\"\n)\n";
        let file = parse_file("t.go", src).unwrap();
        let Decl::Gen(g) = &file.decls[0] else {
            panic!("not a group");
        };
        assert_eq!(g.tok, TokenKind::Const);
        assert!(g.lparen.is_valid());
        let specs: Vec<_> = g
            .specs
            .iter()
            .map(|s| match s {
                Spec::Value(v) => (v.ty.is_some(), v.values.len()),
                other => panic!("unexpected spec {:?}", other),
            })
            .collect();
        assert_eq!(specs, vec![(true, 1), (false, 0), (false, 1)]);
    }

    #[test]
    fn test_first_const_needs_value() {
        let err = parse_file("t.go", "package p\n\nconst (\n\ta\n)\n").unwrap_err();
        assert!(err.to_string().contains("missing constant value"));
    }

    #[test]
    fn test_var_needs_type_or_value() {
        let err = parse_file("t.go", "package p\n\nvar a\n").unwrap_err();
        assert!(err.to_string().contains("missing variable type or initialization"));
    }

    #[test]
    fn test_method_decl() {
        let src = "package p\n\nfunc (a foo) Str() (string) {}\n";
        let file = parse_file("t.go", src).unwrap();
        let Decl::Func(f) = &file.decls[0] else {
            panic!("not a func");
        };
        assert_eq!(f.name.name, "Str");
        assert_eq!(f.recv.as_ref().unwrap().list[0].names[0].name, "a");
        let results = f.ty.results.as_ref().unwrap();
        assert!(results.opening.is_valid());
        assert_eq!(results.list.len(), 1);
    }

    #[test]
    fn test_external_func_has_no_body() {
        let file = parse_file("t.go", "package p\n\nfunc nanotime() int64\n").unwrap();
        let Decl::Func(f) = &file.decls[0] else {
            panic!("not a func");
        };
        assert!(f.body.is_none());
    }

    #[test]
    fn test_alias_type() {
        let file = parse_file("t.go", "package p\n\ntype A = int\n").unwrap();
        let Decl::Gen(g) = &file.decls[0] else {
            panic!("not a group");
        };
        let Spec::Type(t) = &g.specs[0] else {
            panic!("not a type spec");
        };
        assert!(t.assign.is_valid());
    }
}
