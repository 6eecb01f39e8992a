//! # Identifier Resolution
//!
//! Binds identifiers to the objects they denote using lexical scopes.
//! Package-level constants, types, variables and functions are declared
//! before any body is visited so forward references resolve.
//!
//! Selector names, struct field names, method names and labels are
//! never resolved. Identifiers with no visible declaration are recorded
//! in [`File::unresolved`].
//!
//! ## Example
//!
//! ```rust
//! use go_parser::ast::{Decl, Spec};
//!
//! let file = go_parser::parse_file("a.go", "package p\n\nvar x = y\nvar y = 1\n").unwrap();
//! let Decl::Gen(g) = &file.decls[0] else { unreachable!() };
//! let Spec::Value(v) = &g.specs[0] else { unreachable!() };
//! assert!(v.names[0].obj.is_some());
//! assert!(file.unresolved.is_empty());
//! ```

use crate::ast::{
    BlockStmt, CaseClause, CommClause, Decl, Expr, FieldList, File, FuncType, GenDecl, Ident,
    ObjKind, Object, Spec, Stmt,
};
use crate::lexer::TokenKind;
use std::collections::HashMap;
use std::sync::Arc;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Resolve every identifier in `file` and fill [`File::unresolved`].
pub fn resolve_file(file: &mut File) {
    let mut resolver = Resolver::default();
    resolver.open_scope();

    for decl in &mut file.decls {
        resolver.declare_top_level(decl);
    }
    for decl in &mut file.decls {
        resolver.walk_top_level(decl);
    }

    file.unresolved = resolver.unresolved;
}

// =============================================================================
// RESOLVER
// =============================================================================

#[derive(Default)]
struct Resolver {
    /// Innermost scope last.
    scopes: Vec<HashMap<String, Arc<Object>>>,
    unresolved: Vec<Ident>,
}

impl Resolver {
    fn open_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn close_scope(&mut self) {
        self.scopes.pop();
    }

    /// Bind `ident` to a new object in the innermost scope.
    fn declare(&mut self, ident: &mut Ident, kind: ObjKind) {
        let obj = Arc::new(Object::new(kind, &ident.name, ident.name_pos));
        ident.obj = Some(obj.clone());
        if ident.name == "_" {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(ident.name.clone(), obj);
        }
    }

    fn lookup(&self, name: &str) -> Option<Arc<Object>> {
        self.scopes.iter().rev().find_map(|s| s.get(name).cloned())
    }

    fn resolve(&mut self, ident: &mut Ident) {
        self.try_resolve(ident, true);
    }

    fn try_resolve(&mut self, ident: &mut Ident, collect_unresolved: bool) {
        if ident.name == "_" {
            return;
        }
        match self.lookup(&ident.name) {
            Some(obj) => ident.obj = Some(obj),
            None if collect_unresolved => self.unresolved.push(ident.clone()),
            None => {}
        }
    }

    // =========================================================================
    // DECLARATIONS
    // =========================================================================

    fn declare_top_level(&mut self, decl: &mut Decl) {
        match decl {
            Decl::Gen(g) => {
                let tok = g.tok;
                for spec in &mut g.specs {
                    match spec {
                        Spec::Import(_) => {}
                        Spec::Value(v) => {
                            let kind = value_kind(tok);
                            for name in &mut v.names {
                                self.declare(name, kind);
                            }
                        }
                        Spec::Type(t) => self.declare(&mut t.name, ObjKind::Typ),
                    }
                }
            }
            Decl::Func(f) => {
                if f.recv.is_none() && f.name.name != "init" {
                    self.declare(&mut f.name, ObjKind::Fun);
                }
            }
            Decl::Bad(_) => {}
        }
    }

    fn walk_top_level(&mut self, decl: &mut Decl) {
        match decl {
            Decl::Gen(g) => {
                for spec in &mut g.specs {
                    match spec {
                        Spec::Import(_) => {}
                        Spec::Value(v) => {
                            if let Some(ty) = &mut v.ty {
                                self.walk_expr(ty);
                            }
                            for value in &mut v.values {
                                self.walk_expr(value);
                            }
                        }
                        Spec::Type(t) => self.walk_expr(&mut t.ty),
                    }
                }
            }
            Decl::Func(f) => {
                self.open_scope();
                if let Some(recv) = &mut f.recv {
                    self.declare_fields(recv, ObjKind::Var);
                }
                self.declare_signature(&mut f.ty);
                if let Some(body) = &mut f.body {
                    self.walk_stmts(&mut body.list);
                }
                self.close_scope();
            }
            Decl::Bad(_) => {}
        }
    }

    /// Declarations inside function bodies become visible after their spec.
    fn walk_local_decl(&mut self, decl: &mut GenDecl) {
        let tok = decl.tok;
        for spec in &mut decl.specs {
            match spec {
                Spec::Import(_) => {}
                Spec::Value(v) => {
                    if let Some(ty) = &mut v.ty {
                        self.walk_expr(ty);
                    }
                    for value in &mut v.values {
                        self.walk_expr(value);
                    }
                    for name in &mut v.names {
                        self.declare(name, value_kind(tok));
                    }
                }
                Spec::Type(t) => {
                    self.declare(&mut t.name, ObjKind::Typ);
                    self.walk_expr(&mut t.ty);
                }
            }
        }
    }

    /// Resolve field types, then declare field names as variables.
    fn declare_fields(&mut self, list: &mut FieldList, kind: ObjKind) {
        for field in &mut list.list {
            self.walk_expr(&mut field.ty);
        }
        for field in &mut list.list {
            for name in &mut field.names {
                self.declare(name, kind);
            }
        }
    }

    fn declare_signature(&mut self, ty: &mut FuncType) {
        self.declare_fields(&mut ty.params, ObjKind::Var);
        if let Some(results) = &mut ty.results {
            self.declare_fields(results, ObjKind::Var);
        }
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    fn walk_exprs(&mut self, list: &mut [Expr]) {
        for x in list {
            self.walk_expr(x);
        }
    }

    fn walk_opt(&mut self, x: &mut Option<Box<Expr>>) {
        if let Some(x) = x {
            self.walk_expr(x);
        }
    }

    fn walk_expr(&mut self, x: &mut Expr) {
        match x {
            Expr::Bad(_) | Expr::BasicLit(_) => {}
            Expr::Ident(ident) => self.resolve(ident),
            Expr::Ellipsis(e) => self.walk_opt(&mut e.elt),
            Expr::FuncLit(f) => {
                self.open_scope();
                self.declare_signature(&mut f.ty);
                self.walk_stmts(&mut f.body.list);
                self.close_scope();
            }
            Expr::CompositeLit(c) => {
                self.walk_opt(&mut c.ty);
                for elt in &mut c.elts {
                    match elt {
                        Expr::KeyValue(kv) => {
                            // Keys may be struct field names.
                            match kv.key.as_mut() {
                                Expr::Ident(key) => self.try_resolve(key, false),
                                key => self.walk_expr(key),
                            }
                            self.walk_expr(&mut kv.value);
                        }
                        other => self.walk_expr(other),
                    }
                }
            }
            Expr::Paren(p) => self.walk_expr(&mut p.x),
            Expr::Selector(s) => self.walk_expr(&mut s.x),
            Expr::Index(i) => {
                self.walk_expr(&mut i.x);
                self.walk_expr(&mut i.index);
            }
            Expr::Slice(s) => {
                self.walk_expr(&mut s.x);
                self.walk_opt(&mut s.low);
                self.walk_opt(&mut s.high);
                self.walk_opt(&mut s.max);
            }
            Expr::TypeAssert(t) => {
                self.walk_expr(&mut t.x);
                self.walk_opt(&mut t.ty);
            }
            Expr::Call(c) => {
                self.walk_expr(&mut c.fun);
                self.walk_exprs(&mut c.args);
            }
            Expr::Star(s) => self.walk_expr(&mut s.x),
            Expr::Unary(u) => self.walk_expr(&mut u.x),
            Expr::Binary(b) => {
                self.walk_expr(&mut b.x);
                self.walk_expr(&mut b.y);
            }
            Expr::KeyValue(kv) => {
                self.walk_expr(&mut kv.key);
                self.walk_expr(&mut kv.value);
            }
            Expr::ArrayType(a) => {
                self.walk_opt(&mut a.len);
                self.walk_expr(&mut a.elt);
            }
            Expr::StructType(s) => {
                for field in &mut s.fields.list {
                    self.walk_expr(&mut field.ty);
                }
            }
            Expr::FuncType(f) => {
                self.open_scope();
                self.declare_signature(f);
                self.close_scope();
            }
            Expr::InterfaceType(i) => {
                for method in &mut i.methods.list {
                    self.walk_expr(&mut method.ty);
                }
            }
            Expr::MapType(m) => {
                self.walk_expr(&mut m.key);
                self.walk_expr(&mut m.value);
            }
            Expr::ChanType(c) => self.walk_expr(&mut c.value),
        }
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    fn walk_stmts(&mut self, list: &mut [Stmt]) {
        for stmt in list {
            self.walk_stmt(stmt);
        }
    }

    fn walk_block(&mut self, block: &mut BlockStmt) {
        self.open_scope();
        self.walk_stmts(&mut block.list);
        self.close_scope();
    }

    fn walk_opt_stmt(&mut self, stmt: &mut Option<Box<Stmt>>) {
        if let Some(stmt) = stmt {
            self.walk_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Bad(_) | Stmt::Empty(_) | Stmt::Branch(_) => {}
            Stmt::Decl(d) => {
                if let Decl::Gen(g) = &mut d.decl {
                    self.walk_local_decl(g);
                }
            }
            Stmt::Labeled(l) => self.walk_stmt(&mut l.stmt),
            Stmt::Expr(s) => self.walk_expr(&mut s.x),
            Stmt::Send(s) => {
                self.walk_expr(&mut s.chan);
                self.walk_expr(&mut s.value);
            }
            Stmt::IncDec(s) => self.walk_expr(&mut s.x),
            Stmt::Assign(a) => {
                self.walk_exprs(&mut a.rhs);
                if a.tok == TokenKind::Define {
                    self.short_var_decl(&mut a.lhs);
                } else {
                    self.walk_exprs(&mut a.lhs);
                }
            }
            Stmt::Go(s) => {
                self.walk_expr(&mut s.call.fun);
                self.walk_exprs(&mut s.call.args);
            }
            Stmt::Defer(s) => {
                self.walk_expr(&mut s.call.fun);
                self.walk_exprs(&mut s.call.args);
            }
            Stmt::Return(r) => self.walk_exprs(&mut r.results),
            Stmt::Block(b) => self.walk_block(b),
            Stmt::If(s) => {
                self.open_scope();
                self.walk_opt_stmt(&mut s.init);
                self.walk_expr(&mut s.cond);
                self.walk_block(&mut s.body);
                self.walk_opt_stmt(&mut s.else_branch);
                self.close_scope();
            }
            Stmt::CaseClause(c) => self.walk_case_clause(c),
            Stmt::Switch(s) => {
                self.open_scope();
                self.walk_opt_stmt(&mut s.init);
                if let Some(tag) = &mut s.tag {
                    self.walk_expr(tag);
                }
                self.walk_stmts(&mut s.body.list);
                self.close_scope();
            }
            Stmt::TypeSwitch(s) => {
                self.open_scope();
                self.walk_opt_stmt(&mut s.init);
                self.walk_stmt(&mut s.assign);
                self.walk_stmts(&mut s.body.list);
                self.close_scope();
            }
            Stmt::CommClause(c) => self.walk_comm_clause(c),
            Stmt::Select(s) => self.walk_stmts(&mut s.body.list),
            Stmt::For(s) => {
                self.open_scope();
                self.walk_opt_stmt(&mut s.init);
                if let Some(cond) = &mut s.cond {
                    self.walk_expr(cond);
                }
                self.walk_opt_stmt(&mut s.post);
                self.walk_block(&mut s.body);
                self.close_scope();
            }
            Stmt::Range(r) => {
                self.open_scope();
                self.walk_expr(&mut r.x);
                let define = r.tok == TokenKind::Define;
                for target in [&mut r.key, &mut r.value].into_iter().flatten() {
                    if define {
                        if let Expr::Ident(ident) = target {
                            self.declare(ident, ObjKind::Var);
                        }
                    } else {
                        self.walk_expr(target);
                    }
                }
                self.walk_block(&mut r.body);
                self.close_scope();
            }
        }
    }

    fn walk_case_clause(&mut self, clause: &mut CaseClause) {
        self.walk_exprs(&mut clause.list);
        self.open_scope();
        self.walk_stmts(&mut clause.body);
        self.close_scope();
    }

    fn walk_comm_clause(&mut self, clause: &mut CommClause) {
        self.open_scope();
        self.walk_opt_stmt(&mut clause.comm);
        self.walk_stmts(&mut clause.body);
        self.close_scope();
    }

    /// `a, b := ...` declares the names not yet declared in this scope.
    fn short_var_decl(&mut self, lhs: &mut [Expr]) {
        for x in lhs {
            let Expr::Ident(ident) = x else {
                self.walk_expr(x);
                continue;
            };
            let existing = self
                .scopes
                .last()
                .and_then(|scope| scope.get(&ident.name).cloned());
            match existing {
                Some(obj) => ident.obj = Some(obj),
                None => self.declare(ident, ObjKind::Var),
            }
        }
    }
}

fn value_kind(tok: TokenKind) -> ObjKind {
    if tok == TokenKind::Const {
        ObjKind::Con
    } else {
        ObjKind::Var
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::ast::{Decl, Expr, ObjKind, Spec, Stmt};
    use crate::parse_file;

    #[test]
    fn test_forward_reference_at_file_scope() {
        let file = parse_file("t.go", "package p\n\nvar a = b\n\nconst b = 1\n").unwrap();
        let Decl::Gen(g) = &file.decls[0] else {
            panic!("not a group");
        };
        let Spec::Value(v) = &g.specs[0] else {
            panic!("not a value spec");
        };
        let Expr::Ident(b) = &v.values[0] else {
            panic!("not an ident");
        };
        assert_eq!(b.obj.as_ref().unwrap().kind, ObjKind::Con);
        assert!(file.unresolved.is_empty());
    }

    #[test]
    fn test_universe_names_are_unresolved() {
        let file = parse_file("t.go", "package p\n\nvar a int = len(\"x\")\n").unwrap();
        let names: Vec<_> = file.unresolved.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["int", "len"]);
    }

    #[test]
    fn test_params_and_locals() {
        let src = "package p\n\nfunc f(x int) {\n\ty := x\n\t_ = y\n}\n";
        let file = parse_file("t.go", src).unwrap();
        let Decl::Func(f) = &file.decls[0] else {
            panic!("not a func");
        };
        let body = &f.body.as_ref().unwrap().list;
        let Stmt::Assign(first) = &body[0] else {
            panic!("not an assignment");
        };
        let Expr::Ident(x) = &first.rhs[0] else {
            panic!("not an ident");
        };
        assert_eq!(x.obj.as_ref().unwrap().kind, ObjKind::Var);
        let Stmt::Assign(second) = &body[1] else {
            panic!("not an assignment");
        };
        let Expr::Ident(y) = &second.rhs[0] else {
            panic!("not an ident");
        };
        assert_eq!(y.obj.as_ref().unwrap().decl, match &first.lhs[0] {
            Expr::Ident(decl) => decl.name_pos,
            other => panic!("unexpected {:?}", other),
        });
        let names: Vec<_> = file.unresolved.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["int"]);
    }

    #[test]
    fn test_selectors_and_keys_are_not_collected() {
        let src = "package p\n\ntype T struct{ a int }\n\nvar v = T{a: 1}.a\n";
        let file = parse_file("t.go", src).unwrap();
        let names: Vec<_> = file.unresolved.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["int"]);
    }

    #[test]
    fn test_scopes_close() {
        let src = "package p\n\nfunc f() {\n\tif x := 1; x > 0 {\n\t}\n\t_ = x\n}\n";
        let file = parse_file("t.go", src).unwrap();
        let names: Vec<_> = file.unresolved.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["x"]);
    }
}
