//! # Go+ Syntax Tree
//!
//! Node types consumed by Go+ tooling (printer, type checker, code
//! generators). The shape follows the Go tree node for node so plain Go
//! files can be carried over without re-parsing, plus a few Go+ only
//! markers such as [`File::no_pkg_decl`].
//!
//! Positions and token kinds are shared with `go_parser`, so a converted
//! tree keeps pointing into the original source text.
//!
//! ## Example
//!
//! ```rust
//! use gop_ast::ast::{Expr, Ident};
//!
//! let x = Expr::Ident(Ident::new("x"));
//! assert_eq!(x.kind_name(), "Ident");
//! assert!(!x.pos().is_valid());
//! ```

use crate::token::{LineTable, Pos, TokenKind};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// COMMENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub slash: Pos,
    /// Comment text including the comment markers.
    pub text: String,
}

impl Comment {
    pub fn end(&self) -> Pos {
        self.slash.advance(self.text.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    pub fn pos(&self) -> Pos {
        self.list.first().map_or(Pos::NONE, |c| c.slash)
    }

    pub fn end(&self) -> Pos {
        self.list.last().map_or(Pos::NONE, Comment::end)
    }
}

// =============================================================================
// IDENTIFIERS AND OBJECTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjKind {
    Bad,
    Pkg,
    Con,
    Typ,
    Var,
    Fun,
    Lbl,
}

/// A named entity an identifier refers to.
///
/// `data` is an opaque payload for downstream consumers. Identifiers
/// converted from Go carry the original Go identifier there (see
/// [`crate::fromgo::check_ident`]).
#[derive(Clone)]
pub struct Object {
    pub kind: ObjKind,
    pub name: String,
    pub decl: Pos,
    pub data: Option<Arc<dyn Any + Send + Sync>>,
}

impl Object {
    pub fn new(kind: ObjKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            decl: Pos::NONE,
            data: None,
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("decl", &self.decl)
            .field("data", &self.data.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Payloads compare by identity.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        let same_data = match (&self.data, &other.data) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.kind == other.kind && self.name == other.name && self.decl == other.decl && same_data
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name_pos: Pos,
    pub name: String,
    pub obj: Option<Arc<Object>>,
}

impl Ident {
    /// Synthesized identifier without a source position.
    pub fn new(name: &str) -> Self {
        Self::with_pos(Pos::NONE, name)
    }

    pub fn with_pos(name_pos: Pos, name: &str) -> Self {
        Self {
            name_pos,
            name: name.to_string(),
            obj: None,
        }
    }

    pub fn end(&self) -> Pos {
        self.name_pos.advance(self.name.len())
    }

    pub fn is_exported(&self) -> bool {
        self.name.chars().next().map_or(false, char::is_uppercase)
    }
}

// =============================================================================
// FIELDS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub doc: Option<CommentGroup>,
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<BasicLit>,
    pub comment: Option<CommentGroup>,
}

impl Field {
    pub fn pos(&self) -> Pos {
        self.names.first().map_or_else(|| self.ty.pos(), |n| n.name_pos)
    }

    pub fn end(&self) -> Pos {
        self.tag.as_ref().map_or_else(|| self.ty.end(), BasicLit::end)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldList {
    pub opening: Pos,
    pub list: Vec<Field>,
    pub closing: Pos,
}

impl FieldList {
    pub fn pos(&self) -> Pos {
        if self.opening.is_valid() {
            return self.opening;
        }
        self.list.first().map_or(Pos::NONE, Field::pos)
    }

    pub fn end(&self) -> Pos {
        if self.closing.is_valid() {
            return self.closing.advance(1);
        }
        self.list.last().map_or(Pos::NONE, Field::end)
    }

    pub fn num_fields(&self) -> usize {
        self.list.iter().map(|f| f.names.len().max(1)).sum()
    }
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadExpr {
    pub from: Pos,
    pub to: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsis {
    pub ellipsis: Pos,
    pub elt: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicLit {
    pub value_pos: Pos,
    pub kind: LitKind,
    pub value: String,
}

impl BasicLit {
    pub fn end(&self) -> Pos {
        self.value_pos.advance(self.value.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncLit {
    pub ty: FuncType,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeLit {
    pub ty: Option<Box<Expr>>,
    pub lbrace: Pos,
    pub elts: Vec<Expr>,
    pub rbrace: Pos,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub lparen: Pos,
    pub x: Box<Expr>,
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub lbrack: Pos,
    pub index: Box<Expr>,
    pub rbrack: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceExpr {
    pub x: Box<Expr>,
    pub lbrack: Pos,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub max: Option<Box<Expr>>,
    pub slice3: bool,
    pub rbrack: Pos,
}

/// `x.(T)`, or the switch guard `x.(type)` when `ty` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAssertExpr {
    pub x: Box<Expr>,
    pub lparen: Pos,
    pub ty: Option<Box<Expr>>,
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub lparen: Pos,
    pub args: Vec<Expr>,
    pub ellipsis: Pos,
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarExpr {
    pub star: Pos,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op_pos: Pos,
    pub op: TokenKind,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op_pos: Pos,
    pub op: TokenKind,
    pub y: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueExpr {
    pub key: Box<Expr>,
    pub colon: Pos,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub lbrack: Pos,
    pub len: Option<Box<Expr>>,
    pub elt: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub struct_pos: Pos,
    pub fields: FieldList,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub func: Pos,
    pub params: FieldList,
    pub results: Option<FieldList>,
}

impl FuncType {
    pub fn pos(&self) -> Pos {
        if self.func.is_valid() {
            self.func
        } else {
            self.params.pos()
        }
    }

    pub fn end(&self) -> Pos {
        self.results
            .as_ref()
            .map_or_else(|| self.params.end(), FieldList::end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub interface: Pos,
    pub methods: FieldList,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapType {
    pub map: Pos,
    pub key: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChanType {
    pub begin: Pos,
    pub arrow: Pos,
    pub dir: ChanDir,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bad(BadExpr),
    Ident(Ident),
    Ellipsis(Ellipsis),
    BasicLit(BasicLit),
    FuncLit(Box<FuncLit>),
    CompositeLit(CompositeLit),
    Paren(ParenExpr),
    Selector(SelectorExpr),
    Index(IndexExpr),
    Slice(SliceExpr),
    TypeAssert(TypeAssertExpr),
    Call(CallExpr),
    Star(StarExpr),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    KeyValue(KeyValueExpr),
    ArrayType(ArrayType),
    StructType(StructType),
    FuncType(FuncType),
    InterfaceType(InterfaceType),
    MapType(MapType),
    ChanType(ChanType),
}

impl Expr {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Bad(_) => "BadExpr",
            Expr::Ident(_) => "Ident",
            Expr::Ellipsis(_) => "Ellipsis",
            Expr::BasicLit(_) => "BasicLit",
            Expr::FuncLit(_) => "FuncLit",
            Expr::CompositeLit(_) => "CompositeLit",
            Expr::Paren(_) => "ParenExpr",
            Expr::Selector(_) => "SelectorExpr",
            Expr::Index(_) => "IndexExpr",
            Expr::Slice(_) => "SliceExpr",
            Expr::TypeAssert(_) => "TypeAssertExpr",
            Expr::Call(_) => "CallExpr",
            Expr::Star(_) => "StarExpr",
            Expr::Unary(_) => "UnaryExpr",
            Expr::Binary(_) => "BinaryExpr",
            Expr::KeyValue(_) => "KeyValueExpr",
            Expr::ArrayType(_) => "ArrayType",
            Expr::StructType(_) => "StructType",
            Expr::FuncType(_) => "FuncType",
            Expr::InterfaceType(_) => "InterfaceType",
            Expr::MapType(_) => "MapType",
            Expr::ChanType(_) => "ChanType",
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Expr::Bad(e) => e.from,
            Expr::Ident(e) => e.name_pos,
            Expr::Ellipsis(e) => e.ellipsis,
            Expr::BasicLit(e) => e.value_pos,
            Expr::FuncLit(e) => e.ty.pos(),
            Expr::CompositeLit(e) => e.ty.as_ref().map_or(e.lbrace, |t| t.pos()),
            Expr::Paren(e) => e.lparen,
            Expr::Selector(e) => e.x.pos(),
            Expr::Index(e) => e.x.pos(),
            Expr::Slice(e) => e.x.pos(),
            Expr::TypeAssert(e) => e.x.pos(),
            Expr::Call(e) => e.fun.pos(),
            Expr::Star(e) => e.star,
            Expr::Unary(e) => e.op_pos,
            Expr::Binary(e) => e.x.pos(),
            Expr::KeyValue(e) => e.key.pos(),
            Expr::ArrayType(e) => e.lbrack,
            Expr::StructType(e) => e.struct_pos,
            Expr::FuncType(e) => e.pos(),
            Expr::InterfaceType(e) => e.interface,
            Expr::MapType(e) => e.map,
            Expr::ChanType(e) => e.begin,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Expr::Bad(e) => e.to,
            Expr::Ident(e) => e.end(),
            Expr::Ellipsis(e) => e.elt.as_ref().map_or(e.ellipsis.advance(3), |t| t.end()),
            Expr::BasicLit(e) => e.end(),
            Expr::FuncLit(e) => e.body.end(),
            Expr::CompositeLit(e) => e.rbrace.advance(1),
            Expr::Paren(e) => e.rparen.advance(1),
            Expr::Selector(e) => e.sel.end(),
            Expr::Index(e) => e.rbrack.advance(1),
            Expr::Slice(e) => e.rbrack.advance(1),
            Expr::TypeAssert(e) => e.rparen.advance(1),
            Expr::Call(e) => e.rparen.advance(1),
            Expr::Star(e) => e.x.end(),
            Expr::Unary(e) => e.x.end(),
            Expr::Binary(e) => e.y.end(),
            Expr::KeyValue(e) => e.value.end(),
            Expr::ArrayType(e) => e.elt.end(),
            Expr::StructType(e) => e.fields.end(),
            Expr::FuncType(e) => e.end(),
            Expr::InterfaceType(e) => e.methods.end(),
            Expr::MapType(e) => e.value.end(),
            Expr::ChanType(e) => e.value.end(),
        }
    }
}

// =============================================================================
// STATEMENTS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct BadStmt {
    pub from: Pos,
    pub to: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclStmt {
    pub decl: Decl,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStmt {
    pub semicolon: Pos,
    pub implicit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStmt {
    pub label: Ident,
    pub colon: Pos,
    pub stmt: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub x: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendStmt {
    pub chan: Expr,
    pub arrow: Pos,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncDecStmt {
    pub x: Expr,
    pub tok_pos: Pos,
    pub tok: TokenKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub tok_pos: Pos,
    pub tok: TokenKind,
    pub rhs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoStmt {
    pub go: Pos,
    pub call: CallExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeferStmt {
    pub defer: Pos,
    pub call: CallExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub ret: Pos,
    pub results: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchStmt {
    pub tok_pos: Pos,
    pub tok: TokenKind,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStmt {
    pub lbrace: Pos,
    pub list: Vec<Stmt>,
    pub rbrace: Pos,
}

impl BlockStmt {
    pub fn end(&self) -> Pos {
        self.rbrace.advance(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub if_pos: Pos,
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: BlockStmt,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub case: Pos,
    pub list: Vec<Expr>,
    pub colon: Pos,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub switch: Pos,
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSwitchStmt {
    pub switch: Pos,
    pub init: Option<Box<Stmt>>,
    pub assign: Box<Stmt>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommClause {
    pub case: Pos,
    pub comm: Option<Box<Stmt>>,
    pub colon: Pos,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    pub select: Pos,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub for_pos: Pos,
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeStmt {
    pub for_pos: Pos,
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    pub tok_pos: Pos,
    pub tok: TokenKind,
    pub x: Expr,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Bad(BadStmt),
    Decl(Box<DeclStmt>),
    Empty(EmptyStmt),
    Labeled(LabeledStmt),
    Expr(ExprStmt),
    Send(SendStmt),
    IncDec(IncDecStmt),
    Assign(AssignStmt),
    Go(GoStmt),
    Defer(DeferStmt),
    Return(ReturnStmt),
    Branch(BranchStmt),
    Block(BlockStmt),
    If(IfStmt),
    CaseClause(CaseClause),
    Switch(SwitchStmt),
    TypeSwitch(TypeSwitchStmt),
    CommClause(CommClause),
    Select(SelectStmt),
    For(ForStmt),
    Range(RangeStmt),
}

impl Stmt {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Bad(_) => "BadStmt",
            Stmt::Decl(_) => "DeclStmt",
            Stmt::Empty(_) => "EmptyStmt",
            Stmt::Labeled(_) => "LabeledStmt",
            Stmt::Expr(_) => "ExprStmt",
            Stmt::Send(_) => "SendStmt",
            Stmt::IncDec(_) => "IncDecStmt",
            Stmt::Assign(_) => "AssignStmt",
            Stmt::Go(_) => "GoStmt",
            Stmt::Defer(_) => "DeferStmt",
            Stmt::Return(_) => "ReturnStmt",
            Stmt::Branch(_) => "BranchStmt",
            Stmt::Block(_) => "BlockStmt",
            Stmt::If(_) => "IfStmt",
            Stmt::CaseClause(_) => "CaseClause",
            Stmt::Switch(_) => "SwitchStmt",
            Stmt::TypeSwitch(_) => "TypeSwitchStmt",
            Stmt::CommClause(_) => "CommClause",
            Stmt::Select(_) => "SelectStmt",
            Stmt::For(_) => "ForStmt",
            Stmt::Range(_) => "RangeStmt",
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Stmt::Bad(s) => s.from,
            Stmt::Decl(s) => s.decl.pos(),
            Stmt::Empty(s) => s.semicolon,
            Stmt::Labeled(s) => s.label.name_pos,
            Stmt::Expr(s) => s.x.pos(),
            Stmt::Send(s) => s.chan.pos(),
            Stmt::IncDec(s) => s.x.pos(),
            Stmt::Assign(s) => s.lhs.first().map_or(s.tok_pos, Expr::pos),
            Stmt::Go(s) => s.go,
            Stmt::Defer(s) => s.defer,
            Stmt::Return(s) => s.ret,
            Stmt::Branch(s) => s.tok_pos,
            Stmt::Block(s) => s.lbrace,
            Stmt::If(s) => s.if_pos,
            Stmt::CaseClause(s) => s.case,
            Stmt::Switch(s) => s.switch,
            Stmt::TypeSwitch(s) => s.switch,
            Stmt::CommClause(s) => s.case,
            Stmt::Select(s) => s.select,
            Stmt::For(s) => s.for_pos,
            Stmt::Range(s) => s.for_pos,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Stmt::Bad(s) => s.to,
            Stmt::Decl(s) => s.decl.end(),
            Stmt::Empty(s) => {
                if s.implicit {
                    s.semicolon
                } else {
                    s.semicolon.advance(1)
                }
            }
            Stmt::Labeled(s) => s.stmt.end(),
            Stmt::Expr(s) => s.x.end(),
            Stmt::Send(s) => s.value.end(),
            Stmt::IncDec(s) => s.tok_pos.advance(2),
            Stmt::Assign(s) => s.rhs.last().map_or(s.tok_pos, Expr::end),
            Stmt::Go(s) => s.call.rparen.advance(1),
            Stmt::Defer(s) => s.call.rparen.advance(1),
            Stmt::Return(s) => s.results.last().map_or(s.ret.advance(6), Expr::end),
            Stmt::Branch(s) => s
                .label
                .as_ref()
                .map_or(s.tok_pos.advance(s.tok.display().len()), Ident::end),
            Stmt::Block(s) => s.end(),
            Stmt::If(s) => s.else_branch.as_ref().map_or(s.body.end(), |e| e.end()),
            Stmt::CaseClause(s) => s.body.last().map_or(s.colon.advance(1), Stmt::end),
            Stmt::Switch(s) => s.body.end(),
            Stmt::TypeSwitch(s) => s.body.end(),
            Stmt::CommClause(s) => s.body.last().map_or(s.colon.advance(1), Stmt::end),
            Stmt::Select(s) => s.body.end(),
            Stmt::For(s) => s.body.end(),
            Stmt::Range(s) => s.body.end(),
        }
    }
}

// =============================================================================
// DECLARATIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub doc: Option<CommentGroup>,
    pub name: Option<Ident>,
    pub path: BasicLit,
    pub comment: Option<CommentGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub doc: Option<CommentGroup>,
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub comment: Option<CommentGroup>,
}

impl ValueSpec {
    pub fn end(&self) -> Pos {
        self.values
            .last()
            .map(Expr::end)
            .or_else(|| self.ty.as_ref().map(Expr::end))
            .or_else(|| self.names.last().map(Ident::end))
            .unwrap_or(Pos::NONE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub doc: Option<CommentGroup>,
    pub name: Ident,
    pub assign: Pos,
    pub ty: Expr,
    pub comment: Option<CommentGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub fn pos(&self) -> Pos {
        match self {
            Spec::Import(s) => s.name.as_ref().map_or(s.path.value_pos, |n| n.name_pos),
            Spec::Value(s) => s.names.first().map_or(Pos::NONE, |n| n.name_pos),
            Spec::Type(s) => s.name.name_pos,
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Spec::Import(s) => s.path.end(),
            Spec::Value(s) => s.end(),
            Spec::Type(s) => s.ty.end(),
        }
    }

    pub fn doc(&self) -> Option<&CommentGroup> {
        match self {
            Spec::Import(s) => s.doc.as_ref(),
            Spec::Value(s) => s.doc.as_ref(),
            Spec::Type(s) => s.doc.as_ref(),
        }
    }

    pub fn comment(&self) -> Option<&CommentGroup> {
        match self {
            Spec::Import(s) => s.comment.as_ref(),
            Spec::Value(s) => s.comment.as_ref(),
            Spec::Type(s) => s.comment.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadDecl {
    pub from: Pos,
    pub to: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub doc: Option<CommentGroup>,
    pub tok_pos: Pos,
    pub tok: TokenKind,
    pub lparen: Pos,
    pub specs: Vec<Spec>,
    pub rparen: Pos,
}

impl GenDecl {
    pub fn end(&self) -> Pos {
        if self.rparen.is_valid() {
            return self.rparen.advance(1);
        }
        self.specs.last().map_or(self.tok_pos, Spec::end)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub doc: Option<CommentGroup>,
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    pub body: Option<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Bad(BadDecl),
    Gen(GenDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Decl::Bad(_) => "BadDecl",
            Decl::Gen(_) => "GenDecl",
            Decl::Func(_) => "FuncDecl",
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Decl::Bad(d) => d.from,
            Decl::Gen(d) => d.tok_pos,
            Decl::Func(d) => d.ty.pos(),
        }
    }

    pub fn end(&self) -> Pos {
        match self {
            Decl::Bad(d) => d.to,
            Decl::Gen(d) => d.end(),
            Decl::Func(d) => d.body.as_ref().map_or_else(|| d.ty.end(), BlockStmt::end),
        }
    }

    pub fn doc(&self) -> Option<&CommentGroup> {
        match self {
            Decl::Bad(_) => None,
            Decl::Gen(d) => d.doc.as_ref(),
            Decl::Func(d) => d.doc.as_ref(),
        }
    }
}

// =============================================================================
// FILE
// =============================================================================

/// A Go+ source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub doc: Option<CommentGroup>,
    pub package: Pos,
    pub name: Ident,
    pub decls: Vec<Decl>,
    pub imports: Vec<ImportSpec>,
    pub unresolved: Vec<Ident>,
    pub comments: Vec<CommentGroup>,
    /// Line starts of the source the positions refer to.
    pub lines: LineTable,
    /// Go+ scripts may omit the package clause; printers skip it then.
    pub no_pkg_decl: bool,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesized_ident_has_no_position() {
        let id = Ident::new("main");
        assert!(!id.name_pos.is_valid());
        assert!(id.obj.is_none());
        assert_eq!(id.end(), Pos::NONE);
    }

    #[test]
    fn test_object_equality_uses_payload_identity() {
        let payload: Arc<dyn Any + Send + Sync> = Arc::new(42u8);
        let mut a = Object::new(ObjKind::Var, "x");
        a.data = Some(payload.clone());
        let mut b = Object::new(ObjKind::Var, "x");
        b.data = Some(payload);
        assert_eq!(a, b);

        b.data = Some(Arc::new(42u8));
        assert_ne!(a, b);
    }

    #[test]
    fn test_object_debug_hides_payload() {
        let mut obj = Object::new(ObjKind::Fun, "f");
        obj.data = Some(Arc::new(String::from("secret")));
        let text = format!("{:?}", obj);
        assert!(text.contains("Fun"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_spec_end_prefers_values() {
        let spec = Spec::Value(ValueSpec {
            doc: None,
            names: vec![Ident::with_pos(Pos::from_offset(4), "a")],
            ty: Some(Expr::Ident(Ident::with_pos(Pos::from_offset(6), "int"))),
            values: vec![Expr::BasicLit(BasicLit {
                value_pos: Pos::from_offset(12),
                kind: LitKind::Int,
                value: "10".into(),
            })],
            comment: None,
        });
        assert_eq!(spec.pos(), Pos::from_offset(4));
        assert_eq!(spec.end(), Pos::from_offset(14));
    }
}
