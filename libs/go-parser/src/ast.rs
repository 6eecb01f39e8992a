//! # Go Syntax Tree
//!
//! Node types produced by the parser, modelled on the shape of `go/ast`.
//! Every node keeps the positions needed to print it back with the same
//! line structure.
//!
//! ## Structure
//!
//! - [`File`]: package clause, declarations and comments of one file
//! - [`Decl`] / [`Spec`]: top-level declarations and grouped specs
//! - [`Expr`]: values and type expressions
//! - [`Stmt`]: statements inside function bodies
//!
//! ## Example
//!
//! ```rust
//! use go_parser::ast::{Expr, Ident};
//! use go_parser::span::Pos;
//!
//! let x = Expr::Ident(Ident::new(Pos::from_offset(0), "x"));
//! assert_eq!(x.kind_name(), "Ident");
//! assert_eq!(x.end(), Pos::from_offset(1));
//! ```

use crate::lexer::TokenKind;
use crate::span::{LineTable, Pos};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// COMMENTS
// =============================================================================

/// A single `//` or `/* */` comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Position of the leading `/`.
    pub slash: Pos,
    /// Comment text including the comment markers.
    pub text: String,
}

impl Comment {
    pub fn end(&self) -> Pos {
        self.slash.advance(self.text.len())
    }
}

/// Comments with no other tokens and no empty lines between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// What a declared name denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjKind {
    Bad,
    Pkg,
    Con,
    Typ,
    Var,
    Fun,
    Lbl,
}

impl ObjKind {
    pub fn display(&self) -> &'static str {
        match self {
            ObjKind::Bad => "bad",
            ObjKind::Pkg => "package",
            ObjKind::Con => "const",
            ObjKind::Typ => "type",
            ObjKind::Var => "var",
            ObjKind::Fun => "func",
            ObjKind::Lbl => "label",
        }
    }
}

/// A named language entity the resolver bound an identifier to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub kind: ObjKind,
    pub name: String,
    /// Position of the declaring identifier.
    pub decl: Pos,
}

impl Object {
    pub fn new(kind: ObjKind, name: &str, decl: Pos) -> Self {
        Self {
            kind,
            name: name.to_string(),
            decl,
        }
    }
}

/// An identifier, optionally bound to the object it denotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name_pos: Pos,
    pub name: String,
    pub obj: Option<Arc<Object>>,
}

impl Ident {
    /// Unbound identifier.
    pub fn new(name_pos: Pos, name: &str) -> Self {
        Self {
            name_pos,
            name: name.to_string(),
            obj: None,
        }
    }

    pub fn end(&self) -> Pos {
        self.name_pos.advance(self.name.len())
    }

    /// Whether the identifier starts with an upper-case letter.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().map_or(false, char::is_uppercase)
    }
}

// =============================================================================
// FIELDS
// =============================================================================

/// A parameter, result, struct field or interface method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub doc: Option<CommentGroup>,
    /// Empty for anonymous parameters and embedded fields.
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

/// Fields enclosed by parentheses or braces.
///
/// `opening` is [`Pos::NONE`] for a single unparenthesized result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
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

    /// Number of declared names; anonymous fields count once.
    pub fn num_fields(&self) -> usize {
        self.list.iter().map(|f| f.names.len().max(1)).sum()
    }
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

/// Literal class of a [`BasicLit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadExpr {
    pub from: Pos,
    pub to: Pos,
}

/// `...T` in parameter lists or `[...]T` array lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipsis {
    pub ellipsis: Pos,
    pub elt: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicLit {
    pub value_pos: Pos,
    pub kind: LitKind,
    /// Literal spelling, e.g. `42`, `"foo"` or `'a'`.
    pub value: String,
}

impl BasicLit {
    pub fn end(&self) -> Pos {
        self.value_pos.advance(self.value.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncLit {
    pub ty: FuncType,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeLit {
    pub ty: Option<Box<Expr>>,
    pub lbrace: Pos,
    pub elts: Vec<Expr>,
    pub rbrace: Pos,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenExpr {
    pub lparen: Pos,
    pub x: Box<Expr>,
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub lbrack: Pos,
    pub index: Box<Expr>,
    pub rbrack: Pos,
}

/// `x[low:high]` or `x[low:high:max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceExpr {
    pub x: Box<Expr>,
    pub lbrack: Pos,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub max: Option<Box<Expr>>,
    pub slice3: bool,
    pub rbrack: Pos,
}

/// `x.(T)`; `ty` is `None` for the `x.(type)` switch guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAssertExpr {
    pub x: Box<Expr>,
    pub lparen: Pos,
    pub ty: Option<Box<Expr>>,
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub lparen: Pos,
    pub args: Vec<Expr>,
    /// Position of `...` in a variadic call, else [`Pos::NONE`].
    pub ellipsis: Pos,
    pub rparen: Pos,
}

/// `*x`, either a dereference or a pointer type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarExpr {
    pub star: Pos,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op_pos: Pos,
    pub op: TokenKind,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op_pos: Pos,
    pub op: TokenKind,
    pub y: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueExpr {
    pub key: Box<Expr>,
    pub colon: Pos,
    pub value: Box<Expr>,
}

/// `[len]elt`, `[...]elt` or the slice type `[]elt` (`len` is `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayType {
    pub lbrack: Pos,
    pub len: Option<Box<Expr>>,
    pub elt: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructType {
    pub struct_pos: Pos,
    pub fields: FieldList,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncType {
    /// Position of `func`, [`Pos::NONE`] for method signatures.
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceType {
    pub interface: Pos,
    pub methods: FieldList,
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapType {
    pub map: Pos,
    pub key: Box<Expr>,
    pub value: Box<Expr>,
}

/// Direction of a channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChanType {
    /// Position of `chan` or of `<-` for receive-only channels.
    pub begin: Pos,
    /// Position of `<-`, [`Pos::NONE`] for bidirectional channels.
    pub arrow: Pos,
    pub dir: ChanDir,
    pub value: Box<Expr>,
}

/// Any expression or type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
    /// Concrete node kind, e.g. `BadExpr` or `CallExpr`.
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

    /// Position of the first character of the expression.
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

    /// Position just past the last character of the expression.
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadStmt {
    pub from: Pos,
    pub to: Pos,
}

/// A declaration inside a function body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclStmt {
    pub decl: Decl,
}

/// Explicit `;` or an empty statement implied by a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyStmt {
    pub semicolon: Pos,
    pub implicit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledStmt {
    pub label: Ident,
    pub colon: Pos,
    pub stmt: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub x: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendStmt {
    pub chan: Expr,
    pub arrow: Pos,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncDecStmt {
    pub x: Expr,
    pub tok_pos: Pos,
    pub tok: TokenKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub tok_pos: Pos,
    pub tok: TokenKind,
    pub rhs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoStmt {
    pub go: Pos,
    pub call: CallExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferStmt {
    pub defer: Pos,
    pub call: CallExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStmt {
    pub ret: Pos,
    pub results: Vec<Expr>,
}

/// `break`, `continue`, `goto` or `fallthrough`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchStmt {
    pub tok_pos: Pos,
    pub tok: TokenKind,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub if_pos: Pos,
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: BlockStmt,
    /// Either another `if` or a block.
    pub else_branch: Option<Box<Stmt>>,
}

/// `case x, y:` or `default:` (empty `list`) of an expression or type switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseClause {
    pub case: Pos,
    pub list: Vec<Expr>,
    pub colon: Pos,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStmt {
    pub switch: Pos,
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    /// Holds only [`Stmt::CaseClause`] entries.
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSwitchStmt {
    pub switch: Pos,
    pub init: Option<Box<Stmt>>,
    /// `x := y.(type)` or `y.(type)`.
    pub assign: Box<Stmt>,
    pub body: BlockStmt,
}

/// `case <comm>:` or `default:` (no `comm`) of a select statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommClause {
    pub case: Pos,
    pub comm: Option<Box<Stmt>>,
    pub colon: Pos,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStmt {
    pub select: Pos,
    /// Holds only [`Stmt::CommClause`] entries.
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    pub for_pos: Pos,
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: BlockStmt,
}

/// `for key, value := range x`; `tok` is `Illegal` when there is no key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeStmt {
    pub for_pos: Pos,
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    pub tok_pos: Pos,
    pub tok: TokenKind,
    pub x: Expr,
    pub body: BlockStmt,
}

/// Any statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
    /// Concrete node kind, e.g. `BadStmt` or `IfStmt`.
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    pub doc: Option<CommentGroup>,
    pub name: Option<Ident>,
    pub path: BasicLit,
    pub comment: Option<CommentGroup>,
}

/// One line of a `const` or `var` group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub doc: Option<CommentGroup>,
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub comment: Option<CommentGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub doc: Option<CommentGroup>,
    pub name: Ident,
    /// Position of `=` for alias declarations.
    pub assign: Pos,
    pub ty: Expr,
    pub comment: Option<CommentGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
            Spec::Value(s) => s
                .values
                .last()
                .map(Expr::end)
                .or_else(|| s.ty.as_ref().map(Expr::end))
                .or_else(|| s.names.last().map(Ident::end))
                .unwrap_or(Pos::NONE),
            Spec::Type(s) => s.ty.end(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadDecl {
    pub from: Pos,
    pub to: Pos,
}

/// `import`, `const`, `type` or `var` with one spec or a parenthesized group.
///
/// `lparen` is [`Pos::NONE`] for the ungrouped form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub doc: Option<CommentGroup>,
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    /// `None` for external (assembly) functions.
    pub body: Option<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Bad(BadDecl),
    Gen(GenDecl),
    Func(FuncDecl),
}

impl Decl {
    /// Concrete node kind, e.g. `GenDecl`.
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

    /// Leading doc comment, if any.
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

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub doc: Option<CommentGroup>,
    /// Position of the `package` keyword.
    pub package: Pos,
    pub name: Ident,
    pub decls: Vec<Decl>,
    /// Copies of every import spec in the file.
    pub imports: Vec<ImportSpec>,
    /// Identifiers the resolver could not bind within the file.
    pub unresolved: Vec<Ident>,
    /// All comment groups in source order.
    pub comments: Vec<CommentGroup>,
    /// Line starts of the source text.
    pub lines: LineTable,
}

impl File {
    /// Line (1-based) of a position in this file.
    pub fn line(&self, pos: Pos) -> usize {
        self.lines.line(pos)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(offset: usize, name: &str) -> Expr {
        Expr::Ident(Ident::new(Pos::from_offset(offset), name))
    }

    #[test]
    fn test_binary_span() {
        let expr = Expr::Binary(BinaryExpr {
            x: Box::new(ident(0, "a")),
            op_pos: Pos::from_offset(2),
            op: TokenKind::Add,
            y: Box::new(ident(4, "bc")),
        });
        assert_eq!(expr.pos(), Pos::from_offset(0));
        assert_eq!(expr.end(), Pos::from_offset(6));
        assert_eq!(expr.kind_name(), "BinaryExpr");
    }

    #[test]
    fn test_field_list_counts() {
        let field = |names: &[&str]| Field {
            doc: None,
            names: names.iter().map(|n| Ident::new(Pos::NONE, n)).collect(),
            ty: ident(0, "int"),
            tag: None,
            comment: None,
        };
        let list = FieldList {
            opening: Pos::NONE,
            list: vec![field(&["a", "b"]), field(&[])],
            closing: Pos::NONE,
        };
        assert_eq!(list.num_fields(), 3);
    }

    #[test]
    fn test_bad_nodes_report_kind() {
        let bad = Expr::Bad(BadExpr {
            from: Pos::NONE,
            to: Pos::NONE,
        });
        assert_eq!(bad.kind_name(), "BadExpr");
        let decl = Decl::Bad(BadDecl {
            from: Pos::NONE,
            to: Pos::NONE,
        });
        assert_eq!(decl.kind_name(), "BadDecl");
        assert!(decl.doc().is_none());
    }

    #[test]
    fn test_exported_ident() {
        assert!(Ident::new(Pos::NONE, "Println").is_exported());
        assert!(!Ident::new(Pos::NONE, "println").is_exported());
    }

    #[test]
    fn test_serde_roundtrip_keeps_binding() {
        let mut id = Ident::new(Pos::from_offset(3), "x");
        id.obj = Some(Arc::new(Object::new(ObjKind::Var, "x", Pos::from_offset(1))));
        let json = serde_json::to_string(&id).unwrap();
        let back: Ident = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
