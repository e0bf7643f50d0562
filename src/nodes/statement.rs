// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! Statement nodes of the lossless tree.
//!
//! The space BETWEEN statements lives in the previous statement's
//! [`Padded::after`], never in the next statement's prefix; that is what lets
//! the printer decide `;` insertion by looking at its own output. Blocks and
//! the module carry a final `end` space for the trailing run.

use crate::markers::Markers;
use crate::nodes::expression::{Empty, Expr, Identifier, TypeHint};
use crate::nodes::{Container, LeftPadded, NodeId, Padded, Space};

/// The root of one built source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Module<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub statements: Vec<Padded<'a, Stmt<'a>>>,
    /// Trailing run after the last statement.
    pub eof: Space<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'a> {
    Assert(Assert<'a>),
    Assign(Assign<'a>),
    Block(Block<'a>),
    Break(Break<'a>),
    Case(Case<'a>),
    ClassDecl(ClassDecl<'a>),
    Continue(Continue<'a>),
    Del(Del<'a>),
    Empty(Empty<'a>),
    ExprStmt(ExprStmt<'a>),
    FnDecl(FnDecl<'a>),
    ForEach(ForEach<'a>),
    If(If<'a>),
    Import(Import<'a>),
    Match(Match<'a>),
    Pass(Pass<'a>),
    Raise(Raise<'a>),
    Return(Return<'a>),
    Try(Try<'a>),
    VariableScope(VariableScope<'a>),
    While(While<'a>),
}

impl<'a> Stmt<'a> {
    pub fn markers(&self) -> &Markers<'a> {
        match self {
            Stmt::Assert(n) => &n.markers,
            Stmt::Assign(n) => &n.markers,
            Stmt::Block(n) => &n.markers,
            Stmt::Break(n) => &n.markers,
            Stmt::Case(n) => &n.markers,
            Stmt::ClassDecl(n) => &n.markers,
            Stmt::Continue(n) => &n.markers,
            Stmt::Del(n) => &n.markers,
            Stmt::Empty(n) => &n.markers,
            Stmt::ExprStmt(n) => &n.markers,
            Stmt::FnDecl(n) => &n.markers,
            Stmt::ForEach(n) => &n.markers,
            Stmt::If(n) => &n.markers,
            Stmt::Import(n) => &n.markers,
            Stmt::Match(n) => &n.markers,
            Stmt::Pass(n) => &n.markers,
            Stmt::Raise(n) => &n.markers,
            Stmt::Return(n) => &n.markers,
            Stmt::Try(n) => &n.markers,
            Stmt::VariableScope(n) => &n.markers,
            Stmt::While(n) => &n.markers,
        }
    }
}

/// An `=` binding. Reused in three positions: assignment statement, keyword
/// argument (via [`Expr::Assignment`]), and `with` resource, where the
/// printer emits `value as target` using the same slots in reverse.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub target: Expr<'a>,
    pub value: LeftPadded<'a, Expr<'a>>,
}

/// A statement body. The builder leaves `prefix` empty and captures the
/// pre-colon run as `ExtraPadding(BeforeCompoundBlockColon)`; the printer
/// emits padding, `:`, prefix, statements, then `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub statements: Vec<Padded<'a, Stmt<'a>>>,
    pub end: Space<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub expr: Expr<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub expr: Option<Expr<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pass<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Break<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Continue<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
}

/// `if`/`elif`/`else`. An `elif` chain nests bottom-up: each `elif` clause is
/// an [`Else`] whose body is an `If` with an empty prefix, which the printer
/// renders as `el` + `if`.
#[derive(Debug, Clone, PartialEq)]
pub struct If<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub condition: Padded<'a, Expr<'a>>,
    pub then_part: Box<Padded<'a, Stmt<'a>>>,
    pub else_part: Option<Box<Else<'a>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Else<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub body: Padded<'a, Stmt<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub condition: Padded<'a, Expr<'a>>,
    pub body: Box<Padded<'a, Stmt<'a>>>,
}

/// Loop targets: one identifier or a comma-joined tuple of identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTargets<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub names: Vec<Padded<'a, Identifier<'a>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEach<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub target: Padded<'a, NamedTargets<'a>>,
    pub iterable: Padded<'a, Expr<'a>>,
    pub body: Box<Padded<'a, Stmt<'a>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decorator<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub name: Identifier<'a>,
    pub args: Option<Container<'a, Expr<'a>>>,
}

/// A class definition. The base list takes one of three shapes: no
/// parentheses in source (`OmitParentheses` on the container), empty
/// parentheses (single `Empty` slot holding the interior run), or a list of
/// identifier bases.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub decorators: Vec<Decorator<'a>>,
    /// Space before the `class` keyword (after decorators).
    pub kind_prefix: Space<'a>,
    pub name: Identifier<'a>,
    pub bases: Container<'a, Expr<'a>>,
    pub body: Block<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub decorators: Vec<Decorator<'a>>,
    /// Space before the `def` keyword (after decorators).
    pub def_prefix: Space<'a>,
    pub name: Identifier<'a>,
    pub params: Container<'a, Expr<'a>>,
    pub return_hint: Option<TypeHint<'a>>,
    pub body: Block<'a>,
}

/// One imported name. A multi-name import builds one `Import` per name,
/// linked by `GroupedStatement` markers; the statement prefix, module
/// spacing, and paren padding all live on the LAST member, where the group
/// renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Import<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    /// For `from m import a`: the module. For `import m`: the member itself
    /// (and `name.elem.name` is empty).
    pub module: Identifier<'a>,
    /// `before` = space before the `import` keyword; `elem` = the imported
    /// name with its own prefix.
    pub name: LeftPadded<'a, Identifier<'a>>,
    pub alias: Option<LeftPadded<'a, Identifier<'a>>>,
    /// Space before the `,` following this member. Empty on the final member,
    /// whose trailing run lives at statement level.
    pub after: Space<'a>,
}

impl Import<'_> {
    /// `import m` form, as opposed to `from m import a`.
    pub fn is_plain(&self) -> bool {
        self.name.elem.name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Raise<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub expr: Option<Expr<'a>>,
}

/// `try`/`except`/`finally` and `with` share one node. Non-empty `resources`
/// means `with`; each resource must be an [`Expr::Assignment`] printing
/// `value as target`. A trailing [`Stmt::Block`] inside `body` is the `else`
/// clause; its `Padded::after` is the space BEFORE the `else` keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct Try<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub resources: Option<Container<'a, Expr<'a>>>,
    pub body: Block<'a>,
    pub catches: Vec<Catch<'a>>,
    pub finally: Option<LeftPadded<'a, Block<'a>>>,
}

/// The expression after `except`. `is_group` prints `except*`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionType<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub is_group: bool,
    pub expr: Expr<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catch<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub except_type: Option<ExceptionType<'a>>,
    /// `before` = space before the `as` keyword.
    pub as_name: Option<LeftPadded<'a, Identifier<'a>>>,
    pub body: Block<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub selector: Padded<'a, Expr<'a>>,
    pub cases: Block<'a>,
}

/// One `case` arm. The keyword is omitted when the sole pattern expression is
/// the identifier `default`.
#[derive(Debug, Clone, PartialEq)]
pub struct Case<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub patterns: Container<'a, Expr<'a>>,
    pub body: Box<Padded<'a, Stmt<'a>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Del<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub targets: Vec<Padded<'a, Expr<'a>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Nonlocal,
}

impl ScopeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Nonlocal => "nonlocal",
        }
    }
}

/// `global` / `nonlocal`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableScope<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub kind: ScopeKind,
    pub names: Vec<Padded<'a, Identifier<'a>>>,
}

/// `assert expr` or `assert expr, message`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assert<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub exprs: Vec<Padded<'a, Expr<'a>>>,
}
