// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! Expression nodes of the lossless tree.
//!
//! Every node carries `id`, `prefix`, and `markers` in addition to its
//! variant fields. Desugared forms are ordinary [`Call`]s distinguished only
//! by markers: operator applications (`MagicMethodDesugar`) and literal
//! constructions on `__builtins__` (`BuiltinDesugar`).

use crate::markers::Markers;
use crate::nodes::statement::Assign;
use crate::nodes::{Container, LeftPadded, NodeId, Padded, Space};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    /// Keyword argument (`a=1`) or `with`-resource binding.
    Assignment(Box<Assign<'a>>),
    Await(Box<Await<'a>>),
    Binary(Box<Binary<'a>>),
    Call(Box<Call<'a>>),
    /// List literal, or the bracketless payload of a builtin desugar.
    Collection(CollectionLiteral<'a>),
    Comprehension(Box<Comprehension<'a>>),
    Dict(DictLiteral<'a>),
    Empty(Empty<'a>),
    ErrorFrom(Box<ErrorFrom<'a>>),
    Identifier(Identifier<'a>),
    KeyValue(Box<KeyValue<'a>>),
    Literal(Literal<'a>),
    MatchCase(Box<MatchCaseExpr<'a>>),
    Paren(Box<Paren<'a>>),
    Pattern(Box<MatchPattern<'a>>),
    SpecialParam(SpecialParam<'a>),
    Subscript(Box<Subscript<'a>>),
    TypeHinted(Box<TypeHinted<'a>>),
    Unary(Box<Unary<'a>>),
    Yield(Box<Yield<'a>>),
}

impl<'a> Expr<'a> {
    pub fn prefix(&self) -> &Space<'a> {
        match self {
            Expr::Assignment(n) => &n.prefix,
            Expr::Await(n) => &n.prefix,
            Expr::Binary(n) => &n.prefix,
            Expr::Call(n) => &n.prefix,
            Expr::Collection(n) => &n.prefix,
            Expr::Comprehension(n) => &n.prefix,
            Expr::Dict(n) => &n.prefix,
            Expr::Empty(n) => &n.prefix,
            Expr::ErrorFrom(n) => &n.prefix,
            Expr::Identifier(n) => &n.prefix,
            Expr::KeyValue(n) => &n.prefix,
            Expr::Literal(n) => &n.prefix,
            Expr::MatchCase(n) => &n.prefix,
            Expr::Paren(n) => &n.prefix,
            Expr::Pattern(n) => &n.prefix,
            Expr::SpecialParam(n) => &n.prefix,
            Expr::Subscript(n) => &n.prefix,
            Expr::TypeHinted(n) => &n.prefix,
            Expr::Unary(n) => &n.prefix,
            Expr::Yield(n) => &n.prefix,
        }
    }

    pub fn set_prefix(&mut self, prefix: Space<'a>) {
        let slot = match self {
            Expr::Assignment(n) => &mut n.prefix,
            Expr::Await(n) => &mut n.prefix,
            Expr::Binary(n) => &mut n.prefix,
            Expr::Call(n) => &mut n.prefix,
            Expr::Collection(n) => &mut n.prefix,
            Expr::Comprehension(n) => &mut n.prefix,
            Expr::Dict(n) => &mut n.prefix,
            Expr::Empty(n) => &mut n.prefix,
            Expr::ErrorFrom(n) => &mut n.prefix,
            Expr::Identifier(n) => &mut n.prefix,
            Expr::KeyValue(n) => &mut n.prefix,
            Expr::Literal(n) => &mut n.prefix,
            Expr::MatchCase(n) => &mut n.prefix,
            Expr::Paren(n) => &mut n.prefix,
            Expr::Pattern(n) => &mut n.prefix,
            Expr::SpecialParam(n) => &mut n.prefix,
            Expr::Subscript(n) => &mut n.prefix,
            Expr::TypeHinted(n) => &mut n.prefix,
            Expr::Unary(n) => &mut n.prefix,
            Expr::Yield(n) => &mut n.prefix,
        };
        *slot = prefix;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub name: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    None,
}

/// A literal, keeping its exact source spelling. `source` is absent only for
/// synthesized literals (an `ImplicitNone` marker suppresses output).
#[derive(Debug, Clone, PartialEq)]
pub struct Literal<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub value: LiteralValue<'a>,
    pub source: Option<&'a str>,
}

/// Operators that keep binary form in the lossless tree. The remaining
/// Python operators (`in`, `not in`, `//`, `**`, `@`) desugar to magic-method
/// calls instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    NotEq,
    Is,
    IsNot,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    And,
    Or,
}

impl BinaryOp {
    /// The exact source spelling. Bijective with [`BinaryOp::from_spelling`]:
    /// printing a built tree reproduces the operator tokens byte-for-byte.
    pub fn spelling(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mult => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Is => "is",
            BinaryOp::IsNot => "is not",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    pub fn from_spelling(token: &str) -> Option<BinaryOp> {
        Some(match token {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mult,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::NotEq,
            "is" => BinaryOp::Is,
            "is not" => BinaryOp::IsNot,
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            "and" => BinaryOp::And,
            "or" => BinaryOp::Or,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub left: Expr<'a>,
    pub op: LeftPadded<'a, BinaryOp>,
    pub right: Expr<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Pos,
    Neg,
    Invert,
}

impl UnaryOp {
    pub fn spelling(self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Invert => "~",
        }
    }

    pub fn from_spelling(token: &str) -> Option<UnaryOp> {
        Some(match token {
            "not" => UnaryOp::Not,
            "+" => UnaryOp::Pos,
            "-" => UnaryOp::Neg,
            "~" => UnaryOp::Invert,
            _ => return None,
        })
    }
}

/// A unary application. When marked `MagicMethodDesugar` the operator must be
/// `Not` and the operand a `__contains__` call; the pair prints as `not in`.
#[derive(Debug, Clone, PartialEq)]
pub struct Unary<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub op: UnaryOp,
    pub expr: Expr<'a>,
}

/// A call. `select` is the receiver (`a` in `a.f(x)`); plain calls have none.
/// For `__call__` desugars the receiver is the callee expression and no name
/// or dot is printed; for `__contains__` the printed operand order reverses.
#[derive(Debug, Clone, PartialEq)]
pub struct Call<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub select: Option<Padded<'a, Expr<'a>>>,
    pub name: Identifier<'a>,
    pub args: Container<'a, Expr<'a>>,
}

/// A list literal, or the payload slot of a `set`/`tuple` builtin desugar.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionLiteral<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub elements: Container<'a, Expr<'a>>,
}

/// A dict literal. Empty dicts keep their interior run as
/// `ExtraPadding(EmptyInitializer)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DictLiteral<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub elements: Container<'a, Expr<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub key: Padded<'a, Expr<'a>>,
    pub value: Expr<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paren<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub expr: Padded<'a, Expr<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subscript<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub target: Expr<'a>,
    /// Space between the target and `[`.
    pub index_prefix: Space<'a>,
    pub index: Padded<'a, Expr<'a>>,
}

/// A zero-width placeholder. Holds the interior space of empty argument
/// lists, empty slice slots, and empty base lists; also stands in as the
/// synthetic statement after a trailing `;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Empty<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

impl ComprehensionKind {
    pub fn open(self) -> &'static str {
        match self {
            ComprehensionKind::List => "[",
            ComprehensionKind::Set | ComprehensionKind::Dict => "{",
            ComprehensionKind::Generator => "(",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            ComprehensionKind::List => "]",
            ComprehensionKind::Set | ComprehensionKind::Dict => "}",
            ComprehensionKind::Generator => ")",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub kind: ComprehensionKind,
    pub result: Expr<'a>,
    pub clauses: Vec<ComprehensionClause<'a>>,
    /// Space before the closing bracket.
    pub suffix: Space<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComprehensionClause<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub iterator: Expr<'a>,
    pub iterated: LeftPadded<'a, Expr<'a>>,
    pub conditions: Vec<ComprehensionCondition<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComprehensionCondition<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub expr: Expr<'a>,
}

/// `yield` / `yield from`. `from` holds the space before the `from` keyword
/// when present.
#[derive(Debug, Clone, PartialEq)]
pub struct Yield<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub from: Option<Space<'a>>,
    pub exprs: Vec<Padded<'a, Expr<'a>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Await<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub expr: Expr<'a>,
}

/// `raise X from Y`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorFrom<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub error: Expr<'a>,
    pub from: LeftPadded<'a, Expr<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHintKind {
    /// `: T`
    Variable,
    /// `-> T`
    Return,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeHint<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub kind: TypeHintKind,
    pub expr: Expr<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeHinted<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub expr: Expr<'a>,
    pub hint: TypeHint<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialParamKind {
    /// `*`
    Args,
    /// `**`
    Kwargs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialParam<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub kind: SpecialParamKind,
}

/// The twelve-plus-two structural `match` pattern kinds. Each kind fixes its
/// bracket pair and separator; children carry all interior spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    As,
    Capture,
    Class,
    DoubleStar,
    Group,
    KeyValue,
    Keyword,
    Literal,
    Mapping,
    Or,
    Sequence,
    Star,
    Value,
    Wildcard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchPattern<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub kind: PatternKind,
    pub children: Container<'a, Expr<'a>>,
}

/// One `case` arm's pattern expression with an optional `if` guard.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCaseExpr<'a> {
    pub id: NodeId,
    pub prefix: Space<'a>,
    pub markers: Markers<'a>,
    pub pattern: MatchPattern<'a>,
    pub guard: Option<LeftPadded<'a, Expr<'a>>>,
}

/// Operator spelling for a magic method name, for re-sugaring at print time.
pub fn magic_method_operator(name: &str) -> Option<&'static str> {
    Some(match name {
        "__eq__" => "==",
        "__ne__" => "!=",
        "__mod__" => "%",
        "__floordiv__" => "//",
        "__pow__" => "**",
        "__matmul__" => "@",
        "__contains__" => "in",
        _ => return None,
    })
}

/// Magic method name for operators the builder desugars.
pub fn magic_method_for_operator(op: &str) -> Option<&'static str> {
    Some(match op {
        "//" => "__floordiv__",
        "**" => "__pow__",
        "@" => "__matmul__",
        "in" | "not in" => "__contains__",
        _ => return None,
    })
}

/// `__contains__` prints its receiver on the right of the operator.
pub fn magic_method_reverses_operands(name: &str) -> bool {
    name == "__contains__"
}
