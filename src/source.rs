// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! The concrete-parse-tree input contract.
//!
//! The builder does not parse Python. It consumes a [`SourceTree`] produced
//! by an external parser: an arena of categorized nodes whose leaves, read in
//! order, reconstruct the source text exactly. [`TreeBuilder`] is the
//! cursor-style constructor embedders (and this crate's tests) use; `finish`
//! fails unless every opened node was closed and the emitted leaves cover the
//! source byte-for-byte.
//!
//! Contract invariants the builder relies on:
//!
//! - Children are contiguous and in source order.
//! - Zero-width placeholder leaves may appear anywhere; space attribution
//!   skips them.
//! - `;` separators and the trivia between statements are siblings inside a
//!   statement list, never children of a statement. A comment on a
//!   statement's own line is a trailing child of that statement.

use serde::Serialize;
use thiserror::Error;

/// Node categories an external parser tags its tree with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Module,

    // Statements
    AssignmentStatement,
    BreakStatement,
    ContinueStatement,
    ExpressionStatement,
    PassStatement,
    ReturnStatement,
    IfStatement,
    IfClause,
    ElifClause,
    ElseClause,
    ForStatement,
    WhileStatement,
    ClassDefinition,
    FunctionDefinition,
    DecoratorList,
    Decorator,
    ParameterList,
    Parameter,
    ImportStatement,
    FromImportStatement,
    ImportElement,
    StatementList,

    // Expressions
    BinaryExpression,
    PrefixExpression,
    BooleanLiteral,
    NumericLiteral,
    StringLiteral,
    NoneLiteral,
    CallExpression,
    ArgumentList,
    KeywordArgument,
    ListLiteral,
    SetLiteral,
    DictLiteral,
    KeyValue,
    TupleExpression,
    ParenthesizedExpression,
    SubscriptionExpression,
    SliceExpression,
    ReferenceExpression,
    TargetExpression,

    // Tokens
    Identifier,
    Keyword,
    OperatorToken,
    Colon,
    Semicolon,
    Equals,
    Comma,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    At,

    // Trivia
    Whitespace,
    Comment,
    Placeholder,
}

impl Category {
    pub fn is_trivia(self) -> bool {
        matches!(self, Category::Whitespace | Category::Comment)
    }

    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Category::BinaryExpression
                | Category::PrefixExpression
                | Category::BooleanLiteral
                | Category::NumericLiteral
                | Category::StringLiteral
                | Category::NoneLiteral
                | Category::CallExpression
                | Category::KeywordArgument
                | Category::ListLiteral
                | Category::SetLiteral
                | Category::DictLiteral
                | Category::KeyValue
                | Category::TupleExpression
                | Category::ParenthesizedExpression
                | Category::SubscriptionExpression
                | Category::SliceExpression
                | Category::ReferenceExpression
                | Category::TargetExpression
        )
    }

    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Category::AssignmentStatement
                | Category::BreakStatement
                | Category::ContinueStatement
                | Category::ExpressionStatement
                | Category::PassStatement
                | Category::ReturnStatement
                | Category::IfStatement
                | Category::ForStatement
                | Category::WhileStatement
                | Category::ClassDefinition
                | Category::FunctionDefinition
                | Category::ImportStatement
                | Category::FromImportStatement
        )
    }
}

#[derive(Debug)]
struct RawNode {
    category: Category,
    start: usize,
    end: usize,
    parent: Option<usize>,
    pos_in_parent: usize,
    children: Vec<usize>,
}

/// An arena holding one concrete parse tree over borrowed source text.
#[derive(Debug)]
pub struct SourceTree<'a> {
    text: &'a str,
    nodes: Vec<RawNode>,
}

impl<'a> SourceTree<'a> {
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn root(&self) -> SourceNode<'_, 'a> {
        SourceNode { tree: self, idx: 0 }
    }
}

/// A copyable handle to one node of a [`SourceTree`].
#[derive(Clone, Copy)]
pub struct SourceNode<'t, 'a> {
    tree: &'t SourceTree<'a>,
    idx: usize,
}

impl<'t, 'a> SourceNode<'t, 'a> {
    fn raw(&self) -> &'t RawNode {
        &self.tree.nodes[self.idx]
    }

    pub fn category(&self) -> Category {
        self.raw().category
    }

    pub fn start(&self) -> usize {
        self.raw().start
    }

    pub fn end(&self) -> usize {
        self.raw().end
    }

    /// The exact source slice this node covers.
    pub fn text(&self) -> &'a str {
        &self.tree.text[self.raw().start..self.raw().end]
    }

    /// Zero-width leaves are invisible to space attribution.
    pub fn is_hidden(&self) -> bool {
        self.raw().start == self.raw().end
    }

    pub fn is_trivia(&self) -> bool {
        self.category().is_trivia()
    }

    pub fn tree(&self) -> &'t SourceTree<'a> {
        self.tree
    }

    pub fn parent(&self) -> Option<SourceNode<'t, 'a>> {
        self.raw().parent.map(|idx| SourceNode { tree: self.tree, idx })
    }

    pub fn children(&self) -> impl Iterator<Item = SourceNode<'t, 'a>> + '_ {
        let tree = self.tree;
        self.raw()
            .children
            .iter()
            .map(move |&idx| SourceNode { tree, idx })
    }

    pub fn child_count(&self) -> usize {
        self.raw().children.len()
    }

    /// First child with the given category.
    pub fn child_of(&self, category: Category) -> Option<SourceNode<'t, 'a>> {
        self.children().find(|c| c.category() == category)
    }

    pub fn children_of(&self, category: Category) -> Vec<SourceNode<'t, 'a>> {
        self.children().filter(|c| c.category() == category).collect()
    }

    /// First non-trivia child that is an expression.
    pub fn first_expression(&self) -> Option<SourceNode<'t, 'a>> {
        self.children().find(|c| c.category().is_expression())
    }

    pub fn expressions(&self) -> Vec<SourceNode<'t, 'a>> {
        self.children()
            .filter(|c| c.category().is_expression())
            .collect()
    }

    /// First keyword child whose text matches.
    pub fn keyword(&self, text: &str) -> Option<SourceNode<'t, 'a>> {
        self.children()
            .find(|c| c.category() == Category::Keyword && c.text() == text)
    }

    pub fn prev_sibling(&self) -> Option<SourceNode<'t, 'a>> {
        let raw = self.raw();
        let parent = &self.tree.nodes[raw.parent?];
        let pos = raw.pos_in_parent.checked_sub(1)?;
        Some(SourceNode {
            tree: self.tree,
            idx: parent.children[pos],
        })
    }

    pub fn next_sibling(&self) -> Option<SourceNode<'t, 'a>> {
        let raw = self.raw();
        let parent = &self.tree.nodes[raw.parent?];
        let idx = *parent.children.get(raw.pos_in_parent + 1)?;
        Some(SourceNode { tree: self.tree, idx })
    }
}

impl std::fmt::Debug for SourceNode<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceNode")
            .field("category", &self.category())
            .field("span", &(self.start()..self.end()))
            .field("text", &self.text())
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("token text {expected:?} does not match source at byte {offset}")]
    TokenMismatch { offset: usize, expected: String },
    #[error("{0} node(s) left open at finish")]
    UnclosedNodes(usize),
    #[error("close() called with no open node")]
    UnbalancedClose,
    #[error("leaves cover {consumed} of {total} source bytes")]
    IncompleteCoverage { consumed: usize, total: usize },
}

/// Cursor-style constructor for [`SourceTree`]s.
///
/// # Example
///
/// ```
/// use python_lst::source::{Category, TreeBuilder};
///
/// let mut b = TreeBuilder::new("pass\n");
/// b.open(Category::PassStatement);
/// b.token(Category::Keyword, "pass");
/// b.close();
/// b.ws("\n");
/// let tree = b.finish().unwrap();
/// assert_eq!(tree.root().text(), "pass\n");
/// ```
pub struct TreeBuilder<'a> {
    text: &'a str,
    pos: usize,
    nodes: Vec<RawNode>,
    stack: Vec<usize>,
    error: Option<TreeError>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(text: &'a str) -> Self {
        let root = RawNode {
            category: Category::Module,
            start: 0,
            end: 0,
            parent: None,
            pos_in_parent: 0,
            children: Vec::new(),
        };
        TreeBuilder {
            text,
            pos: 0,
            nodes: vec![root],
            stack: vec![0],
            error: None,
        }
    }

    fn attach(&mut self, category: Category, start: usize, end: usize) -> usize {
        let parent = *self.stack.last().unwrap_or(&0);
        let idx = self.nodes.len();
        let pos_in_parent = self.nodes[parent].children.len();
        self.nodes.push(RawNode {
            category,
            start,
            end,
            parent: Some(parent),
            pos_in_parent,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    /// Opens an interior node at the current cursor position.
    pub fn open(&mut self, category: Category) -> &mut Self {
        let idx = self.attach(category, self.pos, self.pos);
        self.stack.push(idx);
        self
    }

    /// Closes the innermost open node, fixing its end at the cursor.
    pub fn close(&mut self) -> &mut Self {
        if self.stack.len() <= 1 {
            self.error.get_or_insert(TreeError::UnbalancedClose);
            return self;
        }
        let idx = self.stack.pop().unwrap_or_default();
        self.nodes[idx].end = self.pos;
        self
    }

    /// Emits a leaf whose text must match the source at the cursor.
    pub fn token(&mut self, category: Category, text: &str) -> &mut Self {
        let end = self.pos + text.len();
        let matches = self
            .text
            .get(self.pos..end)
            .map(|s| s == text)
            .unwrap_or(false);
        if !matches {
            self.error.get_or_insert(TreeError::TokenMismatch {
                offset: self.pos,
                expected: text.to_string(),
            });
            return self;
        }
        self.attach(category, self.pos, end);
        self.pos = end;
        self
    }

    pub fn ws(&mut self, text: &str) -> &mut Self {
        self.token(Category::Whitespace, text)
    }

    pub fn comment(&mut self, text: &str) -> &mut Self {
        self.token(Category::Comment, text)
    }

    /// Emits a zero-width placeholder leaf.
    pub fn placeholder(&mut self, category: Category) -> &mut Self {
        self.attach(category, self.pos, self.pos);
        self
    }

    pub fn finish(mut self) -> std::result::Result<SourceTree<'a>, TreeError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.stack.len() != 1 {
            return Err(TreeError::UnclosedNodes(self.stack.len() - 1));
        }
        if self.pos != self.text.len() {
            return Err(TreeError::IncompleteCoverage {
                consumed: self.pos,
                total: self.text.len(),
            });
        }
        self.nodes[0].end = self.text.len();
        Ok(SourceTree {
            text: self.text,
            nodes: self.nodes,
        })
    }
}
