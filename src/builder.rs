// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! The builder: concrete parse tree in, lossless tree out.
//!
//! Space attribution is the heart of it. `space_before`/`space_after` collect
//! the maximal trivia run adjacent to a node among its siblings, skipping
//! zero-width leaves; `trailing_space` collects the run at a node's own tail.
//! Every run is attributed exactly once.
//!
//! Statement lists run through a small state machine so that the printer's
//! separator rule reproduces semicolons: the run after a statement goes into
//! that statement's `Padded::after`, the run after a `;` becomes the next
//! statement's prefix, and a trailing `;` synthesizes a trailing `Empty`
//! statement.
//!
//! Unsupported STATEMENTS degrade: a diagnostic is recorded, a warning is
//! logged, and building continues. Unsupported expressions propagate until
//! the enclosing statement is skipped the same way.

use std::borrow::Cow;

use crate::error::{Diagnostic, Error, Result};
use crate::markers::{GroupId, Marker, Markers, PaddingLocation};
use crate::nodes::expression::{
    magic_method_for_operator, magic_method_reverses_operands, Binary, BinaryOp, Call,
    CollectionLiteral, DictLiteral, Empty, Expr, Identifier, KeyValue, Literal, LiteralValue,
    Paren, Subscript, Unary, UnaryOp,
};
use crate::nodes::statement::{
    Assign, Block, Break, ClassDecl, Continue, Decorator, Else, ExprStmt, FnDecl, ForEach, If,
    Import, Module, NamedTargets, Pass, Return, Stmt, While,
};
use crate::nodes::{Comment, Container, LeftPadded, NodeIdGenerator, Padded, Space};
use crate::source::{Category, SourceNode, SourceTree};

/// Maps one concrete tree to a lossless [`Module`], accumulating skip
/// diagnostics along the way.
#[derive(Debug, Default)]
pub struct Builder {
    ids: NodeIdGenerator,
    groups: u32,
    diagnostics: Vec<Diagnostic>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<'a>(&mut self, tree: &SourceTree<'a>) -> Result<Module<'a>> {
        self.ids.reset();
        self.diagnostics.clear();
        let root = tree.root();
        let id = self.ids.next_id();
        let children: Vec<_> = root.children().collect();
        let (statements, eof) = self.statement_list(&children)?;
        Ok(Module {
            id,
            prefix: Space::empty(),
            markers: Markers::empty(),
            statements,
            eof,
        })
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn next_group(&mut self) -> GroupId {
        let id = GroupId(self.groups);
        self.groups += 1;
        id
    }

    // ------------------------------------------------------------------
    // Statement lists
    // ------------------------------------------------------------------

    fn statement_list<'a>(
        &mut self,
        children: &[SourceNode<'_, 'a>],
    ) -> Result<(Vec<Padded<'a, Stmt<'a>>>, Space<'a>)> {
        let mut stmts: Vec<Padded<'a, Stmt<'a>>> = Vec::new();
        let mut run: Vec<SourceNode<'_, 'a>> = Vec::new();
        let mut semi_open = false;

        for child in children {
            match child.category() {
                Category::Whitespace | Category::Comment => run.push(*child),
                _ if child.is_hidden() => {}
                Category::Semicolon => {
                    let run_space = merge_trivia(&run)?;
                    run.clear();
                    if semi_open || stmts.is_empty() {
                        // `;;` or a leading `;`: an empty statement sits here.
                        stmts.push(Padded::bare(Stmt::Empty(Empty {
                            id: self.ids.next_id(),
                            prefix: run_space,
                            markers: Markers::empty(),
                        })));
                    } else if let Some(prev) = stmts.last_mut() {
                        let after = std::mem::take(&mut prev.after);
                        prev.after = after.concat(run_space);
                    }
                    semi_open = true;
                }
                cat if cat.is_statement() => {
                    let run_space = merge_trivia(&run)?;
                    run.clear();
                    let prefix = if semi_open || stmts.is_empty() {
                        run_space
                    } else {
                        // Inter-statement runs belong to the previous
                        // statement, so the separator rule sees them.
                        if let Some(prev) = stmts.last_mut() {
                            let after = std::mem::take(&mut prev.after);
                            prev.after = after.concat(run_space);
                        }
                        Space::empty()
                    };
                    semi_open = false;
                    match self.statement(*child, prefix) {
                        Ok(mapped) => {
                            let tail = trailing_space(*child)?;
                            let count = mapped.len();
                            for (k, stmt) in mapped.into_iter().enumerate() {
                                let after = if k + 1 == count {
                                    tail.clone()
                                } else {
                                    Space::empty()
                                };
                                stmts.push(Padded::new(stmt, after));
                            }
                        }
                        Err(Error::UnsupportedConstruct { message, span }) => {
                            let (start, end) = span.unwrap_or((child.start(), child.end()));
                            tracing::warn!(start, end, "skipping statement: {message}");
                            self.diagnostics.push(Diagnostic { message, start, end });
                        }
                        Err(fatal) => return Err(fatal),
                    }
                }
                other => {
                    // The run around a skipped node is dropped with it; runs
                    // are only merged across trivia siblings.
                    run.clear();
                    let message = format!("unexpected {other:?} in statement position");
                    tracing::warn!(start = child.start(), end = child.end(), "{message}");
                    self.diagnostics.push(Diagnostic {
                        message,
                        start: child.start(),
                        end: child.end(),
                    });
                }
            }
        }

        let run_space = merge_trivia(&run)?;
        if semi_open {
            // A trailing `;` closes the list with an empty statement that
            // owns whatever follows it.
            stmts.push(Padded::bare(Stmt::Empty(Empty {
                id: self.ids.next_id(),
                prefix: run_space,
                markers: Markers::empty(),
            })));
            Ok((stmts, Space::empty()))
        } else {
            Ok((stmts, run_space))
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn statement<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        prefix: Space<'a>,
    ) -> Result<Vec<Stmt<'a>>> {
        match node.category() {
            Category::ExpressionStatement => self.expr_statement(node, prefix).map(single),
            Category::AssignmentStatement => self.assignment(node, prefix).map(single),
            Category::ReturnStatement => self.return_statement(node, prefix).map(single),
            Category::PassStatement => Ok(vec![Stmt::Pass(Pass {
                id: self.ids.next_id(),
                prefix,
                markers: Markers::empty(),
            })]),
            Category::BreakStatement => Ok(vec![Stmt::Break(Break {
                id: self.ids.next_id(),
                prefix,
                markers: Markers::empty(),
            })]),
            Category::ContinueStatement => Ok(vec![Stmt::Continue(Continue {
                id: self.ids.next_id(),
                prefix,
                markers: Markers::empty(),
            })]),
            Category::IfStatement => self.if_statement(node, prefix).map(single),
            Category::WhileStatement => self.while_statement(node, prefix).map(single),
            Category::ForStatement => self.for_statement(node, prefix).map(single),
            Category::ClassDefinition => self.class_definition(node, prefix).map(single),
            Category::FunctionDefinition => self.function_definition(node, prefix).map(single),
            Category::ImportStatement => self.plain_import(node, prefix),
            Category::FromImportStatement => self.from_import(node, prefix),
            other => Err(unsupported(
                format!("unhandled statement of category {other:?}"),
                node,
            )),
        }
    }

    fn expr_statement<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        prefix: Space<'a>,
    ) -> Result<Stmt<'a>> {
        let id = self.ids.next_id();
        let expr_node = first_expression(node)?;
        Ok(Stmt::ExprStmt(ExprStmt {
            id,
            prefix,
            markers: Markers::empty(),
            expr: self.expression(expr_node)?,
        }))
    }

    fn assignment<'a>(&mut self, node: SourceNode<'_, 'a>, prefix: Space<'a>) -> Result<Stmt<'a>> {
        let id = self.ids.next_id();
        let exprs = node.expressions();
        let (lhs, rhs) = match (exprs.first(), exprs.get(1)) {
            (Some(lhs), Some(rhs)) => (*lhs, *rhs),
            _ => {
                return Err(Error::StructuralPrecondition(
                    "assignment statement needs a target and a value".to_string(),
                ))
            }
        };
        let target = self.expression(lhs)?;
        if !matches!(target, Expr::Identifier(_)) {
            return Err(unsupported(
                "assignment target is not a simple name".to_string(),
                node,
            ));
        }
        let eq = require(node, Category::Equals)?;
        Ok(Stmt::Assign(Assign {
            id,
            prefix,
            markers: Markers::empty(),
            target,
            value: LeftPadded::new(space_before(eq)?, self.expression(rhs)?),
        }))
    }

    fn return_statement<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        prefix: Space<'a>,
    ) -> Result<Stmt<'a>> {
        let id = self.ids.next_id();
        let expr = match node.first_expression() {
            Some(expr_node) => Some(self.expression(expr_node)?),
            None => None,
        };
        Ok(Stmt::Return(Return {
            id,
            prefix,
            markers: Markers::empty(),
            expr,
        }))
    }

    fn if_statement<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        prefix: Space<'a>,
    ) -> Result<Stmt<'a>> {
        let id = self.ids.next_id();
        let if_clause = require(node, Category::IfClause)?;
        let condition = Padded::bare(self.expression(first_expression(if_clause)?)?);
        let body = self.compound_block(if_clause)?;
        let elifs = node.children_of(Category::ElifClause);
        let else_clause = node.child_of(Category::ElseClause);
        let else_part = self.else_chain(&elifs, else_clause)?;
        Ok(Stmt::If(If {
            id,
            prefix,
            markers: Markers::empty(),
            condition,
            then_part: Box::new(Padded::bare(Stmt::Block(body))),
            else_part,
        }))
    }

    /// Nests a flat `elif` chain bottom-up: each clause becomes an `Else`
    /// holding an `If` with an empty prefix, which prints as `elif`.
    fn else_chain<'a>(
        &mut self,
        elifs: &[SourceNode<'_, 'a>],
        else_clause: Option<SourceNode<'_, 'a>>,
    ) -> Result<Option<Box<Else<'a>>>> {
        if let Some((clause, rest)) = elifs.split_first() {
            let else_id = self.ids.next_id();
            let clause_prefix = space_before(*clause)?;
            let if_id = self.ids.next_id();
            let condition = Padded::bare(self.expression(first_expression(*clause)?)?);
            let body = self.compound_block(*clause)?;
            let nested_else = self.else_chain(rest, else_clause)?;
            let nested = If {
                id: if_id,
                prefix: Space::empty(),
                markers: Markers::empty(),
                condition,
                then_part: Box::new(Padded::bare(Stmt::Block(body))),
                else_part: nested_else,
            };
            return Ok(Some(Box::new(Else {
                id: else_id,
                prefix: clause_prefix,
                markers: Markers::empty(),
                body: Padded::bare(Stmt::If(nested)),
            })));
        }
        match else_clause {
            Some(clause) => {
                let id = self.ids.next_id();
                let clause_prefix = space_before(clause)?;
                let body = self.compound_block(clause)?;
                Ok(Some(Box::new(Else {
                    id,
                    prefix: clause_prefix,
                    markers: Markers::empty(),
                    body: Padded::bare(Stmt::Block(body)),
                })))
            }
            None => Ok(None),
        }
    }

    /// Maps the `:` and statement list of a compound statement (or clause).
    /// The pre-colon run becomes padding on the block; the block prefix stays
    /// empty.
    fn compound_block<'a>(&mut self, container: SourceNode<'_, 'a>) -> Result<Block<'a>> {
        let id = self.ids.next_id();
        let colon = require(container, Category::Colon)?;
        let pre_colon = space_before(colon)?;
        let list = require(container, Category::StatementList)?;
        let children: Vec<_> = list.children().collect();
        let (statements, end) = self.statement_list(&children)?;
        let mut markers = Markers::empty();
        markers.set_extra_padding(PaddingLocation::BeforeCompoundBlockColon, pre_colon);
        Ok(Block {
            id,
            prefix: Space::empty(),
            markers,
            statements,
            end,
        })
    }

    fn while_statement<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        prefix: Space<'a>,
    ) -> Result<Stmt<'a>> {
        let id = self.ids.next_id();
        let condition = Padded::bare(self.expression(first_expression(node)?)?);
        let body = self.compound_block(node)?;
        Ok(Stmt::While(While {
            id,
            prefix,
            markers: Markers::empty(),
            condition,
            body: Box::new(Padded::bare(Stmt::Block(body))),
        }))
    }

    fn for_statement<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        prefix: Space<'a>,
    ) -> Result<Stmt<'a>> {
        let id = self.ids.next_id();
        let exprs = node.expressions();
        let (target_node, iterable_node) = match (exprs.first(), exprs.get(1)) {
            (Some(t), Some(i)) => (*t, *i),
            _ => {
                return Err(Error::StructuralPrecondition(
                    "for statement needs a target and an iterable".to_string(),
                ))
            }
        };
        let target = self.loop_targets(target_node)?;
        let target_after = space_after(target_node)?;
        let iterable = Padded::bare(self.expression(iterable_node)?);
        let body = self.compound_block(node)?;
        Ok(Stmt::ForEach(ForEach {
            id,
            prefix,
            markers: Markers::empty(),
            target: Padded::new(target, target_after),
            iterable,
            body: Box::new(Padded::bare(Stmt::Block(body))),
        }))
    }

    fn loop_targets<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<NamedTargets<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        match node.category() {
            Category::TargetExpression | Category::ReferenceExpression => Ok(NamedTargets {
                id,
                prefix: node_prefix,
                markers: Markers::empty(),
                names: vec![Padded::bare(Identifier {
                    id: self.ids.next_id(),
                    prefix: Space::empty(),
                    markers: Markers::empty(),
                    name: node.text(),
                })],
            }),
            Category::TupleExpression => {
                let mut names = Vec::new();
                for element in node.expressions() {
                    if !matches!(
                        element.category(),
                        Category::TargetExpression | Category::ReferenceExpression
                    ) {
                        return Err(unsupported(
                            "loop target is not a simple name".to_string(),
                            element,
                        ));
                    }
                    names.push(Padded::new(
                        Identifier {
                            id: self.ids.next_id(),
                            prefix: space_before(element)?,
                            markers: Markers::empty(),
                            name: element.text(),
                        },
                        space_after(element)?,
                    ));
                }
                Ok(NamedTargets {
                    id,
                    prefix: node_prefix,
                    markers: Markers::empty(),
                    names,
                })
            }
            other => Err(unsupported(
                format!("unhandled loop target of category {other:?}"),
                node,
            )),
        }
    }

    fn class_definition<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        prefix: Space<'a>,
    ) -> Result<Stmt<'a>> {
        let id = self.ids.next_id();
        let decorators = match node.child_of(Category::DecoratorList) {
            Some(list) => self.decorators(list)?,
            None => Vec::new(),
        };
        let class_kw = node.keyword("class").ok_or_else(|| {
            Error::StructuralPrecondition("class definition has no `class` keyword".to_string())
        })?;
        let kind_prefix = space_before(class_kw)?;
        let name_tok = require(node, Category::Identifier)?;
        let name = Identifier {
            id: self.ids.next_id(),
            prefix: space_before(name_tok)?,
            markers: Markers::empty(),
            name: name_tok.text(),
        };
        let bases = self.class_bases(node)?;
        let body = self.compound_block(node)?;
        Ok(Stmt::ClassDecl(ClassDecl {
            id,
            prefix,
            markers: Markers::empty(),
            decorators,
            kind_prefix,
            name,
            bases,
            body,
        }))
    }

    /// Base lists come in three shapes: absent parentheses, empty
    /// parentheses, and a list of names. Non-name bases are a hard error.
    fn class_bases<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Container<'a, Expr<'a>>> {
        let arglist = match node.child_of(Category::ArgumentList) {
            None => {
                let mut container = Container::bare(Vec::new());
                container.markers.add(Marker::OmitParentheses);
                return Ok(container);
            }
            Some(arglist) => arglist,
        };
        let before = space_before(arglist)?;
        let bases = arglist.expressions();
        if bases.is_empty() {
            let rparen = require(arglist, Category::RightParen)?;
            let empty = Expr::Empty(Empty {
                id: self.ids.next_id(),
                prefix: space_before(rparen)?,
                markers: Markers::empty(),
            });
            return Ok(Container::new(before, vec![Padded::bare(empty)]));
        }
        let mut elems = Vec::with_capacity(bases.len());
        for base in bases {
            if base.category() != Category::ReferenceExpression {
                return Err(Error::StructuralPrecondition(format!(
                    "class base is not a simple name: {:?}",
                    base.category()
                )));
            }
            elems.push(Padded::new(
                Expr::Identifier(Identifier {
                    id: self.ids.next_id(),
                    prefix: space_before(base)?,
                    markers: Markers::empty(),
                    name: base.text(),
                }),
                space_after(base)?,
            ));
        }
        Ok(Container::new(before, elems))
    }

    fn function_definition<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        prefix: Space<'a>,
    ) -> Result<Stmt<'a>> {
        let id = self.ids.next_id();
        let decorators = match node.child_of(Category::DecoratorList) {
            Some(list) => self.decorators(list)?,
            None => Vec::new(),
        };
        let def_kw = node.keyword("def").ok_or_else(|| {
            Error::StructuralPrecondition("function definition has no `def` keyword".to_string())
        })?;
        let def_prefix = space_before(def_kw)?;
        let name_tok = require(node, Category::Identifier)?;
        let name = Identifier {
            id: self.ids.next_id(),
            prefix: space_before(name_tok)?,
            markers: Markers::empty(),
            name: name_tok.text(),
        };
        let params_node = require(node, Category::ParameterList)?;
        let params = self.parameter_list(params_node)?;
        let body = self.compound_block(node)?;
        Ok(Stmt::FnDecl(FnDecl {
            id,
            prefix,
            markers: Markers::empty(),
            decorators,
            def_prefix,
            name,
            params,
            return_hint: None,
            body,
        }))
    }

    fn parameter_list<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Container<'a, Expr<'a>>> {
        let before = space_before(node)?;
        let params = node.children_of(Category::Parameter);
        if params.is_empty() {
            let rparen = require(node, Category::RightParen)?;
            let empty = Expr::Empty(Empty {
                id: self.ids.next_id(),
                prefix: space_before(rparen)?,
                markers: Markers::empty(),
            });
            return Ok(Container::new(before, vec![Padded::bare(empty)]));
        }
        let mut elems = Vec::with_capacity(params.len());
        for param in params {
            elems.push(Padded::new(self.parameter(param)?, space_after(param)?));
        }
        Ok(Container::new(before, elems))
    }

    fn parameter<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let name_tok = require(node, Category::Identifier)?;
        match node.child_of(Category::Equals) {
            // A defaulted parameter is an assignment, like a keyword argument.
            Some(eq) => {
                let value_node = first_expression(node)?;
                Ok(Expr::Assignment(Box::new(Assign {
                    id,
                    prefix: node_prefix,
                    markers: Markers::empty(),
                    target: Expr::Identifier(Identifier {
                        id: self.ids.next_id(),
                        prefix: Space::empty(),
                        markers: Markers::empty(),
                        name: name_tok.text(),
                    }),
                    value: LeftPadded::new(space_before(eq)?, self.expression(value_node)?),
                })))
            }
            None => Ok(Expr::Identifier(Identifier {
                id,
                prefix: node_prefix,
                markers: Markers::empty(),
                name: name_tok.text(),
            })),
        }
    }

    fn decorators<'a>(&mut self, list: SourceNode<'_, 'a>) -> Result<Vec<Decorator<'a>>> {
        let mut out = Vec::new();
        for node in list.children_of(Category::Decorator) {
            let id = self.ids.next_id();
            let node_prefix = space_before(node)?;
            let name_tok = require(node, Category::Identifier)?;
            let name = Identifier {
                id: self.ids.next_id(),
                prefix: space_before(name_tok)?,
                markers: Markers::empty(),
                name: name_tok.text(),
            };
            let args = match node.child_of(Category::ArgumentList) {
                Some(arglist) => Some(self.argument_list(arglist)?),
                None => None,
            };
            out.push(Decorator {
                id,
                prefix: node_prefix,
                markers: Markers::empty(),
                name,
                args,
            });
        }
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Imports
    // ------------------------------------------------------------------

    fn plain_import<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        prefix: Space<'a>,
    ) -> Result<Vec<Stmt<'a>>> {
        let elements = node.children_of(Category::ImportElement);
        if elements.is_empty() {
            return Err(Error::StructuralPrecondition(
                "import statement has no imported names".to_string(),
            ));
        }
        let group = (elements.len() > 1).then(|| self.next_group());
        let count = elements.len();
        let mut stmt_prefix = Some(prefix);
        let mut out = Vec::with_capacity(count);
        for (i, element) in elements.iter().enumerate() {
            let last = i + 1 == count;
            let id = self.ids.next_id();
            let mut markers = Markers::empty();
            if let Some(g) = group {
                markers.add(Marker::GroupedStatement { group: g });
            }
            let (name_tok, alias) = self.import_element(*element)?;
            out.push(Stmt::Import(Import {
                id,
                prefix: if last {
                    stmt_prefix.take().unwrap_or_default()
                } else {
                    Space::empty()
                },
                markers,
                module: Identifier {
                    id: self.ids.next_id(),
                    prefix: space_before(*element)?,
                    markers: Markers::empty(),
                    name: name_tok.text(),
                },
                name: LeftPadded::bare(Identifier {
                    id: self.ids.next_id(),
                    prefix: Space::empty(),
                    markers: Markers::empty(),
                    name: "",
                }),
                alias,
                after: if last {
                    Space::empty()
                } else {
                    space_after(*element)?
                },
            }));
        }
        Ok(out)
    }

    fn from_import<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        prefix: Space<'a>,
    ) -> Result<Vec<Stmt<'a>>> {
        let module_node = require(node, Category::ReferenceExpression)?;
        let elements = node.children_of(Category::ImportElement);
        if elements.is_empty() {
            return Err(Error::StructuralPrecondition(
                "from-import has no imported names".to_string(),
            ));
        }
        let group = (elements.len() > 1).then(|| self.next_group());
        // Parentheses are kept only when something inside them needs parens:
        // a newline or a comment. Single-line parentheses are not reproduced;
        // their leading space folds into the first name's prefix.
        let mut paren_padding = None;
        let mut fold_open = None;
        if let (Some(lparen), Some(rparen)) = (
            node.child_of(Category::LeftParen),
            node.child_of(Category::RightParen),
        ) {
            let interior = &node.tree().text()[lparen.end()..rparen.start()];
            if interior.contains('\n') || interior.contains('#') {
                paren_padding = Some((space_before(lparen)?, space_before(rparen)?));
            } else {
                fold_open = Some(space_before(lparen)?);
            }
        }
        let count = elements.len();
        let mut stmt_prefix = Some(prefix);
        let mut out = Vec::with_capacity(count);
        for (i, element) in elements.iter().enumerate() {
            let last = i + 1 == count;
            let id = self.ids.next_id();
            let mut markers = Markers::empty();
            if let Some(g) = group {
                markers.add(Marker::GroupedStatement { group: g });
            }
            if last {
                // Added directly, not via set_extra_padding: the markers'
                // presence is what tells the printer the source had parens,
                // even when the captured spaces equal the defaults.
                if let Some((open, close)) = paren_padding.clone() {
                    markers.add(Marker::ExtraPadding {
                        location: PaddingLocation::ImportParensPrefix,
                        space: open,
                    });
                    markers.add(Marker::ExtraPadding {
                        location: PaddingLocation::ImportParensSuffix,
                        space: close,
                    });
                }
            }
            let (name_tok, alias) = self.import_element(*element)?;
            let mut elem_prefix = space_before(*element)?;
            if i == 0 {
                if let Some(open) = fold_open.take() {
                    elem_prefix = open.concat(elem_prefix);
                }
            }
            out.push(Stmt::Import(Import {
                id,
                prefix: if last {
                    stmt_prefix.take().unwrap_or_default()
                } else {
                    Space::empty()
                },
                markers,
                module: Identifier {
                    id: self.ids.next_id(),
                    prefix: if last {
                        space_before(module_node)?
                    } else {
                        Space::empty()
                    },
                    markers: Markers::empty(),
                    name: module_node.text(),
                },
                name: LeftPadded::new(
                    if last {
                        space_after(module_node)?
                    } else {
                        Space::empty()
                    },
                    Identifier {
                        id: self.ids.next_id(),
                        prefix: elem_prefix,
                        markers: Markers::empty(),
                        name: name_tok.text(),
                    },
                ),
                alias,
                after: if last {
                    Space::empty()
                } else {
                    space_after(*element)?
                },
            }));
        }
        Ok(out)
    }

    #[allow(clippy::type_complexity)]
    fn import_element<'t, 'a>(
        &mut self,
        element: SourceNode<'t, 'a>,
    ) -> Result<(SourceNode<'t, 'a>, Option<LeftPadded<'a, Identifier<'a>>>)> {
        let name_tok = element
            .children()
            .find(|c| {
                matches!(
                    c.category(),
                    Category::Identifier | Category::ReferenceExpression
                )
            })
            .ok_or_else(|| {
                Error::StructuralPrecondition("import element has no name".to_string())
            })?;
        let alias = match element.keyword("as") {
            Some(as_kw) => {
                let alias_tok = element
                    .children()
                    .find(|c| c.category() == Category::Identifier && c.start() >= as_kw.end())
                    .ok_or_else(|| {
                        Error::StructuralPrecondition(
                            "import alias has no name after `as`".to_string(),
                        )
                    })?;
                Some(LeftPadded::new(
                    space_before(as_kw)?,
                    Identifier {
                        id: self.ids.next_id(),
                        prefix: space_before(alias_tok)?,
                        markers: Markers::empty(),
                        name: alias_tok.text(),
                    },
                ))
            }
            None => None,
        };
        Ok((name_tok, alias))
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expression<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        match node.category() {
            Category::ReferenceExpression | Category::TargetExpression => {
                Ok(Expr::Identifier(Identifier {
                    id: self.ids.next_id(),
                    prefix: space_before(node)?,
                    markers: Markers::empty(),
                    name: node.text(),
                }))
            }
            Category::BooleanLiteral => Ok(Expr::Literal(Literal {
                id: self.ids.next_id(),
                prefix: space_before(node)?,
                markers: Markers::empty(),
                value: LiteralValue::Bool(node.text() == "True"),
                source: Some(node.text()),
            })),
            Category::NumericLiteral => self.numeric_literal(node),
            Category::StringLiteral => Ok(Expr::Literal(Literal {
                id: self.ids.next_id(),
                prefix: space_before(node)?,
                markers: Markers::empty(),
                value: LiteralValue::Str(node.text()),
                source: Some(node.text()),
            })),
            Category::NoneLiteral => Ok(Expr::Literal(Literal {
                id: self.ids.next_id(),
                prefix: space_before(node)?,
                markers: Markers::empty(),
                value: LiteralValue::None,
                source: Some(node.text()),
            })),
            Category::BinaryExpression => self.binary(node),
            Category::PrefixExpression => self.prefix_expression(node),
            Category::CallExpression => self.call(node),
            Category::KeywordArgument => self.keyword_argument(node),
            Category::ListLiteral => self.list_literal(node),
            Category::SetLiteral => self.set_literal(node),
            Category::DictLiteral => self.dict_literal(node),
            Category::KeyValue => self.key_value(node),
            Category::ParenthesizedExpression => self.parenthesized(node),
            Category::SubscriptionExpression => self.subscription(node),
            Category::TupleExpression => Err(unsupported(
                "bare tuple expression outside parentheses".to_string(),
                node,
            )),
            other => Err(unsupported(
                format!("unhandled expression of category {other:?}"),
                node,
            )),
        }
    }

    fn numeric_literal<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let text = node.text();
        let value = match numeric_value(text) {
            Some(v) => v,
            None => {
                return Err(unsupported(
                    format!("unparseable numeric literal {text:?}"),
                    node,
                ))
            }
        };
        Ok(Expr::Literal(Literal {
            id: self.ids.next_id(),
            prefix: space_before(node)?,
            markers: Markers::empty(),
            value,
            source: Some(text),
        }))
    }

    /// Binary operators either keep binary form or desugar to a magic-method
    /// call; the spelling table decides. `not in` additionally wraps the
    /// `__contains__` call in a negating `Unary`.
    fn binary<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let exprs = node.expressions();
        let (lhs, rhs) = match (exprs.first(), exprs.get(1)) {
            (Some(lhs), Some(rhs)) => (*lhs, *rhs),
            _ => {
                return Err(Error::StructuralPrecondition(
                    "binary expression needs two operands".to_string(),
                ))
            }
        };
        let ops = node.children_of(Category::OperatorToken);
        let (spelling, within) = match ops.as_slice() {
            [op] => (op.text().to_string(), None),
            [first, second] => (
                format!("{} {}", first.text(), second.text()),
                Some(space_before(*second)?),
            ),
            _ => {
                return Err(Error::StructuralPrecondition(format!(
                    "binary expression has {} operator tokens",
                    ops.len()
                )))
            }
        };
        let before_op = space_after(lhs)?;
        let left = self.expression(lhs)?;
        let right = self.expression(rhs)?;

        if let Some(op) = BinaryOp::from_spelling(&spelling) {
            let mut markers = Markers::empty();
            if let Some(space) = within {
                markers.set_extra_padding(PaddingLocation::WithinOperatorName, space);
            }
            return Ok(Expr::Binary(Box::new(Binary {
                id,
                prefix: node_prefix,
                markers,
                left,
                op: LeftPadded::new(before_op, op),
                right,
            })));
        }

        let magic = match magic_method_for_operator(&spelling) {
            Some(magic) => magic,
            None => {
                return Err(unsupported(
                    format!("unhandled binary operator {spelling:?}"),
                    node,
                ))
            }
        };
        let negate = spelling == "not in";
        let mut call_markers = Markers::with(Marker::MagicMethodDesugar);
        if let Some(space) = within {
            call_markers.set_extra_padding(PaddingLocation::WithinOperatorName, space);
        }
        let (select, args) = if magic_method_reverses_operands(magic) {
            // `a in b` becomes `b.__contains__(a)`. The printer reads the
            // after-operator space out of the argument's prefix slot.
            let mut receiver = right;
            let after_op = receiver.prefix().clone();
            receiver.set_prefix(Space::empty());
            let mut argument = left;
            argument.set_prefix(after_op);
            (
                Padded::new(receiver, before_op),
                vec![Padded::bare(argument)],
            )
        } else {
            (Padded::new(left, before_op), vec![Padded::bare(right)])
        };
        let call = Call {
            id: self.ids.next_id(),
            prefix: node_prefix,
            markers: call_markers,
            select: Some(select),
            name: Identifier {
                id: self.ids.next_id(),
                prefix: Space::empty(),
                markers: Markers::empty(),
                name: magic,
            },
            args: Container::bare(args),
        };
        if negate {
            Ok(Expr::Unary(Box::new(Unary {
                id: self.ids.next_id(),
                prefix: Space::empty(),
                markers: Markers::with(Marker::MagicMethodDesugar),
                op: UnaryOp::Not,
                expr: Expr::Call(Box::new(call)),
            })))
        } else {
            Ok(Expr::Call(Box::new(call)))
        }
    }

    fn prefix_expression<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let op_tok = node
            .children()
            .find(|c| matches!(c.category(), Category::OperatorToken | Category::Keyword))
            .ok_or_else(|| {
                Error::StructuralPrecondition("prefix expression has no operator".to_string())
            })?;
        let op = UnaryOp::from_spelling(op_tok.text()).ok_or_else(|| {
            unsupported(
                format!("unhandled prefix operator {:?}", op_tok.text()),
                node,
            )
        })?;
        let operand = first_expression(node)?;
        Ok(Expr::Unary(Box::new(Unary {
            id,
            prefix: node_prefix,
            markers: Markers::empty(),
            op,
            expr: self.expression(operand)?,
        })))
    }

    fn call<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let callee = first_expression(node)?;
        let args_node = require(node, Category::ArgumentList)?;
        if callee.category() == Category::ReferenceExpression {
            let name = Identifier {
                id: self.ids.next_id(),
                prefix: space_before(callee)?,
                markers: Markers::empty(),
                name: callee.text(),
            };
            let args = self.argument_list(args_node)?;
            return Ok(Expr::Call(Box::new(Call {
                id,
                prefix: node_prefix,
                markers: Markers::empty(),
                select: None,
                name,
                args,
            })));
        }
        // A non-name callee desugars to `__call__`: the callee expression is
        // the receiver and no name is printed.
        let select = Padded::new(self.expression(callee)?, space_after(callee)?);
        let args = self.argument_list(args_node)?;
        Ok(Expr::Call(Box::new(Call {
            id,
            prefix: node_prefix,
            markers: Markers::with(Marker::MagicMethodDesugar),
            select: Some(select),
            name: Identifier {
                id: self.ids.next_id(),
                prefix: Space::empty(),
                markers: Markers::empty(),
                name: "__call__",
            },
            args,
        })))
    }

    /// An empty list keeps its interior run on a placeholder `Empty` slot, so
    /// `f()` and `f( )` stay distinct.
    fn argument_list<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Container<'a, Expr<'a>>> {
        let before = space_before(node)?;
        let args = node.expressions();
        if args.is_empty() {
            let rparen = require(node, Category::RightParen)?;
            let empty = Expr::Empty(Empty {
                id: self.ids.next_id(),
                prefix: space_before(rparen)?,
                markers: Markers::empty(),
            });
            return Ok(Container::new(before, vec![Padded::bare(empty)]));
        }
        let mut elems = Vec::with_capacity(args.len());
        for arg in args {
            elems.push(Padded::new(self.expression(arg)?, space_after(arg)?));
        }
        Ok(Container::new(before, elems))
    }

    fn keyword_argument<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let name_tok = require(node, Category::Identifier)?;
        let eq = require(node, Category::Equals)?;
        let value_node = first_expression(node)?;
        Ok(Expr::Assignment(Box::new(Assign {
            id,
            prefix: node_prefix,
            markers: Markers::empty(),
            target: Expr::Identifier(Identifier {
                id: self.ids.next_id(),
                prefix: Space::empty(),
                markers: Markers::empty(),
                name: name_tok.text(),
            }),
            value: LeftPadded::new(space_before(eq)?, self.expression(value_node)?),
        })))
    }

    fn list_literal<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let elements = self.bracketed_elements(node, Category::RightBracket)?;
        Ok(Expr::Collection(CollectionLiteral {
            id,
            prefix: node_prefix,
            markers: Markers::empty(),
            elements: Container::bare(elements),
        }))
    }

    fn set_literal<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let elements = self.bracketed_elements(node, Category::RightBrace)?;
        Ok(self.builtin_desugar(id, node_prefix, "set", elements))
    }

    fn dict_literal<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let mut markers = Markers::empty();
        let pairs = node.expressions();
        let elements = if pairs.is_empty() {
            let rbrace = require(node, Category::RightBrace)?;
            markers.set_extra_padding(PaddingLocation::EmptyInitializer, space_before(rbrace)?);
            Vec::new()
        } else {
            let mut elems = Vec::with_capacity(pairs.len());
            for pair in pairs {
                elems.push(Padded::new(self.expression(pair)?, space_after(pair)?));
            }
            elems
        };
        Ok(Expr::Dict(DictLiteral {
            id,
            prefix: node_prefix,
            markers,
            elements: Container::bare(elements),
        }))
    }

    fn key_value<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let exprs = node.expressions();
        let (key, value) = match (exprs.first(), exprs.get(1)) {
            (Some(k), Some(v)) => (*k, *v),
            _ => {
                return Err(Error::StructuralPrecondition(
                    "key-value pair needs a key and a value".to_string(),
                ))
            }
        };
        let key_after = space_after(key)?;
        Ok(Expr::KeyValue(Box::new(KeyValue {
            id,
            prefix: node_prefix,
            markers: Markers::empty(),
            key: Padded::new(self.expression(key)?, key_after),
            value: self.expression(value)?,
        })))
    }

    fn parenthesized<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let inner = first_expression(node)?;
        if inner.category() == Category::TupleExpression {
            // The parentheses fold into the tuple desugar and come back at
            // print time.
            let members = inner.expressions();
            let elements = if members.is_empty() {
                let rparen = require(node, Category::RightParen)?;
                vec![Padded::bare(Expr::Empty(Empty {
                    id: self.ids.next_id(),
                    prefix: space_before(rparen)?,
                    markers: Markers::empty(),
                }))]
            } else {
                let mut elems = Vec::with_capacity(members.len());
                for member in members {
                    elems.push(Padded::new(self.expression(member)?, space_after(member)?));
                }
                elems
            };
            return Ok(self.builtin_desugar(id, node_prefix, "tuple", elements));
        }
        let inner_after = space_after(inner)?;
        Ok(Expr::Paren(Box::new(Paren {
            id,
            prefix: node_prefix,
            markers: Markers::empty(),
            expr: Padded::new(self.expression(inner)?, inner_after),
        })))
    }

    fn subscription<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let exprs = node.expressions();
        let (target_node, index_node) = match (exprs.first(), exprs.get(1)) {
            (Some(t), Some(i)) => (*t, *i),
            _ => {
                return Err(Error::StructuralPrecondition(
                    "subscription needs a target and an index".to_string(),
                ))
            }
        };
        let lbracket = require(node, Category::LeftBracket)?;
        let index_prefix = space_before(lbracket)?;
        let target = self.expression(target_node)?;
        let index_after = space_after(index_node)?;
        let index = if index_node.category() == Category::SliceExpression {
            self.slice(index_node)?
        } else {
            self.expression(index_node)?
        };
        Ok(Expr::Subscript(Box::new(Subscript {
            id,
            prefix: node_prefix,
            markers: Markers::empty(),
            target,
            index_prefix,
            index: Padded::new(index, index_after),
        })))
    }

    /// `a[x:y:z]` desugars to `__builtins__.slice(x, y, z)`; empty slots are
    /// placeholder `Empty` expressions keeping their run.
    fn slice<'a>(&mut self, node: SourceNode<'_, 'a>) -> Result<Expr<'a>> {
        let id = self.ids.next_id();
        let node_prefix = space_before(node)?;
        let mut slots: Vec<Padded<'a, Expr<'a>>> = Vec::new();
        let mut current: Option<Padded<'a, Expr<'a>>> = None;
        let mut pending: Vec<SourceNode<'_, 'a>> = Vec::new();
        for child in node.children() {
            match child.category() {
                Category::Colon => {
                    let slot = match current.take() {
                        Some(slot) => slot,
                        None => Padded::bare(Expr::Empty(Empty {
                            id: self.ids.next_id(),
                            prefix: merge_trivia(&pending)?,
                            markers: Markers::empty(),
                        })),
                    };
                    pending.clear();
                    slots.push(slot);
                }
                Category::Whitespace | Category::Comment => pending.push(child),
                cat if cat.is_expression() => {
                    current = Some(Padded::new(self.expression(child)?, space_after(child)?));
                    pending.clear();
                }
                _ => {}
            }
        }
        let final_slot = match current.take() {
            Some(slot) => slot,
            None => Padded::bare(Expr::Empty(Empty {
                id: self.ids.next_id(),
                prefix: merge_trivia(&pending)?,
                markers: Markers::empty(),
            })),
        };
        slots.push(final_slot);
        let select = Expr::Identifier(Identifier {
            id: self.ids.next_id(),
            prefix: Space::empty(),
            markers: Markers::empty(),
            name: "__builtins__",
        });
        Ok(Expr::Call(Box::new(Call {
            id,
            prefix: node_prefix,
            markers: Markers::with(Marker::BuiltinDesugar),
            select: Some(Padded::bare(select)),
            name: Identifier {
                id: self.ids.next_id(),
                prefix: Space::empty(),
                markers: Markers::empty(),
                name: "slice",
            },
            args: Container::bare(slots),
        })))
    }

    /// Elements of a bracketed literal, with a placeholder slot when empty.
    fn bracketed_elements<'a>(
        &mut self,
        node: SourceNode<'_, 'a>,
        closing: Category,
    ) -> Result<Vec<Padded<'a, Expr<'a>>>> {
        let members = node.expressions();
        if members.is_empty() {
            let close = require(node, closing)?;
            return Ok(vec![Padded::bare(Expr::Empty(Empty {
                id: self.ids.next_id(),
                prefix: space_before(close)?,
                markers: Markers::empty(),
            }))]);
        }
        let mut elems = Vec::with_capacity(members.len());
        for member in members {
            elems.push(Padded::new(self.expression(member)?, space_after(member)?));
        }
        Ok(elems)
    }

    fn builtin_desugar<'a>(
        &mut self,
        id: crate::nodes::NodeId,
        prefix: Space<'a>,
        name: &'static str,
        elements: Vec<Padded<'a, Expr<'a>>>,
    ) -> Expr<'a> {
        let payload = Expr::Collection(CollectionLiteral {
            id: self.ids.next_id(),
            prefix: Space::empty(),
            markers: Markers::empty(),
            elements: Container::bare(elements),
        });
        let select = Expr::Identifier(Identifier {
            id: self.ids.next_id(),
            prefix: Space::empty(),
            markers: Markers::empty(),
            name: "__builtins__",
        });
        Expr::Call(Box::new(Call {
            id,
            prefix,
            markers: Markers::with(Marker::BuiltinDesugar),
            select: Some(Padded::bare(select)),
            name: Identifier {
                id: self.ids.next_id(),
                prefix: Space::empty(),
                markers: Markers::empty(),
                name,
            },
            args: Container::bare(vec![Padded::bare(payload)]),
        }))
    }
}

fn single(stmt: Stmt<'_>) -> Vec<Stmt<'_>> {
    vec![stmt]
}

fn unsupported(message: String, node: SourceNode<'_, '_>) -> Error {
    Error::UnsupportedConstruct {
        message,
        span: Some((node.start(), node.end())),
    }
}

/// Parses the full range of numeric spellings: radix prefixes, `_` digit
/// separators, an imaginary `j`/`J` suffix, and integers past `i64` (held as
/// an approximate float; the exact spelling survives in [`Literal::source`]).
fn numeric_value(text: &str) -> Option<LiteralValue<'static>> {
    let text: Cow<'_, str> = if text.contains('_') {
        Cow::Owned(text.replace('_', ""))
    } else {
        Cow::Borrowed(text)
    };
    let radix = match text.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => 10,
    };
    if radix != 10 {
        let digits = &text[2..];
        return i64::from_str_radix(digits, radix)
            .ok()
            .map(LiteralValue::Int)
            .or_else(|| {
                u128::from_str_radix(digits, radix)
                    .ok()
                    .map(|v| LiteralValue::Float(v as f64))
            });
    }
    if let Some(magnitude) = text.strip_suffix(['j', 'J']) {
        return magnitude.parse::<f64>().ok().map(LiteralValue::Float);
    }
    text.parse::<i64>()
        .ok()
        .map(LiteralValue::Int)
        .or_else(|| text.parse::<f64>().ok().map(LiteralValue::Float))
}

fn require<'t, 'a>(node: SourceNode<'t, 'a>, category: Category) -> Result<SourceNode<'t, 'a>> {
    node.child_of(category).ok_or_else(|| {
        Error::StructuralPrecondition(format!(
            "{:?} node has no {category:?} child",
            node.category()
        ))
    })
}

fn first_expression<'t, 'a>(node: SourceNode<'t, 'a>) -> Result<SourceNode<'t, 'a>> {
    node.first_expression().ok_or_else(|| {
        Error::StructuralPrecondition(format!(
            "{:?} node has no expression child",
            node.category()
        ))
    })
}

// ----------------------------------------------------------------------
// Space attribution
// ----------------------------------------------------------------------

/// Merges an ordered run of trivia siblings into one [`Space`]. Adjacent
/// whitespace leaves re-slice the source; a comment leaf must start with `#`,
/// which is stripped here and restored at print time.
fn merge_trivia<'a>(nodes: &[SourceNode<'_, 'a>]) -> Result<Space<'a>> {
    let first = match nodes.first() {
        Some(first) => first,
        None => return Ok(Space::empty()),
    };
    let text = first.tree().text();
    let mut pairs = Vec::new();
    let mut run: Option<(usize, usize)> = None;
    for node in nodes {
        match node.category() {
            Category::Whitespace => {
                run = Some(match run {
                    Some((start, _)) => (start, node.end()),
                    None => (node.start(), node.end()),
                });
            }
            Category::Comment => {
                let body = node.text().strip_prefix('#').ok_or_else(|| {
                    Error::StructuralPrecondition(format!(
                        "comment at byte {} does not start with '#'",
                        node.start()
                    ))
                })?;
                let ws = match run.take() {
                    Some((start, end)) => Cow::Borrowed(&text[start..end]),
                    None => Cow::Borrowed(""),
                };
                pairs.push((ws, Comment { text: body }));
            }
            _ => {}
        }
    }
    let last = match run {
        Some((start, end)) => Cow::Borrowed(&text[start..end]),
        None => Cow::Borrowed(""),
    };
    Ok(Space { pairs, last })
}

/// The maximal trivia run immediately before `node` among its siblings,
/// skipping zero-width leaves.
fn space_before<'a>(node: SourceNode<'_, 'a>) -> Result<Space<'a>> {
    let mut trivia = Vec::new();
    let mut cursor = node.prev_sibling();
    while let Some(sibling) = cursor {
        if sibling.is_trivia() {
            trivia.push(sibling);
        } else if !sibling.is_hidden() {
            break;
        }
        cursor = sibling.prev_sibling();
    }
    trivia.reverse();
    merge_trivia(&trivia)
}

/// The maximal trivia run immediately after `node` among its siblings.
fn space_after<'a>(node: SourceNode<'_, 'a>) -> Result<Space<'a>> {
    let mut trivia = Vec::new();
    let mut cursor = node.next_sibling();
    while let Some(sibling) = cursor {
        if sibling.is_trivia() {
            trivia.push(sibling);
        } else if !sibling.is_hidden() {
            break;
        }
        cursor = sibling.next_sibling();
    }
    merge_trivia(&trivia)
}

/// The trivia run at the tail of `node`'s own children (an end-of-line
/// comment lives inside its statement).
fn trailing_space<'a>(node: SourceNode<'_, 'a>) -> Result<Space<'a>> {
    let children: Vec<_> = node.children().collect();
    let mut trivia = Vec::new();
    for child in children.iter().rev() {
        if child.is_trivia() {
            trivia.push(*child);
        } else if !child.is_hidden() {
            break;
        }
    }
    trivia.reverse();
    merge_trivia(&trivia)
}
