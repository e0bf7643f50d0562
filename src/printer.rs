// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! The printer: lossless tree back to source text, byte-for-byte.
//!
//! Fixed syntax (keywords, delimiters, separators, operator spellings) is
//! re-emitted from node kinds; everything else comes out of captured spaces.
//! The `;` separator is decided by looking at the output produced so far: a
//! separator is inserted before a statement that is not the first of its
//! list exactly when the output sits mid-line, i.e. the trailing spaces and
//! tabs are not preceded by a newline. A grouped import counts as starting
//! at its first member even though it renders at the last one.
//!
//! Desugared nodes are validated before re-sugaring; any violation is a
//! [`Error::MalformedDesugar`] and aborts the whole print.

use crate::error::{Error, Result};
use crate::group::{find_statement_group, StatementGroup};
use crate::markers::PaddingLocation;
use crate::nodes::expression::{
    magic_method_operator, magic_method_reverses_operands, Await, Binary, Call,
    CollectionLiteral, Comprehension, DictLiteral, ErrorFrom, Expr, Identifier, KeyValue,
    Literal, LiteralValue, MatchCaseExpr, MatchPattern, Paren, PatternKind, Subscript, TypeHint,
    TypeHintKind, TypeHinted, Unary, UnaryOp, Yield,
};
use crate::nodes::statement::{
    Assert, Assign, Block, Case, Catch, ClassDecl, Decorator, Del, Else, ExprStmt, FnDecl,
    ForEach, If, Import, Match, Module, NamedTargets, Raise, Return, Stmt, Try, VariableScope,
    While,
};
use crate::nodes::{Container, Padded, Space};

/// Prints one module. See [`Printer::print`].
#[derive(Debug, Default)]
pub struct Printer {
    out: String,
}

impl Printer {
    pub fn print(module: &Module<'_>) -> Result<String> {
        let mut printer = Printer { out: String::new() };
        printer.module(module)?;
        Ok(printer.out)
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn space(&mut self, space: &Space<'_>) {
        space.write_to(&mut self.out);
    }

    /// Whether the output sits at the start of a (possibly indented) line.
    fn at_line_start(&self) -> bool {
        let trimmed = self.out.trim_end_matches([' ', '\t']);
        trimmed.is_empty() || trimmed.ends_with('\n')
    }

    fn extra_padding(&mut self, markers: &crate::markers::Markers<'_>, loc: PaddingLocation) {
        let space = markers.padding_or_default(loc);
        self.space(&space);
    }

    fn module(&mut self, module: &Module<'_>) -> Result<()> {
        self.space(&module.prefix);
        self.statements(&module.statements)?;
        self.space(&module.eof);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn statements(&mut self, stmts: &[Padded<'_, Stmt<'_>>]) -> Result<()> {
        let mut cached: Option<StatementGroup> = None;
        for (i, padded) in stmts.iter().enumerate() {
            let group = match cached {
                Some(g) if g.contains(i) => Some(g),
                _ => {
                    cached = find_statement_group(stmts, i);
                    cached
                }
            };
            if let Some(g) = group {
                // A group renders once, at its final member.
                if i < g.last {
                    continue;
                }
            }
            // Separator position is where the statement starts; a group starts
            // at its first member even though it renders at the last one.
            let start = group.map_or(i, |g| g.first);
            if start != 0 && !self.at_line_start() {
                self.out.push(';');
            }
            match (&padded.elem, group) {
                (Stmt::Import(_), Some(g)) => {
                    let mut members = Vec::with_capacity(g.member_count());
                    for member in &stmts[g.first..=g.last] {
                        match &member.elem {
                            Stmt::Import(imp) => members.push(imp),
                            other => {
                                return Err(Error::StructuralPrecondition(format!(
                                    "statement group member is not an import: {other:?}"
                                )))
                            }
                        }
                    }
                    self.import_group(&members)?;
                }
                (Stmt::Import(imp), None) => self.import_group(&[imp])?,
                (stmt, _) => self.stmt(stmt)?,
            }
            self.space(&padded.after);
        }
        Ok(())
    }

    fn padded_stmt(&mut self, padded: &Padded<'_, Stmt<'_>>) -> Result<()> {
        self.stmt(&padded.elem)?;
        self.space(&padded.after);
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match stmt {
            Stmt::Assert(n) => self.assert_stmt(n),
            Stmt::Assign(n) => self.assign(n),
            Stmt::Block(n) => self.block(n),
            Stmt::Break(n) => {
                self.space(&n.prefix);
                self.push("break");
                Ok(())
            }
            Stmt::Case(n) => self.case(n),
            Stmt::ClassDecl(n) => self.class_decl(n),
            Stmt::Continue(n) => {
                self.space(&n.prefix);
                self.push("continue");
                Ok(())
            }
            Stmt::Del(n) => self.del(n),
            Stmt::Empty(n) => {
                self.space(&n.prefix);
                Ok(())
            }
            Stmt::ExprStmt(n) => self.expr_stmt(n),
            Stmt::FnDecl(n) => self.fn_decl(n),
            Stmt::ForEach(n) => self.for_each(n),
            Stmt::If(n) => self.if_stmt(n),
            Stmt::Import(n) => self.import_group(&[n]),
            Stmt::Match(n) => self.match_stmt(n),
            Stmt::Pass(n) => {
                self.space(&n.prefix);
                self.push("pass");
                Ok(())
            }
            Stmt::Raise(n) => self.raise(n),
            Stmt::Return(n) => self.return_stmt(n),
            Stmt::Try(n) => self.try_stmt(n),
            Stmt::VariableScope(n) => self.variable_scope(n),
            Stmt::While(n) => self.while_stmt(n),
        }
    }

    /// Padding, `:`, prefix, statements, end — in that order. The pre-colon
    /// run lives in the padding marker, never in the prefix.
    fn block(&mut self, block: &Block<'_>) -> Result<()> {
        self.block_with(block, &block.statements)
    }

    fn block_with(&mut self, block: &Block<'_>, stmts: &[Padded<'_, Stmt<'_>>]) -> Result<()> {
        self.extra_padding(&block.markers, PaddingLocation::BeforeCompoundBlockColon);
        self.push(":");
        self.space(&block.prefix);
        self.statements(stmts)?;
        self.space(&block.end);
        Ok(())
    }

    fn assign(&mut self, n: &Assign<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.expr(&n.target)?;
        self.space(&n.value.before);
        self.push("=");
        self.expr(&n.value.elem)
    }

    fn expr_stmt(&mut self, n: &ExprStmt<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.expr(&n.expr)
    }

    fn return_stmt(&mut self, n: &Return<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push("return");
        match &n.expr {
            Some(expr) => self.expr(expr),
            None => Ok(()),
        }
    }

    fn raise(&mut self, n: &Raise<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push("raise");
        match &n.expr {
            Some(expr) => self.expr(expr),
            None => Ok(()),
        }
    }

    fn if_stmt(&mut self, n: &If<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push("if");
        self.expr(&n.condition.elem)?;
        self.space(&n.condition.after);
        self.padded_stmt(&n.then_part)?;
        match &n.else_part {
            Some(else_part) => self.else_part(else_part),
            None => Ok(()),
        }
    }

    fn else_part(&mut self, n: &Else<'_>) -> Result<()> {
        self.space(&n.prefix);
        match &n.body.elem {
            // A nested `if` with an empty prefix renders as `elif`.
            Stmt::If(nested) => {
                self.push("el");
                self.if_stmt(nested)?;
            }
            other => {
                self.push("else");
                self.stmt(other)?;
            }
        }
        self.space(&n.body.after);
        Ok(())
    }

    fn while_stmt(&mut self, n: &While<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push("while");
        self.expr(&n.condition.elem)?;
        self.space(&n.condition.after);
        self.padded_stmt(&n.body)
    }

    fn for_each(&mut self, n: &ForEach<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push("for");
        self.named_targets(&n.target.elem);
        self.space(&n.target.after);
        self.push("in");
        self.expr(&n.iterable.elem)?;
        self.space(&n.iterable.after);
        self.padded_stmt(&n.body)
    }

    fn named_targets(&mut self, n: &NamedTargets<'_>) {
        self.space(&n.prefix);
        for (i, name) in n.names.iter().enumerate() {
            self.ident(&name.elem);
            self.space(&name.after);
            if i + 1 < n.names.len() {
                self.push(",");
            }
        }
    }

    fn class_decl(&mut self, n: &ClassDecl<'_>) -> Result<()> {
        self.space(&n.prefix);
        for decorator in &n.decorators {
            self.decorator(decorator)?;
        }
        self.space(&n.kind_prefix);
        self.push("class");
        self.ident(&n.name);
        let (open, close) = if n.bases.markers.omit_parentheses() {
            ("", "")
        } else {
            ("(", ")")
        };
        self.container(open, &n.bases, ",", close)?;
        self.block(&n.body)
    }

    fn fn_decl(&mut self, n: &FnDecl<'_>) -> Result<()> {
        self.space(&n.prefix);
        for decorator in &n.decorators {
            self.decorator(decorator)?;
        }
        self.space(&n.def_prefix);
        self.push("def");
        self.ident(&n.name);
        self.container("(", &n.params, ",", ")")?;
        if let Some(hint) = &n.return_hint {
            self.type_hint(hint)?;
        }
        self.block(&n.body)
    }

    fn decorator(&mut self, n: &Decorator<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push("@");
        self.ident(&n.name);
        match &n.args {
            Some(args) => self.container("(", args, ",", ")"),
            None => Ok(()),
        }
    }

    /// Renders one import group as a single statement, from its last member.
    fn import_group(&mut self, members: &[&Import<'_>]) -> Result<()> {
        let last = match members.last() {
            Some(last) => last,
            None => return Ok(()),
        };
        self.space(&last.prefix);
        if last.is_plain() {
            self.push("import");
        } else {
            self.push("from");
            self.ident(&last.module);
            self.space(&last.name.before);
            self.push("import");
        }
        // Parentheses are re-created only when something inside would need
        // them: a newline or a comment in any member's spacing, or captured
        // paren padding on the rendering member.
        let parenthesize = members.iter().any(|m| import_member_needs_parens(m))
            || last
                .markers
                .extra_padding(PaddingLocation::ImportParensPrefix)
                .is_some()
            || last
                .markers
                .extra_padding(PaddingLocation::ImportParensSuffix)
                .is_some();
        if parenthesize {
            self.extra_padding(&last.markers, PaddingLocation::ImportParensPrefix);
            self.push("(");
        }
        for (i, member) in members.iter().enumerate() {
            if i != 0 {
                self.push(",");
            }
            if member.is_plain() {
                self.ident(&member.module);
            } else {
                self.ident(&member.name.elem);
            }
            if let Some(alias) = &member.alias {
                self.space(&alias.before);
                self.push("as");
                self.ident(&alias.elem);
            }
            self.space(&member.after);
        }
        if parenthesize {
            self.extra_padding(&last.markers, PaddingLocation::ImportParensSuffix);
            self.push(")");
        }
        Ok(())
    }

    fn try_stmt(&mut self, n: &Try<'_>) -> Result<()> {
        self.space(&n.prefix);
        if let Some(resources) = n.resources.as_ref().filter(|r| !r.elems.is_empty()) {
            self.push("with");
            self.space(&resources.before);
            for (i, resource) in resources.elems.iter().enumerate() {
                if i != 0 {
                    self.push(",");
                }
                match &resource.elem {
                    Expr::Assignment(assign) => {
                        self.space(&assign.prefix);
                        self.expr(&assign.value.elem)?;
                        self.space(&assign.value.before);
                        self.push("as");
                        self.expr(&assign.target)?;
                    }
                    other => {
                        return Err(Error::StructuralPrecondition(format!(
                            "with-resource is not an assignment: {other:?}"
                        )))
                    }
                }
                self.space(&resource.after);
            }
        } else {
            self.push("try");
        }
        // A trailing Block statement inside the body is the `else` clause;
        // its padding's `after` is the space before the `else` keyword.
        let else_elem = match n.body.statements.last() {
            Some(padded) if matches!(padded.elem, Stmt::Block(_)) => Some(padded),
            _ => None,
        };
        match else_elem {
            Some(else_padded) => {
                let main = &n.body.statements[..n.body.statements.len() - 1];
                self.block_with(&n.body, main)?;
                for catch in &n.catches {
                    self.catch(catch)?;
                }
                self.space(&else_padded.after);
                self.push("else");
                self.stmt(&else_padded.elem)?;
            }
            None => {
                self.block(&n.body)?;
                for catch in &n.catches {
                    self.catch(catch)?;
                }
            }
        }
        if let Some(finally) = &n.finally {
            self.space(&finally.before);
            self.push("finally");
            self.block(&finally.elem)?;
        }
        Ok(())
    }

    fn catch(&mut self, n: &Catch<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push("except");
        if let Some(except_type) = &n.except_type {
            if except_type.is_group {
                self.push("*");
            }
            self.space(&except_type.prefix);
            self.expr(&except_type.expr)?;
        }
        if let Some(as_name) = &n.as_name {
            self.space(&as_name.before);
            self.push("as");
            self.ident(&as_name.elem);
        }
        self.block(&n.body)
    }

    fn match_stmt(&mut self, n: &Match<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push("match");
        self.expr(&n.selector.elem)?;
        self.space(&n.selector.after);
        self.block(&n.cases)
    }

    fn case(&mut self, n: &Case<'_>) -> Result<()> {
        self.space(&n.prefix);
        let is_wildcard = n.patterns.elems.len() == 1
            && matches!(&n.patterns.elems[0].elem, Expr::Identifier(id) if id.name == "default");
        if !is_wildcard {
            self.push("case");
        }
        self.container("", &n.patterns, ",", "")?;
        self.padded_stmt(&n.body)
    }

    fn del(&mut self, n: &Del<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push("del");
        self.padded_exprs(&n.targets, ",")
    }

    fn variable_scope(&mut self, n: &VariableScope<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push(n.kind.keyword());
        for (i, name) in n.names.iter().enumerate() {
            if i != 0 {
                self.push(",");
            }
            self.ident(&name.elem);
            self.space(&name.after);
        }
        Ok(())
    }

    fn assert_stmt(&mut self, n: &Assert<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push("assert");
        self.padded_exprs(&n.exprs, ",")
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expr(&mut self, e: &Expr<'_>) -> Result<()> {
        self.space(e.prefix());
        self.expr_tail(e)
    }

    /// Everything after the node's own prefix. Desugar printing uses this to
    /// substitute operand spacing.
    fn expr_tail(&mut self, e: &Expr<'_>) -> Result<()> {
        match e {
            Expr::Assignment(n) => {
                self.expr(&n.target)?;
                self.space(&n.value.before);
                self.push("=");
                self.expr(&n.value.elem)
            }
            Expr::Await(n) => self.await_tail(n),
            Expr::Binary(n) => self.binary_tail(n),
            Expr::Call(n) => self.call_tail(n),
            Expr::Collection(n) => self.collection_tail(n),
            Expr::Comprehension(n) => self.comprehension_tail(n),
            Expr::Dict(n) => self.dict_tail(n),
            Expr::Empty(_) => Ok(()),
            Expr::ErrorFrom(n) => self.error_from_tail(n),
            Expr::Identifier(n) => {
                self.push(n.name);
                Ok(())
            }
            Expr::KeyValue(n) => self.key_value_tail(n),
            Expr::Literal(n) => self.literal_tail(n),
            Expr::MatchCase(n) => self.match_case_tail(n),
            Expr::Paren(n) => self.paren_tail(n),
            Expr::Pattern(n) => self.pattern_tail(n),
            Expr::SpecialParam(n) => {
                self.push(match n.kind {
                    crate::nodes::expression::SpecialParamKind::Args => "*",
                    crate::nodes::expression::SpecialParamKind::Kwargs => "**",
                });
                Ok(())
            }
            Expr::Subscript(n) => self.subscript_tail(n),
            Expr::TypeHinted(n) => self.type_hinted_tail(n),
            Expr::Unary(n) => self.unary_tail(n),
            Expr::Yield(n) => self.yield_tail(n),
        }
    }

    fn ident(&mut self, n: &Identifier<'_>) {
        self.space(&n.prefix);
        self.push(n.name);
    }

    fn binary_tail(&mut self, n: &Binary<'_>) -> Result<()> {
        self.expr(&n.left)?;
        self.space(&n.op.before);
        let spelling = n.op.elem.spelling();
        match spelling.split_once(' ') {
            Some((first, second)) => {
                self.push(first);
                self.extra_padding(&n.markers, PaddingLocation::WithinOperatorName);
                self.push(second);
            }
            None => self.push(spelling),
        }
        self.expr(&n.right)
    }

    fn unary_tail(&mut self, n: &Unary<'_>) -> Result<()> {
        if n.markers.is_magic_desugar() {
            if n.op != UnaryOp::Not {
                return Err(Error::MalformedDesugar(format!(
                    "negated desugar uses operator {:?}, not `not`",
                    n.op
                )));
            }
            // The operand may be parenthesized; re-sugaring drops the parens.
            let mut inner = &n.expr;
            while let Expr::Paren(paren) = inner {
                inner = &paren.expr.elem;
            }
            return match inner {
                Expr::Call(call) if call.markers.is_magic_desugar() => {
                    self.space(&call.prefix);
                    self.magic_call_tail(call, true)
                }
                other => Err(Error::MalformedDesugar(format!(
                    "negated desugar operand is not a desugared call: {other:?}"
                ))),
            };
        }
        self.push(n.op.spelling());
        self.expr(&n.expr)
    }

    fn call_tail(&mut self, n: &Call<'_>) -> Result<()> {
        if n.markers.is_magic_desugar() {
            return self.magic_call_tail(n, false);
        }
        if n.markers.is_builtin_desugar() {
            return self.builtin_call_tail(n);
        }
        if let Some(select) = &n.select {
            self.expr(&select.elem)?;
            self.space(&select.after);
            self.push(".");
        }
        self.ident(&n.name);
        self.container("(", &n.args, ",", ")")
    }

    fn magic_call_tail(&mut self, call: &Call<'_>, negate: bool) -> Result<()> {
        let name = call.name.name;
        if name == "__call__" {
            if negate {
                return Err(Error::MalformedDesugar(
                    "cannot negate a __call__ desugar".to_string(),
                ));
            }
            let select = call.select.as_ref().ok_or_else(|| {
                Error::MalformedDesugar("__call__ desugar has no callee".to_string())
            })?;
            self.expr(&select.elem)?;
            self.space(&select.after);
            return self.container("(", &call.args, ",", ")");
        }
        let op = magic_method_operator(name).ok_or_else(|| {
            Error::MalformedDesugar(format!("unknown magic method {name}"))
        })?;
        if negate && op != "in" {
            return Err(Error::MalformedDesugar(format!(
                "operator {op} cannot be negated"
            )));
        }
        if call.args.elems.len() != 1 {
            return Err(Error::MalformedDesugar(format!(
                "magic method {name} expects exactly one argument, found {}",
                call.args.elems.len()
            )));
        }
        let select = call.select.as_ref().ok_or_else(|| {
            Error::MalformedDesugar(format!("magic method {name} has no receiver"))
        })?;
        let arg = &call.args.elems[0].elem;
        // Operand spacing slots, read before any reversal.
        let before_op = &select.after;
        let after_op = arg.prefix();
        let (lhs, rhs) = if magic_method_reverses_operands(name) {
            (arg, &select.elem)
        } else {
            (&select.elem, arg)
        };
        self.expr_tail(lhs)?;
        self.space(before_op);
        if negate {
            self.push("not");
            self.extra_padding(&call.markers, PaddingLocation::WithinOperatorName);
        }
        self.push(op);
        self.space(after_op);
        self.expr_tail(rhs)
    }

    fn builtin_call_tail(&mut self, call: &Call<'_>) -> Result<()> {
        match &call.select {
            Some(select) => match &select.elem {
                Expr::Identifier(id) if id.name == "__builtins__" => {}
                Expr::Identifier(id) => {
                    return Err(Error::MalformedDesugar(format!(
                        "builtin desugar receiver is {}, not __builtins__",
                        id.name
                    )))
                }
                other => {
                    return Err(Error::MalformedDesugar(format!(
                        "builtin desugar receiver is not an identifier: {other:?}"
                    )))
                }
            },
            None => {
                return Err(Error::MalformedDesugar(
                    "builtin desugar has no receiver".to_string(),
                ))
            }
        }
        match call.name.name {
            "slice" => self.container("", &call.args, ":", ""),
            kind @ ("set" | "tuple") => {
                if call.args.elems.len() != 1 {
                    return Err(Error::MalformedDesugar(format!(
                        "{kind} desugar expects one collection argument, found {}",
                        call.args.elems.len()
                    )));
                }
                let payload = match &call.args.elems[0].elem {
                    Expr::Collection(collection) => collection,
                    other => {
                        return Err(Error::MalformedDesugar(format!(
                            "{kind} desugar argument is not a collection: {other:?}"
                        )))
                    }
                };
                let mut visible = 0usize;
                let mut placeholders = 0usize;
                for elem in &payload.elements.elems {
                    match elem.elem {
                        Expr::Empty(_) => placeholders += 1,
                        _ => visible += 1,
                    }
                }
                if placeholders > 1 {
                    return Err(Error::MalformedDesugar(format!(
                        "{kind} desugar has {placeholders} empty placeholders; arity is ambiguous"
                    )));
                }
                let (open, close) = match kind {
                    "set" => ("{", "}"),
                    // A one-element tuple needs its trailing comma back.
                    _ if visible == 1 => ("(", ",)"),
                    _ => ("(", ")"),
                };
                self.container(open, &payload.elements, ",", close)
            }
            other => Err(Error::MalformedDesugar(format!(
                "unknown builtin desugar {other}"
            ))),
        }
    }

    fn collection_tail(&mut self, n: &CollectionLiteral<'_>) -> Result<()> {
        self.container("[", &n.elements, ",", "]")
    }

    fn dict_tail(&mut self, n: &DictLiteral<'_>) -> Result<()> {
        if n.elements.elems.is_empty() {
            self.space(&n.elements.before);
            self.push("{");
            self.extra_padding(&n.markers, PaddingLocation::EmptyInitializer);
            self.push("}");
            return Ok(());
        }
        self.container("{", &n.elements, ",", "}")
    }

    fn key_value_tail(&mut self, n: &KeyValue<'_>) -> Result<()> {
        self.expr(&n.key.elem)?;
        self.space(&n.key.after);
        self.push(":");
        self.expr(&n.value)
    }

    fn paren_tail(&mut self, n: &Paren<'_>) -> Result<()> {
        self.push("(");
        self.expr(&n.expr.elem)?;
        self.space(&n.expr.after);
        self.push(")");
        Ok(())
    }

    fn subscript_tail(&mut self, n: &Subscript<'_>) -> Result<()> {
        self.expr(&n.target)?;
        self.space(&n.index_prefix);
        self.push("[");
        self.expr(&n.index.elem)?;
        self.space(&n.index.after);
        self.push("]");
        Ok(())
    }

    fn literal_tail(&mut self, n: &Literal<'_>) -> Result<()> {
        if n.markers.implicit_none() {
            return Ok(());
        }
        match n.source {
            Some(source) => self.push(source),
            None => match &n.value {
                LiteralValue::Bool(true) => self.push("True"),
                LiteralValue::Bool(false) => self.push("False"),
                LiteralValue::Int(v) => self.out.push_str(&v.to_string()),
                LiteralValue::Float(v) => self.out.push_str(&v.to_string()),
                LiteralValue::Str(s) => {
                    self.out.push('\'');
                    self.out.push_str(s);
                    self.out.push('\'');
                }
                LiteralValue::None => self.push("None"),
            },
        }
        Ok(())
    }

    fn await_tail(&mut self, n: &Await<'_>) -> Result<()> {
        self.push("await");
        self.expr(&n.expr)
    }

    fn yield_tail(&mut self, n: &Yield<'_>) -> Result<()> {
        self.push("yield");
        if let Some(from) = &n.from {
            self.space(from);
            self.push("from");
        }
        self.padded_exprs(&n.exprs, ",")
    }

    fn error_from_tail(&mut self, n: &ErrorFrom<'_>) -> Result<()> {
        self.expr(&n.error)?;
        self.space(&n.from.before);
        self.push("from");
        self.expr(&n.from.elem)
    }

    fn type_hint(&mut self, n: &TypeHint<'_>) -> Result<()> {
        self.space(&n.prefix);
        self.push(match n.kind {
            TypeHintKind::Variable => ":",
            TypeHintKind::Return => "->",
        });
        self.expr(&n.expr)
    }

    fn type_hinted_tail(&mut self, n: &TypeHinted<'_>) -> Result<()> {
        self.expr(&n.expr)?;
        self.type_hint(&n.hint)
    }

    fn comprehension_tail(&mut self, n: &Comprehension<'_>) -> Result<()> {
        self.push(n.kind.open());
        self.expr(&n.result)?;
        for clause in &n.clauses {
            self.space(&clause.prefix);
            self.push("for");
            self.expr(&clause.iterator)?;
            self.space(&clause.iterated.before);
            self.push("in");
            self.expr(&clause.iterated.elem)?;
            for condition in &clause.conditions {
                self.space(&condition.prefix);
                self.push("if");
                self.expr(&condition.expr)?;
            }
        }
        self.space(&n.suffix);
        self.push(n.kind.close());
        Ok(())
    }

    fn match_case_tail(&mut self, n: &MatchCaseExpr<'_>) -> Result<()> {
        self.space(&n.pattern.prefix);
        self.pattern_tail(&n.pattern)?;
        if let Some(guard) = &n.guard {
            self.space(&guard.before);
            self.push("if");
            self.expr(&guard.elem)?;
        }
        Ok(())
    }

    fn pattern_tail(&mut self, n: &MatchPattern<'_>) -> Result<()> {
        match n.kind {
            PatternKind::As => self.container("", &n.children, "as", ""),
            PatternKind::Capture | PatternKind::Literal | PatternKind::Value => {
                self.container("", &n.children, "", "")
            }
            PatternKind::Class => {
                self.space(&n.children.before);
                let (first, rest) = match n.children.elems.split_first() {
                    Some(split) => split,
                    None => return Ok(()),
                };
                self.expr(&first.elem)?;
                self.space(&first.after);
                self.push("(");
                self.padded_exprs(rest, ",")?;
                self.push(")");
                Ok(())
            }
            PatternKind::DoubleStar => self.container("**", &n.children, "", ""),
            PatternKind::Group => self.container("(", &n.children, ",", ")"),
            PatternKind::KeyValue => self.container("", &n.children, ":", ""),
            PatternKind::Keyword => self.container("", &n.children, "=", ""),
            PatternKind::Mapping => self.container("{", &n.children, ",", "}"),
            PatternKind::Or => self.container("", &n.children, "|", ""),
            PatternKind::Sequence => self.container("[", &n.children, ",", "]"),
            PatternKind::Star => self.container("*", &n.children, "", ""),
            PatternKind::Wildcard => self.container("_", &n.children, "", ""),
        }
    }

    // ------------------------------------------------------------------
    // Shared plumbing
    // ------------------------------------------------------------------

    fn container(
        &mut self,
        open: &str,
        container: &Container<'_, Expr<'_>>,
        separator: &str,
        close: &str,
    ) -> Result<()> {
        self.space(&container.before);
        self.push(open);
        self.padded_exprs(&container.elems, separator)?;
        self.push(close);
        Ok(())
    }

    fn padded_exprs(&mut self, elems: &[Padded<'_, Expr<'_>>], separator: &str) -> Result<()> {
        for (i, padded) in elems.iter().enumerate() {
            self.expr(&padded.elem)?;
            self.space(&padded.after);
            if i + 1 < elems.len() {
                self.push(separator);
            }
        }
        Ok(())
    }
}

// The statement-level prefix stays out of the scan: it holds inter-statement
// whitespace, and the newlines there say nothing about the import itself.
fn import_member_needs_parens(member: &Import<'_>) -> bool {
    let spaces = [
        &member.module.prefix,
        &member.name.before,
        &member.name.elem.prefix,
        &member.after,
    ];
    let alias_spaces = member
        .alias
        .iter()
        .flat_map(|a| [&a.before, &a.elem.prefix]);
    spaces
        .into_iter()
        .chain(alias_spaces)
        .any(|s| s.contains_newline() || s.has_comment())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::Markers;
    use crate::nodes::statement::Pass;
    use crate::nodes::{NodeIdGenerator, Space};

    fn pass_stmt<'a>(ids: &mut NodeIdGenerator, prefix: &'a str) -> Stmt<'a> {
        Stmt::Pass(Pass {
            id: ids.next_id(),
            prefix: Space::from_ws(prefix),
            markers: Markers::empty(),
        })
    }

    #[test]
    fn separator_depends_on_trailing_newline() {
        let mut ids = NodeIdGenerator::new();
        let module = Module {
            id: ids.next_id(),
            prefix: Space::empty(),
            markers: Markers::empty(),
            statements: vec![
                Padded::new(pass_stmt(&mut ids, ""), Space::from_ws("\n")),
                Padded::new(pass_stmt(&mut ids, ""), Space::empty()),
                Padded::new(pass_stmt(&mut ids, " "), Space::empty()),
            ],
            eof: Space::from_ws("\n"),
        };
        // After "\n" no separator; after no newline a ";" is inserted.
        assert_eq!(Printer::print(&module).unwrap(), "pass\npass; pass\n");
    }

    #[test]
    fn empty_statement_round_trips_trailing_semicolon() {
        let mut ids = NodeIdGenerator::new();
        let module = Module {
            id: ids.next_id(),
            prefix: Space::empty(),
            markers: Markers::empty(),
            statements: vec![
                Padded::new(pass_stmt(&mut ids, ""), Space::empty()),
                Padded::bare(Stmt::Empty(crate::nodes::expression::Empty {
                    id: ids.next_id(),
                    prefix: Space::from_ws(" "),
                    markers: Markers::empty(),
                })),
            ],
            eof: Space::empty(),
        };
        assert_eq!(Printer::print(&module).unwrap(), "pass; ");
    }
}
