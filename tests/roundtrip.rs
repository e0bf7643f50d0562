// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! Round-trip tests: a concrete tree built over source text must print back
//! byte-for-byte.
//!
//! Each fixture constructs the concrete tree by hand with [`TreeBuilder`];
//! `finish` already guarantees the leaves cover the text exactly, so a
//! passing test pins down both the builder's space attribution and the
//! printer's re-emission.

use difference::assert_diff;
use python_lst::source::{Category, SourceTree, TreeBuilder};
use python_lst::{build_module, print_module};

/// Helper to visualize whitespace differences in test output
fn visualize(s: &str) -> String {
    s.replace(' ', "▩")
        .lines()
        .collect::<Vec<_>>()
        .join("↩\n")
}

fn assert_roundtrip(tree: &SourceTree<'_>) {
    let outcome = build_module(tree).expect("build failed");
    assert!(
        outcome.diagnostics.is_empty(),
        "unexpected skips: {:?}",
        outcome.diagnostics
    );
    let printed = print_module(&outcome.module).expect("print failed");
    if printed != tree.text() {
        let got = visualize(&printed);
        let expected = visualize(tree.text());
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

// ---------------------------------------------------------------------
// Small concrete-tree vocabulary
// ---------------------------------------------------------------------

fn ref_expr(b: &mut TreeBuilder<'_>, name: &str) {
    b.open(Category::ReferenceExpression);
    b.token(Category::Identifier, name);
    b.close();
}

fn target(b: &mut TreeBuilder<'_>, name: &str) {
    b.open(Category::TargetExpression);
    b.token(Category::Identifier, name);
    b.close();
}

fn num(b: &mut TreeBuilder<'_>, text: &str) {
    b.open(Category::NumericLiteral);
    b.token(Category::Identifier, text);
    b.close();
}

fn pass_stmt(b: &mut TreeBuilder<'_>) {
    b.open(Category::PassStatement);
    b.token(Category::Keyword, "pass");
    b.close();
}

/// `:` plus an indented single-`pass` body (`indent` includes the newline).
fn colon_pass_body(b: &mut TreeBuilder<'_>, indent: &str) {
    b.token(Category::Colon, ":");
    b.open(Category::StatementList);
    b.ws(indent);
    pass_stmt(b);
    b.close();
}

// ---------------------------------------------------------------------
// Trivia shapes
// ---------------------------------------------------------------------

#[test]
fn empty_module() {
    let b = TreeBuilder::new("");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn comment_only_module() {
    let mut b = TreeBuilder::new("# header\n");
    b.comment("# header");
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn single_statement_with_newline() {
    let mut b = TreeBuilder::new("pass\n");
    pass_stmt(&mut b);
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn single_statement_without_newline() {
    let mut b = TreeBuilder::new("pass");
    pass_stmt(&mut b);
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn semicolon_separated_statements() {
    let mut b = TreeBuilder::new("pass\npass; pass\n");
    pass_stmt(&mut b);
    b.ws("\n");
    pass_stmt(&mut b);
    b.token(Category::Semicolon, ";");
    b.ws(" ");
    pass_stmt(&mut b);
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn trailing_semicolon() {
    let mut b = TreeBuilder::new("pass;\n");
    pass_stmt(&mut b);
    b.token(Category::Semicolon, ";");
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn semicolon_with_surrounding_spaces() {
    let mut b = TreeBuilder::new("pass ; pass");
    pass_stmt(&mut b);
    b.ws(" ");
    b.token(Category::Semicolon, ";");
    b.ws(" ");
    pass_stmt(&mut b);
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn doubled_semicolon() {
    let mut b = TreeBuilder::new("pass;;\n");
    pass_stmt(&mut b);
    b.token(Category::Semicolon, ";");
    b.token(Category::Semicolon, ";");
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn end_of_line_comment_stays_with_statement() {
    let mut b = TreeBuilder::new("x = 1  # set x\npass\n");
    b.open(Category::AssignmentStatement);
    target(&mut b, "x");
    b.ws(" ");
    b.token(Category::Equals, "=");
    b.ws(" ");
    num(&mut b, "1");
    b.ws("  ");
    b.comment("# set x");
    b.close();
    b.ws("\n");
    pass_stmt(&mut b);
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

// ---------------------------------------------------------------------
// Simple statements
// ---------------------------------------------------------------------

#[test]
fn assignment_keeps_asymmetric_spacing() {
    let mut b = TreeBuilder::new("a =1\nb= 2\n");
    b.open(Category::AssignmentStatement);
    target(&mut b, "a");
    b.ws(" ");
    b.token(Category::Equals, "=");
    num(&mut b, "1");
    b.close();
    b.ws("\n");
    b.open(Category::AssignmentStatement);
    target(&mut b, "b");
    b.token(Category::Equals, "=");
    b.ws(" ");
    num(&mut b, "2");
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn return_with_and_without_value() {
    let mut b = TreeBuilder::new("return x\nreturn\n");
    b.open(Category::ReturnStatement);
    b.token(Category::Keyword, "return");
    b.ws(" ");
    ref_expr(&mut b, "x");
    b.close();
    b.ws("\n");
    b.open(Category::ReturnStatement);
    b.token(Category::Keyword, "return");
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

// ---------------------------------------------------------------------
// Compound statements
// ---------------------------------------------------------------------

#[test]
fn if_elif_else_chain() {
    let mut b = TreeBuilder::new("if a:\n    pass\nelif b:\n    pass\nelse:\n    pass\n");
    b.open(Category::IfStatement);
    b.open(Category::IfClause);
    b.token(Category::Keyword, "if");
    b.ws(" ");
    ref_expr(&mut b, "a");
    colon_pass_body(&mut b, "\n    ");
    b.close();
    b.ws("\n");
    b.open(Category::ElifClause);
    b.token(Category::Keyword, "elif");
    b.ws(" ");
    ref_expr(&mut b, "b");
    colon_pass_body(&mut b, "\n    ");
    b.close();
    b.ws("\n");
    b.open(Category::ElseClause);
    b.token(Category::Keyword, "else");
    colon_pass_body(&mut b, "\n    ");
    b.close();
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn space_before_block_colon() {
    let mut b = TreeBuilder::new("if a :\n    pass\n");
    b.open(Category::IfStatement);
    b.open(Category::IfClause);
    b.token(Category::Keyword, "if");
    b.ws(" ");
    ref_expr(&mut b, "a");
    b.ws(" ");
    colon_pass_body(&mut b, "\n    ");
    b.close();
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn multi_statement_block_needs_no_separator() {
    let mut b = TreeBuilder::new("while a:\n    pass\n    pass\nbreak\n");
    b.open(Category::WhileStatement);
    b.token(Category::Keyword, "while");
    b.ws(" ");
    ref_expr(&mut b, "a");
    b.token(Category::Colon, ":");
    b.open(Category::StatementList);
    b.ws("\n    ");
    pass_stmt(&mut b);
    b.ws("\n    ");
    pass_stmt(&mut b);
    b.close();
    b.close();
    b.ws("\n");
    b.open(Category::BreakStatement);
    b.token(Category::Keyword, "break");
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn blank_line_between_statements() {
    let mut b = TreeBuilder::new("if a:\n    pass\n\npass\n");
    b.open(Category::IfStatement);
    b.open(Category::IfClause);
    b.token(Category::Keyword, "if");
    b.ws(" ");
    ref_expr(&mut b, "a");
    colon_pass_body(&mut b, "\n    ");
    b.close();
    b.close();
    b.ws("\n\n");
    pass_stmt(&mut b);
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn for_loop_with_tuple_target() {
    let mut b = TreeBuilder::new("for a, b in pairs:\n    continue\n");
    b.open(Category::ForStatement);
    b.token(Category::Keyword, "for");
    b.ws(" ");
    b.open(Category::TupleExpression);
    target(&mut b, "a");
    b.token(Category::Comma, ",");
    b.ws(" ");
    target(&mut b, "b");
    b.close();
    b.ws(" ");
    b.token(Category::Keyword, "in");
    b.ws(" ");
    ref_expr(&mut b, "pairs");
    b.token(Category::Colon, ":");
    b.open(Category::StatementList);
    b.ws("\n    ");
    b.open(Category::ContinueStatement);
    b.token(Category::Keyword, "continue");
    b.close();
    b.close();
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn decorated_function_with_defaults() {
    let mut b = TreeBuilder::new("@wrap\ndef f(x, y=1):\n    return x\n");
    b.open(Category::FunctionDefinition);
    b.open(Category::DecoratorList);
    b.open(Category::Decorator);
    b.token(Category::At, "@");
    b.token(Category::Identifier, "wrap");
    b.close();
    b.close();
    b.ws("\n");
    b.token(Category::Keyword, "def");
    b.ws(" ");
    b.token(Category::Identifier, "f");
    b.open(Category::ParameterList);
    b.token(Category::LeftParen, "(");
    b.open(Category::Parameter);
    b.token(Category::Identifier, "x");
    b.close();
    b.token(Category::Comma, ",");
    b.ws(" ");
    b.open(Category::Parameter);
    b.token(Category::Identifier, "y");
    b.token(Category::Equals, "=");
    num(&mut b, "1");
    b.close();
    b.token(Category::RightParen, ")");
    b.close();
    b.token(Category::Colon, ":");
    b.open(Category::StatementList);
    b.ws("\n    ");
    b.open(Category::ReturnStatement);
    b.token(Category::Keyword, "return");
    b.ws(" ");
    ref_expr(&mut b, "x");
    b.close();
    b.close();
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn class_base_list_shapes() {
    let mut b =
        TreeBuilder::new("class C(Base):\n    pass\nclass D:\n    pass\nclass E( ):\n    pass\n");
    b.open(Category::ClassDefinition);
    b.token(Category::Keyword, "class");
    b.ws(" ");
    b.token(Category::Identifier, "C");
    b.open(Category::ArgumentList);
    b.token(Category::LeftParen, "(");
    ref_expr(&mut b, "Base");
    b.token(Category::RightParen, ")");
    b.close();
    colon_pass_body(&mut b, "\n    ");
    b.close();
    b.ws("\n");
    b.open(Category::ClassDefinition);
    b.token(Category::Keyword, "class");
    b.ws(" ");
    b.token(Category::Identifier, "D");
    colon_pass_body(&mut b, "\n    ");
    b.close();
    b.ws("\n");
    b.open(Category::ClassDefinition);
    b.token(Category::Keyword, "class");
    b.ws(" ");
    b.token(Category::Identifier, "E");
    b.open(Category::ArgumentList);
    b.token(Category::LeftParen, "(");
    b.ws(" ");
    b.token(Category::RightParen, ")");
    b.close();
    colon_pass_body(&mut b, "\n    ");
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

// ---------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------

fn expr_stmt_call(b: &mut TreeBuilder<'_>, callee: &str, args: impl FnOnce(&mut TreeBuilder<'_>)) {
    b.open(Category::ExpressionStatement);
    b.open(Category::CallExpression);
    ref_expr(b, callee);
    b.open(Category::ArgumentList);
    b.token(Category::LeftParen, "(");
    args(b);
    b.token(Category::RightParen, ")");
    b.close();
    b.close();
    b.close();
}

#[test]
fn call_spacing_is_preserved() {
    let mut b = TreeBuilder::new("print( )\nprint(1 , 2)\nf(a=1)\na.b(x)\n");
    expr_stmt_call(&mut b, "print", |b| {
        b.ws(" ");
    });
    b.ws("\n");
    expr_stmt_call(&mut b, "print", |b| {
        num(b, "1");
        b.ws(" ");
        b.token(Category::Comma, ",");
        b.ws(" ");
        num(b, "2");
    });
    b.ws("\n");
    expr_stmt_call(&mut b, "f", |b| {
        b.open(Category::KeywordArgument);
        b.token(Category::Identifier, "a");
        b.token(Category::Equals, "=");
        num(b, "1");
        b.close();
    });
    b.ws("\n");
    expr_stmt_call(&mut b, "a.b", |b| {
        ref_expr(b, "x");
    });
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn parenthesized_callee_round_trips() {
    // `(f)(x)` desugars to `__call__` and back.
    let mut b = TreeBuilder::new("(f)(x)\n");
    b.open(Category::ExpressionStatement);
    b.open(Category::CallExpression);
    b.open(Category::ParenthesizedExpression);
    b.token(Category::LeftParen, "(");
    ref_expr(&mut b, "f");
    b.token(Category::RightParen, ")");
    b.close();
    b.open(Category::ArgumentList);
    b.token(Category::LeftParen, "(");
    ref_expr(&mut b, "x");
    b.token(Category::RightParen, ")");
    b.close();
    b.close();
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

// ---------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------

fn assign_binary(b: &mut TreeBuilder<'_>, lhs: &str, ops: &[&str], rhs: &str) {
    b.open(Category::AssignmentStatement);
    target(b, "r");
    b.ws(" ");
    b.token(Category::Equals, "=");
    b.ws(" ");
    b.open(Category::BinaryExpression);
    ref_expr(b, lhs);
    b.ws(" ");
    for (i, op) in ops.iter().enumerate() {
        if i != 0 {
            b.ws(" ");
        }
        b.token(Category::OperatorToken, op);
    }
    b.ws(" ");
    ref_expr(b, rhs);
    b.close();
    b.close();
}

#[test]
fn binary_operators_round_trip() {
    let text = "r = a + b\nr = a == b\nr = x and y\nr = a << b\n";
    let mut b = TreeBuilder::new(text);
    for op in ["+", "==", "and", "<<"] {
        assign_binary(&mut b, if op == "and" { "x" } else { "a" }, &[op], if op == "and" { "y" } else { "b" });
        b.ws("\n");
    }
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn two_word_operators_round_trip() {
    let mut b = TreeBuilder::new("r = a is not b\nr = a not in b\n");
    assign_binary(&mut b, "a", &["is", "not"], "b");
    b.ws("\n");
    assign_binary(&mut b, "a", &["not", "in"], "b");
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn wide_two_word_operator_keeps_interior_space() {
    let mut b = TreeBuilder::new("r = a is  not b\n");
    b.open(Category::AssignmentStatement);
    target(&mut b, "r");
    b.ws(" ");
    b.token(Category::Equals, "=");
    b.ws(" ");
    b.open(Category::BinaryExpression);
    ref_expr(&mut b, "a");
    b.ws(" ");
    b.token(Category::OperatorToken, "is");
    b.ws("  ");
    b.token(Category::OperatorToken, "not");
    b.ws(" ");
    ref_expr(&mut b, "b");
    b.close();
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn desugared_operators_round_trip() {
    let mut b = TreeBuilder::new("r = a ** b\nr = a // b\nr = a in b\n");
    assign_binary(&mut b, "a", &["**"], "b");
    b.ws("\n");
    assign_binary(&mut b, "a", &["//"], "b");
    b.ws("\n");
    assign_binary(&mut b, "a", &["in"], "b");
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn unary_operators_round_trip() {
    let mut b = TreeBuilder::new("r = not a\nr = -1\n");
    b.open(Category::AssignmentStatement);
    target(&mut b, "r");
    b.ws(" ");
    b.token(Category::Equals, "=");
    b.ws(" ");
    b.open(Category::PrefixExpression);
    b.token(Category::Keyword, "not");
    b.ws(" ");
    ref_expr(&mut b, "a");
    b.close();
    b.close();
    b.ws("\n");
    b.open(Category::AssignmentStatement);
    target(&mut b, "r");
    b.ws(" ");
    b.token(Category::Equals, "=");
    b.ws(" ");
    b.open(Category::PrefixExpression);
    b.token(Category::OperatorToken, "-");
    num(&mut b, "1");
    b.close();
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

// ---------------------------------------------------------------------
// Collection literals, parens, subscripts
// ---------------------------------------------------------------------

fn assign_to(b: &mut TreeBuilder<'_>, name: &str, value: impl FnOnce(&mut TreeBuilder<'_>)) {
    b.open(Category::AssignmentStatement);
    target(b, name);
    b.ws(" ");
    b.token(Category::Equals, "=");
    b.ws(" ");
    value(b);
    b.close();
    b.ws("\n");
}

#[test]
fn numeric_spellings_round_trip() {
    // Radix, separator, and imaginary forms must build without a skip.
    let mut b = TreeBuilder::new("a = 0xFF\nb = 1_000\nc = 1j\nd = 0b1010\n");
    for (name, text) in [("a", "0xFF"), ("b", "1_000"), ("c", "1j"), ("d", "0b1010")] {
        assign_to(&mut b, name, |b| num(b, text));
    }
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn dict_literals_round_trip() {
    let mut b = TreeBuilder::new("d = { }\ne = {}\nk = {'a': 1}\n");
    assign_to(&mut b, "d", |b| {
        b.open(Category::DictLiteral);
        b.token(Category::LeftBrace, "{");
        b.ws(" ");
        b.token(Category::RightBrace, "}");
        b.close();
    });
    assign_to(&mut b, "e", |b| {
        b.open(Category::DictLiteral);
        b.token(Category::LeftBrace, "{");
        b.token(Category::RightBrace, "}");
        b.close();
    });
    assign_to(&mut b, "k", |b| {
        b.open(Category::DictLiteral);
        b.token(Category::LeftBrace, "{");
        b.open(Category::KeyValue);
        b.open(Category::StringLiteral);
        b.token(Category::Identifier, "'a'");
        b.close();
        b.token(Category::Colon, ":");
        b.ws(" ");
        num(b, "1");
        b.close();
        b.token(Category::RightBrace, "}");
        b.close();
    });
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn list_and_set_literals_round_trip() {
    let mut b = TreeBuilder::new("l = [1, 2]\ns = {1 , 2}\n");
    assign_to(&mut b, "l", |b| {
        b.open(Category::ListLiteral);
        b.token(Category::LeftBracket, "[");
        num(b, "1");
        b.token(Category::Comma, ",");
        b.ws(" ");
        num(b, "2");
        b.token(Category::RightBracket, "]");
        b.close();
    });
    assign_to(&mut b, "s", |b| {
        b.open(Category::SetLiteral);
        b.token(Category::LeftBrace, "{");
        num(b, "1");
        b.ws(" ");
        b.token(Category::Comma, ",");
        b.ws(" ");
        num(b, "2");
        b.token(Category::RightBrace, "}");
        b.close();
    });
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn tuples_round_trip() {
    // Non-empty tuples own their interior trivia; `(1,)` restores the
    // trailing comma from arity, not from a stored token.
    let mut b = TreeBuilder::new("t = (1,)\nu = ( 1, 2 )\np = (x)\n");
    assign_to(&mut b, "t", |b| {
        b.open(Category::ParenthesizedExpression);
        b.token(Category::LeftParen, "(");
        b.open(Category::TupleExpression);
        num(b, "1");
        b.token(Category::Comma, ",");
        b.close();
        b.token(Category::RightParen, ")");
        b.close();
    });
    assign_to(&mut b, "u", |b| {
        b.open(Category::ParenthesizedExpression);
        b.token(Category::LeftParen, "(");
        b.open(Category::TupleExpression);
        b.ws(" ");
        num(b, "1");
        b.token(Category::Comma, ",");
        b.ws(" ");
        num(b, "2");
        b.ws(" ");
        b.close();
        b.token(Category::RightParen, ")");
        b.close();
    });
    assign_to(&mut b, "p", |b| {
        b.open(Category::ParenthesizedExpression);
        b.token(Category::LeftParen, "(");
        ref_expr(b, "x");
        b.token(Category::RightParen, ")");
        b.close();
    });
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn subscripts_and_slices_round_trip() {
    let mut b = TreeBuilder::new("s = x[1 : 2]\nt = y[:]\nv = z [i]\n");
    assign_to(&mut b, "s", |b| {
        b.open(Category::SubscriptionExpression);
        ref_expr(b, "x");
        b.token(Category::LeftBracket, "[");
        b.open(Category::SliceExpression);
        num(b, "1");
        b.ws(" ");
        b.token(Category::Colon, ":");
        b.ws(" ");
        num(b, "2");
        b.close();
        b.token(Category::RightBracket, "]");
        b.close();
    });
    assign_to(&mut b, "t", |b| {
        b.open(Category::SubscriptionExpression);
        ref_expr(b, "y");
        b.token(Category::LeftBracket, "[");
        b.open(Category::SliceExpression);
        b.token(Category::Colon, ":");
        b.close();
        b.token(Category::RightBracket, "]");
        b.close();
    });
    assign_to(&mut b, "v", |b| {
        b.open(Category::SubscriptionExpression);
        ref_expr(b, "z");
        b.ws(" ");
        b.token(Category::LeftBracket, "[");
        ref_expr(b, "i");
        b.token(Category::RightBracket, "]");
        b.close();
    });
    assert_roundtrip(&b.finish().unwrap());
}

// ---------------------------------------------------------------------
// Imports
// ---------------------------------------------------------------------

fn import_element(b: &mut TreeBuilder<'_>, name: &str, alias: Option<&str>) {
    b.open(Category::ImportElement);
    b.token(Category::Identifier, name);
    if let Some(alias) = alias {
        b.ws(" ");
        b.token(Category::Keyword, "as");
        b.ws(" ");
        b.token(Category::Identifier, alias);
    }
    b.close();
}

#[test]
fn plain_imports_round_trip() {
    let mut b = TreeBuilder::new("import os\nimport a , b\n");
    b.open(Category::ImportStatement);
    b.token(Category::Keyword, "import");
    b.ws(" ");
    import_element(&mut b, "os", None);
    b.close();
    b.ws("\n");
    b.open(Category::ImportStatement);
    b.token(Category::Keyword, "import");
    b.ws(" ");
    import_element(&mut b, "a", None);
    b.ws(" ");
    b.token(Category::Comma, ",");
    b.ws(" ");
    import_element(&mut b, "b", None);
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn from_import_with_alias_round_trips() {
    let mut b = TreeBuilder::new("from m import x as y, z\n");
    b.open(Category::FromImportStatement);
    b.token(Category::Keyword, "from");
    b.ws(" ");
    ref_expr(&mut b, "m");
    b.ws(" ");
    b.token(Category::Keyword, "import");
    b.ws(" ");
    import_element(&mut b, "x", Some("y"));
    b.token(Category::Comma, ",");
    b.ws(" ");
    import_element(&mut b, "z", None);
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

fn def_with_body(b: &mut TreeBuilder<'_>, body: impl FnOnce(&mut TreeBuilder<'_>)) {
    b.open(Category::FunctionDefinition);
    b.token(Category::Keyword, "def");
    b.ws(" ");
    b.token(Category::Identifier, "f");
    b.open(Category::ParameterList);
    b.token(Category::LeftParen, "(");
    b.token(Category::RightParen, ")");
    b.close();
    b.token(Category::Colon, ":");
    b.open(Category::StatementList);
    body(b);
    b.close();
    b.close();
}

#[test]
fn import_inside_block_round_trips() {
    // The statement prefix carries the block indent; that newline must not
    // make the printer invent parentheses.
    let mut b = TreeBuilder::new("def f():\n    import os\n");
    def_with_body(&mut b, |b| {
        b.ws("\n    ");
        b.open(Category::ImportStatement);
        b.token(Category::Keyword, "import");
        b.ws(" ");
        import_element(b, "os", None);
        b.close();
    });
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn import_group_as_block_body_round_trips() {
    // A group renders at its last member, but the separator decision belongs
    // to its first: no `;` may appear after the colon.
    let mut b = TreeBuilder::new("def f():\n    from m import a, b\n");
    def_with_body(&mut b, |b| {
        b.ws("\n    ");
        b.open(Category::FromImportStatement);
        b.token(Category::Keyword, "from");
        b.ws(" ");
        ref_expr(b, "m");
        b.ws(" ");
        b.token(Category::Keyword, "import");
        b.ws(" ");
        import_element(b, "a", None);
        b.token(Category::Comma, ",");
        b.ws(" ");
        import_element(b, "b", None);
        b.close();
    });
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn blank_line_before_import_round_trips() {
    let mut b = TreeBuilder::new("\nimport os\n\nimport a, b\n");
    b.ws("\n");
    b.open(Category::ImportStatement);
    b.token(Category::Keyword, "import");
    b.ws(" ");
    import_element(&mut b, "os", None);
    b.close();
    b.ws("\n\n");
    b.open(Category::ImportStatement);
    b.token(Category::Keyword, "import");
    b.ws(" ");
    import_element(&mut b, "a", None);
    b.token(Category::Comma, ",");
    b.ws(" ");
    import_element(&mut b, "b", None);
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn multiline_parenthesized_import_round_trips() {
    let mut b = TreeBuilder::new("from pkg import ( # names\n    one,\n    two\n)\n");
    b.open(Category::FromImportStatement);
    b.token(Category::Keyword, "from");
    b.ws(" ");
    ref_expr(&mut b, "pkg");
    b.ws(" ");
    b.token(Category::Keyword, "import");
    b.ws(" ");
    b.token(Category::LeftParen, "(");
    b.ws(" ");
    b.comment("# names");
    b.ws("\n    ");
    import_element(&mut b, "one", None);
    b.token(Category::Comma, ",");
    b.ws("\n    ");
    import_element(&mut b, "two", None);
    b.ws("\n");
    b.token(Category::RightParen, ")");
    b.close();
    b.ws("\n");
    assert_roundtrip(&b.finish().unwrap());
}

#[test]
fn single_line_parenthesized_import_loses_parens() {
    // Sanctioned normalization: parens with nothing inside that needs them
    // are not reproduced.
    let mut b = TreeBuilder::new("from m import (a, b)\n");
    b.open(Category::FromImportStatement);
    b.token(Category::Keyword, "from");
    b.ws(" ");
    ref_expr(&mut b, "m");
    b.ws(" ");
    b.token(Category::Keyword, "import");
    b.ws(" ");
    b.token(Category::LeftParen, "(");
    import_element(&mut b, "a", None);
    b.token(Category::Comma, ",");
    b.ws(" ");
    import_element(&mut b, "b", None);
    b.token(Category::RightParen, ")");
    b.close();
    b.ws("\n");
    let tree = b.finish().unwrap();
    let outcome = build_module(&tree).unwrap();
    assert!(outcome.diagnostics.is_empty());
    let printed = print_module(&outcome.module).unwrap();
    assert_eq!(printed, "from m import a, b\n");
}

// ---------------------------------------------------------------------
// Skips
// ---------------------------------------------------------------------

#[test]
fn unsupported_statement_is_skipped_with_diagnostic() {
    // A subscript assignment target is out of scope; the statement is
    // dropped, the rest of the module survives.
    let mut b = TreeBuilder::new("pass\nx[0] = 1\npass\n");
    pass_stmt(&mut b);
    b.ws("\n");
    b.open(Category::AssignmentStatement);
    b.open(Category::SubscriptionExpression);
    ref_expr(&mut b, "x");
    b.token(Category::LeftBracket, "[");
    num(&mut b, "0");
    b.token(Category::RightBracket, "]");
    b.close();
    b.ws(" ");
    b.token(Category::Equals, "=");
    b.ws(" ");
    num(&mut b, "1");
    b.close();
    b.ws("\n");
    pass_stmt(&mut b);
    b.ws("\n");
    let tree = b.finish().unwrap();

    let outcome = build_module(&tree).unwrap();
    assert_eq!(outcome.diagnostics.len(), 1);
    let diag = &outcome.diagnostics[0];
    assert_eq!((diag.start, diag.end), (5, 13));
    let rendered = python_lst::prettify_diagnostic(tree.text(), diag);
    assert!(rendered.contains(diag.message.as_str()));

    let printed = print_module(&outcome.module).unwrap();
    assert_eq!(printed, "pass\n\npass\n");
}

#[test]
fn bare_tuple_statement_is_skipped() {
    let mut b = TreeBuilder::new("a, b\npass\n");
    b.open(Category::ExpressionStatement);
    b.open(Category::TupleExpression);
    ref_expr(&mut b, "a");
    b.token(Category::Comma, ",");
    b.ws(" ");
    ref_expr(&mut b, "b");
    b.close();
    b.close();
    b.ws("\n");
    pass_stmt(&mut b);
    b.ws("\n");
    let tree = b.finish().unwrap();

    let outcome = build_module(&tree).unwrap();
    assert_eq!(outcome.diagnostics.len(), 1);
    // With no surviving statement before it, the blank run becomes the
    // next statement's prefix.
    assert_eq!(print_module(&outcome.module).unwrap(), "\npass\n");
}
