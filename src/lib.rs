// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! python-lst: a lossless statement tree for Python source.
//!
//! The crate turns an externally-parsed concrete tree ([`source::SourceTree`])
//! into identity-carrying nodes that own every whitespace byte and comment,
//! and prints those nodes back byte-for-byte. Because printing is lossless,
//! a tool can rewrite one node and leave every other byte of the file
//! untouched.
//!
//! The two halves of the API:
//!
//! - [`build_module`] maps a [`source::SourceTree`] into a
//!   [`nodes::statement::Module`], desugaring a handful of constructs
//!   (operator magic methods, builtin literal constructors) behind markers
//!   so the printer can re-sugar them.
//! - [`print_module`] re-emits the source. For any successfully built tree
//!   the output equals the input text.
//!
//! Statements the builder cannot map are skipped with a recorded
//! [`Diagnostic`] rather than failing the whole build; structural invariant
//! violations are fatal.
//!
//! ```
//! use python_lst::source::{Category, TreeBuilder};
//! use python_lst::{build_module, print_module};
//!
//! let mut b = TreeBuilder::new("pass\n");
//! b.open(Category::PassStatement);
//! b.token(Category::Keyword, "pass");
//! b.close();
//! b.ws("\n");
//! let tree = b.finish().unwrap();
//!
//! let outcome = build_module(&tree).unwrap();
//! assert!(outcome.diagnostics.is_empty());
//! assert_eq!(print_module(&outcome.module).unwrap(), "pass\n");
//! ```

pub mod builder;
pub mod error;
pub mod group;
pub mod markers;
pub mod nodes;
pub mod printer;
pub mod source;

pub use builder::Builder;
pub use error::{prettify_diagnostic, Diagnostic, Error, Result};
pub use printer::Printer;

use nodes::statement::Module;
use source::SourceTree;

/// A built module plus the skip diagnostics accumulated along the way.
#[derive(Debug)]
pub struct BuildOutcome<'a> {
    pub module: Module<'a>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Builds the lossless tree for one source file.
pub fn build_module<'a>(tree: &SourceTree<'a>) -> Result<BuildOutcome<'a>> {
    let mut builder = Builder::new();
    let module = builder.build(tree)?;
    Ok(BuildOutcome {
        module,
        diagnostics: builder.take_diagnostics(),
    })
}

/// Prints a module back to source text.
pub fn print_module(module: &Module<'_>) -> Result<String> {
    Printer::print(module)
}
