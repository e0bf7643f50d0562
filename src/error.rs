// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! Error taxonomy and skip diagnostics.
//!
//! Three failure classes cross the public API:
//!
//! - [`Error::UnsupportedConstruct`] — the concrete tree contains something
//!   the builder has no mapping for. At statement level this degrades to a
//!   recorded [`Diagnostic`] and the statement is skipped; inside an
//!   expression it propagates until the enclosing statement is skipped.
//! - [`Error::MalformedDesugar`] — a desugared node fails shape validation at
//!   print time (wrong arity, unknown magic name, illegal negation, ambiguous
//!   placeholders).
//! - [`Error::StructuralPrecondition`] — the input tree or a node violates an
//!   invariant the crate depends on (comment without `#`, non-assignment
//!   `with` resource, non-import member of an import group). Always fatal.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("unsupported construct: {message}")]
    UnsupportedConstruct {
        message: String,
        /// Byte span in the source text, when known.
        span: Option<(usize, usize)>,
    },
    #[error("malformed desugar: {0}")]
    MalformedDesugar(String),
    #[error("structural precondition violated: {0}")]
    StructuralPrecondition(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A record of a statement the builder skipped.
///
/// Skipping is loud: the statement's bytes (including its leading space) are
/// absent from any subsequent print, and one `Diagnostic` per skip is
/// surfaced alongside the built module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    /// Byte offset of the skipped region's start.
    pub start: usize,
    /// Byte offset of the skipped region's end (exclusive).
    pub end: usize,
}

/// Renders a diagnostic as an annotated snippet of the offending source.
///
/// # Example
///
/// ```
/// use python_lst::{prettify_diagnostic, Diagnostic};
///
/// let source = "lambda: 0\n";
/// let diag = Diagnostic {
///     message: "unhandled statement".to_string(),
///     start: 0,
///     end: 9,
/// };
/// let rendered = prettify_diagnostic(source, &diag);
/// assert!(rendered.contains("lambda"));
/// ```
pub fn prettify_diagnostic(source: &str, diag: &Diagnostic) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let end = diag.end.min(source.len()).max(diag.start);
    Renderer::styled()
        .render(
            Level::Warning.title("skipped unsupported construct").snippet(
                Snippet::source(source)
                    .line_start(1)
                    .fold(true)
                    .annotations(vec![Level::Warning
                        .span(diag.start..end)
                        .label(&diag.message)]),
            ),
        )
        .to_string()
}
