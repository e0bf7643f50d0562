// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! Core building blocks of the lossless tree: node identity, captured
//! whitespace, and the padding wrappers that position it.
//!
//! Every byte of the source lives somewhere: either inside a node's own text
//! or in exactly one [`Space`]. A `Space` is an ordered run of
//! `(whitespace, comment)` pairs followed by a final whitespace run; comments
//! are stored without their leading `#`, which the printer re-emits.

pub mod expression;
pub mod statement;

use std::borrow::Cow;

use memchr::memchr;

/// Stable identity of a lossless-tree node, unique within one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Hands out [`NodeId`]s in pre-order during a build.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    next: u32,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn count(&self) -> u32 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// One `#` comment, stored without the leading `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment<'a> {
    pub text: &'a str,
}

/// A captured run of whitespace and comments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Space<'a> {
    /// `(whitespace, comment)` pairs, in source order.
    pub pairs: Vec<(Cow<'a, str>, Comment<'a>)>,
    /// Whitespace after the final comment (or the whole run if no comments).
    pub last: Cow<'a, str>,
}

impl<'a> Space<'a> {
    pub const fn empty() -> Self {
        Space {
            pairs: Vec::new(),
            last: Cow::Borrowed(""),
        }
    }

    pub fn from_ws(ws: &'a str) -> Self {
        Space {
            pairs: Vec::new(),
            last: Cow::Borrowed(ws),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.last.is_empty()
    }

    pub fn has_comment(&self) -> bool {
        !self.pairs.is_empty()
    }

    pub fn contains_newline(&self) -> bool {
        self.pairs
            .iter()
            .any(|(ws, _)| memchr(b'\n', ws.as_bytes()).is_some())
            || memchr(b'\n', self.last.as_bytes()).is_some()
    }

    /// Concatenates two adjacent runs.
    pub fn concat(self, other: Space<'a>) -> Space<'a> {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        let mut pairs = self.pairs;
        let mut rest = other.pairs.into_iter();
        match rest.next() {
            Some((ws, comment)) => {
                let joined = join_ws(self.last, ws);
                pairs.push((joined, comment));
                pairs.extend(rest);
                Space {
                    pairs,
                    last: other.last,
                }
            }
            None => Space {
                pairs,
                last: join_ws(self.last, other.last),
            },
        }
    }

    /// Appends this run's exact source bytes to `out`.
    pub fn write_to(&self, out: &mut String) {
        for (ws, comment) in &self.pairs {
            out.push_str(ws);
            out.push('#');
            out.push_str(comment.text);
        }
        out.push_str(&self.last);
    }
}

fn join_ws<'a>(a: Cow<'a, str>, b: Cow<'a, str>) -> Cow<'a, str> {
    if a.is_empty() {
        b
    } else if b.is_empty() {
        a
    } else {
        let mut owned = a.into_owned();
        owned.push_str(&b);
        Cow::Owned(owned)
    }
}

/// An element plus the space that FOLLOWS it.
#[derive(Debug, Clone, PartialEq)]
pub struct Padded<'a, T> {
    pub elem: T,
    pub after: Space<'a>,
}

impl<'a, T> Padded<'a, T> {
    pub fn new(elem: T, after: Space<'a>) -> Self {
        Padded { elem, after }
    }

    pub fn bare(elem: T) -> Self {
        Padded {
            elem,
            after: Space::empty(),
        }
    }
}

/// An element plus the space that PRECEDES it (before a fixed token such as
/// `=` or `import`).
#[derive(Debug, Clone, PartialEq)]
pub struct LeftPadded<'a, T> {
    pub before: Space<'a>,
    pub elem: T,
}

impl<'a, T> LeftPadded<'a, T> {
    pub fn new(before: Space<'a>, elem: T) -> Self {
        LeftPadded { before, elem }
    }

    pub fn bare(elem: T) -> Self {
        LeftPadded {
            before: Space::empty(),
            elem,
        }
    }
}

/// A delimited, separator-joined sequence: leading space, padded slots, and
/// markers of its own (class base lists carry `OmitParentheses` here).
#[derive(Debug, Clone, PartialEq)]
pub struct Container<'a, T> {
    pub before: Space<'a>,
    pub elems: Vec<Padded<'a, T>>,
    pub markers: crate::markers::Markers<'a>,
}

impl<'a, T> Container<'a, T> {
    pub fn new(before: Space<'a>, elems: Vec<Padded<'a, T>>) -> Self {
        Container {
            before,
            elems,
            markers: crate::markers::Markers::empty(),
        }
    }

    pub fn bare(elems: Vec<Padded<'a, T>>) -> Self {
        Self::new(Space::empty(), elems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_preorder_unique() {
        let mut gen = NodeIdGenerator::new();
        assert_eq!(gen.next_id(), NodeId(0));
        assert_eq!(gen.next_id(), NodeId(1));
        assert_eq!(gen.count(), 2);
        gen.reset();
        assert_eq!(gen.next_id(), NodeId(0));
    }

    #[test]
    fn space_writes_exact_bytes() {
        let space = Space {
            pairs: vec![(Cow::Borrowed("  "), Comment { text: " note" })],
            last: Cow::Borrowed("\n    "),
        };
        let mut out = String::new();
        space.write_to(&mut out);
        assert_eq!(out, "  # note\n    ");
    }

    #[test]
    fn space_newline_and_comment_detection() {
        assert!(!Space::from_ws("   ").contains_newline());
        assert!(Space::from_ws(" \n ").contains_newline());
        let with_comment = Space {
            pairs: vec![(Cow::Borrowed(""), Comment { text: "c" })],
            last: Cow::Borrowed(""),
        };
        assert!(with_comment.has_comment());
        assert!(!with_comment.contains_newline());
    }

    #[test]
    fn concat_merges_adjacent_runs() {
        let a = Space::from_ws(" ");
        let b = Space::from_ws("\n");
        let joined = a.concat(b);
        assert_eq!(joined, Space::from_ws(" \n"));

        let a = Space::from_ws(" ");
        let b = Space {
            pairs: vec![(Cow::Borrowed(" "), Comment { text: "x" })],
            last: Cow::Borrowed("\n"),
        };
        let joined = a.concat(b);
        let mut out = String::new();
        joined.write_to(&mut out);
        assert_eq!(out, "  #x\n");
    }

    #[test]
    fn concat_with_empty_is_identity() {
        let a = Space::from_ws("  ");
        assert_eq!(a.clone().concat(Space::empty()), a);
        assert_eq!(Space::empty().concat(a.clone()), a);
    }
}
