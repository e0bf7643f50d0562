// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! Markers: the closed set of flags a node can carry beyond its fields.
//!
//! Markers never hold printable text of their own except
//! [`Marker::ExtraPadding`], which captures a space at a fixed location when
//! it differs from that location's default. The printer always consults the
//! marker first and falls back to the default.

use crate::nodes::Space;

/// Identity of one grouped-statement run. Statements sharing a `GroupId`
/// print as a single composite statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub u32);

/// Fixed locations where non-default spacing can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingLocation {
    /// Between a compound statement's header and its `:`.
    BeforeCompoundBlockColon,
    /// Between `import` and `(` in a parenthesized import group.
    ImportParensPrefix,
    /// Before the closing `)` of a parenthesized import group.
    ImportParensSuffix,
    /// Inside a two-word operator (`is not`, `not in`).
    WithinOperatorName,
    /// Inside the brackets of an empty literal (`{ }`).
    EmptyInitializer,
}

impl PaddingLocation {
    pub fn default_space(self) -> Space<'static> {
        match self {
            PaddingLocation::BeforeCompoundBlockColon => Space::empty(),
            PaddingLocation::ImportParensPrefix => Space::from_ws(" "),
            PaddingLocation::ImportParensSuffix => Space::from_ws("\n"),
            PaddingLocation::WithinOperatorName => Space::from_ws(" "),
            PaddingLocation::EmptyInitializer => Space::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Marker<'a> {
    /// This statement is part of a multi-statement print group.
    GroupedStatement { group: GroupId },
    /// This call re-sugars to operator syntax when printed.
    MagicMethodDesugar,
    /// This call on `__builtins__` re-sugars to literal syntax when printed.
    BuiltinDesugar,
    /// Non-default space at a fixed location.
    ExtraPadding {
        location: PaddingLocation,
        space: Space<'a>,
    },
    /// A class base list that had no parentheses in source.
    OmitParentheses,
    /// A `None` literal with no corresponding source text.
    ImplicitNone,
}

/// The marker bag every node carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Markers<'a>(Vec<Marker<'a>>);

impl<'a> Markers<'a> {
    pub const fn empty() -> Self {
        Markers(Vec::new())
    }

    pub fn with(marker: Marker<'a>) -> Self {
        Markers(vec![marker])
    }

    pub fn add(&mut self, marker: Marker<'a>) {
        self.0.push(marker);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker<'a>> {
        self.0.iter()
    }

    pub fn group_id(&self) -> Option<GroupId> {
        self.0.iter().find_map(|m| match m {
            Marker::GroupedStatement { group } => Some(*group),
            _ => None,
        })
    }

    pub fn is_magic_desugar(&self) -> bool {
        self.0.iter().any(|m| matches!(m, Marker::MagicMethodDesugar))
    }

    pub fn is_builtin_desugar(&self) -> bool {
        self.0.iter().any(|m| matches!(m, Marker::BuiltinDesugar))
    }

    pub fn omit_parentheses(&self) -> bool {
        self.0.iter().any(|m| matches!(m, Marker::OmitParentheses))
    }

    pub fn implicit_none(&self) -> bool {
        self.0.iter().any(|m| matches!(m, Marker::ImplicitNone))
    }

    pub fn extra_padding(&self, location: PaddingLocation) -> Option<&Space<'a>> {
        self.0.iter().find_map(|m| match m {
            Marker::ExtraPadding { location: loc, space } if *loc == location => Some(space),
            _ => None,
        })
    }

    /// The space at `location`: the captured one if a marker is present,
    /// otherwise the location's default.
    pub fn padding_or_default(&self, location: PaddingLocation) -> Space<'a> {
        match self.extra_padding(location) {
            Some(space) => space.clone(),
            None => location.default_space(),
        }
    }

    /// Records `space` at `location`. A space equal to the location's default
    /// stores nothing (and clears any previous capture).
    pub fn set_extra_padding(&mut self, location: PaddingLocation, space: Space<'a>) {
        self.0.retain(
            |m| !matches!(m, Marker::ExtraPadding { location: loc, .. } if *loc == location),
        );
        if space != location.default_space() {
            self.0.push(Marker::ExtraPadding { location, space });
        }
    }
}
