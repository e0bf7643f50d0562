// Copyright (c) python-lst contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! Statement-group derivation.
//!
//! Groups are never stored as a collection; they are derived on demand from
//! `GroupedStatement` markers by expanding outward from any member over equal
//! group ids. The result is the same from every member index.

use crate::markers::GroupId;
use crate::nodes::statement::Stmt;
use crate::nodes::Padded;

/// A contiguous run of statements sharing one [`GroupId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementGroup {
    pub first: usize,
    pub last: usize,
    pub id: GroupId,
}

impl StatementGroup {
    pub fn contains(&self, index: usize) -> bool {
        self.first <= index && index <= self.last
    }

    pub fn member_count(&self) -> usize {
        self.last - self.first + 1
    }
}

fn group_of(padded: &Padded<'_, Stmt<'_>>) -> Option<GroupId> {
    padded.elem.markers().group_id()
}

/// The group containing `index`, if that statement carries a group marker.
pub fn find_statement_group(
    statements: &[Padded<'_, Stmt<'_>>],
    index: usize,
) -> Option<StatementGroup> {
    let id = group_of(statements.get(index)?)?;
    let mut first = index;
    while first > 0 && group_of(&statements[first - 1]) == Some(id) {
        first -= 1;
    }
    let mut last = index;
    while last + 1 < statements.len() && group_of(&statements[last + 1]) == Some(id) {
        last += 1;
    }
    Some(StatementGroup { first, last, id })
}
