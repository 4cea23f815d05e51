// LDB - Levels Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Sorting and change highlighting of variable tables.

use std::time::{Duration, Instant};

use ldb_common::types::{VariableTableEntry, DEFAULT_CHANGE_HIGHLIGHT};

/// Sort direction and highlight window applied to the variable tables of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableTablePolicy {
    ascending: bool,
    highlight_window: Duration,
}

impl Default for VariableTablePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGE_HIGHLIGHT)
    }
}

impl VariableTablePolicy {
    /// Ascending policy highlighting changes for `highlight_window`.
    pub fn new(highlight_window: Duration) -> Self {
        Self { ascending: true, highlight_window }
    }

    /// Whether tables sort A to Z.
    pub fn is_ascending(&self) -> bool {
        self.ascending
    }

    /// How long a change stays highlighted.
    pub fn highlight_window(&self) -> Duration {
        self.highlight_window
    }

    /// Reverse the sort direction.
    pub fn flip_sort_mode(&mut self) {
        self.ascending = !self.ascending;
    }

    /// Back to ascending order.
    pub fn reset_sort_mode(&mut self) {
        self.ascending = true;
    }

    /// Stable sort by name in the current direction.
    pub fn sort(&self, table: &mut [VariableTableEntry]) {
        if self.ascending {
            table.sort_by(|a, b| a.name().cmp(b.name()));
        } else {
            table.sort_by(|a, b| b.name().cmp(a.name()));
        }
    }

    /// Highlight the entries of `new` that differ from `old`.
    ///
    /// An entry equal to one in `old` keeps that entry's highlight, including
    /// its original expiry, as long as it has not expired. Every other entry
    /// gets a fresh highlight.
    pub fn mark_changed_entries(&self, new: &mut [VariableTableEntry], old: &[VariableTableEntry]) {
        self.mark_changed_entries_at(new, old, Instant::now());
    }

    /// [`mark_changed_entries`](Self::mark_changed_entries) with an explicit clock.
    pub fn mark_changed_entries_at(
        &self,
        new: &mut [VariableTableEntry],
        old: &[VariableTableEntry],
        now: Instant,
    ) {
        for entry in new.iter_mut() {
            match old.iter().find(|previous| **previous == *entry) {
                Some(previous) => {
                    if previous.is_changed_at(now) {
                        entry.inherit_changed(previous);
                    }
                }
                None => entry.mark_changed_at(now, self.highlight_window),
            }
        }
    }
}
