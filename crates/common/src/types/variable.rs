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

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Default duration for which a changed variable stays highlighted.
pub const DEFAULT_CHANGE_HIGHLIGHT: Duration = Duration::from_millis(20);

/// One row of a variable table: a named variable, its rendered value and the
/// memory address reported by the debuggee.
///
/// The `changed` flag is purely cosmetic. It expires after a short window and
/// never removes the entry from its table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableTableEntry {
    name: String,
    value: String,
    address: String,
    #[serde(default)]
    changed: bool,
    #[serde(skip)]
    changed_expires_at: Option<Instant>,
}

impl VariableTableEntry {
    /// Create an unchanged entry.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            address: address.into(),
            changed: false,
            changed_expires_at: None,
        }
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rendered value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Memory address of the variable, used to detect aliasing across scopes.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// A copy of this entry carrying a new value. The changed state is not carried over.
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self::new(self.name.clone(), value, self.address.clone())
    }

    /// Whether the entry is highlighted as changed right now.
    pub fn is_changed(&self) -> bool {
        self.is_changed_at(Instant::now())
    }

    /// Whether the entry is highlighted as changed at `now`.
    pub fn is_changed_at(&self, now: Instant) -> bool {
        self.changed && self.changed_expires_at.is_some_and(|expires| now < expires)
    }

    /// Instant at which the current highlight expires, if one was ever set.
    pub fn changed_expires_at(&self) -> Option<Instant> {
        self.changed_expires_at
    }

    /// Mark the entry as changed, expiring `window` after now.
    pub fn mark_changed(&mut self, window: Duration) {
        self.mark_changed_at(Instant::now(), window);
    }

    /// Mark the entry as changed, expiring `window` after `now`.
    pub fn mark_changed_at(&mut self, now: Instant, window: Duration) {
        self.changed = true;
        self.changed_expires_at = Some(now + window);
    }

    /// Take over the changed flag and expiry of `other` without refreshing the timer.
    pub fn inherit_changed(&mut self, other: &Self) {
        self.changed = other.changed;
        self.changed_expires_at = other.changed_expires_at;
    }
}

/// Entries compare on (name, value, address) only; the highlight state is ignored.
impl PartialEq for VariableTableEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value && self.address == other.address
    }
}

impl Eq for VariableTableEntry {}
