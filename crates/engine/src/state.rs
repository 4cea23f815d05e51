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


//! A snapshot of everything the session knows about the debuggee at one point in time.

use std::mem;

use ldb_common::types::{CallStackEntry, Position, VariableTableEntry};
use serde::{Deserialize, Serialize};

/// Execution state of the debuggee as seen by the session.
///
/// The call stack is ordered most recent first: index 0 is the innermost frame.
/// Every frame owns the table of its caller's scope in `shadow_tables`
/// (innermost last), so both stacks always have the same depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebuggerState {
    position: Position,
    call_stack: Vec<CallStackEntry>,
    variable_table: Vec<VariableTableEntry>,
    #[serde(default)]
    shadow_tables: Vec<Vec<VariableTableEntry>>,
    auto_step: bool,
    step_over_next_call: bool,
}

impl DebuggerState {
    /// Current source position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Move to `position`.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Frames, innermost first.
    pub fn call_stack(&self) -> &[CallStackEntry] {
        &self.call_stack
    }

    /// The innermost frame.
    pub fn top_frame(&self) -> Option<&CallStackEntry> {
        self.call_stack.first()
    }

    /// Whether no call is active.
    pub fn is_call_stack_empty(&self) -> bool {
        self.call_stack.is_empty()
    }

    /// Tables of the enclosing scopes, innermost last.
    pub fn shadow_tables(&self) -> &[Vec<VariableTableEntry>] {
        &self.shadow_tables
    }

    pub(crate) fn shadow_tables_mut(&mut self) -> &mut [Vec<VariableTableEntry>] {
        &mut self.shadow_tables
    }

    /// Push `frame` and give it an empty scope, shadowing the current table.
    pub(crate) fn enter_call(&mut self, frame: CallStackEntry) {
        self.call_stack.insert(0, frame);
        let table = mem::take(&mut self.variable_table);
        self.shadow_tables.push(table);
    }

    /// Pop the innermost frame and bring back the table of the enclosing scope.
    pub(crate) fn leave_call(&mut self) -> Option<CallStackEntry> {
        if self.call_stack.is_empty() {
            return None;
        }
        let frame = self.call_stack.remove(0);
        self.variable_table = self.shadow_tables.pop().unwrap_or_default();
        Some(frame)
    }

    pub(crate) fn top_frame_mut(&mut self) -> Option<&mut CallStackEntry> {
        self.call_stack.first_mut()
    }

    /// Variables of the innermost scope.
    pub fn variable_table(&self) -> &[VariableTableEntry] {
        &self.variable_table
    }

    pub(crate) fn variable_table_mut(&mut self) -> &mut Vec<VariableTableEntry> {
        &mut self.variable_table
    }

    pub(crate) fn set_variable_table(&mut self, table: Vec<VariableTableEntry>) {
        self.variable_table = table;
    }

    /// Whether the session keeps stepping without user input.
    pub fn is_auto_step(&self) -> bool {
        self.auto_step
    }

    pub(crate) fn set_auto_step(&mut self, auto_step: bool) {
        self.auto_step = auto_step;
    }

    /// Whether the next pushed frame gets marked for step over.
    pub fn is_step_over_next_call(&self) -> bool {
        self.step_over_next_call
    }

    pub(crate) fn set_step_over_next_call(&mut self, step_over_next_call: bool) {
        self.step_over_next_call = step_over_next_call;
    }
}
