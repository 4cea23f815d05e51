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


//! Recording tape of live states.
//!
//! Every live position update appends a snapshot of the session state. Each
//! method call remembers the tape offset at which it was entered, so that the
//! states recorded from that call onwards can be walked again without the
//! debuggee.

use std::collections::HashMap;

use ldb_common::types::CallId;
use thiserror::Error;
use tracing::debug;

use crate::state::DebuggerState;

/// Errors raised when entering replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// The call was never entered while recording.
    #[error("no recorded entry point for call {0}")]
    UnknownCall(CallId),
    /// The call was entered, but no state was recorded after its entry point yet.
    #[error("nothing recorded for call {0} yet")]
    NothingRecorded(CallId),
}

/// Append-only tape of states with a replay cursor.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    states: Vec<DebuggerState>,
    entry_points: HashMap<CallId, usize>,
    cursor: usize,
}

impl Recorder {
    /// Empty tape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state to the tape.
    pub fn record_state(&mut self, state: DebuggerState) {
        self.states.push(state);
    }

    /// Remember the current tape length as the entry point of `call_id`.
    ///
    /// The first state recorded after this call is the first state of the call.
    pub fn record_entry_point(&mut self, call_id: CallId) {
        debug!(%call_id, offset = self.states.len(), "Recorded entry point");
        self.entry_points.insert(call_id, self.states.len());
    }

    /// Move the cursor to the entry point of `call_id` and return the state there.
    ///
    /// The cursor is left untouched when an error is returned.
    pub fn start_replay(&mut self, call_id: CallId) -> Result<&DebuggerState, ReplayError> {
        let offset = *self.entry_points.get(&call_id).ok_or(ReplayError::UnknownCall(call_id))?;
        if offset >= self.states.len() {
            return Err(ReplayError::NothingRecorded(call_id));
        }
        self.cursor = offset;
        Ok(&self.states[offset])
    }

    /// Advance the cursor by one and return the state there.
    ///
    /// Returns `None` without moving at the end of the tape.
    pub fn replay_step(&mut self) -> Option<&DebuggerState> {
        if self.cursor + 1 >= self.states.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.states[self.cursor])
    }

    /// Whether the cursor sits on the last recorded state.
    pub fn end_of_tape(&self) -> bool {
        self.cursor + 1 == self.states.len()
    }

    /// State under the cursor.
    pub fn current(&self) -> Option<&DebuggerState> {
        self.states.get(self.cursor)
    }

    /// Offset of the replay cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Tape offset recorded for `call_id`.
    pub fn entry_point(&self, call_id: CallId) -> Option<usize> {
        self.entry_points.get(&call_id).copied()
    }

    /// All recorded states, oldest first.
    pub fn states(&self) -> &[DebuggerState] {
        &self.states
    }

    /// Number of recorded states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldb_common::types::Position;

    fn state_at(line: usize) -> DebuggerState {
        let mut state = DebuggerState::default();
        state.set_position(Position::new(line, 1));
        state
    }

    fn recorder_with(lines: &[usize]) -> Recorder {
        let mut recorder = Recorder::new();
        for &line in lines {
            recorder.record_state(state_at(line));
        }
        recorder
    }

    #[test]
    fn test_entry_point_and_replay() {
        let mut recorder = recorder_with(&[1, 2]);
        recorder.record_entry_point(CallId(5));
        recorder.record_state(state_at(3));
        recorder.record_state(state_at(4));

        assert_eq!(recorder.len(), 4);
        assert_eq!(recorder.entry_point(CallId(5)), Some(2));

        assert_eq!(recorder.start_replay(CallId(5)).unwrap().position().line(), 3);
        assert!(!recorder.end_of_tape());
        assert_eq!(recorder.replay_step().unwrap().position().line(), 4);
        assert!(recorder.end_of_tape());
    }

    #[test]
    fn test_replay_step_does_not_pass_end() {
        let mut recorder = recorder_with(&[1, 2]);
        recorder.record_entry_point(CallId(0));
        recorder.record_state(state_at(3));

        recorder.start_replay(CallId(0)).unwrap();
        assert!(recorder.end_of_tape());
        assert!(recorder.replay_step().is_none());
        assert_eq!(recorder.cursor(), 2);
        assert_eq!(recorder.current().unwrap().position().line(), 3);
    }

    #[test]
    fn test_start_replay_errors() {
        let mut recorder = recorder_with(&[1, 2, 3]);
        recorder.start_replay(CallId(0)).unwrap_err();
        assert_eq!(recorder.start_replay(CallId(9)), Err(ReplayError::UnknownCall(CallId(9))));

        recorder.replay_step();
        let cursor = recorder.cursor();
        recorder.record_entry_point(CallId(1));
        assert_eq!(recorder.start_replay(CallId(1)), Err(ReplayError::NothingRecorded(CallId(1))));
        assert_eq!(recorder.cursor(), cursor);
    }

    #[test]
    fn test_empty_tape() {
        let mut recorder = Recorder::new();
        assert!(recorder.is_empty());
        assert!(!recorder.end_of_tape());
        assert!(recorder.replay_step().is_none());
        assert!(recorder.current().is_none());
    }
}
