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


//! In-memory collaborators for driving a session in tests.
//!
//! [`RecordingChannel`] keeps every outbound message and [`RecordingMarkers`]
//! keeps track of which markers are currently drawn. Both are cheap to clone
//! and share their recordings between clones, so a test can hand one copy to
//! the session and inspect the other.

use std::sync::Arc;

use ldb_common::types::Position;
use parking_lot::Mutex;

use crate::{
    channel::{ChannelError, DebuggeeChannel},
    marker::{Marker, MarkerProvider},
};

#[derive(Debug, Default)]
struct ChannelLog {
    connected: bool,
    connects: usize,
    fail_sends: bool,
    sent: Vec<String>,
}

/// A debuggee channel that records outbound messages instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    log: Arc<Mutex<ChannelLog>>,
}

impl RecordingChannel {
    /// Every message sent so far, in order.
    pub fn sent(&self) -> Vec<String> {
        self.log.lock().sent.clone()
    }

    /// Forget the recorded messages.
    pub fn clear(&self) {
        self.log.lock().sent.clear();
    }

    /// Whether `connect` was called without a later `disconnect`.
    pub fn is_connected(&self) -> bool {
        self.log.lock().connected
    }

    /// How many times `connect` was called.
    pub fn connect_count(&self) -> usize {
        self.log.lock().connects
    }

    /// Make every following send fail as if the connection was lost.
    pub fn fail_sends(&self, fail: bool) {
        self.log.lock().fail_sends = fail;
    }
}

impl DebuggeeChannel for RecordingChannel {
    fn connect(&mut self) -> Result<(), ChannelError> {
        let mut log = self.log.lock();
        log.connected = true;
        log.connects += 1;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.log.lock().connected = false;
    }

    fn send_message(&mut self, message: &str) -> Result<(), ChannelError> {
        let mut log = self.log.lock();
        if !log.connected {
            return Err(ChannelError::NotConnected);
        }
        if log.fail_sends {
            return Err(ChannelError::Closed);
        }
        log.sent.push(message.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Breakpoint { enabled: bool },
    Position,
}

#[derive(Debug, Default)]
struct MarkerLog {
    created: usize,
    live: Vec<(usize, MarkerKind, Position)>,
}

/// A marker provider that remembers which markers are alive.
#[derive(Debug, Clone, Default)]
pub struct RecordingMarkers {
    log: Arc<Mutex<MarkerLog>>,
}

impl RecordingMarkers {
    fn add(&self, kind: MarkerKind, position: Position) -> Box<dyn Marker> {
        let mut log = self.log.lock();
        let id = log.created;
        log.created += 1;
        log.live.push((id, kind, position));
        Box::new(RecordedMarker { id, log: Arc::clone(&self.log), destroyed: false })
    }

    /// Live breakpoint markers and whether they were drawn as enabled, in creation order.
    pub fn live_breakpoint_markers(&self) -> Vec<(Position, bool)> {
        self.log
            .lock()
            .live
            .iter()
            .filter_map(|(_, kind, position)| match kind {
                MarkerKind::Breakpoint { enabled } => Some((*position, *enabled)),
                MarkerKind::Position => None,
            })
            .collect()
    }

    /// Live position markers, in creation order.
    pub fn live_position_markers(&self) -> Vec<Position> {
        self.log
            .lock()
            .live
            .iter()
            .filter(|(_, kind, _)| *kind == MarkerKind::Position)
            .map(|(_, _, position)| *position)
            .collect()
    }

    /// Total number of markers ever created.
    pub fn created_count(&self) -> usize {
        self.log.lock().created
    }
}

impl MarkerProvider for RecordingMarkers {
    fn add_breakpoint_marker(&self, position: Position, enabled: bool) -> Box<dyn Marker> {
        self.add(MarkerKind::Breakpoint { enabled }, position)
    }

    fn add_position_marker(&self, position: Position) -> Box<dyn Marker> {
        self.add(MarkerKind::Position, position)
    }
}

struct RecordedMarker {
    id: usize,
    log: Arc<Mutex<MarkerLog>>,
    destroyed: bool,
}

impl Marker for RecordedMarker {
    fn destroy(&mut self) {
        assert!(!self.destroyed, "marker {} destroyed twice", self.id);
        self.destroyed = true;
        self.log.lock().live.retain(|(id, _, _)| *id != self.id);
    }
}
