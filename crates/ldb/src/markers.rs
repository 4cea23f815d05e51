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


//! Editor decorations for a terminal front-end
//!
//! There is no editor gutter in a console, so markers are reported through the
//! log instead of drawn.

use ldb_common::types::Position;
use ldb_engine::{Marker, MarkerProvider};
use tracing::debug;

/// Marker provider that logs marker creation and removal.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMarkers;

impl MarkerProvider for LogMarkers {
    fn add_breakpoint_marker(&self, position: Position, enabled: bool) -> Box<dyn Marker> {
        let kind = if enabled { "breakpoint" } else { "disabled breakpoint" };
        debug!(%position, kind, "Marker added");
        Box::new(LogMarker { kind, position })
    }

    fn add_position_marker(&self, position: Position) -> Box<dyn Marker> {
        debug!(%position, kind = "position", "Marker added");
        Box::new(LogMarker { kind: "position", position })
    }
}

#[derive(Debug)]
struct LogMarker {
    kind: &'static str,
    position: Position,
}

impl Marker for LogMarker {
    fn destroy(&mut self) {
        debug!(position = %self.position, kind = self.kind, "Marker removed");
    }
}
