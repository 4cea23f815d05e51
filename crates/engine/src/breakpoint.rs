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


//! Breakpoint set of a debugging session.
//!
//! Breakpoints are keyed by source line: at most one breakpoint exists per
//! line, and a breakpoint matches any position on its line. The manager also
//! keeps track of the single breakpoint whose marker is hidden because
//! execution currently sits on its line.

use std::{fmt, sync::Arc};

use ldb_common::types::Position;
use tracing::debug;

use crate::marker::{Marker, MarkerProvider};

/// A breakpoint and the view marker that currently represents it.
pub struct Breakpoint {
    position: Position,
    marker: Option<Box<dyn Marker>>,
}

impl fmt::Debug for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Breakpoint")
            .field("position", &self.position)
            .field("has_marker", &self.marker.is_some())
            .finish()
    }
}

impl Breakpoint {
    fn new(position: Position, marker: Box<dyn Marker>) -> Self {
        Self { position, marker: Some(marker) }
    }

    /// Position the breakpoint was set at.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether a marker is currently drawn for this breakpoint.
    pub fn has_marker(&self) -> bool {
        self.marker.is_some()
    }

    fn set_marker(&mut self, marker: Box<dyn Marker>) {
        self.destroy_marker();
        self.marker = Some(marker);
    }

    fn destroy_marker(&mut self) {
        if let Some(mut marker) = self.marker.take() {
            marker.destroy();
        }
    }
}

/// Owns the breakpoints of one session.
pub struct BreakpointManager {
    markers: Arc<dyn MarkerProvider>,
    breakpoints: Vec<Breakpoint>,
    enabled: bool,
    hidden: Option<Position>,
}

impl fmt::Debug for BreakpointManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakpointManager")
            .field("breakpoints", &self.breakpoints)
            .field("enabled", &self.enabled)
            .field("hidden", &self.hidden)
            .finish()
    }
}

impl BreakpointManager {
    /// Create an empty, enabled breakpoint set drawing through `markers`.
    pub fn new(markers: Arc<dyn MarkerProvider>) -> Self {
        Self { markers, breakpoints: Vec::new(), enabled: true, hidden: None }
    }

    /// Add a breakpoint on the line of `position`, or remove the existing one.
    ///
    /// Returns `true` if a breakpoint was created.
    pub fn toggle(&mut self, position: Position) -> bool {
        if let Some(index) = self.index_of(position) {
            let mut breakpoint = self.breakpoints.remove(index);
            breakpoint.destroy_marker();
            debug!(line = position.line(), "Removed breakpoint");
            false
        } else {
            let marker = self.markers.add_breakpoint_marker(position, self.enabled);
            self.breakpoints.push(Breakpoint::new(position, marker));
            debug!(line = position.line(), "Added breakpoint");
            true
        }
    }

    /// Remove every breakpoint and its marker.
    pub fn remove_all(&mut self) {
        for breakpoint in &mut self.breakpoints {
            breakpoint.destroy_marker();
        }
        self.breakpoints.clear();
        self.hidden = None;
    }

    /// Flip the global enabled flag and redraw every visible marker.
    ///
    /// Returns the new value of the flag. Membership is not touched, and a
    /// hidden breakpoint stays hidden.
    pub fn flip(&mut self) -> bool {
        self.enabled = !self.enabled;
        for breakpoint in &mut self.breakpoints {
            if breakpoint.has_marker() {
                let marker = self.markers.add_breakpoint_marker(breakpoint.position, self.enabled);
                breakpoint.set_marker(marker);
            }
        }
        self.enabled
    }

    /// Whether execution should stop at `position`.
    ///
    /// Always `false` while breakpoints are globally disabled.
    pub fn is_breakpoint(&self, position: Position) -> bool {
        self.enabled && self.index_of(position).is_some()
    }

    /// Breakpoint on the line of `position`, if any.
    pub fn get(&self, position: Position) -> Option<&Breakpoint> {
        self.index_of(position).map(|index| &self.breakpoints[index])
    }

    /// Hide the marker of the breakpoint on the line of `position`.
    ///
    /// At most one breakpoint is hidden at a time. Hiding the line that is
    /// already hidden does nothing.
    pub fn hide_breakpoint(&mut self, position: Position) {
        if self.hidden.is_some_and(|hidden| hidden.is_on_same_line(&position)) {
            return;
        }
        if let Some(index) = self.index_of(position) {
            let breakpoint = &mut self.breakpoints[index];
            breakpoint.destroy_marker();
            self.hidden = Some(breakpoint.position);
        }
    }

    /// Redraw the marker of the hidden breakpoint, if it still exists.
    pub fn restore_hidden_breakpoint(&mut self) {
        let Some(hidden) = self.hidden.take() else {
            return;
        };
        if let Some(index) = self.index_of(hidden) {
            let marker = self.markers.add_breakpoint_marker(hidden, self.enabled);
            self.breakpoints[index].set_marker(marker);
        }
    }

    /// Position of the currently hidden breakpoint.
    pub fn hidden_breakpoint(&self) -> Option<Position> {
        self.hidden
    }

    /// All breakpoints, in creation order.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Positions of all breakpoints, in creation order.
    pub fn positions(&self) -> Vec<Position> {
        self.breakpoints.iter().map(Breakpoint::position).collect()
    }

    /// Global enabled flag.
    pub fn are_breakpoints_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of breakpoints, enabled or not.
    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    /// Whether there are no breakpoints.
    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        self.breakpoints.iter().position(|bp| bp.position.is_on_same_line(&position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingMarkers;

    fn manager() -> (BreakpointManager, RecordingMarkers) {
        let markers = RecordingMarkers::default();
        (BreakpointManager::new(Arc::new(markers.clone())), markers)
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let (mut manager, markers) = manager();
        let p = Position::new(3, 1);

        assert!(manager.toggle(p));
        assert_eq!(manager.positions(), vec![p]);
        assert_eq!(markers.live_breakpoint_markers(), vec![(p, true)]);

        // Any column on the same line hits the same breakpoint.
        assert!(!manager.toggle(Position::new(3, 9)));
        assert!(manager.is_empty());
        assert!(markers.live_breakpoint_markers().is_empty());
    }

    #[test]
    fn test_is_breakpoint_respects_global_flag() {
        let (mut manager, markers) = manager();
        manager.toggle(Position::new(3, 1));
        assert!(manager.is_breakpoint(Position::new(3, 4)));
        assert!(!manager.is_breakpoint(Position::new(4, 1)));

        assert!(!manager.flip());
        assert!(!manager.is_breakpoint(Position::new(3, 1)));
        assert_eq!(manager.len(), 1);
        assert_eq!(markers.live_breakpoint_markers(), vec![(Position::new(3, 1), false)]);

        assert!(manager.flip());
        assert!(manager.is_breakpoint(Position::new(3, 1)));
        assert_eq!(markers.live_breakpoint_markers(), vec![(Position::new(3, 1), true)]);
    }

    #[test]
    fn test_hide_and_restore() {
        let (mut manager, markers) = manager();
        manager.toggle(Position::new(3, 1));
        manager.toggle(Position::new(5, 1));

        manager.hide_breakpoint(Position::new(3, 7));
        assert_eq!(manager.hidden_breakpoint(), Some(Position::new(3, 1)));
        assert!(!manager.get(Position::new(3, 1)).unwrap().has_marker());
        assert_eq!(markers.live_breakpoint_markers().len(), 1);

        // Hiding the same line again is a no-op.
        let created = markers.created_count();
        manager.hide_breakpoint(Position::new(3, 2));
        assert_eq!(markers.created_count(), created);

        // Flipping keeps the hidden breakpoint hidden.
        manager.flip();
        assert!(!manager.get(Position::new(3, 1)).unwrap().has_marker());

        manager.restore_hidden_breakpoint();
        assert_eq!(manager.hidden_breakpoint(), None);
        assert!(manager.get(Position::new(3, 1)).unwrap().has_marker());
        assert_eq!(markers.live_breakpoint_markers().len(), 2);
    }

    #[test]
    fn test_hide_without_breakpoint() {
        let (mut manager, _) = manager();
        manager.hide_breakpoint(Position::new(8, 1));
        assert_eq!(manager.hidden_breakpoint(), None);
        manager.restore_hidden_breakpoint();
    }

    #[test]
    fn test_remove_all() {
        let (mut manager, markers) = manager();
        manager.toggle(Position::new(1, 1));
        manager.toggle(Position::new(2, 1));
        manager.hide_breakpoint(Position::new(2, 1));

        manager.remove_all();
        assert!(manager.is_empty());
        assert!(markers.live_breakpoint_markers().is_empty());

        manager.restore_hidden_breakpoint();
        assert!(markers.live_breakpoint_markers().is_empty());
    }
}
