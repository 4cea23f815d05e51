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


//! Visual markers owned by the view collaborator.
//!
//! The session never draws anything itself. It asks a [`MarkerProvider`] for
//! marker handles and destroys them again once they are stale. A handle is
//! only valid until [`Marker::destroy`] is called on it.

use ldb_common::types::Position;

/// A handle to a marker drawn by the view.
pub trait Marker: Send {
    /// Remove the marker from the view.
    fn destroy(&mut self);
}

/// Creates markers on behalf of the session.
pub trait MarkerProvider: Send + Sync {
    /// Draw a breakpoint marker, rendered differently when breakpoints are globally disabled.
    fn add_breakpoint_marker(&self, position: Position, enabled: bool) -> Box<dyn Marker>;

    /// Draw the marker of the currently executing position.
    fn add_position_marker(&self, position: Position) -> Box<dyn Marker>;
}
