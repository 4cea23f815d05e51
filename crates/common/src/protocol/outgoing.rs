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

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Wire tag of the step signal.
pub const STEP_TAG: &str = "STEP";
/// Wire tag announcing a breakpoint to the debuggee.
pub const ADD_BREAKPOINT_TAG: &str = "ADDBREAKPOINT";

/// A message the session sends to the debuggee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutgoingMessage {
    /// Execute until the next reported position.
    Step,
    /// Register a breakpoint at the given position.
    AddBreakpoint(Position),
}
