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


//! LDB Engine - the session core of the Levels record-and-replay debugger
//!
//! The engine tracks the execution of one debuggee: its source position, call
//! stack, per-scope variables and breakpoints. It drives stepping over an
//! asynchronous line protocol and records every live state onto a tape, so
//! any call that was entered can be walked again without the debuggee.
//!
//! The view and the transport are collaborators behind traits:
//! [`MarkerProvider`] draws markers, [`DebuggeeChannel`] carries outbound
//! messages, and inbound data is fed through a [`MessageDispatcher`].

pub mod breakpoint;
pub use breakpoint::*;

pub mod channel;
pub use channel::*;

pub mod dispatch;
pub use dispatch::*;

pub mod events;
pub use events::*;

pub mod marker;
pub use marker::*;

pub mod recorder;
pub use recorder::*;

pub mod session;
pub use session::*;

pub mod state;
pub use state::*;

pub mod variable_table;
pub use variable_table::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
