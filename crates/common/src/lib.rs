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

// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! LDB Common - Shared functionality for LDB components
//!
//! This crate provides the value types, the debuggee wire protocol and the
//! logging setup used by both the session engine and the `ldb` binary.

/// Common types used throughout LDB: positions, variable-table rows and call-stack frames
pub mod types;

/// Logging setup and utilities for consistent logging across LDB components
pub mod logging;
/// Line-oriented wire protocol spoken with the debuggee runtime
pub mod protocol;

pub use logging::*;
pub use protocol::*;
