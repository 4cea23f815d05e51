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


//! Connection to the debuggee process.

use thiserror::Error;

/// Errors reported by a [`DebuggeeChannel`].
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel has not been connected yet, or was disconnected.
    #[error("channel is not connected")]
    NotConnected,
    /// The debuggee went away.
    #[error("connection to the debuggee was closed")]
    Closed,
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Transport carrying the line protocol to and from the debuggee.
///
/// Inbound data does not flow through this trait. Whoever owns the transport
/// feeds received bytes to a [`MessageDispatcher`](crate::MessageDispatcher)
/// and reports failures through
/// [`Debugger::handle_channel_error`](crate::Debugger::handle_channel_error).
pub trait DebuggeeChannel: Send {
    /// Open the connection.
    fn connect(&mut self) -> Result<(), ChannelError>;

    /// Close the connection. Calling this on a closed channel does nothing.
    fn disconnect(&mut self);

    /// Send one encoded, newline-terminated message. Must not block on the debuggee.
    fn send_message(&mut self, message: &str) -> Result<(), ChannelError>;
}
