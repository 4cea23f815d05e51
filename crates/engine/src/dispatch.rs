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


//! Splits the inbound byte stream into protocol messages.

use ldb_common::protocol::{IncomingMessage, WireFormat};
use tracing::{debug, warn};

use crate::session::Debugger;

/// Turns raw chunks received from the debuggee into decoded messages.
///
/// Chunks may carry several messages, and a message may be split across
/// chunks. A trailing partial line is kept until its newline arrives.
#[derive(Debug, Clone, Default)]
pub struct MessageDispatcher {
    wire: WireFormat,
    pending: String,
}

impl MessageDispatcher {
    /// Dispatcher decoding with `wire`.
    pub fn new(wire: WireFormat) -> Self {
        Self { wire, pending: String::new() }
    }

    /// Decode every complete line of `chunk`, in order.
    ///
    /// Unknown categories and malformed messages are logged and skipped.
    pub fn feed(&mut self, chunk: &str) -> Vec<IncomingMessage> {
        self.pending.push_str(chunk);

        let mut messages = Vec::new();
        while let Some(newline) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=newline).collect();
            if let Some(message) = self.decode(&line) {
                messages.push(message);
            }
        }
        messages
    }

    /// Decode `chunk` and hand every message to `debugger`. Returns how many were handled.
    pub fn dispatch(&mut self, chunk: &str, debugger: &mut Debugger) -> usize {
        let messages = self.feed(chunk);
        let count = messages.len();
        for message in messages {
            let category = message.category();
            if let Err(error) = debugger.handle_message(message) {
                warn!(%category, %error, "Failed to handle message");
            }
        }
        count
    }

    /// Buffered bytes of an incomplete line.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Drop any incomplete line, e.g. after the connection was lost.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    fn decode(&self, line: &str) -> Option<IncomingMessage> {
        let line = line.trim_end_matches(['\r', '\n']);
        match self.wire.parse_line(line) {
            Ok(Some(message)) => Some(message),
            Ok(None) => {
                if !line.is_empty() {
                    debug!(line, "Dropping message of unknown category");
                }
                None
            }
            Err(error) => {
                warn!(%error, line, "Dropping malformed message");
                None
            }
        }
    }
}
