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

//! Wire protocol spoken with the debuggee runtime
//!
//! Every message is a single UTF-8 line. The first field names the message
//! category, the remaining fields are separated by a fixed delimiter token.
//! Table updates additionally carry `key=value` attributes, split on the
//! assignment token.
//!
//! # Inbound (debuggee → session)
//!
//! ```text
//! UPDATEPOSITION|<line>|<column>
//! UPDATETABLE|<name>|<value>|<address>|scopeType=<..>|DefiningClassId=<..>|DefiningInstanceId=<..>
//! PUSHONTOCALLSTACK|<method>[|<arg>]*[|DefiningClassId=<..>|DefiningInstanceId=<..>]
//! POPFROMCALLSTACK
//! CHECKVALUE|<name>|<value>
//! ```
//!
//! # Outbound (session → debuggee)
//!
//! ```text
//! STEP
//! ADDBREAKPOINT|<line>|<column>
//! ```
//!
//! Unknown categories parse to `None` so that a newer debuggee cannot crash an
//! older session. Known categories with a malformed payload are reported as a
//! [`ProtocolError`].

mod incoming;
mod outgoing;

pub use incoming::*;
pub use outgoing::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Position;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: &str = "|";
/// Default assignment token used inside attribute fields.
pub const DEFAULT_ASSIGN_SYMBOL: &str = "=";

/// Errors raised while decoding a line of a known category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A mandatory field is absent.
    #[error("{category} message is missing field `{field}`")]
    MissingField {
        /// Category of the offending message.
        category: MessageCategory,
        /// Name of the missing field.
        field: &'static str,
    },
    /// A numeric field could not be parsed.
    #[error("{category} message has invalid {field} `{value}`")]
    InvalidNumber {
        /// Category of the offending message.
        category: MessageCategory,
        /// Name of the field.
        field: &'static str,
        /// Raw field content.
        value: String,
    },
}

/// Category tag at the start of every inbound line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCategory {
    /// `UPDATEPOSITION`
    UpdatePosition,
    /// `UPDATETABLE`
    UpdateTable,
    /// `PUSHONTOCALLSTACK`
    PushOntoCallStack,
    /// `POPFROMCALLSTACK`
    PopFromCallStack,
    /// `CHECKVALUE`
    CheckValue,
}

impl MessageCategory {
    /// Tag as it appears on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UpdatePosition => "UPDATEPOSITION",
            Self::UpdateTable => "UPDATETABLE",
            Self::PushOntoCallStack => "PUSHONTOCALLSTACK",
            Self::PopFromCallStack => "POPFROMCALLSTACK",
            Self::CheckValue => "CHECKVALUE",
        }
    }

    /// Look up a wire tag. Returns `None` for categories this session does not know.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "UPDATEPOSITION" => Some(Self::UpdatePosition),
            "UPDATETABLE" => Some(Self::UpdateTable),
            "PUSHONTOCALLSTACK" => Some(Self::PushOntoCallStack),
            "POPFROMCALLSTACK" => Some(Self::PopFromCallStack),
            "CHECKVALUE" => Some(Self::CheckValue),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delimiter configuration of the line protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFormat {
    /// Token separating fields of a message.
    pub delimiter: String,
    /// Token separating key and value inside an attribute field.
    pub assign_symbol: String,
}

impl Default for WireFormat {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            assign_symbol: DEFAULT_ASSIGN_SYMBOL.to_string(),
        }
    }
}

impl WireFormat {
    /// Create a wire format with custom tokens.
    pub fn new(delimiter: impl Into<String>, assign_symbol: impl Into<String>) -> Self {
        Self { delimiter: delimiter.into(), assign_symbol: assign_symbol.into() }
    }

    /// Decode a single line (without its terminating newline).
    ///
    /// Returns `Ok(None)` for blank lines and unknown categories.
    pub fn parse_line(&self, line: &str) -> Result<Option<IncomingMessage>, ProtocolError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Ok(None);
        }

        let (tag, payload) = match line.split_once(self.delimiter.as_str()) {
            Some((tag, payload)) => (tag, Some(payload)),
            None => (line, None),
        };
        let Some(category) = MessageCategory::from_tag(tag) else {
            return Ok(None);
        };
        let fields: Vec<&str> = match payload {
            Some(payload) => payload.split(self.delimiter.as_str()).collect(),
            None => Vec::new(),
        };

        let message = match category {
            MessageCategory::UpdatePosition => {
                let line = parse_number(category, "line", fields.first().copied())?;
                let column = parse_number(category, "column", fields.get(1).copied())?;
                IncomingMessage::UpdatePosition(Position::new(line, column))
            }
            MessageCategory::UpdateTable => {
                IncomingMessage::UpdateTable(UpdateTableMessage::from_fields(&fields, self)?)
            }
            MessageCategory::PushOntoCallStack => IncomingMessage::PushOntoCallStack(
                PushOntoCallStackMessage::from_fields(&fields)?,
            ),
            MessageCategory::PopFromCallStack => IncomingMessage::PopFromCallStack,
            MessageCategory::CheckValue => {
                IncomingMessage::CheckValue(CheckValueMessage::from_fields(&fields)?)
            }
        };

        Ok(Some(message))
    }

    /// Encode an inbound message the way the debuggee would send it, newline terminated.
    pub fn encode_incoming(&self, message: &IncomingMessage) -> String {
        let d = self.delimiter.as_str();
        let category = message.category();
        let mut line = category.as_str().to_string();
        match message {
            IncomingMessage::UpdatePosition(position) => {
                line.push_str(&format!("{d}{}{d}{}", position.line(), position.column()));
            }
            IncomingMessage::UpdateTable(msg) => {
                let a = self.assign_symbol.as_str();
                line.push_str(&format!("{d}{}{d}{}{d}{}", msg.name, msg.value, msg.address));
                line.push_str(&format!(
                    "{d}scopeType{a}{}{d}DefiningClassId{a}{}{d}DefiningInstanceId{a}{}",
                    msg.scope_type.as_deref().unwrap_or_default(),
                    msg.defining_class_id.as_deref().unwrap_or_default(),
                    msg.defining_instance_id.as_deref().unwrap_or_default(),
                ));
            }
            IncomingMessage::PushOntoCallStack(msg) => {
                line.push_str(d);
                line.push_str(&msg.method_name);
                for param in &msg.params {
                    line.push_str(d);
                    line.push_str(param);
                }
                if let Some(class_id) = &msg.defining_class_id {
                    line.push_str(&format!(
                        "{d}{class_id}{d}{}",
                        msg.defining_instance_id.as_deref().unwrap_or_default()
                    ));
                }
            }
            IncomingMessage::PopFromCallStack => {}
            IncomingMessage::CheckValue(msg) => {
                line.push_str(&format!("{d}{}{d}{}", msg.name, msg.value));
            }
        }
        line.push('\n');
        line
    }

    /// Encode an outbound message, newline terminated.
    pub fn encode_outgoing(&self, message: &OutgoingMessage) -> String {
        let d = self.delimiter.as_str();
        match message {
            OutgoingMessage::Step => format!("{STEP_TAG}\n"),
            OutgoingMessage::AddBreakpoint(position) => {
                format!("{ADD_BREAKPOINT_TAG}{d}{}{d}{}\n", position.line(), position.column())
            }
        }
    }

    /// Decode an outbound line. Mainly useful for debuggee-side tooling and tests.
    pub fn parse_outgoing(&self, line: &str) -> Option<OutgoingMessage> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields = line.split(self.delimiter.as_str());
        match fields.next()? {
            STEP_TAG => Some(OutgoingMessage::Step),
            ADD_BREAKPOINT_TAG => {
                let line = fields.next()?.trim().parse().ok()?;
                let column = fields.next()?.trim().parse().ok()?;
                Some(OutgoingMessage::AddBreakpoint(Position::new(line, column)))
            }
            _ => None,
        }
    }
}

fn parse_number(
    category: MessageCategory,
    field: &'static str,
    raw: Option<&str>,
) -> Result<usize, ProtocolError> {
    let raw = raw.ok_or(ProtocolError::MissingField { category, field })?;
    match raw.trim().parse::<usize>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ProtocolError::InvalidNumber { category, field, value: raw.to_string() }),
    }
}
