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

use super::{MessageCategory, ProtocolError, WireFormat};
use crate::types::{CallId, CallStackEntry, Position, VariableTableEntry};

const DEFINING_CLASS_ID: &str = "DefiningClassId";
const DEFINING_INSTANCE_ID: &str = "DefiningInstanceId";
const SCOPE_TYPE: &str = "scopeType";

/// A decoded message sent by the debuggee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomingMessage {
    /// Execution moved to a new source position.
    UpdatePosition(Position),
    /// A variable of the current scope was created or written.
    UpdateTable(UpdateTableMessage),
    /// A method call started.
    PushOntoCallStack(PushOntoCallStackMessage),
    /// The innermost method call returned.
    PopFromCallStack,
    /// The debuggee reports the current value of a named variable.
    CheckValue(CheckValueMessage),
}

impl IncomingMessage {
    /// Category tag of this message.
    pub fn category(&self) -> MessageCategory {
        match self {
            Self::UpdatePosition(_) => MessageCategory::UpdatePosition,
            Self::UpdateTable(_) => MessageCategory::UpdateTable,
            Self::PushOntoCallStack(_) => MessageCategory::PushOntoCallStack,
            Self::PopFromCallStack => MessageCategory::PopFromCallStack,
            Self::CheckValue(_) => MessageCategory::CheckValue,
        }
    }
}

/// Payload of `UPDATETABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTableMessage {
    /// Variable name
    pub name: String,
    /// Rendered value
    pub value: String,
    /// Memory address
    pub address: String,
    /// Scope kind reported by the runtime (local, instance, ...)
    pub scope_type: Option<String>,
    /// Class identity, value part only
    pub defining_class_id: Option<String>,
    /// Instance identity, value part only
    pub defining_instance_id: Option<String>,
}

impl UpdateTableMessage {
    pub(super) fn from_fields(fields: &[&str], wire: &WireFormat) -> Result<Self, ProtocolError> {
        let category = MessageCategory::UpdateTable;
        let field = |index: usize, name: &'static str| {
            fields
                .get(index)
                .map(|f| f.to_string())
                .ok_or(ProtocolError::MissingField { category, field: name })
        };

        let mut msg = Self {
            name: field(0, "name")?,
            value: field(1, "value")?,
            address: field(2, "address")?,
            scope_type: None,
            defining_class_id: None,
            defining_instance_id: None,
        };

        // Attributes are matched by key so that reordered or missing ones do not shift the rest.
        for attribute in fields.iter().skip(3) {
            let Some((key, value)) = attribute.split_once(wire.assign_symbol.as_str()) else {
                continue;
            };
            match key {
                SCOPE_TYPE => msg.scope_type = Some(value.to_string()),
                DEFINING_CLASS_ID => msg.defining_class_id = Some(value.to_string()),
                DEFINING_INSTANCE_ID => msg.defining_instance_id = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(msg)
    }

    /// The variable-table row described by this message.
    pub fn to_entry(&self) -> VariableTableEntry {
        VariableTableEntry::new(&self.name, &self.value, &self.address)
    }
}

/// Payload of `PUSHONTOCALLSTACK`.
///
/// The identity fields are kept verbatim (`DefiningClassId=42`), the way call
/// frames display them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushOntoCallStackMessage {
    /// Name of the called method
    pub method_name: String,
    /// Rendered arguments
    pub params: Vec<String>,
    /// Raw class identity field
    pub defining_class_id: Option<String>,
    /// Raw instance identity field
    pub defining_instance_id: Option<String>,
}

impl PushOntoCallStackMessage {
    pub(super) fn from_fields(fields: &[&str]) -> Result<Self, ProtocolError> {
        let method_name = fields.first().ok_or(ProtocolError::MissingField {
            category: MessageCategory::PushOntoCallStack,
            field: "method",
        })?;

        let mut params = Vec::new();
        let mut defining_class_id = None;
        let mut defining_instance_id = None;
        for (index, field) in fields.iter().enumerate().skip(1) {
            if field.starts_with(DEFINING_CLASS_ID) {
                defining_class_id = Some(field.to_string());
                defining_instance_id = fields.get(index + 1).map(|f| f.to_string());
                break;
            }
            params.push(field.to_string());
        }

        Ok(Self { method_name: method_name.to_string(), params, defining_class_id, defining_instance_id })
    }

    /// Build the call-stack frame for this call under the given identity.
    pub fn into_entry(self, call_id: CallId) -> CallStackEntry {
        CallStackEntry::new(
            call_id,
            self.method_name,
            self.params,
            self.defining_class_id,
            self.defining_instance_id,
        )
    }
}

/// Payload of `CHECKVALUE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckValueMessage {
    /// Variable name
    pub name: String,
    /// Current value
    pub value: String,
}

impl CheckValueMessage {
    pub(super) fn from_fields(fields: &[&str]) -> Result<Self, ProtocolError> {
        let category = MessageCategory::CheckValue;
        let name = fields.first().ok_or(ProtocolError::MissingField { category, field: "name" })?;
        let value = fields.get(1).ok_or(ProtocolError::MissingField { category, field: "value" })?;
        Ok(Self { name: name.to_string(), value: value.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_with_identity() {
        let wire = WireFormat::default();
        let msg = wire
            .parse_line("PUSHONTOCALLSTACK|foo|bar|DefiningClassId=42|DefiningInstanceId=7")
            .unwrap();
        let Some(IncomingMessage::PushOntoCallStack(push)) = msg else {
            panic!("Expected PushOntoCallStack");
        };

        assert_eq!(push.method_name, "foo");
        assert_eq!(push.params, vec!["bar".to_string()]);

        let entry = push.into_entry(CallId(0));
        assert_eq!(entry.call_id(), CallId(0));
        assert_eq!(entry.signature(), "foo(bar)");
        assert_eq!(entry.defining_class_id(), Some("DefiningClassId=42"));
        assert_eq!(entry.defining_instance_id(), Some("DefiningInstanceId=7"));
        assert!(!entry.is_marked());
    }

    #[test]
    fn test_push_without_identity() {
        let wire = WireFormat::default();
        let Some(IncomingMessage::PushOntoCallStack(push)) =
            wire.parse_line("PUSHONTOCALLSTACK|sum|1|2|3").unwrap()
        else {
            panic!("Expected PushOntoCallStack");
        };
        assert_eq!(push.params.len(), 3);
        assert!(push.defining_class_id.is_none());
        assert!(push.defining_instance_id.is_none());

        assert!(wire.parse_line("PUSHONTOCALLSTACK").is_err());
    }

    #[test]
    fn test_update_table() {
        let wire = WireFormat::default();
        let Some(IncomingMessage::UpdateTable(msg)) = wire
            .parse_line("UPDATETABLE|x|5|0x55|scopeType=local|DefiningClassId=1|DefiningInstanceId=2")
            .unwrap()
        else {
            panic!("Expected UpdateTable");
        };

        assert_eq!(msg.name, "x");
        assert_eq!(msg.value, "5");
        assert_eq!(msg.address, "0x55");
        assert_eq!(msg.scope_type.as_deref(), Some("local"));
        assert_eq!(msg.to_entry(), VariableTableEntry::new("x", "5", "0x55"));
    }

    #[test]
    fn test_update_table_without_attributes() {
        let wire = WireFormat::default();
        let Some(IncomingMessage::UpdateTable(msg)) =
            wire.parse_line("UPDATETABLE|x|5|0x55").unwrap()
        else {
            panic!("Expected UpdateTable");
        };
        assert!(msg.scope_type.is_none());

        assert_eq!(
            wire.parse_line("UPDATETABLE|x|5"),
            Err(ProtocolError::MissingField {
                category: MessageCategory::UpdateTable,
                field: "address"
            })
        );
    }
}
