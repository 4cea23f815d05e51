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

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifier of one method call, assigned by the session in push order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallId(pub usize);

impl CallId {
    /// The identifier following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for CallId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl FromStr for CallId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// One active frame on the debuggee's call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallStackEntry {
    call_id: CallId,
    method_name: String,
    params: Vec<String>,
    defining_class_id: Option<String>,
    defining_instance_id: Option<String>,
    /// Set when the frame was entered through "step over" or targeted by
    /// "run to end of method". Popping a marked frame ends auto-stepping.
    marked: bool,
}

impl CallStackEntry {
    /// Create an unmarked frame.
    pub fn new(
        call_id: CallId,
        method_name: impl Into<String>,
        params: Vec<String>,
        defining_class_id: Option<String>,
        defining_instance_id: Option<String>,
    ) -> Self {
        Self {
            call_id,
            method_name: method_name.into(),
            params,
            defining_class_id,
            defining_instance_id,
            marked: false,
        }
    }

    /// Identity assigned when the call was pushed.
    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    /// Name of the called method.
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Rendered arguments.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Method name followed by its arguments, e.g. `foo(a, b)`.
    pub fn signature(&self) -> String {
        format!("{}({})", self.method_name, self.params.join(", "))
    }

    /// Raw class identity field as sent by the debuggee (`DefiningClassId=...`).
    pub fn defining_class_id(&self) -> Option<&str> {
        self.defining_class_id.as_deref()
    }

    /// Raw instance identity field as sent by the debuggee (`DefiningInstanceId=...`).
    pub fn defining_instance_id(&self) -> Option<&str> {
        self.defining_instance_id.as_deref()
    }

    /// Whether popping this frame ends auto-stepping.
    pub fn is_marked(&self) -> bool {
        self.marked
    }

    /// Mark or unmark the frame for step over.
    pub fn set_marked(&mut self, marked: bool) {
        self.marked = marked;
    }
}

impl fmt::Display for CallStackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.call_id, self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature() {
        let entry = CallStackEntry::new(
            CallId(0),
            "foo",
            vec!["bar".to_string(), "baz".to_string()],
            None,
            None,
        );
        assert_eq!(entry.signature(), "foo(bar, baz)");

        let entry = CallStackEntry::new(CallId(1), "main", vec![], None, None);
        assert_eq!(entry.signature(), "main()");
        assert_eq!(entry.to_string(), "#1 main()");
    }

    #[test]
    fn test_call_id_parsing() {
        assert_eq!("7".parse::<CallId>().unwrap(), CallId(7));
        assert_eq!("#12".parse::<CallId>().unwrap(), CallId(12));
        assert!("abc".parse::<CallId>().is_err());
        assert_eq!(CallId(3).next(), CallId(4));
    }
}
