use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::repr::python_repr;

pub const BEGIN_OF_TEXT: &str = "<|begin_of_text|>";
pub const END_OF_TURN: &str = "<|eot_id|>";
pub const TOOLS_START: &str = "<tools>";
pub const TOOLS_END: &str = "</tools>";
pub const TOOL_CALL_START: &str = "<tool_call>";
pub const TOOL_CALL_END: &str = "</tool_call>";
pub const TOOL_RESPONSE_START: &str = "<tool_response>";
pub const TOOL_RESPONSE_END: &str = "</tool_response>";

pub const TOOL_ROLE: &str = "tool";
pub const ASSISTANT_ROLE: &str = "assistant";

pub fn role_header(role: &str) -> String {
    format!("<|start_header_id|>{role}<|end_header_id|>\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl CallRecord {
    pub fn to_invocation(&self) -> String {
        let args = self
            .arguments
            .iter()
            .map(|(key, value)| format!("{key}={}", python_repr(value)))
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({args})", self.name)
    }
}

impl Serialize for CallRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.name, &self.arguments)?;
        map.end()
    }
}
