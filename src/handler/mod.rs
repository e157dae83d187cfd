mod inject;
mod marin;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use inject::{InjectionError, append_tool_results};
pub use marin::MarinHandler;

use crate::decode::DecodeResult;
use crate::protocol::{CallRecord, ConversationTurn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestEntry {
    pub id: String,
    #[serde(default)]
    pub function: Vec<Value>,
    #[serde(default)]
    pub question: Vec<Vec<ConversationTurn>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceData {
    pub message: Vec<ConversationTurn>,
    pub function: Vec<Value>,
}

pub trait PromptingHandler {
    fn pre_query_processing(&self, entry: &TestEntry) -> InferenceData;

    fn format_prompt(&self, turns: &[ConversationTurn], functions: &[Value]) -> String;

    fn decode_calls(&self, raw_response: &str) -> DecodeResult<Vec<CallRecord>>;

    fn decode_invocations(&self, raw_response: &str) -> DecodeResult<Vec<String>>;

    fn add_execution_results(
        &self,
        data: InferenceData,
        execution_results: &[String],
        decoded_responses: &[String],
    ) -> Result<InferenceData, InjectionError>;
}
