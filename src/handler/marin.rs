use serde_json::Value;

use super::{InferenceData, InjectionError, PromptingHandler, TestEntry, append_tool_results};
use crate::declarations::{DeclarationNormalizer, DeclarationNormalizerKind, test_category};
use crate::decode::{DecodeResult, QuoteNormalizationKind, ResponseDecoder};
use crate::prompt::build_prompt;
use crate::protocol::{CallRecord, ConversationTurn};
use crate::repr::python_repr;
use crate::trace::SessionTrace;

#[derive(Debug, Clone, Default)]
pub struct MarinHandler {
    decoder: ResponseDecoder<QuoteNormalizationKind>,
    declarations: DeclarationNormalizerKind,
    trace: Option<SessionTrace>,
}

impl MarinHandler {
    pub fn new(quotes: QuoteNormalizationKind, declarations: DeclarationNormalizerKind) -> Self {
        Self {
            decoder: ResponseDecoder::with_normalization(quotes),
            declarations,
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: SessionTrace) -> Self {
        self.decoder = self.decoder.with_trace(trace.clone());
        self.trace = Some(trace);
        self
    }

    fn log_response(&self, raw_response: &str) {
        if let Some(trace) = &self.trace {
            trace.log_response(raw_response);
        }
    }
}

impl PromptingHandler for MarinHandler {
    fn pre_query_processing(&self, entry: &TestEntry) -> InferenceData {
        let category = test_category(&entry.id);
        let function = self.declarations.normalize(entry.function.clone(), category);

        // The system prompt lives in the template, so no message is seeded.
        InferenceData {
            message: Vec::new(),
            function,
        }
    }

    fn format_prompt(&self, turns: &[ConversationTurn], functions: &[Value]) -> String {
        let embedded = python_repr(&Value::Array(functions.to_vec()));
        let prompt = build_prompt(turns, &embedded);
        if let Some(trace) = &self.trace {
            trace.log_prompt(&prompt);
        }
        prompt
    }

    fn decode_calls(&self, raw_response: &str) -> DecodeResult<Vec<CallRecord>> {
        self.log_response(raw_response);
        self.decoder.decode_calls(raw_response)
    }

    fn decode_invocations(&self, raw_response: &str) -> DecodeResult<Vec<String>> {
        self.log_response(raw_response);
        self.decoder.decode_invocations(raw_response)
    }

    fn add_execution_results(
        &self,
        mut data: InferenceData,
        execution_results: &[String],
        decoded_responses: &[String],
    ) -> Result<InferenceData, InjectionError> {
        append_tool_results(&mut data.message, execution_results, decoded_responses)?;
        if let Some(trace) = &self.trace {
            for (name, result) in decoded_responses.iter().zip(execution_results) {
                trace.log_tool_result(name, result);
            }
        }
        Ok(data)
    }
}
