mod quotes;

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde_json::{Map, Value};

pub use quotes::{ApostropheToDoubleQuote, QuoteNormalization, QuoteNormalizationKind, Verbatim};

use crate::protocol::{CallRecord, TOOL_CALL_END, TOOL_CALL_START};
use crate::trace::SessionTrace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    InvalidJson {
        line: usize,
        message: String,
    },
    NotAnObject {
        line: usize,
    },
    MissingField {
        line: usize,
        field: &'static str,
    },
    InvalidField {
        line: usize,
        field: &'static str,
        expected: &'static str,
    },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson { line, message } => {
                write!(f, "line {line}: invalid tool call json: {message}")
            }
            Self::NotAnObject { line } => {
                write!(f, "line {line}: tool call must be a json object")
            }
            Self::MissingField { line, field } => {
                write!(f, "line {line}: tool call is missing '{field}'")
            }
            Self::InvalidField {
                line,
                field,
                expected,
            } => write!(f, "line {line}: tool call '{field}' must be {expected}"),
        }
    }
}

impl Error for DecodeError {}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    ArmedForOneLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Open,
    Close,
    Data(&'a str),
}

fn classify(line: &str) -> LineKind<'_> {
    if line == TOOL_CALL_START {
        LineKind::Open
    } else if line == TOOL_CALL_END {
        LineKind::Close
    } else {
        LineKind::Data(line)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseDecoder<N = ApostropheToDoubleQuote> {
    normalization: N,
    trace: Option<SessionTrace>,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: QuoteNormalization> ResponseDecoder<N> {
    pub fn with_normalization(normalization: N) -> Self {
        Self {
            normalization,
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: SessionTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn decode_calls(&self, raw_response: &str) -> DecodeResult<Vec<CallRecord>> {
        let mut state = ScanState::Outside;
        // Only feeds the trace: whether a block is textually open.
        let mut block_open = false;
        let mut calls = Vec::new();

        for (index, line) in raw_response.split('\n').enumerate() {
            let line_no = index + 1;
            match classify(line) {
                LineKind::Open => {
                    state = ScanState::ArmedForOneLine;
                    block_open = true;
                }
                LineKind::Close => {
                    state = ScanState::Outside;
                    block_open = false;
                }
                LineKind::Data(text) => {
                    if state == ScanState::ArmedForOneLine {
                        let call = self.parse_record(text, line_no).inspect_err(|err| {
                            if let Some(trace) = &self.trace {
                                trace.log_decode_error(&err.to_string());
                            }
                        })?;
                        if let Some(trace) = &self.trace {
                            trace.log_decoded_call(line_no, &call.to_invocation());
                        }
                        calls.push(call);
                    } else if block_open && let Some(trace) = &self.trace {
                        trace.log_skipped_line(line_no, text);
                    }
                    state = ScanState::Outside;
                }
            }
        }

        Ok(calls)
    }

    pub fn decode_invocations(&self, raw_response: &str) -> DecodeResult<Vec<String>> {
        let calls = self.decode_calls(raw_response)?;
        Ok(calls.iter().map(CallRecord::to_invocation).collect())
    }

    fn parse_record(&self, line: &str, line_no: usize) -> DecodeResult<CallRecord> {
        let normalized = self.normalization.normalize(line);
        let value: Value =
            serde_json::from_str(&normalized).map_err(|err| DecodeError::InvalidJson {
                line: line_no,
                message: err.to_string(),
            })?;
        let Value::Object(mut record) = value else {
            return Err(DecodeError::NotAnObject { line: line_no });
        };

        let name = match take_field(&mut record, "name", line_no)? {
            Value::String(name) => name,
            _ => {
                return Err(DecodeError::InvalidField {
                    line: line_no,
                    field: "name",
                    expected: "a string",
                });
            }
        };
        let arguments = match take_field(&mut record, "arguments", line_no)? {
            Value::Object(arguments) => arguments,
            _ => {
                return Err(DecodeError::InvalidField {
                    line: line_no,
                    field: "arguments",
                    expected: "an object",
                });
            }
        };

        Ok(CallRecord { name, arguments })
    }
}

fn take_field(
    record: &mut Map<String, Value>,
    field: &'static str,
    line_no: usize,
) -> DecodeResult<Value> {
    record
        .remove(field)
        .ok_or(DecodeError::MissingField {
            line: line_no,
            field,
        })
}
