use std::error::Error;
use std::fmt::{Display, Formatter};

use serde_json::Value;

use crate::protocol::{ConversationTurn, TOOL_RESPONSE_END, TOOL_RESPONSE_START, TOOL_ROLE};
use crate::repr::python_dict_repr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionError {
    LengthMismatch { results: usize, names: usize },
}

impl Display for InjectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { results, names } => write!(
                f,
                "got {results} execution results for {names} decoded calls"
            ),
        }
    }
}

impl Error for InjectionError {}

pub fn append_tool_results(
    turns: &mut Vec<ConversationTurn>,
    results: &[String],
    decoded_names: &[String],
) -> Result<(), InjectionError> {
    if results.len() != decoded_names.len() {
        return Err(InjectionError::LengthMismatch {
            results: results.len(),
            names: decoded_names.len(),
        });
    }

    turns.extend(
        results
            .iter()
            .zip(decoded_names)
            .map(|(result, name)| ConversationTurn::new(TOOL_ROLE, tool_response(name, result))),
    );
    Ok(())
}

fn tool_response(name: &str, result: &str) -> String {
    let record = python_dict_repr(&[
        ("name", Value::String(name.to_string())),
        ("content", Value::String(result.to_string())),
    ]);
    format!("{TOOL_RESPONSE_START}\n{record}\n{TOOL_RESPONSE_END}\n")
}
