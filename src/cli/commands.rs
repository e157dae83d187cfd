use anyhow::{Result, anyhow};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use super::CliCommand;
use crate::handler::{InferenceData, PromptingHandler, TestEntry};
use crate::protocol::ConversationTurn;

/// Runs one subcommand and returns the text to print on stdout.
pub(crate) fn execute<H: PromptingHandler>(handler: &H, command: &CliCommand) -> Result<String> {
    match command {
        CliCommand::Prompt { entry } => render_prompt(handler, entry),
        CliCommand::Decode { execute, input } => {
            let raw = match input {
                Some(path) => read_text(path)?,
                None => read_stdin()?,
            };
            decode(handler, &raw, *execute)
        }
        CliCommand::Inject {
            conversation,
            results,
            names,
        } => inject(handler, conversation, results, names),
    }
}

fn render_prompt<H: PromptingHandler>(handler: &H, entry_path: &Path) -> Result<String> {
    let text = read_text(entry_path)?;
    let entry: TestEntry = serde_json::from_str(&text).map_err(|err| {
        anyhow!(
            "Failed to parse test entry {}: {err}",
            entry_path.display()
        )
    })?;

    let mut data = handler.pre_query_processing(&entry);
    if let Some(first_turns) = entry.question.first() {
        data.message.extend(first_turns.iter().cloned());
    }
    Ok(handler.format_prompt(&data.message, &data.function))
}

pub(crate) fn decode<H: PromptingHandler>(handler: &H, raw: &str, execute: bool) -> Result<String> {
    let rendered = if execute {
        let invocations = handler
            .decode_invocations(raw)
            .map_err(|err| anyhow!("Failed to decode response: {err}"))?;
        serde_json::to_string_pretty(&invocations)?
    } else {
        let calls = handler
            .decode_calls(raw)
            .map_err(|err| anyhow!("Failed to decode response: {err}"))?;
        serde_json::to_string_pretty(&calls)?
    };
    Ok(format!("{rendered}\n"))
}

fn inject<H: PromptingHandler>(
    handler: &H,
    conversation_path: &Path,
    results: &[String],
    names: &[String],
) -> Result<String> {
    let text = read_text(conversation_path)?;
    let message: Vec<ConversationTurn> = serde_json::from_str(&text).map_err(|err| {
        anyhow!(
            "Failed to parse conversation {}: {err}",
            conversation_path.display()
        )
    })?;

    let data = handler
        .add_execution_results(
            InferenceData {
                message,
                function: Vec::new(),
            },
            results,
            names,
        )
        .map_err(|err| anyhow!("Failed to append tool results: {err}"))?;
    Ok(format!("{}\n", serde_json::to_string_pretty(&data.message)?))
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|err| anyhow!("Failed to read {}: {err}", path.display()))
}

fn read_stdin() -> Result<String> {
    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .map_err(|err| anyhow!("Failed to read response from stdin: {err}"))?;
    Ok(raw)
}
