use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "marin_adapter")]
#[command(
    about = "Prompt formatting and tool-call decoding for function-calling evaluations",
    long_about = "Prompt formatting and tool-call decoding for function-calling evaluations\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default lookup path when --config is not provided:\n    1. $XDG_CONFIG_HOME/marin-adapter/config.toml\n    2. ~/.config/marin-adapter/config.toml"
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Write a session trace file regardless of the config setting.
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Render the prompt for a test entry JSON file.
    Prompt {
        #[arg(long, value_name = "FILE")]
        entry: PathBuf,
    },
    /// Decode tool calls from a raw model response (stdin when FILE is omitted).
    Decode {
        /// Print invocation expressions instead of call records.
        #[arg(long)]
        execute: bool,
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Append execution results to a JSON conversation as tool turns.
    Inject {
        #[arg(long, value_name = "FILE")]
        conversation: PathBuf,
        #[arg(long = "result", value_name = "TEXT")]
        results: Vec<String>,
        #[arg(long = "name", value_name = "CALL")]
        names: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::{CliArgs, CliCommand};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn parse_requires_a_subcommand() {
        assert!(CliArgs::try_parse_from(["marin_adapter"]).is_err());
    }

    #[test]
    fn parse_decode_defaults_to_stdin() {
        let args = CliArgs::try_parse_from(["marin_adapter", "decode"]).expect("parse");
        assert_eq!(args.config, None);
        assert!(!args.trace);
        assert_eq!(
            args.command,
            CliCommand::Decode {
                execute: false,
                input: None
            }
        );
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "marin_adapter",
            "decode",
            "--execute",
            "response.txt",
            "--config",
            "/tmp/custom.toml",
            "--trace",
        ])
        .expect("parse");
        assert_eq!(
            args.config.as_deref(),
            Some(std::path::Path::new("/tmp/custom.toml"))
        );
        assert!(args.trace);
        assert_eq!(
            args.command,
            CliCommand::Decode {
                execute: true,
                input: Some(PathBuf::from("response.txt"))
            }
        );
    }

    #[test]
    fn parse_inject_collects_repeated_pairs() {
        let args = CliArgs::try_parse_from([
            "marin_adapter",
            "inject",
            "--conversation",
            "turns.json",
            "--result",
            "42",
            "--name",
            "foo(x=1)",
            "--result",
            "7",
            "--name",
            "bar()",
        ])
        .expect("parse");
        assert_eq!(
            args.command,
            CliCommand::Inject {
                conversation: PathBuf::from("turns.json"),
                results: vec!["42".to_string(), "7".to_string()],
                names: vec!["foo(x=1)".to_string(), "bar()".to_string()],
            }
        );
    }
}
