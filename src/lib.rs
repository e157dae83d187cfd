pub mod cli;
pub mod config;
pub mod declarations;
pub mod decode;
pub mod handler;
pub mod prompt;
pub mod protocol;
pub mod repr;
pub mod trace;

use anyhow::Result;
use cli::CliArgs;
use config::AppConfig;
use handler::MarinHandler;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};
use trace::SessionTrace;

pub use handler::{InferenceData, PromptingHandler, TestEntry};
pub use protocol::{CallRecord, ConversationTurn};

pub fn run(args: CliArgs) -> Result<()> {
    let config = AppConfig::load_with_path(args.config.as_deref())?;
    let handler = build_handler(&config, args.trace)?;

    let output = cli::execute(&handler, &args.command)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn build_handler(config: &AppConfig, force_trace: bool) -> Result<MarinHandler> {
    let handler = MarinHandler::new(config.quote_normalization, config.declaration_normalization);
    if !(config.trace || force_trace) {
        return Ok(handler);
    }

    let trace = SessionTrace::create(&generate_session_id())?;
    Ok(handler.with_trace(trace))
}

fn generate_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    format!("{millis:x}-{:x}", std::process::id())
}

#[cfg(test)]
mod tests {
    use super::{build_handler, generate_session_id};
    use crate::config::AppConfig;
    use crate::handler::PromptingHandler;
    use serial_test::serial;
    use std::env;
    use std::fs;

    #[test]
    fn generated_session_id_has_expected_shape() {
        let session_id = generate_session_id();
        let mut parts = session_id.split('-');
        let ts = parts.next().expect("timestamp segment");
        let pid = parts.next().expect("pid segment");
        assert!(
            parts.next().is_none(),
            "session id should contain one delimiter"
        );
        assert!(!ts.is_empty(), "timestamp segment should not be empty");
        assert!(!pid.is_empty(), "pid segment should not be empty");
        assert!(
            ts.chars().all(|ch| ch.is_ascii_hexdigit()),
            "timestamp segment should be hex"
        );
        assert!(
            pid.chars().all(|ch| ch.is_ascii_hexdigit()),
            "pid segment should be hex"
        );
    }

    #[test]
    #[serial]
    fn forced_trace_writes_under_xdg_state_home() {
        let tmp = tempfile::tempdir().expect("tempdir");
        unsafe {
            env::set_var("XDG_STATE_HOME", tmp.path());
        }

        let handler = build_handler(&AppConfig::default(), true).expect("handler");
        handler
            .decode_calls("<tool_call>\n{'name': 'f', 'arguments': {}}")
            .expect("decode");
        unsafe {
            env::remove_var("XDG_STATE_HOME");
        }

        let trace_dir = tmp.path().join("marin-adapter/traces");
        let entries: Vec<_> = fs::read_dir(&trace_dir)
            .expect("trace dir")
            .map(|entry| entry.expect("entry").path())
            .collect();
        assert_eq!(entries.len(), 1);
        let content = fs::read_to_string(&entries[0]).expect("read trace");
        assert!(content.contains("[decode.call] line 2: f()"), "{content}");
    }

    #[test]
    #[serial]
    fn trace_is_off_by_default() {
        let tmp = tempfile::tempdir().expect("tempdir");
        unsafe {
            env::set_var("XDG_STATE_HOME", tmp.path());
        }

        build_handler(&AppConfig::default(), false).expect("handler");
        unsafe {
            env::remove_var("XDG_STATE_HOME");
        }

        assert!(!tmp.path().join("marin-adapter").exists());
    }
}
