mod args;
mod commands;

pub use args::{CliArgs, CliCommand};
pub(crate) use commands::execute;
