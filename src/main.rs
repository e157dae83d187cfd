use anyhow::Result;
use clap::Parser;
use marin_adapter::cli::CliArgs;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    marin_adapter::run(args)
}
