//! annocurate command-line entry point

use annocurate_cli::commands::Commands;
use annocurate_cli::CliResult;
use clap::Parser;

/// Curate brat standoff annotations: remove duplicates and resolve overlaps
#[derive(Debug, Parser)]
#[command(name = "annocurate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> CliResult<()> {
    Cli::parse().command.execute()
}
