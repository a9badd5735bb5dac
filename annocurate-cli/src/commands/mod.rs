//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod curate;
pub mod export;
pub mod generate_config;
pub mod list;
pub mod overlaps;
pub mod validate;

use curate::Stages;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Remove duplicates and resolve overlapping annotations
    Curate(curate::CurateArgs),

    /// Remove exact duplicate records only
    Dedup(curate::CurateArgs),

    /// Resolve identical spans and overlaps only
    Resolve(curate::CurateArgs),

    /// Print overlapping annotation pairs without changing anything
    Overlaps(overlaps::OverlapsArgs),

    /// Convert importer hand-off JSON to standoff annotations
    Export(export::ExportArgs),

    /// Validate a priority table
    Validate(validate::ValidateArgs),

    /// Write a priority table template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// Print the active priority rules
    Rules(list::RulesArgs),

    /// List available report formats
    Formats,
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Curate(args) => args.execute(Stages::Configured),
            Commands::Dedup(args) => args.execute(Stages::DedupOnly),
            Commands::Resolve(args) => args.execute(Stages::ResolveOnly),
            Commands::Overlaps(args) => args.execute(),
            Commands::Export(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => match subcommand {
                ListCommands::Rules(args) => args.execute(),
                ListCommands::Formats => {
                    list::list_formats();
                    Ok(())
                }
            },
        }
    }
}

/// Initialize logging based on verbosity level
pub fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    if !quiet {
        // A logger may already be installed when commands run in-process
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .try_init();
    }
}
