//! Overlaps command implementation

use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use annocurate_core::{overlap_report, Document};
use anyhow::{Context, Result};
use clap::Args;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Arguments for the overlaps command
#[derive(Debug, Args)]
pub struct OverlapsArgs {
    /// Input annotation files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl OverlapsArgs {
    /// Execute the overlaps command
    pub fn execute(&self) -> Result<()> {
        super::init_logging(self.verbose, self.quiet);

        let files = resolve_patterns(&self.input)?;
        let mut out = BufWriter::new(io::stdout());
        let failed = write_overlaps(&files, &mut out)?;
        out.flush()?;

        if failed == files.len() {
            return Err(CliError::NothingProcessed { failed }.into());
        }
        Ok(())
    }
}

/// Write the overlap report of every file; returns the number of failures
pub fn write_overlaps<W: Write>(files: &[impl AsRef<Path>], out: &mut W) -> Result<usize> {
    let mut failed = 0;
    for path in files {
        let path = path.as_ref();
        let name = path.display().to_string();
        let document = FileReader::read_text(path).and_then(|content| {
            Document::parse(&name, &content).with_context(|| format!("Failed to parse {name}"))
        });
        match document {
            Ok(document) => {
                for line in overlap_report(&document) {
                    writeln!(out, "{line}")?;
                }
            }
            Err(error) => {
                log::error!("{name}: {error:#}");
                failed += 1;
            }
        }
    }
    Ok(failed)
}
