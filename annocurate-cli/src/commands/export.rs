//! Export command implementation

use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use annocurate_core::{export_source, group_by_source, DocumentText, HandoffDocument, TypeMap};
use anyhow::{Context, Result};
use clap::Args;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Arguments for the export command
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Hand-off JSON files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Directory holding the source texts (default: next to each JSON file)
    #[arg(long, value_name = "DIR")]
    pub text_dir: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Write `<source stem>.ann` files under this directory
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self) -> Result<()> {
        super::init_logging(self.verbose, self.quiet);

        let files = resolve_patterns(&self.input)?;
        let types = TypeMap::default();
        let mut stream: Option<Box<dyn Write>> = match (&self.output, &self.output_dir) {
            (_, Some(dir)) => {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create directory {}", dir.display()))?;
                None
            }
            (Some(path), None) => Some(Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            ))),
            (None, None) => Some(Box::new(BufWriter::new(io::stdout()))),
        };

        let mut failed = 0;
        let mut loaded: Vec<(&Path, HandoffDocument)> = Vec::new();
        for path in &files {
            match FileReader::read_text(path)
                .and_then(|content| Ok(HandoffDocument::from_json(&content)?))
            {
                Ok(handoffs) => loaded.extend(handoffs.into_iter().map(|h| (path.as_path(), h))),
                Err(error) => {
                    log::error!("{}: {error:#}", path.display());
                    failed += 1;
                }
            }
        }

        // Texts are looked up next to the first JSON file naming the source
        let mut origins: HashMap<&str, &Path> = HashMap::new();
        for (path, handoff) in &loaded {
            origins.entry(handoff.text_source.as_str()).or_insert(*path);
        }

        let mut exported = 0;
        for group in group_by_source(loaded.iter().map(|(_, h)| h)) {
            let text_source = group[0].text_source.as_str();
            let json = origins.get(text_source).copied().unwrap_or(Path::new("."));
            match self.export_group(json, text_source, &group, &types) {
                Ok(standoff) => {
                    match &mut stream {
                        Some(writer) => writer.write_all(standoff.as_bytes())?,
                        None => self.write_file(text_source, &standoff)?,
                    }
                    exported += 1;
                }
                Err(error) => {
                    log::error!("{text_source}: {error:#}");
                    failed += 1;
                }
            }
        }

        if let Some(writer) = &mut stream {
            writer.flush()?;
        }
        if exported == 0 {
            return Err(CliError::NothingProcessed { failed }.into());
        }
        log::info!("Exported {exported} documents");
        Ok(())
    }

    fn export_group(
        &self,
        json: &Path,
        text_source: &str,
        handoffs: &[&HandoffDocument],
        types: &TypeMap,
    ) -> Result<String> {
        let text_dir = match &self.text_dir {
            Some(dir) => dir.as_path(),
            None => json.parent().unwrap_or_else(|| Path::new(".")),
        };
        let text_path = text_dir.join(text_source);
        if !text_path.is_file() {
            return Err(CliError::FileNotFound(text_path.display().to_string()).into());
        }
        let text = DocumentText::new(FileReader::read_text(&text_path)?);

        let export = export_source(text_source, handoffs, &text, types)
            .with_context(|| format!("Failed to export {text_source}"))?;
        for skipped in &export.skipped {
            eprintln!("error parsing {text_source}: {skipped}");
        }
        Ok(export.document.render())
    }

    fn write_file(&self, text_source: &str, standoff: &str) -> Result<()> {
        let Some(dir) = &self.output_dir else {
            return Ok(());
        };
        let stem = Path::new(text_source)
            .file_stem()
            .ok_or_else(|| CliError::FileNotFound(text_source.to_string()))?;
        let path = dir.join(format!("{}.ann", stem.to_string_lossy()));
        fs::write(&path, standoff).with_context(|| format!("Failed to write to {}", path.display()))
    }
}
