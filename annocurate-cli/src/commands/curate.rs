//! Curate command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{JsonFormatter, ReportFormat, ReportFormatter, TextFormatter};
use crate::priority_source::PrioritySource;
use crate::progress::CurationProgress;
use annocurate_core::{CurationOptions, Curator, Document, DocumentText};
use anyhow::{Context, Result};
use clap::Args;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Arguments shared by the curate, dedup and resolve commands
#[derive(Debug, Args)]
pub struct CurateArgs {
    /// Input annotation files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Write each curated document under this directory, keeping its file name
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Priority table (default: built-in CRAFT table)
    #[arg(short, long, value_name = "FILE")]
    pub priority: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip duplicate filtering
    #[arg(long)]
    pub no_dedup: bool,

    /// Skip identical-span and overlap resolution
    #[arg(long)]
    pub no_resolve: bool,

    /// Directory holding `<name>.txt` document texts to align against
    #[arg(long, value_name = "DIR")]
    pub text_dir: Option<PathBuf>,

    /// Write diagnostics to this file (default: stderr)
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Diagnostics format
    #[arg(long, value_enum)]
    pub report_format: Option<ReportFormat>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Which stages a command forces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stages {
    /// Configuration and flags decide
    Configured,
    /// Duplicate filtering only
    DedupOnly,
    /// Resolution only
    ResolveOnly,
}

/// Where curated documents go
enum Sink {
    Stream(Box<dyn Write>),
    Directory(PathBuf),
}

impl Sink {
    fn write(&mut self, source: &Path, document: &Document) -> Result<()> {
        match self {
            Sink::Stream(writer) => {
                writer.write_all(document.render().as_bytes())?;
                Ok(())
            }
            Sink::Directory(dir) => {
                let name = source
                    .file_name()
                    .ok_or_else(|| CliError::FileNotFound(source.display().to_string()))?;
                let path = dir.join(name);
                fs::write(&path, document.render())
                    .with_context(|| format!("Failed to write to {}", path.display()))
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Sink::Stream(writer) = self {
            writer.flush()?;
        }
        Ok(())
    }
}

impl CurateArgs {
    /// Execute the command
    pub fn execute(&self, stages: Stages) -> Result<()> {
        super::init_logging(self.verbose, self.quiet);

        log::info!("Starting curation");
        log::debug!("Arguments: {:?}", self);

        let config = CliConfig::load(self.config.as_deref())?;
        let options = self.options(&config, stages);
        let source = PrioritySource::select(
            self.priority.as_deref(),
            config.curation.priority_table.as_deref(),
        );
        let table = source.load()?;
        log::info!(
            "Priority table: {} ({} rules)",
            source.display_name(),
            table.len()
        );

        let files = resolve_patterns(&self.input)?;
        let mut sink = self.sink()?;
        let mut formatter = self.formatter(config.output.report_format)?;
        let mut progress = CurationProgress::new(self.progress, files.len());

        let curator = Curator::new(&table, options);
        for path in &files {
            let name = path.display().to_string();
            match self.curate_file(&curator, path) {
                Ok((document, report)) => {
                    sink.write(path, &document)?;
                    formatter.format_document(&report)?;
                    progress.curated(&name, report.removed_count());
                }
                Err(error) => {
                    log::error!("{name}: {error:#}");
                    formatter.format_failure(&name, &error)?;
                    progress.failed(&name);
                }
            }
        }

        let tally = progress.finish();
        sink.flush()?;
        formatter.finish()?;

        if tally.curated == 0 {
            return Err(CliError::NothingProcessed {
                failed: tally.failed,
            }
            .into());
        }
        log::info!("Batch done: {tally}");
        Ok(())
    }

    /// Flags override the configuration file; a forced stage set overrides both
    fn options(&self, config: &CliConfig, stages: Stages) -> CurationOptions {
        match stages {
            Stages::DedupOnly => CurationOptions::dedup_only(),
            Stages::ResolveOnly => CurationOptions::resolve_only(),
            Stages::Configured => {
                let configured = config.curation.options();
                CurationOptions {
                    dedup: configured.dedup && !self.no_dedup,
                    resolve: configured.resolve && !self.no_resolve,
                }
            }
        }
    }

    fn curate_file(
        &self,
        curator: &Curator<'_>,
        path: &Path,
    ) -> Result<(Document, annocurate_core::CurationReport)> {
        let content = FileReader::read_text(path)?;
        let text = match &self.text_dir {
            Some(dir) => Some(DocumentText::new(FileReader::read_companion_text(dir, path)?)),
            None => None,
        };
        let name = path.display().to_string();
        curator
            .curate_str(&name, &content, text.as_ref())
            .with_context(|| format!("Failed to curate {name}"))
    }

    fn sink(&self) -> Result<Sink> {
        if let Some(dir) = &self.output_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
            return Ok(Sink::Directory(dir.clone()));
        }
        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            )),
            None => Box::new(BufWriter::new(io::stdout())),
        };
        Ok(Sink::Stream(writer))
    }

    fn formatter(&self, configured: ReportFormat) -> Result<Box<dyn ReportFormatter>> {
        let format = self.report_format.unwrap_or(configured);
        let writer: Box<dyn Write + Send + Sync> = match &self.report {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            ),
            None => Box::new(io::stderr()),
        };
        Ok(match format {
            ReportFormat::Text => Box::new(TextFormatter::new(writer)),
            ReportFormat::Json => Box::new(JsonFormatter::new(writer)),
        })
    }
}
