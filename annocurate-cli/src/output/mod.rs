//! Curation report formatting module

use annocurate_core::CurationReport;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Trait for report formatters
pub trait ReportFormatter: Send + Sync {
    /// Report one curated document
    fn format_document(&mut self, report: &CurationReport) -> Result<()>;

    /// Report a document that could not be curated
    fn format_failure(&mut self, source: &str, error: &anyhow::Error) -> Result<()>;

    /// Finalize output (e.g., write the JSON document)
    fn finish(&mut self) -> Result<()>;
}

/// Supported report formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One diagnostic line per event
    #[default]
    Text,
    /// Per-document summaries and diagnostics as JSON
    Json,
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;
