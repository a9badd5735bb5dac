//! JSON report formatter

use super::ReportFormatter;
use annocurate_core::{CurationReport, CurationSummary};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// JSON formatter - collects every document and writes one JSON object
pub struct JsonFormatter<W: Write> {
    writer: W,
    report: BatchReport,
}

/// Data structure for JSON output
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Curated documents
    pub documents: Vec<DocumentData>,
    /// Documents that failed
    pub failures: Vec<FailureData>,
}

/// One curated document
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentData {
    /// Counts
    #[serde(flatten)]
    pub summary: CurationSummary,
    /// Diagnostic lines, in emission order
    pub diagnostics: Vec<String>,
}

/// One failed document
#[derive(Debug, Serialize, Deserialize)]
pub struct FailureData {
    /// Document source
    pub document: String,
    /// Error message
    pub error: String,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            report: BatchReport::default(),
        }
    }

    /// Consume the formatter, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> ReportFormatter for JsonFormatter<W> {
    fn format_document(&mut self, report: &CurationReport) -> Result<()> {
        self.report.documents.push(DocumentData {
            summary: report.summary(),
            diagnostics: report.diagnostics(),
        });
        Ok(())
    }

    fn format_failure(&mut self, source: &str, error: &anyhow::Error) -> Result<()> {
        self.report.failures.push(FailureData {
            document: source.to_string(),
            error: format!("{error:#}"),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.report)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
