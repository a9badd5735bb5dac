//! Plain text report formatter

use super::ReportFormatter;
use annocurate_core::CurationReport;
use anyhow::Result;
use std::io::Write;

/// Plain text formatter - one diagnostic per line
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the formatter, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> ReportFormatter for TextFormatter<W> {
    fn format_document(&mut self, report: &CurationReport) -> Result<()> {
        for line in report.diagnostics() {
            writeln!(self.writer, "{line}")?;
        }
        Ok(())
    }

    fn format_failure(&mut self, source: &str, error: &anyhow::Error) -> Result<()> {
        writeln!(self.writer, "error processing {source}: {error:#}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
