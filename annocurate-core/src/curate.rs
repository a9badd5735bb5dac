//! Per-document curation pipeline
//!
//! Stages, in order: optional alignment against the document text, duplicate
//! filtering, then the two resolution phases. Each stage only marks records
//! removed; the surviving lines are rendered in input order at the end.

use crate::align::{align_segments, split_segments, AlignmentWarning, DocumentText};
use crate::dedup::{remove_duplicates, DedupReport};
use crate::error::{FormatError, Result};
use crate::priority::PriorityTable;
use crate::record::{Document, SkippedLine};
use crate::resolver::{ConflictResolver, Resolution};
use serde::{Deserialize, Serialize};

/// Which stages to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationOptions {
    /// Remove exact duplicates
    pub dedup: bool,
    /// Resolve identical spans and overlaps
    pub resolve: bool,
}

impl Default for CurationOptions {
    fn default() -> Self {
        Self {
            dedup: true,
            resolve: true,
        }
    }
}

impl CurationOptions {
    /// Duplicate filtering only
    pub fn dedup_only() -> Self {
        Self {
            dedup: true,
            resolve: false,
        }
    }

    /// Overlap resolution only
    pub fn resolve_only() -> Self {
        Self {
            dedup: false,
            resolve: true,
        }
    }
}

/// An alignment repair attached to the record it touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWarning {
    /// Record identifier
    pub id: String,
    /// The repair attempt
    pub warning: AlignmentWarning,
}

/// Everything that happened to one document
#[derive(Debug, Clone, Default)]
pub struct CurationReport {
    /// Document name
    pub document: String,
    /// Lines dropped as malformed
    pub skipped: Vec<SkippedLine>,
    /// Span repairs
    pub repairs: Vec<RecordWarning>,
    /// Duplicate filtering outcome
    pub duplicates: DedupReport,
    /// Resolution outcome
    pub resolution: Resolution,
}

/// Counts per document, for machine-readable reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationSummary {
    /// Document name
    pub document: String,
    /// Lines dropped as malformed
    pub skipped: usize,
    /// Span repairs attempted
    pub repairs: usize,
    /// Duplicates removed
    pub duplicates_removed: usize,
    /// Records removed by the priority table
    pub priority_removed: usize,
    /// Records removed by the overlap tie-break
    pub overlap_removed: usize,
    /// Identical-span pairs left undecided
    pub unresolved: usize,
}

impl CurationReport {
    /// Total records removed by dedup and resolution
    pub fn removed_count(&self) -> usize {
        self.duplicates.count() + self.resolution.removed_count()
    }

    /// Numeric summary
    pub fn summary(&self) -> CurationSummary {
        CurationSummary {
            document: self.document.clone(),
            skipped: self.skipped.len(),
            repairs: self.repairs.len(),
            duplicates_removed: self.duplicates.count(),
            priority_removed: self.resolution.priority_count(),
            overlap_removed: self.resolution.overlap_count(),
            unresolved: self.resolution.unresolved.len(),
        }
    }

    /// Human-readable diagnostic lines
    ///
    /// Per-event lines come first, then one summary line per non-zero count.
    pub fn diagnostics(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for skipped in &self.skipped {
            lines.push(format!("error parsing {}: {}", self.document, skipped));
        }
        for repair in &self.repairs {
            lines.push(format!("{}: {}: {}", self.document, repair.id, repair.warning));
        }
        lines.extend(self.resolution.eliminations.iter().map(ToString::to_string));
        lines.extend(self.resolution.unresolved.iter().map(ToString::to_string));

        if self.duplicates.count() != 0 {
            lines.push(format!(
                "removed {} duplicates from {}",
                self.duplicates.count(),
                self.document
            ));
        }
        if self.resolution.removed_count() != 0 {
            lines.push(format!(
                "removed {} overlapped annotations from {}",
                self.resolution.removed_count(),
                self.document
            ));
        }
        lines
    }
}

/// Runs the curation stages over documents
#[derive(Debug, Clone)]
pub struct Curator<'t> {
    table: &'t PriorityTable,
    options: CurationOptions,
}

impl<'t> Curator<'t> {
    /// Create a curator
    pub fn new(table: &'t PriorityTable, options: CurationOptions) -> Self {
        Self { table, options }
    }

    /// Parse and curate annotation text
    pub fn curate_str(
        &self,
        name: &str,
        content: &str,
        text: Option<&DocumentText>,
    ) -> Result<(Document, CurationReport)> {
        let mut document = Document::parse(name, content)?;
        let report = self.curate(&mut document, text);
        Ok((document, report))
    }

    /// Curate a parsed document in place
    pub fn curate(&self, document: &mut Document, text: Option<&DocumentText>) -> CurationReport {
        let repairs = match text {
            Some(text) => align_document(document, text),
            None => Vec::new(),
        };

        let duplicates = if self.options.dedup {
            remove_duplicates(document)
        } else {
            DedupReport::default()
        };

        let resolution = if self.options.resolve {
            ConflictResolver::new(self.table).resolve(document)
        } else {
            Resolution::default()
        };

        let report = CurationReport {
            document: document.name().to_string(),
            skipped: document.skipped().to_vec(),
            repairs,
            duplicates,
            resolution,
        };
        log::info!(
            "{}: removed {} of {} records",
            report.document,
            report.removed_count(),
            document.records().count()
        );
        report
    }
}

/// Check every textbound against the document text, repairing offsets
///
/// Records that cannot be aligned are moved to the document's skipped lines.
pub fn align_document(document: &mut Document, text: &DocumentText) -> Vec<RecordWarning> {
    let mut repairs = Vec::new();
    let mut failed: Vec<(usize, FormatError)> = Vec::new();

    for (index, record) in document.records_mut().into_iter().enumerate() {
        let Some(tb) = record.as_textbound() else {
            continue;
        };
        let aligned = split_segments(tb.text(), tb.spans())
            .and_then(|segments| align_segments(tb.spans(), &segments, text));
        match aligned {
            Ok(alignment) => {
                let id = record.id().to_string();
                let changed = alignment.spans.as_slice() != tb.spans();
                repairs.extend(alignment.warnings.into_iter().map(|warning| RecordWarning {
                    id: id.clone(),
                    warning,
                }));
                if changed {
                    let repaired = tb.clone().with_spans(alignment.spans);
                    record.set_textbound(repaired);
                }
            }
            Err(error) => failed.push((index, error)),
        }
    }

    for (index, error) in failed.into_iter().rev() {
        document.skip_record(index, error);
    }
    repairs
}
