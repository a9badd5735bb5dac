//! Annotation records and per-document parsing

use crate::error::{CurateError, FormatError, Result};
use crate::span::Textbound;
use std::collections::HashSet;
use std::fmt;

/// Identifier prefix of textbound annotations
pub const TEXTBOUND_PREFIX: char = 'T';

/// One standoff annotation line
///
/// `removed` is set at most once and never cleared; removed records stay in
/// memory so that diagnostics can still refer to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    id: String,
    data: String,
    textbound: Option<Textbound>,
    origin_line: usize,
    removed: bool,
}

impl AnnotationRecord {
    /// Parse `ID<TAB>DATA`; textbound data is parsed further
    pub fn parse(line: &str, origin_line: usize) -> std::result::Result<Self, FormatError> {
        let (id, data) = line.split_once('\t').ok_or(FormatError::MissingId)?;
        if id.is_empty() {
            return Err(FormatError::MissingId);
        }
        let textbound = if id.starts_with(TEXTBOUND_PREFIX) {
            Some(Textbound::parse(data)?)
        } else {
            None
        };
        Ok(Self {
            id: id.to_string(),
            data: data.to_string(),
            textbound,
            origin_line,
            removed: false,
        })
    }

    /// Build a textbound record directly
    pub fn textbound(id: impl Into<String>, textbound: Textbound, origin_line: usize) -> Self {
        Self {
            id: id.into(),
            data: textbound.to_payload(),
            textbound: Some(textbound),
            origin_line,
            removed: false,
        }
    }

    /// Identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Payload with the identifier stripped
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Parsed span model, for textbound records
    pub fn as_textbound(&self) -> Option<&Textbound> {
        self.textbound.as_ref()
    }

    /// Whether the record takes part in span-based processing
    pub fn is_textbound(&self) -> bool {
        self.textbound.is_some()
    }

    /// Line index in the input
    pub fn origin_line(&self) -> usize {
        self.origin_line
    }

    /// Whether the record has been eliminated
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Eliminate the record; returns false if it already was
    pub fn mark_removed(&mut self) -> bool {
        !std::mem::replace(&mut self.removed, true)
    }

    /// Replace the span model, keeping the payload in sync
    pub(crate) fn set_textbound(&mut self, textbound: Textbound) {
        self.data = textbound.to_payload();
        self.textbound = Some(textbound);
    }
}

impl fmt::Display for AnnotationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.id, self.data)
    }
}

/// A line of an annotation file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Empty line, preserved verbatim
    Blank,
    /// Annotation record
    Record(AnnotationRecord),
}

/// A line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// Line index in the input
    pub line: usize,
    /// The raw line
    pub content: String,
    /// Why it was skipped
    pub error: FormatError,
}

impl fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line + 1, self.error, self.content)
    }
}

/// All lines of one annotation document
#[derive(Debug, Clone, Default)]
pub struct Document {
    name: String,
    entries: Vec<Entry>,
    skipped: Vec<SkippedLine>,
}

impl Document {
    /// Parse a document, skipping malformed lines
    ///
    /// Fails only if two records share an identifier.
    pub fn parse(name: impl Into<String>, content: &str) -> Result<Self> {
        let name = name.into();
        let mut entries = Vec::new();
        let mut skipped = Vec::new();
        let mut seen_ids = HashSet::new();

        for (ln, line) in content.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                entries.push(Entry::Blank);
                continue;
            }
            match AnnotationRecord::parse(line, ln) {
                Ok(record) => {
                    if !seen_ids.insert(record.id.clone()) {
                        return Err(CurateError::DuplicateIdentifier { id: record.id });
                    }
                    entries.push(Entry::Record(record));
                }
                Err(error) => {
                    log::warn!("{name}: skipping line {}: {error}", ln + 1);
                    skipped.push(SkippedLine {
                        line: ln,
                        content: line.to_string(),
                        error,
                    });
                }
            }
        }

        Ok(Self {
            name,
            entries,
            skipped,
        })
    }

    /// Build a document from records, one per line
    pub fn from_records(name: impl Into<String>, records: Vec<AnnotationRecord>) -> Self {
        Self {
            name: name.into(),
            entries: records.into_iter().map(Entry::Record).collect(),
            skipped: Vec::new(),
        }
    }

    /// Source name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in input order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Lines skipped as malformed
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// Records in input order
    pub fn records(&self) -> impl Iterator<Item = &AnnotationRecord> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Record(r) => Some(r),
            Entry::Blank => None,
        })
    }

    /// Mutable view of the records, in input order
    pub fn records_mut(&mut self) -> Vec<&mut AnnotationRecord> {
        self.entries
            .iter_mut()
            .filter_map(|e| match e {
                Entry::Record(r) => Some(r),
                Entry::Blank => None,
            })
            .collect()
    }

    /// Record a line that failed after parsing (e.g. during alignment)
    pub(crate) fn skip_record(&mut self, index: usize, error: FormatError) {
        let mut seen = 0;
        let position = self.entries.iter().position(|e| {
            if matches!(e, Entry::Record(_)) {
                seen += 1;
                seen == index + 1
            } else {
                false
            }
        });
        if let Some(pos) = position {
            if let Entry::Record(record) = self.entries.remove(pos) {
                log::warn!(
                    "{}: skipping line {}: {error}",
                    self.name,
                    record.origin_line + 1
                );
                self.skipped.push(SkippedLine {
                    line: record.origin_line,
                    content: record.to_string(),
                    error,
                });
            }
        }
    }

    /// Surviving lines, in input order, blank lines preserved
    pub fn output_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().filter_map(|e| match e {
            Entry::Blank => Some(String::new()),
            Entry::Record(r) if r.is_removed() => None,
            Entry::Record(r) => Some(r.to_string()),
        })
    }

    /// Surviving lines joined with trailing newlines
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.output_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
