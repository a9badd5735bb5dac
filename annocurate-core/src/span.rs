//! Span model for textbound annotations
//!
//! A textbound payload has the form `TYPE START END[;START END...]<TAB>TEXT`.
//! More than one `START END` pair denotes a discontinuous mention; for overlap
//! purposes such a mention is reduced to its bounding range
//! `[min(starts), max(ends))`.

use crate::error::FormatError;
use smallvec::SmallVec;
use std::fmt;

/// Separator between the type label and the span list
const TYPE_SEPARATOR: char = ' ';
/// Separator between discontinuous spans
const FRAGMENT_SEPARATOR: char = ';';

/// A half-open character range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl Span {
    /// Create a span, rejecting empty and inverted ranges
    pub fn new(start: usize, end: usize) -> Result<Self, FormatError> {
        if start >= end {
            return Err(FormatError::EmptySpan { start, end });
        }
        Ok(Self { start, end })
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false: spans are non-empty by construction
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Half-open intersection test; touching ranges do not overlap
    pub fn overlaps(&self, other: &Span) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.start, self.end)
    }
}

/// Ordered span list of one mention
pub type Spans = SmallVec<[Span; 1]>;

/// Parse `START END[;START END...]`
pub fn parse_spans(s: &str) -> Result<Spans, FormatError> {
    let mut spans = Spans::new();
    for fragment in s.split(FRAGMENT_SEPARATOR) {
        let mut parts = fragment.split(' ');
        let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(FormatError::SpanList(s.to_string()));
        };
        let start = start
            .parse::<usize>()
            .map_err(|_| FormatError::SpanList(s.to_string()))?;
        let end = end
            .parse::<usize>()
            .map_err(|_| FormatError::SpanList(s.to_string()))?;
        spans.push(Span::new(start, end)?);
    }
    Ok(spans)
}

/// Serialize spans back to `START END[;START END...]`
pub fn format_spans(spans: &[Span]) -> String {
    spans
        .iter()
        .map(Span::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// A parsed textbound payload
///
/// The bounding `start`/`end` are derived once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Textbound {
    type_: String,
    spans: Spans,
    text: String,
    start: usize,
    end: usize,
}

impl Textbound {
    /// Build from already-validated parts
    pub fn new(type_: impl Into<String>, spans: Spans, text: impl Into<String>) -> Self {
        debug_assert!(!spans.is_empty());
        let start = spans.iter().map(|s| s.start).min().unwrap_or(0);
        let end = spans.iter().map(|s| s.end).max().unwrap_or(0);
        Self {
            type_: type_.into(),
            spans,
            text: text.into(),
            start,
            end,
        }
    }

    /// Parse a `TYPE START END[;START END...]<TAB>TEXT` payload
    pub fn parse(payload: &str) -> Result<Self, FormatError> {
        let fields: Vec<&str> = payload.split('\t').collect();
        let [type_spans, text] = fields[..] else {
            return Err(FormatError::FieldCount {
                fields: fields.len(),
            });
        };

        let (type_, spans) = type_spans
            .split_once(TYPE_SEPARATOR)
            .ok_or_else(|| FormatError::SpanList(type_spans.to_string()))?;
        if type_.is_empty() {
            return Err(FormatError::SpanList(type_spans.to_string()));
        }

        Ok(Self::new(type_, parse_spans(spans)?, text))
    }

    /// Type label
    pub fn type_label(&self) -> &str {
        &self.type_
    }

    /// Spans in input order
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Surface text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bounding start
    pub fn start(&self) -> usize {
        self.start
    }

    /// Bounding end
    pub fn end(&self) -> usize {
        self.end
    }

    /// Bounding length
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false: a textbound has at least one non-empty span
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the mention is made of more than one span
    pub fn is_discontinuous(&self) -> bool {
        self.spans.len() > 1
    }

    /// Bounding range as a single span
    pub fn bounds(&self) -> Span {
        Span {
            start: self.start,
            end: self.end,
        }
    }

    /// Whether the bounding ranges intersect
    pub fn overlaps(&self, other: &Textbound) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    /// Whether both mentions have exactly the same span tuple
    pub fn same_spans(&self, other: &Textbound) -> bool {
        self.spans == other.spans
    }

    /// Replace spans (after alignment repair), recomputing the bounds
    pub fn with_spans(self, spans: Spans) -> Self {
        Self::new(self.type_, spans, self.text)
    }

    /// Serialize back to the payload form
    pub fn to_payload(&self) -> String {
        format!(
            "{}{}{}\t{}",
            self.type_,
            TYPE_SEPARATOR,
            format_spans(&self.spans),
            self.text
        )
    }
}

/// Short form used in overlap reports: `TYPE START END (TEXT)`
impl fmt::Display for Textbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.type_, self.start, self.end, self.text
        )
    }
}
