//! Alignment of annotated text against the source document
//!
//! Offsets are character offsets. When a text segment's length disagrees
//! with its span, a single-boundary repair is attempted: first moving the end
//! offset, then the start offset. Every attempt is reported as an
//! [`AlignmentWarning`], successful or not.

use crate::error::FormatError;
use crate::span::{Span, Spans};
use std::fmt;

/// Separator between the text segments of a discontinuous mention
pub const DISCONTINUOUS_TEXT_SEPARATOR: &str = " ... ";

/// Source document text indexed by character offset
#[derive(Debug, Clone)]
pub struct DocumentText {
    text: String,
    // byte offset of every char, plus text.len() as a sentinel
    char_starts: Vec<usize>,
}

impl DocumentText {
    /// Index a document
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut char_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        char_starts.push(text.len());
        Self { text, char_starts }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.char_starts.len() - 1
    }

    /// The whole text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Characters `[start, end)`, or `None` if out of range
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end || end > self.char_len() {
            return None;
        }
        Some(&self.text[self.char_starts[start]..self.char_starts[end]])
    }

    /// Characters `[start, end)` clamped to the document
    fn slice_clamped(&self, start: usize, end: usize) -> &str {
        let end = end.min(self.char_len());
        let start = start.min(end);
        &self.text[self.char_starts[start]..self.char_starts[end]]
    }
}

/// How a span was (or was not) repaired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// End offset moved so the span covers exactly the text
    AdjustEnd {
        /// Document text under the original span
        from: String,
        /// Document text under the repaired span
        to: String,
    },
    /// Start offset moved so the span covers exactly the text
    AdjustStart {
        /// Document text under the original span
        from: String,
        /// Document text under the repaired span
        to: String,
    },
    /// Neither boundary could be moved
    Failed,
}

/// A recoverable span/text length mismatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentWarning {
    /// Annotated text segment
    pub text: String,
    /// Original span
    pub span: Span,
    /// Attempted repair
    pub repair: Repair,
}

impl fmt::Display for AlignmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text length mismatch: \"{}\" ({}) vs {}-{} ({})",
            self.text,
            self.text.chars().count(),
            self.span.start,
            self.span.end,
            self.span.len()
        )?;
        match &self.repair {
            Repair::AdjustEnd { from, to } => write!(f, " (adjust end: \"{from}\" to \"{to}\")"),
            Repair::AdjustStart { from, to } => {
                write!(f, " (adjust start: \"{from}\" to \"{to}\")")
            }
            Repair::Failed => write!(f, " (failed to adjust)"),
        }
    }
}

/// Spans and text segments after alignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    /// Spans, possibly repaired
    pub spans: Spans,
    /// Text segments, one per span
    pub texts: Vec<String>,
    /// Repairs attempted along the way
    pub warnings: Vec<AlignmentWarning>,
}

/// Align `text` (segments joined by `" ... "`) with `spans` in `document`
pub fn align(spans: &[Span], text: &str, document: &DocumentText) -> Result<Alignment, FormatError> {
    let texts: Vec<&str> = text.split(DISCONTINUOUS_TEXT_SEPARATOR).collect();
    align_segments(spans, &texts, document)
}

/// Align one text segment per span
pub fn align_segments(
    spans: &[Span],
    texts: &[&str],
    document: &DocumentText,
) -> Result<Alignment, FormatError> {
    if spans.len() != texts.len() {
        return Err(FormatError::SegmentCount {
            spans: spans.len(),
            texts: texts.len(),
        });
    }

    let mut fixed = Spans::new();
    let mut warnings = Vec::new();
    for (&span, &text) in spans.iter().zip(texts) {
        let text_len = text.chars().count();
        let Span { mut start, mut end } = span;

        if text_len != span.len() {
            let repair = if start
                .checked_add(text_len)
                .and_then(|e| document.slice(start, e))
                == Some(text)
            {
                let repair = Repair::AdjustEnd {
                    from: document.slice_clamped(start, end).to_string(),
                    to: text.to_string(),
                };
                end = start + text_len;
                repair
            } else if end
                .checked_sub(text_len)
                .is_some_and(|s| document.slice(s, end) == Some(text))
            {
                let repair = Repair::AdjustStart {
                    from: document.slice_clamped(start, end).to_string(),
                    to: text.to_string(),
                };
                start = end - text_len;
                repair
            } else {
                Repair::Failed
            };

            let warning = AlignmentWarning {
                text: text.to_string(),
                span,
                repair,
            };
            log::warn!("{warning}");
            warnings.push(warning);
        }

        if text_len != end - start {
            return Err(FormatError::TextMismatch {
                text: text.to_string(),
                text_len,
                document_text: document.slice_clamped(start, end).to_string(),
                start,
                end,
            });
        }
        fixed.push(Span::new(start, end)?);
    }

    Ok(Alignment {
        spans: fixed,
        texts: texts.iter().map(|t| t.to_string()).collect(),
        warnings,
    })
}

/// Split the text of a standoff textbound into one segment per span
///
/// Single-span text is one segment. Multi-span text containing `" ... "` is
/// split on it; otherwise it is taken to be the span texts joined by single
/// spaces and cut by span length.
pub fn split_segments<'a>(text: &'a str, spans: &[Span]) -> Result<Vec<&'a str>, FormatError> {
    if spans.len() == 1 {
        return Ok(vec![text]);
    }
    if text.contains(DISCONTINUOUS_TEXT_SEPARATOR) {
        return Ok(text.split(DISCONTINUOUS_TEXT_SEPARATOR).collect());
    }

    let mismatch = || FormatError::SegmentCount {
        spans: spans.len(),
        texts: text.split(' ').count(),
    };
    let mut segments = Vec::with_capacity(spans.len());
    let mut rest = text;
    for (i, span) in spans.iter().enumerate() {
        let cut = rest
            .char_indices()
            .nth(span.len())
            .map_or(rest.len(), |(b, _)| b);
        if rest[..cut].chars().count() != span.len() {
            return Err(mismatch());
        }
        segments.push(&rest[..cut]);
        rest = &rest[cut..];
        if i + 1 < spans.len() {
            rest = rest.strip_prefix(' ').ok_or_else(mismatch)?;
        }
    }
    if !rest.is_empty() {
        return Err(mismatch());
    }
    Ok(segments)
}
