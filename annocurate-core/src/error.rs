//! Error types for annotation curation

use thiserror::Error;

/// Curation errors
#[derive(Error, Debug)]
pub enum CurateError {
    /// Malformed record: bad span list, wrong field count, or a span/text
    /// mismatch that alignment could not repair
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Two records or mentions share an identifier
    #[error("duplicate identifier: {id}")]
    DuplicateIdentifier {
        /// The repeated identifier
        id: String,
    },

    /// Priority table or other configuration problem
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Hand-off document serialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A single malformed record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The line has no tab between identifier and payload
    #[error("missing identifier separator")]
    MissingId,

    /// A textbound payload has the wrong number of tab-separated fields
    #[error("expected TYPE SPANS<TAB>TEXT, got {fields} field(s)")]
    FieldCount {
        /// Number of fields actually found
        fields: usize,
    },

    /// The type/span field could not be parsed
    #[error("invalid span list '{0}'")]
    SpanList(String),

    /// A span with `start >= end`
    #[error("empty or inverted span {start}-{end}")]
    EmptySpan {
        /// Start offset
        start: usize,
        /// End offset
        end: usize,
    },

    /// Number of spans disagrees with number of text segments
    #[error("{spans} spans, {texts} texts")]
    SegmentCount {
        /// Number of spans
        spans: usize,
        /// Number of text segments
        texts: usize,
    },

    /// Span length mismatch that alignment failed to repair
    #[error("text mismatch: \"{text}\" (len {text_len}) vs \"{document_text}\" ({start}-{end})")]
    TextMismatch {
        /// Annotated text segment
        text: String,
        /// Its length in characters
        text_len: usize,
        /// Document text under the span
        document_text: String,
        /// Start offset
        start: usize,
        /// End offset
        end: usize,
    },

    /// An annotation references a mention that does not exist
    #[error("no mention with id '{0}'")]
    UnknownMention(String),
}

/// Result type for curation operations
pub type Result<T> = std::result::Result<T, CurateError>;
