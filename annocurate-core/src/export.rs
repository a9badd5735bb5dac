//! Standoff export of importer hand-off documents
//!
//! A hand-off document carries span annotations, each pointing at a mention
//! that supplies its type. Export aligns each annotation against the source
//! text, types it through a [`TypeMap`], and numbers it with one
//! [`IdGenerator`] per source document. Several hand-offs may name the same
//! source; their annotations are merged in input order before numbering.

use crate::align::{align, AlignmentWarning, DocumentText};
use crate::error::{FormatError, Result};
use crate::mention::{Mention, MentionIndex};
use crate::record::{AnnotationRecord, Document, SkippedLine, TEXTBOUND_PREFIX};
use crate::span::{Span, Spans, Textbound};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-document identifier numbering, keyed by prefix
///
/// Numbering starts at 1 for every prefix; create a new generator for each
/// document.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counters: HashMap<String, usize>,
}

impl IdGenerator {
    /// Create a generator with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Next free identifier for `prefix`
    pub fn next_id(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{prefix}{counter}")
    }
}

/// Mapping from source type names to standoff types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMap(HashMap<String, String>);

impl Default for TypeMap {
    fn default() -> Self {
        Self(HashMap::from([
            ("Entrez Gene sequence".to_string(), "EntrezGene".to_string()),
            ("organism".to_string(), "NCBITaxon".to_string()),
        ]))
    }
}

impl TypeMap {
    /// Create from explicit entries
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self(entries)
    }

    /// Standoff type for a source type; spaces become underscores
    pub fn standoff_type(&self, source: &str) -> String {
        self.0
            .get(source)
            .map_or(source, String::as_str)
            .replace(' ', "_")
    }
}

/// A span annotation as produced by the importer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnnotation {
    /// `(start, end)` character offsets
    pub spans: Vec<(usize, usize)>,
    /// Covered text, discontinuous segments joined by `" ... "`
    pub text: String,
    /// Mention supplying the type
    pub mention_id: String,
}

/// Importer hand-off for one source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffDocument {
    /// Name of the source text file
    pub text_source: String,
    /// Span annotations in document order
    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
    /// Mentions referenced by the annotations
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

impl HandoffDocument {
    /// Parse hand-off JSON: a single document or an array of documents
    pub fn from_json(content: &str) -> Result<Vec<Self>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(HandoffDocument),
            Many(Vec<HandoffDocument>),
        }
        Ok(match serde_json::from_str(content)? {
            OneOrMany::One(doc) => vec![doc],
            OneOrMany::Many(docs) => docs,
        })
    }
}

/// A span annotation whose offsets agree with the document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanAnnotation {
    /// Spans, possibly repaired
    pub spans: Spans,
    /// One text segment per span
    pub texts: Vec<String>,
    /// Mention supplying the type
    pub mention_id: String,
}

impl SpanAnnotation {
    /// Validate and align a raw annotation against the document text
    pub fn aligned(
        raw: &RawAnnotation,
        text: &DocumentText,
    ) -> std::result::Result<(Self, Vec<AlignmentWarning>), FormatError> {
        let spans = raw
            .spans
            .iter()
            .map(|&(start, end)| Span::new(start, end))
            .collect::<std::result::Result<Spans, _>>()?;
        if spans.is_empty() {
            return Err(FormatError::SegmentCount {
                spans: 0,
                texts: 1,
            });
        }
        let alignment = align(&spans, &raw.text, text)?;
        Ok((
            Self {
                spans: alignment.spans,
                texts: alignment.texts,
                mention_id: raw.mention_id.clone(),
            },
            alignment.warnings,
        ))
    }

    /// Textbound record for this annotation
    pub fn to_standoff(
        &self,
        mentions: &MentionIndex<'_>,
        types: &TypeMap,
        ids: &mut IdGenerator,
        origin_line: usize,
    ) -> std::result::Result<AnnotationRecord, FormatError> {
        let mention = mentions
            .get(&self.mention_id)
            .ok_or_else(|| FormatError::UnknownMention(self.mention_id.clone()))?;
        let textbound = Textbound::new(
            types.standoff_type(mention.type_label()),
            self.spans.clone(),
            self.texts.join(" "),
        );
        let id = ids.next_id(&TEXTBOUND_PREFIX.to_string());
        Ok(AnnotationRecord::textbound(id, textbound, origin_line))
    }
}

/// Exported records of one hand-off document
#[derive(Debug)]
pub struct Export {
    /// Standoff document, ready for curation
    pub document: Document,
    /// Annotations that could not be exported
    pub skipped: Vec<SkippedLine>,
    /// Span repairs
    pub warnings: Vec<AlignmentWarning>,
}

/// Group hand-offs by `text_source`, groups and members in input order
pub fn group_by_source<'h, I>(handoffs: I) -> Vec<Vec<&'h HandoffDocument>>
where
    I: IntoIterator<Item = &'h HandoffDocument>,
{
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<&HandoffDocument>> = Vec::new();
    for handoff in handoffs {
        let slot = *slots
            .entry(handoff.text_source.as_str())
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[slot].push(handoff);
    }
    groups
}

/// Export a hand-off document to standoff
///
/// Duplicate mention identifiers fail the whole document; any other problem
/// skips only the offending annotation.
pub fn export_document(
    handoff: &HandoffDocument,
    text: &DocumentText,
    types: &TypeMap,
) -> Result<Export> {
    export_source(&handoff.text_source, &[handoff], text, types)
}

/// Export every hand-off of one source document into a single standoff file
///
/// Mentions are resolved per hand-off, identifiers are numbered across all of
/// them. A duplicate mention identifier within any hand-off fails the source.
pub fn export_source(
    text_source: &str,
    handoffs: &[&HandoffDocument],
    text: &DocumentText,
    types: &TypeMap,
) -> Result<Export> {
    let mut ids = IdGenerator::new();
    let mut records = Vec::new();
    let mut skipped = Vec::new();
    let mut warnings = Vec::new();
    let mut position = 0;

    for handoff in handoffs {
        let mentions = MentionIndex::build(&handoff.mentions)?;
        for raw in &handoff.annotations {
            let exported = SpanAnnotation::aligned(raw, text).and_then(|(annotation, repairs)| {
                let record = annotation.to_standoff(&mentions, types, &mut ids, records.len())?;
                Ok((record, repairs))
            });
            match exported {
                Ok((record, repairs)) => {
                    warnings.extend(repairs);
                    records.push(record);
                }
                Err(error) => {
                    log::warn!(
                        "error parsing {text_source}: annotation {}: {error}",
                        position + 1
                    );
                    skipped.push(SkippedLine {
                        line: position,
                        content: format!("{} -> {}", raw.text, raw.mention_id),
                        error,
                    });
                }
            }
            position += 1;
        }
    }

    Ok(Export {
        document: Document::from_records(text_source.to_string(), records),
        skipped,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CurateError;
    use crate::mention::MentionKind;

    fn class(id: &str, class_id: &str) -> Mention {
        Mention::new(
            id,
            MentionKind::ClassMention {
                class_id: class_id.to_string(),
                text: None,
            },
        )
    }

    fn raw(spans: &[(usize, usize)], text: &str, mention_id: &str) -> RawAnnotation {
        RawAnnotation {
            spans: spans.to_vec(),
            text: text.to_string(),
            mention_id: mention_id.to_string(),
        }
    }

    #[test]
    fn test_id_generator_counts_per_prefix() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id("T"), "T1");
        assert_eq!(ids.next_id("T"), "T2");
        assert_eq!(ids.next_id("R"), "R1");
        assert_eq!(IdGenerator::new().next_id("T"), "T1");
    }

    #[test]
    fn test_type_map_defaults() {
        let types = TypeMap::default();
        assert_eq!(types.standoff_type("organism"), "NCBITaxon");
        assert_eq!(types.standoff_type("Entrez Gene sequence"), "EntrezGene");
        assert_eq!(types.standoff_type("cell type"), "cell_type");
        assert_eq!(types.standoff_type("CL"), "CL");
    }

    #[test]
    fn test_export_document() {
        let text = DocumentText::new("red blood cells in mice");
        let handoff = HandoffDocument {
            text_source: "doc.txt".to_string(),
            annotations: vec![
                raw(&[(10, 15)], "cells", "m1"),
                raw(&[(0, 3), (10, 15)], "red ... cells", "m1"),
                raw(&[(19, 23)], "mice", "m2"),
            ],
            mentions: vec![class("m1", "CL:0000232"), class("m2", "organism")],
        };
        let export = export_document(&handoff, &text, &TypeMap::default()).unwrap();
        assert!(export.skipped.is_empty());
        assert_eq!(
            export.document.render(),
            "T1\tCL 10 15\tcells\nT2\tCL 0 3;10 15\tred cells\nT3\tNCBITaxon 19 23\tmice\n"
        );
    }

    #[test]
    fn test_export_skips_bad_annotations_only() {
        let text = DocumentText::new("red blood cells");
        let handoff = HandoffDocument {
            text_source: "doc.txt".to_string(),
            annotations: vec![
                raw(&[(0, 3)], "red", "missing"),
                raw(&[(0, 9)], "plasma", "m1"),
                raw(&[(4, 9)], "blood", "m1"),
            ],
            mentions: vec![class("m1", "UBERON:0000178")],
        };
        let export = export_document(&handoff, &text, &TypeMap::default()).unwrap();
        assert_eq!(export.skipped.len(), 2);
        assert_eq!(
            export.skipped[0].error,
            FormatError::UnknownMention("missing".to_string())
        );
        assert_eq!(export.document.render(), "T1\tUBERON 4 9\tblood\n");
    }

    #[test]
    fn test_export_repairs_offsets() {
        let text = DocumentText::new("red blood cells");
        let handoff = HandoffDocument {
            text_source: "doc.txt".to_string(),
            annotations: vec![raw(&[(4, 11)], "blood", "m1")],
            mentions: vec![class("m1", "UBERON:0000178")],
        };
        let export = export_document(&handoff, &text, &TypeMap::default()).unwrap();
        assert_eq!(export.warnings.len(), 1);
        assert_eq!(export.document.render(), "T1\tUBERON 4 9\tblood\n");
    }

    #[test]
    fn test_duplicate_mention_id_fails_document() {
        let handoff = HandoffDocument {
            text_source: "doc.txt".to_string(),
            annotations: vec![],
            mentions: vec![class("m1", "CL:1"), class("m1", "CL:2")],
        };
        let err = export_document(&handoff, &DocumentText::new(""), &TypeMap::default())
            .unwrap_err();
        assert!(matches!(err, CurateError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn test_shared_source_is_numbered_once() {
        let text = DocumentText::new("red blood cells");
        let first = HandoffDocument {
            text_source: "doc.txt".to_string(),
            annotations: vec![raw(&[(0, 3)], "red", "m1")],
            mentions: vec![class("m1", "CL:0000232")],
        };
        let other = HandoffDocument {
            text_source: "other.txt".to_string(),
            annotations: vec![],
            mentions: vec![],
        };
        let second = HandoffDocument {
            text_source: "doc.txt".to_string(),
            annotations: vec![raw(&[(4, 9)], "blood", "m1")],
            mentions: vec![class("m1", "UBERON:0000178")],
        };
        let handoffs = [first, other, second];

        let groups = group_by_source(&handoffs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1][0].text_source, "other.txt");

        let export = export_source("doc.txt", &groups[0], &text, &TypeMap::default()).unwrap();
        assert_eq!(
            export.document.render(),
            "T1\tCL 0 3\tred\nT2\tUBERON 4 9\tblood\n"
        );
    }

    #[test]
    fn test_shared_source_skips_keep_group_positions() {
        let text = DocumentText::new("red blood cells");
        let first = HandoffDocument {
            text_source: "doc.txt".to_string(),
            annotations: vec![raw(&[(0, 3)], "red", "m1")],
            mentions: vec![class("m1", "CL:0000232")],
        };
        let second = HandoffDocument {
            text_source: "doc.txt".to_string(),
            annotations: vec![raw(&[(4, 9)], "blood", "missing")],
            mentions: vec![],
        };
        let export =
            export_source("doc.txt", &[&first, &second], &text, &TypeMap::default()).unwrap();
        assert_eq!(export.skipped.len(), 1);
        assert_eq!(export.skipped[0].line, 1);
        assert_eq!(export.document.render(), "T1\tCL 0 3\tred\n");
    }

    #[test]
    fn test_handoff_json_single_or_many() {
        let one = r#"{"text_source": "a.txt", "annotations": [], "mentions": []}"#;
        assert_eq!(HandoffDocument::from_json(one).unwrap().len(), 1);

        let many = r#"[{"text_source": "a.txt"}, {"text_source": "b.txt"}]"#;
        let docs = HandoffDocument::from_json(many).unwrap();
        assert_eq!(docs[1].text_source, "b.txt");
    }
}
