//! Curation of brat-style standoff annotations
//!
//! Annotation files produced by automated importers often carry the same
//! mention several times, the same span under competing ontology types, or
//! spans that overlap partially. This crate cleans such files in three
//! stages over each document:
//!
//! - **Duplicate filtering**: records whose payload repeats an earlier one
//!   are removed.
//! - **Identical-span resolution**: textbounds with exactly the same spans are
//!   settled by a [`PriorityTable`] of `keep > remove` type rules.
//! - **Overlap resolution**: of two overlapping textbounds the longer one
//!   survives, with ties broken towards the earlier start.
//!
//! Removal is a flag on the record; surviving lines are written back in
//! input order, byte for byte.
//!
//! # Example
//!
//! ```rust
//! use annocurate_core::{CurationOptions, Curator, PriorityTable};
//!
//! let table = PriorityTable::builtin();
//! let curator = Curator::new(table, CurationOptions::default());
//!
//! let input = "T1\tCHEBI 0 3\tDNA\nT2\tSO 0 3\tDNA\nT3\tGO 2 9\tA bound\n";
//! let (document, report) = curator.curate_str("doc.ann", input, None).unwrap();
//!
//! assert_eq!(document.render(), "T3\tGO 2 9\tA bound\n");
//! assert_eq!(report.removed_count(), 2);
//! ```

#![warn(missing_docs)]

pub mod align;
pub mod curate;
pub mod dedup;
pub mod error;
pub mod export;
pub mod mention;
pub mod overlap;
pub mod priority;
pub mod record;
pub mod resolver;
pub mod span;

pub use align::{AlignmentWarning, DocumentText, Repair};
pub use curate::{CurationOptions, CurationReport, CurationSummary, Curator};
pub use dedup::{remove_duplicates, DedupReport, DuplicateFilter};
pub use error::{CurateError, FormatError, Result};
pub use export::{
    export_document, export_source, group_by_source, HandoffDocument, IdGenerator, TypeMap,
};
pub use mention::{Mention, MentionIndex, MentionKind};
pub use overlap::{find_overlaps, overlap_report, overlaps, OverlapLine, OverlapPair};
pub use priority::{PriorityRule, PriorityTable};
pub use record::{AnnotationRecord, Document, Entry, SkippedLine};
pub use resolver::{ConflictResolver, Elimination, EliminationReason, Resolution, UnresolvedPair};
pub use span::{Span, Spans, Textbound};
