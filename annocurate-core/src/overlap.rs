//! Overlap detection between textbound records
//!
//! Two records overlap when their bounding ranges intersect; ranges that only
//! touch at a boundary do not. The same predicate feeds both the read-only
//! report and the conflict resolver.

use crate::record::{AnnotationRecord, Document};
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Whether two textbound records overlap
///
/// Non-textbound records never overlap anything.
pub fn overlaps(a: &AnnotationRecord, b: &AnnotationRecord) -> bool {
    match (a.as_textbound(), b.as_textbound()) {
        (Some(ta), Some(tb)) => ta.overlaps(tb),
        _ => false,
    }
}

/// Index pair into a record slice, ordered so that `ids[first] < ids[second]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OverlapPair {
    /// Record with the smaller identifier
    pub first: usize,
    /// Record with the larger identifier
    pub second: usize,
}

fn candidates(records: &[&AnnotationRecord]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_textbound() && !r.is_removed())
        .map(|(i, _)| i)
        .collect()
}

fn pairs_for(records: &[&AnnotationRecord], live: &[usize], i: usize) -> Vec<OverlapPair> {
    let a = records[i];
    live.iter()
        .copied()
        .filter(|&j| a.id() < records[j].id() && overlaps(a, records[j]))
        .map(|j| OverlapPair { first: i, second: j })
        .collect()
}

/// All overlapping pairs among non-removed textbound records
///
/// Pairs are sorted by `(first, second)` index so the result does not depend
/// on how the scan was scheduled.
pub fn find_overlaps(records: &[&AnnotationRecord]) -> Vec<OverlapPair> {
    let live = candidates(records);

    #[cfg(feature = "parallel")]
    let mut pairs: Vec<OverlapPair> = live
        .par_iter()
        .flat_map_iter(|&i| pairs_for(records, &live, i))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let mut pairs: Vec<OverlapPair> = live
        .iter()
        .flat_map(|&i| pairs_for(records, &live, i))
        .collect();

    pairs.sort_unstable();
    pairs
}

/// One line of the overlap report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapLine {
    /// Document name
    pub source: String,
    /// Short form of the first record
    pub first: String,
    /// Short form of the second record
    pub second: String,
}

impl fmt::Display for OverlapLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.source, self.first, self.second)
    }
}

/// Read-only overlap report for a document
///
/// Lines follow input order of the first record, then of the second.
pub fn overlap_report(document: &Document) -> Vec<OverlapLine> {
    let records: Vec<&AnnotationRecord> = document.records().collect();
    let short = |i: usize| {
        records[i]
            .as_textbound()
            .map(ToString::to_string)
            .unwrap_or_default()
    };
    find_overlaps(&records)
        .into_iter()
        .map(|p| OverlapLine {
            source: document.name().to_string(),
            first: short(p.first),
            second: short(p.second),
        })
        .collect()
}
