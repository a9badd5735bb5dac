//! Exact-duplicate elimination
//!
//! Records are compared by their payload with the identifier stripped. No
//! normalization is performed, so even a difference in whitespace makes two
//! payloads distinct.

use crate::record::Document;
use std::collections::HashMap;

/// Tracks payloads seen so far within one document
#[derive(Debug, Default)]
pub struct DuplicateFilter {
    // payload -> id of its first occurrence
    seen: HashMap<String, String>,
}

impl DuplicateFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload; returns the id of the first occurrence if this
    /// payload is a repeat
    pub fn check(&mut self, id: &str, payload: &str) -> Option<&str> {
        if self.seen.contains_key(payload) {
            return self.seen.get(payload).map(String::as_str);
        }
        self.seen.insert(payload.to_string(), id.to_string());
        None
    }
}

/// A record eliminated as a duplicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRemoval {
    /// Removed record, serialized
    pub removed: String,
    /// Identifier of the retained first occurrence
    pub kept_id: String,
}

/// Outcome of duplicate filtering over one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupReport {
    /// Removed records in input order
    pub removals: Vec<DuplicateRemoval>,
}

impl DedupReport {
    /// Number of removed duplicates
    pub fn count(&self) -> usize {
        self.removals.len()
    }
}

/// Mark every repeated payload in `document` as removed
///
/// All record kinds take part; blank lines are not records and are left alone.
/// Records already removed are neither checked nor registered.
pub fn remove_duplicates(document: &mut Document) -> DedupReport {
    let mut filter = DuplicateFilter::new();
    let mut report = DedupReport::default();

    for record in document.records_mut() {
        if record.is_removed() {
            continue;
        }
        let Some(kept_id) = filter.check(record.id(), record.data()) else {
            continue;
        };
        let kept_id = kept_id.to_string();
        record.mark_removed();
        log::debug!("duplicate {} of {kept_id}", record.id());
        report.removals.push(DuplicateRemoval {
            removed: record.to_string(),
            kept_id,
        });
    }

    report
}
