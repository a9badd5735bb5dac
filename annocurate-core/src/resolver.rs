//! Conflict resolution over overlapping textbound records
//!
//! Resolution runs in two phases:
//!
//! 1. **Identical spans.** Records with exactly the same span tuple are
//!    compared pairwise through the [`PriorityTable`]. Pairs no rule decides
//!    are reported and left in place.
//! 2. **Overlaps.** Every remaining overlap is settled by [`pick_removed`]:
//!    the shorter bounding range loses, then the later start, then the later
//!    input line.
//!
//! A removed record never eliminates another one. Phase 2 visits records from
//! strongest to weakest under the `pick_removed` order, so the surviving set
//! does not depend on the order in which records or pairs are enumerated.

use crate::overlap::overlaps;
use crate::priority::{Loser, PriorityTable};
use crate::record::{AnnotationRecord, Document};
use crate::span::Spans;
use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use std::fmt;

/// Why a record was eliminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationReason {
    /// Identical spans, decided by the priority rule at this index
    Priority {
        /// Index of the deciding rule
        rule: usize,
    },
    /// Overlap settled by the geometric tie-break
    Overlap,
}

/// A single elimination event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elimination {
    /// Eliminated record, serialized
    pub removed: String,
    /// Surviving record that caused the elimination, serialized
    pub survivor: String,
    /// Deciding rule
    pub reason: EliminationReason,
}

impl fmt::Display for Elimination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            EliminationReason::Overlap => write!(
                f,
                "Eliminate {} due to overlap with {}",
                self.removed, self.survivor
            ),
            EliminationReason::Priority { rule } => write!(
                f,
                "Eliminate {} due to type priority of {} (rule {})",
                self.removed,
                self.survivor,
                rule + 1
            ),
        }
    }
}

/// Identically-spanned pair that no priority rule decides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPair {
    /// First record, serialized
    pub first: String,
    /// Second record, serialized
    pub second: String,
}

impl fmt::Display for UnresolvedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unresolved identical spans: {} and {}",
            self.first, self.second
        )
    }
}

/// Outcome of resolving one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Phase 1 eliminations, then phase 2 eliminations
    pub eliminations: Vec<Elimination>,
    /// Phase 1 pairs left undecided
    pub unresolved: Vec<UnresolvedPair>,
}

impl Resolution {
    /// Number of eliminated records
    pub fn removed_count(&self) -> usize {
        self.eliminations.len()
    }

    /// Eliminations decided by the priority table
    pub fn priority_count(&self) -> usize {
        self.eliminations
            .iter()
            .filter(|e| matches!(e.reason, EliminationReason::Priority { .. }))
            .count()
    }

    /// Eliminations decided by the geometric tie-break
    pub fn overlap_count(&self) -> usize {
        self.eliminations
            .iter()
            .filter(|e| e.reason == EliminationReason::Overlap)
            .count()
    }
}

/// Ordering key: the smaller key is the weaker record
fn strength(record: &AnnotationRecord) -> (usize, Reverse<usize>, Reverse<usize>, Reverse<&str>) {
    let (len, start) = record
        .as_textbound()
        .map_or((0, usize::MAX), |tb| (tb.len(), tb.start()));
    (
        len,
        Reverse(start),
        Reverse(record.origin_line()),
        Reverse(record.id()),
    )
}

/// Choose which of two overlapping records to remove
///
/// Returns `(removed, kept)`. Prefers removing the shorter bounding range;
/// for equal lengths the later start; for equal starts the later input line.
/// The result does not depend on argument order.
pub fn pick_removed<'r>(
    a: &'r AnnotationRecord,
    b: &'r AnnotationRecord,
) -> (&'r AnnotationRecord, &'r AnnotationRecord) {
    match strength(a).cmp(&strength(b)) {
        Ordering::Less => (a, b),
        Ordering::Greater | Ordering::Equal => (b, a),
    }
}

fn same_spans(a: &AnnotationRecord, b: &AnnotationRecord) -> bool {
    match (a.as_textbound(), b.as_textbound()) {
        (Some(ta), Some(tb)) => ta.same_spans(tb),
        _ => false,
    }
}

/// Applies the priority table and the tie-break to a document
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver<'t> {
    table: &'t PriorityTable,
}

impl<'t> ConflictResolver<'t> {
    /// Create a resolver over a priority table
    pub fn new(table: &'t PriorityTable) -> Self {
        Self { table }
    }

    /// Run both phases over a document
    pub fn resolve(&self, document: &mut Document) -> Resolution {
        let name = document.name().to_string();
        let mut records = document.records_mut();
        let mut resolution = Resolution::default();
        self.resolve_identical_spans(&mut records, &mut resolution);
        log::debug!(
            "{name}: phase 1 removed {}, left {} unresolved",
            resolution.eliminations.len(),
            resolution.unresolved.len()
        );
        Self::resolve_overlaps(&mut records, &mut resolution);
        resolution
    }

    /// Phase 1: pairwise priority decisions within identical-span groups
    pub fn resolve_identical_spans(
        &self,
        records: &mut [&mut AnnotationRecord],
        resolution: &mut Resolution,
    ) {
        let mut group_of: HashMap<Spans, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (i, record) in records.iter().enumerate() {
            if record.is_removed() {
                continue;
            }
            let Some(tb) = record.as_textbound() else {
                continue;
            };
            let spans: Spans = tb.spans().iter().copied().collect();
            let g = *group_of.entry(spans).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[g].push(i);
        }

        for mut group in groups.into_iter().filter(|g| g.len() > 1) {
            group.sort_by(|&a, &b| {
                (records[a].origin_line(), records[a].id())
                    .cmp(&(records[b].origin_line(), records[b].id()))
            });
            for x in 0..group.len() {
                for y in x + 1..group.len() {
                    let (i, j) = (group[x], group[y]);
                    if records[i].is_removed() || records[j].is_removed() {
                        continue;
                    }
                    let (Some(a), Some(b)) = (records[i].as_textbound(), records[j].as_textbound())
                    else {
                        continue;
                    };
                    let decision = self.table.decide(a.type_label(), b.type_label());
                    match decision {
                        Some(decision) => {
                            let (loser, winner) = match decision.loser {
                                Loser::First => (i, j),
                                Loser::Second => (j, i),
                            };
                            records[loser].mark_removed();
                            resolution.eliminations.push(Elimination {
                                removed: records[loser].to_string(),
                                survivor: records[winner].to_string(),
                                reason: EliminationReason::Priority {
                                    rule: decision.rule,
                                },
                            });
                        }
                        None => {
                            let pair = UnresolvedPair {
                                first: records[i].to_string(),
                                second: records[j].to_string(),
                            };
                            log::warn!("{pair}");
                            resolution.unresolved.push(pair);
                        }
                    }
                }
            }
        }
    }

    /// Phase 2: geometric tie-break over the remaining overlaps
    ///
    /// Identically-spanned pairs belong to phase 1 and are left alone here.
    pub fn resolve_overlaps(records: &mut [&mut AnnotationRecord], resolution: &mut Resolution) {
        let mut live: Vec<usize> = (0..records.len())
            .filter(|&i| records[i].is_textbound() && !records[i].is_removed())
            .collect();
        live.sort_by(|&a, &b| strength(&records[b]).cmp(&strength(&records[a])));

        let mut kept: Vec<usize> = Vec::with_capacity(live.len());
        let mut eliminated: Vec<(usize, Elimination)> = Vec::new();
        for i in live {
            let eliminator = kept.iter().copied().find(|&k| {
                overlaps(&records[k], &records[i]) && !same_spans(&records[k], &records[i])
            });
            match eliminator {
                Some(k) => {
                    records[i].mark_removed();
                    let elimination = Elimination {
                        removed: records[i].to_string(),
                        survivor: records[k].to_string(),
                        reason: EliminationReason::Overlap,
                    };
                    log::debug!("{elimination}");
                    eliminated.push((records[i].origin_line(), elimination));
                }
                None => kept.push(i),
            }
        }

        eliminated.sort_by_key(|(line, _)| *line);
        resolution
            .eliminations
            .extend(eliminated.into_iter().map(|(_, e)| e));
    }
}
