//! Property tests for overlap detection and conflict resolution

use annocurate_core::resolver::pick_removed;
use annocurate_core::{
    find_overlaps, overlaps, AnnotationRecord, ConflictResolver, CurationOptions, Curator,
    Document, OverlapPair, PriorityTable, Span,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

const TYPES: [&str; 4] = ["CL", "GO", "SO", "CHEBI"];

/// `(type, start, len)` for a handful of continuous textbounds
fn textbounds() -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((0..TYPES.len(), 0usize..40, 1usize..12), 0..12)
}

fn render(specs: &[(usize, usize, usize)], ids: &[usize]) -> String {
    ids.iter()
        .map(|&i| {
            let (ty, start, len) = specs[i];
            format!("T{}\t{} {} {}\t{}\n", i + 1, TYPES[ty], start, start + len, "x".repeat(len))
        })
        .collect()
}

fn removed_ids(table: &PriorityTable, content: &str) -> BTreeSet<String> {
    let mut document = Document::parse("doc.ann", content).unwrap();
    ConflictResolver::new(table).resolve(&mut document);
    document
        .records()
        .filter(|r| r.is_removed())
        .map(|r| r.id().to_string())
        .collect()
}

proptest! {
    #[test]
    fn span_overlap_is_symmetric(a in 0usize..50, al in 1usize..20, b in 0usize..50, bl in 1usize..20) {
        let x = Span::new(a, a + al).unwrap();
        let y = Span::new(b, b + bl).unwrap();
        prop_assert_eq!(x.overlaps(&y), y.overlaps(&x));
        prop_assert_eq!(x.overlaps(&y), a < b + bl && b < a + al);
    }

    #[test]
    fn pick_removed_ignores_argument_order(a in 0usize..30, al in 1usize..10, b in 0usize..30, bl in 1usize..10) {
        let x = AnnotationRecord::parse(&format!("T1\tCL {} {}\tx", a, a + al), 0).unwrap();
        let y = AnnotationRecord::parse(&format!("T2\tGO {} {}\ty", b, b + bl), 1).unwrap();
        let (removed, kept) = pick_removed(&x, &y);
        let (removed_rev, kept_rev) = pick_removed(&y, &x);
        prop_assert_eq!(removed.id(), removed_rev.id());
        prop_assert_eq!(kept.id(), kept_rev.id());
        prop_assert!(removed.as_textbound().unwrap().len() <= kept.as_textbound().unwrap().len());
    }

    #[test]
    fn find_overlaps_matches_nested_scan(
        (specs, removed) in textbounds().prop_flat_map(|specs| {
            let n = specs.len();
            (Just(specs), prop::collection::vec(any::<bool>(), n))
        })
    ) {
        let mut records: Vec<AnnotationRecord> = specs
            .iter()
            .enumerate()
            .map(|(i, &(ty, start, len))| {
                let line = format!(
                    "T{}\t{} {} {}\t{}",
                    i + 1,
                    TYPES[ty],
                    start,
                    start + len,
                    "x".repeat(len)
                );
                AnnotationRecord::parse(&line, i).unwrap()
            })
            .collect();
        for (record, &gone) in records.iter_mut().zip(&removed) {
            if gone {
                record.mark_removed();
            }
        }
        let relation = AnnotationRecord::parse("R1\tpart_of Arg1:T1 Arg2:T2", specs.len());
        records.push(relation.unwrap());
        let refs: Vec<&AnnotationRecord> = records.iter().collect();

        let mut expected = Vec::new();
        for (i, &(_, a_start, a_len)) in specs.iter().enumerate() {
            for (j, &(_, b_start, b_len)) in specs.iter().enumerate() {
                if removed[i] || removed[j] || refs[i].id() >= refs[j].id() {
                    continue;
                }
                if a_start < b_start + b_len && b_start < a_start + a_len {
                    expected.push(OverlapPair { first: i, second: j });
                }
            }
        }
        expected.sort();

        prop_assert_eq!(find_overlaps(&refs), expected);
    }

    #[test]
    fn resolution_ignores_input_order(
        (specs, order) in textbounds().prop_flat_map(|specs| {
            let ids: Vec<usize> = (0..specs.len()).collect();
            (Just(specs), Just(ids).prop_shuffle())
        })
    ) {
        let table = PriorityTable::default();
        let natural: Vec<usize> = (0..specs.len()).collect();
        prop_assert_eq!(
            removed_ids(&table, &render(&specs, &natural)),
            removed_ids(&table, &render(&specs, &order))
        );
    }

    #[test]
    fn survivors_never_overlap_with_different_spans(specs in textbounds()) {
        let ids: Vec<usize> = (0..specs.len()).collect();
        let mut document = Document::parse("doc.ann", &render(&specs, &ids)).unwrap();
        ConflictResolver::new(PriorityTable::builtin()).resolve(&mut document);

        let survivors: Vec<&AnnotationRecord> = document.records().filter(|r| !r.is_removed()).collect();
        for (i, a) in survivors.iter().enumerate() {
            for b in &survivors[i + 1..] {
                let same = a.as_textbound().unwrap().same_spans(b.as_textbound().unwrap());
                prop_assert!(same || !overlaps(a, b), "{} overlaps {}", a, b);
            }
        }
    }

    #[test]
    fn every_overlap_removal_has_a_surviving_cause(specs in textbounds()) {
        let ids: Vec<usize> = (0..specs.len()).collect();
        let mut document = Document::parse("doc.ann", &render(&specs, &ids)).unwrap();
        let resolution = ConflictResolver::new(&PriorityTable::default()).resolve(&mut document);

        let survivors: BTreeSet<String> = document
            .records()
            .filter(|r| !r.is_removed())
            .map(|r| r.to_string())
            .collect();
        for elimination in &resolution.eliminations {
            prop_assert!(survivors.contains(&elimination.survivor));
        }
    }

    #[test]
    fn curation_is_idempotent(specs in textbounds()) {
        let ids: Vec<usize> = (0..specs.len()).collect();
        let curator = Curator::new(PriorityTable::builtin(), CurationOptions::default());
        let (first, _) = curator.curate_str("doc.ann", &render(&specs, &ids), None).unwrap();
        let (second, report) = curator.curate_str("doc.ann", &first.render(), None).unwrap();
        prop_assert_eq!(first.render(), second.render());
        prop_assert_eq!(report.removed_count(), 0);
    }
}
