//! End-to-end tests for the curation pipeline

use annocurate_core::{
    overlap_report, CurateError, CurationOptions, Curator, Document, DocumentText, PriorityRule,
    PriorityTable,
};

fn curate(table: &PriorityTable, content: &str) -> (String, Vec<String>) {
    let (document, report) = Curator::new(table, CurationOptions::default())
        .curate_str("doc.ann", content, None)
        .unwrap();
    (document.render(), report.diagnostics())
}

#[test]
fn test_shorter_overlapping_record_removed() {
    let table = PriorityTable::default();
    let (output, diagnostics) = curate(&table, "T1\tGENE 10 20\tfoo\nT2\tGO 12 18\too\n");

    assert_eq!(output, "T1\tGENE 10 20\tfoo\n");
    assert_eq!(
        diagnostics,
        vec![
            "Eliminate T2\tGO 12 18\too due to overlap with T1\tGENE 10 20\tfoo".to_string(),
            "removed 1 overlapped annotations from doc.ann".to_string(),
        ]
    );
}

#[test]
fn test_identical_spans_resolved_by_priority() {
    let table = PriorityTable::new("test", vec![PriorityRule::new("CL", "GO")]);
    let (output, diagnostics) = curate(&table, "T1\tCL 0 5\tcells\nT2\tGO 0 5\tcells\n");

    assert_eq!(output, "T1\tCL 0 5\tcells\n");
    assert!(diagnostics[0].contains("T2\tGO 0 5\tcells"));
    assert!(diagnostics[0].contains("T1\tCL 0 5\tcells"));
    assert!(diagnostics[0].contains("type priority"));
}

#[test]
fn test_byte_identical_records_resolved_by_dedup() {
    let table = PriorityTable::default();
    let (output, diagnostics) = curate(&table, "T1\tPROT 0 4\tabc\nT2\tPROT 0 4\tabc\n");

    assert_eq!(output, "T1\tPROT 0 4\tabc\n");
    assert_eq!(
        diagnostics,
        vec!["removed 1 duplicates from doc.ann".to_string()]
    );
}

#[test]
fn test_builtin_table_prefers_chebi_over_so() {
    let (output, _) = curate(
        PriorityTable::builtin(),
        "T1\tSO 0 3\tDNA\nT2\tCHEBI 0 3\tDNA\n",
    );
    assert_eq!(output, "T2\tCHEBI 0 3\tDNA\n");
}

#[test]
fn test_undecided_identical_spans_both_survive() {
    let table = PriorityTable::default();
    let content = "T1\tFOO 0 5\tcells\nT2\tBAR 0 5\tcells\n";
    let (document, report) = Curator::new(&table, CurationOptions::default())
        .curate_str("doc.ann", content, None)
        .unwrap();

    assert_eq!(document.render(), content);
    assert_eq!(report.resolution.unresolved.len(), 1);
    assert_eq!(
        report.diagnostics(),
        vec!["Unresolved identical spans: T1\tFOO 0 5\tcells and T2\tBAR 0 5\tcells".to_string()]
    );
}

#[test]
fn test_touching_spans_do_not_conflict() {
    let table = PriorityTable::default();
    let content = "T1\tA 0 5\tabcde\nT2\tB 5 10\tfghij\n";
    let (output, diagnostics) = curate(&table, content);
    assert_eq!(output, content);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_removed_records_do_not_eliminate() {
    // T2 loses to T1; T3 only overlaps T2 and therefore survives
    let table = PriorityTable::default();
    let (output, _) = curate(
        &table,
        "T1\tA 0 10\taaaaaaaaaa\nT2\tB 8 14\tbbbbbb\nT3\tC 12 16\tcccc\n",
    );
    assert_eq!(output, "T1\tA 0 10\taaaaaaaaaa\nT3\tC 12 16\tcccc\n");
}

#[test]
fn test_discontinuous_records_use_bounding_range() {
    let table = PriorityTable::default();
    let (output, _) = curate(
        &table,
        "T1\tX 0 3;10 15\tred cells\nT2\tY 5 8\tfoo\n",
    );
    assert_eq!(output, "T1\tX 0 3;10 15\tred cells\n");
}

#[test]
fn test_non_textbound_lines_and_blanks_preserved_in_order() {
    let table = PriorityTable::default();
    let content = "T1\tGENE 10 20\tfoo\n\nR1\tpart_of Arg1:T1 Arg2:T2\nT2\tGO 12 18\too\n#1\tAnnotatorNotes T1\tchecked\n";
    let (output, _) = curate(&table, content);
    assert_eq!(
        output,
        "T1\tGENE 10 20\tfoo\n\nR1\tpart_of Arg1:T1 Arg2:T2\n#1\tAnnotatorNotes T1\tchecked\n"
    );
}

#[test]
fn test_malformed_lines_are_skipped_and_reported() {
    let table = PriorityTable::default();
    let content = "T1\tCL zero 5\tcells\nno tab here\nT2\tCL 0 5\tcells\n";
    let (document, report) = Curator::new(&table, CurationOptions::default())
        .curate_str("doc.ann", content, None)
        .unwrap();

    assert_eq!(document.render(), "T2\tCL 0 5\tcells\n");
    assert_eq!(report.skipped.len(), 2);
    assert!(report.diagnostics()[0].starts_with("error parsing doc.ann: line 1:"));
}

#[test]
fn test_duplicate_identifier_fails_document() {
    let table = PriorityTable::default();
    let err = Curator::new(&table, CurationOptions::default())
        .curate_str("doc.ann", "T1\tCL 0 5\tcells\nT1\tGO 7 9\tin\n", None)
        .unwrap_err();
    assert!(matches!(err, CurateError::DuplicateIdentifier { id } if id == "T1"));
}

#[test]
fn test_alignment_then_resolution() {
    let table = PriorityTable::default();
    let text = DocumentText::new("red blood cells");
    // T2 is repaired to 4-9 before overlap resolution sees it
    let content = "T1\tCL 0 15\tred blood cells\nT2\tUBERON 4 11\tblood\nT3\tCL 12 15\tlls\n";
    let (document, report) = Curator::new(&table, CurationOptions::default())
        .curate_str("doc.ann", content, Some(&text))
        .unwrap();

    assert_eq!(document.render(), "T1\tCL 0 15\tred blood cells\n");
    assert_eq!(report.repairs.len(), 1);
    assert_eq!(report.resolution.overlap_count(), 2);
}

#[test]
fn test_overlap_report_is_read_only() {
    let content = "T1\tGENE 10 20\tfoo\nT2\tGO 12 18\too\nT3\tCL 30 35\tcells\n";
    let document = Document::parse("doc.ann", content).unwrap();
    let lines = overlap_report(&document);

    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0].to_string(),
        "doc.ann\tGENE 10 20 (foo)\tGO 12 18 (oo)"
    );
    assert_eq!(document.render(), content);
}
