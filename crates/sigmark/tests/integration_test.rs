//! Integration tests for Sigmark.

use std::io::Write;
use tempfile::NamedTempFile;

use sigmark::input::Parser;
use sigmark::{
    AnnotationConfig, AnnotationGenerator, ColumnMapping, Comparison, DiagnosticKind,
    FieldSelection, LabelFormat, Measurement, MeasurementTable, Sigmark, SigmarkError, TestMethod,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn mapping() -> ColumnMapping {
    ColumnMapping::new("treatment", "cell_type", "expression")
}

/// T1: Ctrl=[1,2,3] Drug=[10,11,12]; T2: both groups constant at 1.
fn two_facet_rows() -> Vec<Measurement> {
    let mut rows = Vec::new();
    for v in [1.0, 2.0, 3.0] {
        rows.push(Measurement::new("Ctrl", "T1", v));
    }
    for v in [10.0, 11.0, 12.0] {
        rows.push(Measurement::new("Drug", "T1", v));
    }
    for _ in 0..3 {
        rows.push(Measurement::new("Ctrl", "T2", 1.0));
        rows.push(Measurement::new("Drug", "T2", 1.0));
    }
    rows
}

// =============================================================================
// End-to-end Behavior
// =============================================================================

#[test]
fn test_two_facet_end_to_end() {
    let table = MeasurementTable::new(mapping(), two_facet_rows());
    let result = AnnotationGenerator::new()
        .generate(&table, &[Comparison::new("Ctrl", "Drug")])
        .expect("Annotation failed");

    assert_eq!(result.len(), 2);

    let t1 = &result.rows[0];
    assert_eq!((t1.facet.as_str(), t1.group_a.as_str(), t1.group_b.as_str()), ("T1", "Ctrl", "Drug"));
    assert_eq!(t1.label, "***");
    assert_eq!(t1.y_position, 12.0 * 1.05);

    let t2 = &result.rows[1];
    assert_eq!(t2.facet, "T2");
    assert_eq!(t2.label, "ns");
    assert_eq!(t2.y_position, 1.0 * 1.05);
}

#[test]
fn test_file_to_tsv_output() {
    let content = "treatment,cell_type,expression\n\
                   Ctrl,T1,1\nCtrl,T1,2\nCtrl,T1,3\n\
                   Drug,T1,10\nDrug,T1,11\nDrug,T1,12\n";
    let file = create_test_file(content);

    let result = Sigmark::new()
        .annotate(
            file.path(),
            &FieldSelection::Explicit(mapping()),
            &[Comparison::new("Ctrl", "Drug")],
        )
        .expect("Annotation failed");

    let mut out = Vec::new();
    result.annotations.write_delimited(&mut out, b'\t').unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "cell_type\tstart\tend\ty\tlabel");
    assert!(lines[1].starts_with("T1\tCtrl\tDrug\t12.6"));
    assert!(lines[1].ends_with("\t***"));
}

#[test]
fn test_generate_from_data_table() {
    let data = Parser::new()
        .parse_str("g\tf\tv\nA\tx\t1\nA\tx\t2\nB\tx\t3\nB\tx\t5\n")
        .unwrap();
    let mapping = ColumnMapping::positional(&data).unwrap();
    let result = AnnotationGenerator::new()
        .generate_from_table(&data, &mapping, &[Comparison::new("A", "B")])
        .unwrap();

    assert_eq!(result.facet_field, "f");
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].y_position, 5.0 * 1.05);
}

// =============================================================================
// Determinism and Ordering
// =============================================================================

#[test]
fn test_repeated_runs_identical() {
    let table = MeasurementTable::new(mapping(), two_facet_rows());
    let comparisons = [Comparison::new("Ctrl", "Drug"), Comparison::new("Drug", "Ctrl")];
    let generator = AnnotationGenerator::new();

    let first = generator.generate(&table, &comparisons).unwrap();
    let second = generator.generate(&table, &comparisons).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_order_independent_of_row_shuffle_within_facet() {
    let comparisons = [
        Comparison::new("Ctrl", "Drug"),
        Comparison::new("Drug", "Vehicle"),
        Comparison::new("Ctrl", "Vehicle"),
    ];
    let mut rows = Vec::new();
    for (i, v) in [1.0, 2.0, 3.0, 4.0].iter().enumerate() {
        rows.push(Measurement::new("Ctrl", "T1", *v));
        rows.push(Measurement::new("Drug", "T1", v * 3.0 + i as f64));
        rows.push(Measurement::new("Vehicle", "T1", v + 0.5));
        rows.push(Measurement::new("Ctrl", "T2", v * 2.0));
        rows.push(Measurement::new("Drug", "T2", v * 2.5));
        rows.push(Measurement::new("Vehicle", "T2", v * 1.5));
    }

    let ordered = AnnotationGenerator::new()
        .generate(&MeasurementTable::new(mapping(), rows.clone()), &comparisons)
        .unwrap();

    // Reverse rows within each facet, keeping T1 seen first
    let (mut t1, mut t2): (Vec<_>, Vec<_>) = rows.into_iter().partition(|m| m.facet == "T1");
    t1.reverse();
    t2.reverse();
    let shuffled: Vec<Measurement> = t1.into_iter().chain(t2).collect();
    let reordered = AnnotationGenerator::new()
        .generate(&MeasurementTable::new(mapping(), shuffled), &comparisons)
        .unwrap();

    let keys = |t: &sigmark::AnnotationTable| -> Vec<(String, String, String, String)> {
        t.rows
            .iter()
            .map(|r| (r.facet.clone(), r.group_a.clone(), r.group_b.clone(), r.label.clone()))
            .collect()
    };
    assert_eq!(keys(&ordered), keys(&reordered));
    assert_eq!(ordered.rows.len(), 6);
    assert_eq!(ordered.rows[0].facet, "T1");
    assert_eq!(ordered.rows[3].facet, "T2");
    assert_eq!(ordered.rows[1].group_a, "Drug");
    for (a, b) in ordered.rows.iter().zip(&reordered.rows) {
        assert_eq!(a.y_position, b.y_position);
        assert!((a.p_value - b.p_value).abs() < 1e-12);
    }
}

#[test]
fn test_facets_follow_first_appearance() {
    let rows = vec![
        Measurement::new("A", "zeta", 1.0),
        Measurement::new("A", "alpha", 1.0),
        Measurement::new("A", "zeta", 2.0),
        Measurement::new("B", "zeta", 3.0),
        Measurement::new("B", "zeta", 4.0),
        Measurement::new("A", "alpha", 2.0),
        Measurement::new("B", "alpha", 3.0),
        Measurement::new("B", "alpha", 4.0),
    ];
    let result = AnnotationGenerator::new()
        .generate(&MeasurementTable::new(mapping(), rows), &[Comparison::new("A", "B")])
        .unwrap();
    let facets: Vec<&str> = result.rows.iter().map(|r| r.facet.as_str()).collect();
    assert_eq!(facets, vec!["zeta", "alpha"]);
}

// =============================================================================
// Skips and Diagnostics
// =============================================================================

#[test]
fn test_single_observation_skips_only_that_pair() {
    let mut rows = two_facet_rows();
    rows.push(Measurement::new("Solo", "T1", 7.0));
    let comparisons = [Comparison::new("Ctrl", "Solo"), Comparison::new("Ctrl", "Drug")];

    let result = AnnotationGenerator::new()
        .generate(&MeasurementTable::new(mapping(), rows), &comparisons)
        .unwrap();

    // Solo exists only in T1 with one value; absent from T2
    assert_eq!(result.rows.len(), 2);
    assert!(result.rows.iter().all(|r| r.group_b == "Drug"));
    assert_eq!(result.diagnostics.len(), 2);
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::InsufficientData && d.group_b == "Solo"));
    assert_eq!(result.diagnostics[0].facet, "T1");
    assert_eq!(result.diagnostics[0].n_b, 1);
    assert_eq!(result.diagnostics[1].facet, "T2");
    assert_eq!(result.diagnostics[1].n_b, 0);
}

#[test]
fn test_stagger_keeps_index_after_skip() {
    let mut rows = two_facet_rows();
    rows.push(Measurement::new("Solo", "T1", 7.0));
    let comparisons = [Comparison::new("Ctrl", "Solo"), Comparison::new("Ctrl", "Drug")];

    let result = AnnotationGenerator::new()
        .generate(&MeasurementTable::new(mapping(), rows), &comparisons)
        .unwrap();

    // The surviving comparison is index 1, so it is staggered by 1.1
    assert!((result.rows[0].y_position - 12.0 * 1.05 * 1.1).abs() < 1e-12);
}

#[test]
fn test_staggering_identical_ceilings() {
    let rows = vec![
        Measurement::new("A", "F", 2.0),
        Measurement::new("A", "F", 8.0),
        Measurement::new("B", "F", 3.0),
        Measurement::new("B", "F", 8.0),
    ];
    let config = AnnotationConfig {
        y_offset_multiplier: 1.2,
        ..AnnotationConfig::default()
    };
    let result = AnnotationGenerator::with_config(config)
        .generate(
            &MeasurementTable::new(mapping(), rows),
            &[Comparison::new("A", "B"), Comparison::new("B", "A")],
        )
        .unwrap();

    let step = result.rows[1].y_position - result.rows[0].y_position;
    assert!((step - 8.0 * 1.2 * 0.1).abs() < 1e-12);
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn test_numeric_and_raw_labels() {
    let table = MeasurementTable::new(mapping(), two_facet_rows());
    let comparisons = [Comparison::new("Ctrl", "Drug")];

    let numeric = AnnotationGenerator::with_config(AnnotationConfig {
        label_format: LabelFormat::Numeric,
        ..AnnotationConfig::default()
    })
    .generate(&table, &comparisons)
    .unwrap();
    assert_eq!(numeric.rows[0].label, "< 0.001");
    assert_eq!(numeric.rows[1].label, "1.00");

    let raw = AnnotationGenerator::with_config(AnnotationConfig {
        label_format: LabelFormat::Raw,
        ..AnnotationConfig::default()
    })
    .generate(&table, &comparisons)
    .unwrap();
    assert_eq!(raw.rows[0].label, raw.rows[0].p_value.to_string());
    assert_eq!(raw.rows[1].label, "1");
}

#[test]
fn test_rank_sum_method() {
    let table = MeasurementTable::new(mapping(), two_facet_rows());
    let result = AnnotationGenerator::with_config(AnnotationConfig {
        test_method: TestMethod::MannWhitney,
        label_format: LabelFormat::Numeric,
        ..AnnotationConfig::default()
    })
    .generate(&table, &[Comparison::new("Ctrl", "Drug")])
    .unwrap();

    // Complete separation of 3 vs 3: W = 0, normal approximation p ~ 0.0809
    assert_eq!(result.rows[0].statistic, 0.0);
    assert_eq!(result.rows[0].label, "0.08");
    assert_eq!(result.rows[1].label, "1.00");
}

#[test]
fn test_unknown_label_format_is_fatal() {
    let err = "stars".parse::<LabelFormat>().unwrap_err();
    assert!(matches!(err, SigmarkError::Config(_)));
}

#[test]
fn test_non_numeric_value_is_fatal() {
    let content = "treatment,cell_type,expression\nCtrl,T1,1\nCtrl,T1,high\n";
    let file = create_test_file(content);
    let err = Sigmark::new()
        .annotate(
            file.path(),
            &FieldSelection::Explicit(mapping()),
            &[Comparison::new("Ctrl", "Drug")],
        )
        .unwrap_err();
    assert!(matches!(err, SigmarkError::Parse { row: 2, .. }));
}

#[test]
fn test_all_pairs_helper() {
    let table = MeasurementTable::new(mapping(), two_facet_rows());
    let comparisons = Comparison::all_pairs(&table.group_labels());
    assert_eq!(comparisons, vec![Comparison::new("Ctrl", "Drug")]);
}

#[test]
fn test_header_only_file_gives_empty_result() {
    let file = create_test_file("g\tf\tv\n");
    let result = Sigmark::new()
        .annotate(
            file.path(),
            &FieldSelection::Positional,
            &[Comparison::new("Ctrl", "Drug")],
        )
        .expect("Header-only file should annotate to an empty table");

    assert!(result.annotations.rows.is_empty());
    assert!(result.annotations.diagnostics.is_empty());
    assert_eq!(result.annotations.facet_field, "f");
    assert_eq!(result.source.row_count, 0);
    assert_eq!(result.summary.facets, 0);
}

#[test]
fn test_self_comparison_does_not_abort_run() {
    let content = "treatment,cell_type,expression\n\
                   Ctrl,T1,1\nCtrl,T1,2\nCtrl,T1,3\n\
                   Drug,T1,10\nDrug,T1,11\nDrug,T1,12\n";
    let file = create_test_file(content);

    let result = Sigmark::new()
        .annotate(
            file.path(),
            &FieldSelection::Explicit(mapping()),
            &[Comparison::new("Ctrl", "Drug"), Comparison::new("Ctrl", "Ctrl")],
        )
        .expect("Self-comparison should be skipped, not fatal");

    assert_eq!(result.annotations.rows.len(), 1);
    assert_eq!(result.annotations.rows[0].label, "***");
    assert_eq!(result.annotations.diagnostics.len(), 1);
    assert_eq!(
        result.annotations.diagnostics[0].kind,
        DiagnosticKind::ComputationFailure
    );
    assert_eq!(result.summary.skipped, 1);
}

#[test]
fn test_overlong_row_is_fatal() {
    let content = "treatment,cell_type,expression\nCtrl,T1,1\nCtrl,T1,2,extra\n";
    let file = create_test_file(content);
    let err = Sigmark::new()
        .annotate(
            file.path(),
            &FieldSelection::Explicit(mapping()),
            &[Comparison::new("Ctrl", "Drug")],
        )
        .unwrap_err();
    assert!(matches!(err, SigmarkError::Parse { row: 2, column: 4, .. }));
}

#[test]
fn test_empty_facet_cell_is_fatal() {
    let content = "treatment,cell_type,expression\nCtrl,T1,1\nDrug,,2\n";
    let file = create_test_file(content);
    let err = Sigmark::new()
        .annotate(
            file.path(),
            &FieldSelection::Explicit(mapping()),
            &[Comparison::new("Ctrl", "Drug")],
        )
        .unwrap_err();
    assert!(matches!(err, SigmarkError::Parse { row: 2, column: 2, .. }));
}

#[test]
fn test_facet_field_clashing_with_output_column_is_fatal() {
    let content = "treatment,label,expression\nCtrl,T1,1\nCtrl,T1,2\nDrug,T1,3\nDrug,T1,4\n";
    let file = create_test_file(content);
    let err = Sigmark::new()
        .annotate(
            file.path(),
            &FieldSelection::Positional,
            &[Comparison::new("Ctrl", "Drug")],
        )
        .unwrap_err();
    assert!(matches!(err, SigmarkError::Config(_)));
}
