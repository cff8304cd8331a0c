//! Fuzz target for the annotation generator.
//!
//! Arbitrary measurements and comparisons must produce either rows with a
//! finite bracket height or diagnostics, never a panic.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sigmark::{
    AnnotationConfig, AnnotationGenerator, ColumnMapping, Comparison, Measurement,
    MeasurementTable, TestMethod,
};

#[derive(Debug, Arbitrary)]
struct Input {
    rows: Vec<(u8, u8, Option<f64>)>,
    pairs: Vec<(u8, u8)>,
    paired: bool,
    rank_test: bool,
}

fuzz_target!(|input: Input| {
    if input.rows.len() > 2_000 || input.pairs.len() > 16 {
        return;
    }

    let rows = input
        .rows
        .iter()
        .map(|(g, f, v)| Measurement::new(format!("g{}", g % 6), format!("f{}", f % 4), *v))
        .collect();
    let table = MeasurementTable::new(ColumnMapping::new("group", "facet", "value"), rows);

    let comparisons: Vec<Comparison> = input
        .pairs
        .iter()
        .filter(|(a, b)| a % 6 != b % 6)
        .map(|(a, b)| Comparison::new(format!("g{}", a % 6), format!("g{}", b % 6)))
        .collect();

    let generator = AnnotationGenerator::with_config(AnnotationConfig {
        paired_test: input.paired,
        test_method: if input.rank_test { TestMethod::MannWhitney } else { TestMethod::Welch },
        ..AnnotationConfig::default()
    });

    if let Ok(result) = generator.generate(&table, &comparisons) {
        for row in &result.rows {
            assert!(row.y_position.is_finite());
        }
    }
});
