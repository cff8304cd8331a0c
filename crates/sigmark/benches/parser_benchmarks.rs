//! Parser performance benchmarks.
//!
//! Measures reading measurement files and converting them to typed rows.

use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sigmark::input::Parser;
use sigmark::{ColumnMapping, FieldSelection, MeasurementTable, Sigmark};
use tempfile::NamedTempFile;

/// Generate a long-format measurement file with `rows` observations.
fn generate_measurement_data(rows: usize, delimiter: char) -> String {
    let mut data = format!("treatment{delimiter}cell_type{delimiter}expression\n");
    for row in 0..rows {
        let value = if row % 50 == 0 {
            "NA".to_string()
        } else {
            format!("{:.3}", (row % 97) as f64 * 0.37)
        };
        data.push_str(&format!(
            "Group_{}{delimiter}Cell_{}{delimiter}{}\n",
            row % 4,
            row % 20,
            value
        ));
    }
    data
}

fn temp_file(data: &str, suffix: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::with_suffix(suffix).unwrap();
    temp.write_all(data.as_bytes()).unwrap();
    temp
}

/// Benchmark loading files of various sizes and delimiters.
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for (name, delimiter, suffix) in [("tsv", '\t', ".tsv"), ("csv", ',', ".csv")] {
        for rows in [1_000, 10_000, 100_000] {
            let data = generate_measurement_data(rows, delimiter);
            group.throughput(Throughput::Bytes(data.len() as u64));
            group.bench_with_input(BenchmarkId::new(name, rows), &data, |b, data| {
                b.iter_with_setup(
                    || temp_file(data, suffix),
                    |temp| {
                        let sigmark = Sigmark::new();
                        black_box(sigmark.load(temp.path(), &FieldSelection::Positional).unwrap())
                    },
                )
            });
        }
    }

    group.finish();
}

/// Benchmark the string-to-measurement conversion on its own.
fn bench_measurement_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("measurement_conversion");

    for rows in [1_000, 10_000, 100_000] {
        let data = generate_measurement_data(rows, '\t');
        let table = Parser::new().parse_str(&data).unwrap();
        let mapping = ColumnMapping::new("treatment", "cell_type", "expression");

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(MeasurementTable::from_data_table(table, &mapping).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_measurement_conversion);
criterion_main!(benches);
