//! Example: Annotate a measurement file with every pairwise comparison.
//!
//! Usage:
//!   cargo run --example annotate -- <file_path>
//!
//! The first three columns are read as group, facet and value.

use std::env;
use std::path::Path;

use sigmark::{Comparison, FieldSelection, Sigmark};

fn main() -> sigmark::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example annotate -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let sigmark = Sigmark::new();
    let (measurements, source) = sigmark.load(path, &FieldSelection::Positional)?;
    let comparisons = Comparison::all_pairs(&measurements.group_labels());
    let result = sigmark.annotate_measurements(&measurements, source, &comparisons)?;

    println!("## Source");
    println!("  File: {}", result.source.file);
    println!("  Format: {}", result.source.format);
    println!("  Rows: {}", result.source.row_count);
    println!();

    println!("## Annotations ({})", result.annotations.len());
    for row in &result.annotations.rows {
        println!(
            "  {:12} {:>10} - {:<10} y={:<10.3} {:6} (p = {:.4})",
            row.facet, row.group_a, row.group_b, row.y_position, row.label, row.p_value
        );
    }

    if !result.annotations.diagnostics.is_empty() {
        println!();
        println!("## Skipped ({})", result.annotations.diagnostics.len());
        for diagnostic in &result.annotations.diagnostics {
            println!("  {}", diagnostic);
        }
    }

    Ok(())
}
