//! Groups command - show facets, groups and sample sizes.

use std::path::PathBuf;

use colored::Colorize;
use sigmark::{Sigmark, input::GroupSummary};

use crate::cli::FieldArgs;

pub fn run(
    file: PathBuf,
    fields: FieldArgs,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (measurements, source) = Sigmark::new().load(&file, &fields.selection())?;
    let summaries = measurements.group_summaries();

    if json {
        let output = serde_json::json!({
            "mapping": measurements.mapping,
            "groups": summaries,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if verbose {
        println!(
            "{} {} ({}, {})",
            "Source:".cyan().bold(),
            source.file,
            source.format,
            source.hash
        );
    }

    println!(
        "{} by {} within {}",
        measurements.mapping.value.white().bold(),
        measurements.mapping.group.white().bold(),
        measurements.mapping.facet.white().bold()
    );

    let mut current_facet: Option<&str> = None;
    for summary in &summaries {
        if current_facet != Some(summary.facet.as_str()) {
            println!();
            println!("{}", summary.facet.yellow().bold());
            current_facet = Some(summary.facet.as_str());
        }
        print_group(summary);
    }

    Ok(())
}

fn print_group(summary: &GroupSummary) {
    let ceiling = summary
        .ceiling
        .map(|c| format!("{c}"))
        .unwrap_or_else(|| "-".to_string());
    let n = if summary.n < 2 {
        summary.n.to_string().red()
    } else {
        summary.n.to_string().green()
    };
    println!(
        "  {:20} n={:<6} missing={:<6} max={}",
        summary.group, n, summary.missing, ceiling
    );
}
