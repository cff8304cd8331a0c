//! Annotate command - compute brackets for a measurement file.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use sigmark::{
    AnnotationConfig, AnnotationResult, Comparison, CorrectionMethod, LabelFormat, Sigmark,
    SigmarkConfig, TestMethod,
};

use crate::cli::{FieldArgs, OutputFormat};

/// Option overrides taken from command-line flags.
pub struct AnnotateOptions {
    pub config: Option<PathBuf>,
    pub paired: bool,
    pub test: Option<String>,
    pub adjust: Option<String>,
    pub label_format: Option<String>,
    pub y_offset: Option<f64>,
    pub parallel: bool,
}

impl AnnotateOptions {
    /// Start from the config file (or defaults) and apply flags on top.
    fn resolve(&self) -> Result<AnnotationConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => AnnotationConfig::from_json_file(path)?,
            None => AnnotationConfig::default(),
        };

        if self.paired {
            config.paired_test = true;
        }
        if let Some(ref test) = self.test {
            config.test_method = test.parse::<TestMethod>()?;
        }
        if let Some(ref adjust) = self.adjust {
            config.adjust_p_values = true;
            config.correction = adjust.parse::<CorrectionMethod>()?;
        }
        if let Some(ref format) = self.label_format {
            config.label_format = format.parse::<LabelFormat>()?;
        }
        if let Some(y) = self.y_offset {
            config.y_offset_multiplier = y;
        }
        if self.parallel {
            config.parallel = true;
        }

        config.validate()?;
        Ok(config)
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    fields: FieldArgs,
    compare: Vec<String>,
    all_pairs: bool,
    options: AnnotateOptions,
    format: OutputFormat,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    // Parse every flag before reading data so bad options fail fast
    let config = options.resolve()?;
    let requested = compare
        .iter()
        .map(|c| c.parse::<Comparison>())
        .collect::<Result<Vec<_>, _>>()?;

    let sigmark = Sigmark::with_config(SigmarkConfig {
        annotation: config,
        ..SigmarkConfig::default()
    });

    let (measurements, source) = sigmark.load(&file, &fields.selection())?;

    let comparisons = if all_pairs {
        Comparison::all_pairs(&measurements.group_labels())
    } else {
        requested
    };

    if comparisons.is_empty() {
        eprintln!(
            "{} no comparisons given; use {} or {}",
            "Note:".yellow().bold(),
            "--compare A:B".cyan(),
            "--all-pairs".cyan()
        );
    }

    if verbose {
        eprintln!(
            "{} {} ({} rows, {})",
            "Annotating".cyan().bold(),
            source.file.white(),
            source.row_count,
            source.format
        );
        eprintln!(
            "  fields: group={} facet={} value={}",
            measurements.mapping.group, measurements.mapping.facet, measurements.mapping.value
        );
        for comparison in &comparisons {
            eprintln!("  compare: {}", comparison);
        }
    }

    // Skipped comparisons are reported as warnings by the generator
    let result = sigmark.annotate_measurements(&measurements, source, &comparisons)?;

    match output {
        Some(ref path) => {
            let file = File::create(path)?;
            write_result(&result, format, file)?;
            eprintln!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
        None => write_result(&result, format, io::stdout().lock())?,
    }

    if verbose {
        let summary = &result.summary;
        eprintln!(
            "{} annotations ({} significant), {} skipped across {} facets",
            summary.annotated.to_string().white().bold(),
            summary.significant.to_string().green(),
            summary.skipped.to_string().yellow(),
            summary.facets
        );
    }

    Ok(())
}

fn write_result<W: Write>(
    result: &AnnotationResult,
    format: OutputFormat,
    mut writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = &result.annotations;
    match format {
        OutputFormat::Tsv => table.write_delimited(writer, b'\t')?,
        OutputFormat::Csv => table.write_delimited(writer, b',')?,
        OutputFormat::Json => {
            let json = serde_json::json!({
                "facet_field": table.facet_field,
                "annotations": table.to_json()?,
                "diagnostics": table.diagnostics,
                "summary": result.summary,
            });
            serde_json::to_writer_pretty(&mut writer, &json)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
