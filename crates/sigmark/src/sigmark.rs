//! Main Sigmark struct and file-level API.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotate::{AnnotationConfig, AnnotationGenerator, AnnotationTable, Comparison};
use crate::error::Result;
use crate::input::{ColumnMapping, DataTable, MeasurementTable, Parser, ParserConfig, SourceMetadata};

/// How the group, facet and value fields are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    /// Use the named fields.
    Explicit(ColumnMapping),
    /// Use the first three columns in declared order: group, facet, value.
    Positional,
}

impl FieldSelection {
    /// Resolve to a concrete mapping for `table`.
    pub fn resolve(&self, table: &DataTable) -> Result<ColumnMapping> {
        match self {
            FieldSelection::Explicit(mapping) => Ok(mapping.clone()),
            FieldSelection::Positional => ColumnMapping::positional(table),
        }
    }
}

/// Configuration for file-level annotation.
#[derive(Debug, Clone, Default)]
pub struct SigmarkConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Test, label and placement options.
    pub annotation: AnnotationConfig,
}

/// Result of annotating a data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Fields used for group, facet and value.
    pub mapping: ColumnMapping,
    /// Rows and diagnostics.
    pub annotations: AnnotationTable,
    pub summary: AnnotationSummary,
}

/// Counts describing one annotation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSummary {
    pub facets: usize,
    pub comparisons_requested: usize,
    /// Annotation rows produced.
    pub annotated: usize,
    /// (facet, comparison) pairs skipped with a diagnostic.
    pub skipped: usize,
    /// Rows whose reported p-value is below 0.05.
    pub significant: usize,
}

/// Reads a measurement file and annotates it.
pub struct Sigmark {
    parser: Parser,
    generator: AnnotationGenerator,
}

impl Sigmark {
    /// Create a Sigmark instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(SigmarkConfig::default())
    }

    /// Create a Sigmark instance with custom configuration.
    pub fn with_config(config: SigmarkConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser),
            generator: AnnotationGenerator::with_config(config.annotation),
        }
    }

    /// Parse a file into typed measurements.
    pub fn load(
        &self,
        path: impl AsRef<Path>,
        fields: &FieldSelection,
    ) -> Result<(MeasurementTable, SourceMetadata)> {
        let (table, source) = self.parser.parse_file(path)?;
        let mapping = fields.resolve(&table)?;
        let measurements = MeasurementTable::from_data_table(&table, &mapping)?;
        Ok((measurements, source))
    }

    /// Parse a file and annotate the given comparisons.
    pub fn annotate(
        &self,
        path: impl AsRef<Path>,
        fields: &FieldSelection,
        comparisons: &[Comparison],
    ) -> Result<AnnotationResult> {
        // Options are checked before the file is touched
        self.generator.config().validate()?;
        let (measurements, source) = self.load(path, fields)?;
        self.annotate_measurements(&measurements, source, comparisons)
    }

    /// Annotate already-loaded measurements.
    pub fn annotate_measurements(
        &self,
        measurements: &MeasurementTable,
        source: SourceMetadata,
        comparisons: &[Comparison],
    ) -> Result<AnnotationResult> {
        let annotations = self.generator.generate(measurements, comparisons)?;
        let summary = compute_summary(measurements, comparisons, &annotations);

        Ok(AnnotationResult {
            source,
            mapping: measurements.mapping.clone(),
            annotations,
            summary,
        })
    }
}

impl Default for Sigmark {
    fn default() -> Self {
        Self::new()
    }
}

fn compute_summary(
    measurements: &MeasurementTable,
    comparisons: &[Comparison],
    annotations: &AnnotationTable,
) -> AnnotationSummary {
    AnnotationSummary {
        facets: measurements.facet_labels().len(),
        comparisons_requested: comparisons.len(),
        annotated: annotations.rows.len(),
        skipped: annotations.diagnostics.len(),
        significant: annotations.rows.iter().filter(|r| r.is_significant()).count(),
    }
}
