//! Per-facet comparison evaluation and bracket placement.

use rayon::prelude::*;

use crate::error::Result;
use crate::input::{ColumnMapping, DataTable, FacetGroups, MeasurementTable};
use crate::stats::{MIN_SAMPLE_SIZE, TestError, TestOutcome};
use super::comparison::Comparison;
use super::config::AnnotationConfig;
use super::diagnostic::{Diagnostic, DiagnosticKind};
use super::table::{AnnotationRow, AnnotationTable, validate_facet_field};

/// A comparison that produced a p-value and is waiting for its label.
#[derive(Debug)]
struct TestedComparison<'a> {
    facet: &'a str,
    comparison: &'a Comparison,
    y_position: f64,
    outcome: TestOutcome,
}

#[derive(Debug)]
enum Evaluation<'a> {
    Tested(TestedComparison<'a>),
    Skipped(Diagnostic),
}

/// Computes significance brackets for every requested comparison in every facet.
///
/// Facets are visited in first-appearance order and comparisons in the order
/// given, so the output is fully determined by the inputs. A comparison that
/// cannot be evaluated in a facet is left out and reported as a
/// [`Diagnostic`]; only configuration problems are errors.
#[derive(Debug, Clone, Default)]
pub struct AnnotationGenerator {
    config: AnnotationConfig,
}

impl AnnotationGenerator {
    /// Create a generator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnnotationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// Annotate a parsed table, reading fields through `mapping`.
    pub fn generate_from_table(
        &self,
        table: &DataTable,
        mapping: &ColumnMapping,
        comparisons: &[Comparison],
    ) -> Result<AnnotationTable> {
        self.config.validate()?;
        let measurements = MeasurementTable::from_data_table(table, mapping)?;
        self.generate(&measurements, comparisons)
    }

    /// Annotate typed measurements.
    ///
    /// An empty table or an empty comparison list yields an empty result.
    pub fn generate(
        &self,
        measurements: &MeasurementTable,
        comparisons: &[Comparison],
    ) -> Result<AnnotationTable> {
        self.config.validate()?;
        measurements.mapping.validate()?;
        validate_facet_field(&measurements.mapping.facet)?;

        let mut table = AnnotationTable::new(measurements.mapping.facet.clone());
        if measurements.is_empty() || comparisons.is_empty() {
            return Ok(table);
        }

        let facets: Vec<(&str, FacetGroups<'_>)> = measurements.partition().into_iter().collect();

        // Indexed parallel iterators collect in input order
        let per_facet: Vec<Vec<Evaluation<'_>>> = if self.config.parallel {
            facets
                .par_iter()
                .map(|(facet, groups)| self.evaluate_facet(*facet, groups, comparisons))
                .collect()
        } else {
            facets
                .iter()
                .map(|(facet, groups)| self.evaluate_facet(*facet, groups, comparisons))
                .collect()
        };

        let mut tested = Vec::new();
        for evaluation in per_facet.into_iter().flatten() {
            match evaluation {
                Evaluation::Tested(t) => tested.push(t),
                Evaluation::Skipped(diagnostic) => {
                    tracing::warn!(
                        facet = %diagnostic.facet,
                        group_a = %diagnostic.group_a,
                        group_b = %diagnostic.group_b,
                        kind = diagnostic.kind.label(),
                        reason = %diagnostic.message,
                        "skipping comparison"
                    );
                    table.diagnostics.push(diagnostic);
                }
            }
        }

        let adjusted = if self.config.adjust_p_values {
            let raw: Vec<f64> = tested.iter().map(|t| t.outcome.p_value).collect();
            Some(self.config.correction.adjust(&raw))
        } else {
            None
        };

        table.rows = tested
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let p_adjusted = adjusted.as_ref().map(|adj| adj[i]);
                let reported = p_adjusted.unwrap_or(t.outcome.p_value);
                AnnotationRow {
                    facet: t.facet.to_string(),
                    group_a: t.comparison.group_a.clone(),
                    group_b: t.comparison.group_b.clone(),
                    y_position: t.y_position,
                    label: self.config.label_format.render(Some(reported)),
                    p_value: t.outcome.p_value,
                    p_adjusted,
                    statistic: t.outcome.statistic,
                }
            })
            .collect();

        tracing::debug!(
            rows = table.rows.len(),
            skipped = table.diagnostics.len(),
            "annotation complete"
        );

        Ok(table)
    }

    fn evaluate_facet<'a>(
        &self,
        facet: &'a str,
        groups: &FacetGroups<'_>,
        comparisons: &'a [Comparison],
    ) -> Vec<Evaluation<'a>> {
        tracing::debug!(facet, groups = groups.len(), "evaluating facet");
        comparisons
            .iter()
            .enumerate()
            .map(|(index, comparison)| self.evaluate(facet, groups, index, comparison))
            .collect()
    }

    fn evaluate<'a>(
        &self,
        facet: &'a str,
        groups: &FacetGroups<'_>,
        index: usize,
        comparison: &'a Comparison,
    ) -> Evaluation<'a> {
        let a = groups.get(comparison.group_a.as_str());
        let b = groups.get(comparison.group_b.as_str());
        let values_a = a.map(|g| g.values.as_slice()).unwrap_or(&[]);
        let values_b = b.map(|g| g.values.as_slice()).unwrap_or(&[]);
        let (n_a, n_b) = (values_a.len(), values_b.len());

        let skip = |kind: DiagnosticKind, message: String| {
            Evaluation::Skipped(
                Diagnostic::new(kind, facet, comparison, index, message).with_counts(n_a, n_b),
            )
        };

        if comparison.group_a == comparison.group_b {
            return skip(
                DiagnosticKind::ComputationFailure,
                format!("group '{}' compared with itself", comparison.group_a),
            );
        }

        if n_a < MIN_SAMPLE_SIZE || n_b < MIN_SAMPLE_SIZE {
            return skip(
                DiagnosticKind::InsufficientData,
                format!(
                    "need at least {MIN_SAMPLE_SIZE} non-missing observations per group, got {n_a} and {n_b}"
                ),
            );
        }

        let outcome = match self
            .config
            .test_method
            .run(values_a, values_b, self.config.paired_test)
        {
            Ok(outcome) => outcome,
            Err(e @ TestError::InsufficientData { .. }) => {
                return skip(DiagnosticKind::InsufficientData, e.to_string());
            }
            Err(e) => return skip(DiagnosticKind::ComputationFailure, e.to_string()),
        };

        let ceiling = [a, b]
            .into_iter()
            .flatten()
            .filter_map(|g| g.ceiling())
            .fold(f64::NEG_INFINITY, f64::max);
        let y_position = ceiling
            * self.config.y_offset_multiplier
            * (1.0 + index as f64 * self.config.stagger_step);

        if !y_position.is_finite() {
            return skip(
                DiagnosticKind::ComputationFailure,
                format!("bracket position is not finite (ceiling {ceiling})"),
            );
        }

        Evaluation::Tested(TestedComparison {
            facet,
            comparison,
            y_position,
            outcome,
        })
    }
}
