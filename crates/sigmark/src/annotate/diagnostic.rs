//! Non-fatal problems met while evaluating comparisons.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::comparison::Comparison;

/// Why a (facet, comparison) produced no annotation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Fewer than two non-missing observations on one side.
    InsufficientData,
    /// The test could not produce a p-value.
    ComputationFailure,
}

impl DiagnosticKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::InsufficientData => "Insufficient Data",
            DiagnosticKind::ComputationFailure => "Computation Failure",
        }
    }
}

/// A skipped comparison and the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(rename = "type")]
    pub kind: DiagnosticKind,
    pub facet: String,
    pub group_a: String,
    pub group_b: String,
    /// Position of the comparison in the requested sequence.
    pub comparison_index: usize,
    pub message: String,
    /// Non-missing observations of `group_a` in the facet.
    pub n_a: usize,
    /// Non-missing observations of `group_b` in the facet.
    pub n_b: usize,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        facet: impl Into<String>,
        comparison: &Comparison,
        comparison_index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            facet: facet.into(),
            group_a: comparison.group_a.clone(),
            group_b: comparison.group_b.clone(),
            comparison_index,
            message: message.into(),
            n_a: 0,
            n_b: 0,
        }
    }

    /// Set the per-side sample sizes.
    pub fn with_counts(mut self, n_a: usize, n_b: usize) -> Self {
        self.n_a = n_a;
        self.n_b = n_b;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} in facet '{}' for {} vs {}: {}",
            self.kind.label(),
            self.facet,
            self.group_a,
            self.group_b,
            self.message
        )
    }
}
