//! Sigmark: pairwise significance annotations for grouped, faceted measurements.
//!
//! Sigmark takes a table of (group, facet, value) observations and a list of
//! group pairs, runs a two-sample test for each pair inside every facet, and
//! returns the bracket geometry and label a plot needs to draw the result.
//!
//! # Core Principles
//!
//! - **Pure**: the same inputs always give the same table; nothing is rendered
//! - **Non-fatal comparisons**: a comparison that cannot be tested is skipped
//!   and reported as a [`Diagnostic`], the rest still run
//! - **Explicit fields**: group, facet and value columns are always named or
//!   chosen positionally on request, never guessed
//!
//! # Example
//!
//! ```
//! use sigmark::{AnnotationGenerator, ColumnMapping, Comparison, Measurement, MeasurementTable};
//!
//! let mut rows = Vec::new();
//! for v in [1.0, 2.0, 3.0] {
//!     rows.push(Measurement::new("Ctrl", "T1", v));
//! }
//! for v in [10.0, 11.0, 12.0] {
//!     rows.push(Measurement::new("Drug", "T1", v));
//! }
//! let table = MeasurementTable::new(ColumnMapping::new("treatment", "cell", "value"), rows);
//!
//! let result = AnnotationGenerator::new()
//!     .generate(&table, &[Comparison::new("Ctrl", "Drug")])
//!     .unwrap();
//!
//! assert_eq!(result.rows[0].label, "***");
//! assert_eq!(result.columns(), vec!["cell", "start", "end", "y", "label"]);
//! ```

pub mod annotate;
pub mod error;
pub mod input;
pub mod label;
pub mod stats;

mod sigmark;

pub use crate::sigmark::{AnnotationResult, AnnotationSummary, FieldSelection, Sigmark, SigmarkConfig};
pub use annotate::{
    AnnotationConfig, AnnotationGenerator, AnnotationRow, AnnotationTable, Comparison, Diagnostic,
    DiagnosticKind,
};
pub use error::{Result, SigmarkError};
pub use input::{ColumnMapping, DataTable, Measurement, MeasurementTable, SourceMetadata};
pub use label::{LabelFormat, format_p_value, significance_symbol};
pub use stats::{CorrectionMethod, TestMethod};
