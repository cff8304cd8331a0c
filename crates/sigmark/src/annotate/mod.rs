//! Significance bracket generation.

mod comparison;
mod config;
mod diagnostic;
mod generator;
mod table;

pub use comparison::Comparison;
pub use config::AnnotationConfig;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use generator::AnnotationGenerator;
pub use table::{ANNOTATION_COLUMNS, AnnotationRecord, AnnotationRow, AnnotationTable};
