//! Input parsing and the observation table model.

mod measurement;
mod parser;
mod source;

pub(crate) use measurement::FacetGroups;
pub use measurement::{ColumnMapping, GroupSummary, Measurement, MeasurementTable};
pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
