//! CLI command implementations.

pub mod annotate;
pub mod groups;

use sigmark::{ColumnMapping, FieldSelection};

use crate::cli::FieldArgs;

impl FieldArgs {
    /// Named fields when given, otherwise the first three columns.
    pub fn selection(&self) -> FieldSelection {
        match (&self.group, &self.facet, &self.value) {
            (Some(group), Some(facet), Some(value)) => {
                FieldSelection::Explicit(ColumnMapping::new(group, facet, value))
            }
            _ => FieldSelection::Positional,
        }
    }
}
