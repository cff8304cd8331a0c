//! Annotation rows and the output table handed to plot renderers.

use std::io::Write;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SigmarkError};
use crate::label::significance_symbol;
use super::diagnostic::Diagnostic;

/// Fixed output column names following the facet column.
pub const ANNOTATION_COLUMNS: [&str; 4] = ["start", "end", "y", "label"];

/// The facet field heads the first output column, so it must not reuse a fixed column name.
pub(crate) fn validate_facet_field(name: &str) -> Result<()> {
    if ANNOTATION_COLUMNS.contains(&name) {
        return Err(SigmarkError::Config(format!(
            "facet field '{name}' clashes with an output column ({})",
            ANNOTATION_COLUMNS.join(", ")
        )));
    }
    Ok(())
}

/// One bracket: a comparison evaluated within one facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRow {
    pub facet: String,
    /// Bracket start (first group of the comparison).
    pub group_a: String,
    /// Bracket end (second group of the comparison).
    pub group_b: String,
    pub y_position: f64,
    pub label: String,
    /// Unadjusted test p-value.
    pub p_value: f64,
    /// Corrected p-value when correction is enabled; the label uses it.
    pub p_adjusted: Option<f64>,
    pub statistic: f64,
}

impl AnnotationRow {
    /// The p-value the label was derived from.
    pub fn reported_p_value(&self) -> f64 {
        self.p_adjusted.unwrap_or(self.p_value)
    }

    /// Whether the reported p-value is below 0.05.
    pub fn is_significant(&self) -> bool {
        !matches!(significance_symbol(Some(self.reported_p_value())), "ns" | "NA")
    }
}

/// Ordered annotation rows plus the comparisons that were skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationTable {
    /// Name of the caller's facet field; heads the first output column.
    pub facet_field: String,
    pub rows: Vec<AnnotationRow>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnnotationTable {
    pub fn new(facet_field: impl Into<String>) -> Self {
        Self {
            facet_field: facet_field.into(),
            rows: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output header: the facet field, then `start`, `end`, `y`, `label`.
    pub fn columns(&self) -> Vec<&str> {
        std::iter::once(self.facet_field.as_str())
            .chain(ANNOTATION_COLUMNS)
            .collect()
    }

    /// Rows as renderer records keyed by [`AnnotationTable::columns`].
    pub fn records(&self) -> impl Iterator<Item = AnnotationRecord<'_>> {
        self.rows.iter().map(|row| AnnotationRecord {
            facet_field: &self.facet_field,
            row,
        })
    }

    /// Write the five output columns as delimited text with a header row.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        out.write_record(self.columns())?;
        for row in &self.rows {
            out.write_record([
                row.facet.as_str(),
                row.group_a.as_str(),
                row.group_b.as_str(),
                row.y_position.to_string().as_str(),
                row.label.as_str(),
            ])?;
        }
        out.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// The output columns as a JSON array of objects.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let records: Vec<AnnotationRecord<'_>> = self.records().collect();
        Ok(serde_json::to_value(records)?)
    }
}

/// Borrowed view of a row that serializes with the output column names.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationRecord<'a> {
    facet_field: &'a str,
    row: &'a AnnotationRow,
}

impl Serialize for AnnotationRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry(self.facet_field, &self.row.facet)?;
        map.serialize_entry("start", &self.row.group_a)?;
        map.serialize_entry("end", &self.row.group_b)?;
        map.serialize_entry("y", &self.row.y_position)?;
        map.serialize_entry("label", &self.row.label)?;
        map.end()
    }
}
