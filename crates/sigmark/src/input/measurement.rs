//! Typed measurement rows and the field mapping that produces them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{SigmarkError, Result};
use super::source::DataTable;

/// Names of the grouping, facet and value fields.
///
/// Mappings are always explicit. [`ColumnMapping::positional`] is a separate
/// constructor that reads the first three columns of a table in declared
/// order (group, facet, value); it never runs implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub group: String,
    pub facet: String,
    pub value: String,
}

impl ColumnMapping {
    pub fn new(
        group: impl Into<String>,
        facet: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            facet: facet.into(),
            value: value.into(),
        }
    }

    /// Map the first three columns of `table` to group, facet and value.
    pub fn positional(table: &DataTable) -> Result<Self> {
        match table.headers.as_slice() {
            [group, facet, value, ..] => Ok(Self::new(group, facet, value)),
            headers => Err(SigmarkError::Config(format!(
                "positional mapping needs at least 3 columns, table has {}",
                headers.len()
            ))),
        }
    }

    /// Reject empty or repeated field names.
    pub fn validate(&self) -> Result<()> {
        let fields = [&self.group, &self.facet, &self.value];
        if fields.iter().any(|f| f.trim().is_empty()) {
            return Err(SigmarkError::Config(
                "group, facet and value fields must be non-empty".to_string(),
            ));
        }
        if self.group == self.facet || self.group == self.value || self.facet == self.value {
            return Err(SigmarkError::Config(format!(
                "group, facet and value fields must be distinct (got '{}', '{}', '{}')",
                self.group, self.facet, self.value
            )));
        }
        Ok(())
    }

    fn resolve(&self, table: &DataTable) -> Result<(usize, usize, usize)> {
        let find = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| SigmarkError::MissingColumn {
                    name: name.to_string(),
                    available: table.headers.clone(),
                })
        };
        Ok((find(&self.group)?, find(&self.facet)?, find(&self.value)?))
    }
}

/// One observation: a value of `group` measured within `facet`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub group: String,
    pub facet: String,
    /// `None` when the value is missing.
    pub value: Option<f64>,
}

impl Measurement {
    pub fn new(
        group: impl Into<String>,
        facet: impl Into<String>,
        value: impl Into<Option<f64>>,
    ) -> Self {
        Self {
            group: group.into(),
            facet: facet.into(),
            value: value.into().filter(|v| !v.is_nan()),
        }
    }
}

/// The observation table consumed by the annotation generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementTable {
    pub mapping: ColumnMapping,
    pub rows: Vec<Measurement>,
}

/// Non-missing values of one group within one facet.
#[derive(Debug, Clone, Default)]
pub(crate) struct GroupValues {
    pub values: Vec<f64>,
    pub missing: usize,
}

impl GroupValues {
    /// Largest non-missing value.
    pub fn ceiling(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }
}

/// Rows of one facet, keyed by group in first-seen order.
pub(crate) type FacetGroups<'a> = IndexMap<&'a str, GroupValues>;

/// Per (facet, group) counts, as listed by the CLI `groups` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub facet: String,
    pub group: String,
    pub n: usize,
    pub missing: usize,
    pub ceiling: Option<f64>,
}

impl MeasurementTable {
    pub fn new(mapping: ColumnMapping, rows: Vec<Measurement>) -> Self {
        Self { mapping, rows }
    }

    /// Extract typed measurements from a parsed table.
    ///
    /// Null-like value cells become missing values; any other cell that is
    /// not a finite number is a parse error. Empty group or facet cells are
    /// parse errors too.
    pub fn from_data_table(table: &DataTable, mapping: &ColumnMapping) -> Result<Self> {
        mapping.validate()?;
        let (group_idx, facet_idx, value_idx) = mapping.resolve(table)?;

        let mut rows = Vec::with_capacity(table.row_count());
        for (row_idx, row) in table.rows.iter().enumerate() {
            let cell = |idx: usize| row.get(idx).map(|s| s.trim()).unwrap_or("");
            let raw = cell(value_idx);
            let value = if DataTable::is_null_value(raw) {
                None
            } else {
                match raw.parse::<f64>() {
                    Ok(v) if v.is_finite() => Some(v),
                    Ok(_) => {
                        return Err(SigmarkError::Parse {
                            row: row_idx + 1,
                            column: value_idx + 1,
                            message: format!("non-finite value '{}' in '{}'", raw, mapping.value),
                        });
                    }
                    Err(_) => {
                        return Err(SigmarkError::Parse {
                            row: row_idx + 1,
                            column: value_idx + 1,
                            message: format!("'{}' is not numeric in '{}'", raw, mapping.value),
                        });
                    }
                }
            };
            let label = |idx: usize, field: &str| {
                let text = cell(idx);
                if text.is_empty() {
                    Err(SigmarkError::Parse {
                        row: row_idx + 1,
                        column: idx + 1,
                        message: format!("empty label in '{field}'"),
                    })
                } else {
                    Ok(text)
                }
            };
            rows.push(Measurement::new(
                label(group_idx, &mapping.group)?,
                label(facet_idx, &mapping.facet)?,
                value,
            ));
        }

        Ok(Self::new(mapping.clone(), rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct facet labels in first-seen order.
    pub fn facet_labels(&self) -> Vec<&str> {
        first_seen(self.rows.iter().map(|m| m.facet.as_str()))
    }

    /// Distinct group labels in first-seen order, across all facets.
    pub fn group_labels(&self) -> Vec<&str> {
        first_seen(self.rows.iter().map(|m| m.group.as_str()))
    }

    /// Split rows by facet, then by group, preserving first-seen order.
    pub(crate) fn partition(&self) -> IndexMap<&str, FacetGroups<'_>> {
        let mut facets: IndexMap<&str, FacetGroups<'_>> = IndexMap::new();
        for m in &self.rows {
            let entry = facets
                .entry(m.facet.as_str())
                .or_default()
                .entry(m.group.as_str())
                .or_default();
            match m.value {
                Some(v) => entry.values.push(v),
                None => entry.missing += 1,
            }
        }
        facets
    }

    /// Counts and ceilings for every (facet, group) present.
    pub fn group_summaries(&self) -> Vec<GroupSummary> {
        self.partition()
            .into_iter()
            .flat_map(|(facet, groups)| {
                groups.into_iter().map(move |(group, values)| GroupSummary {
                    facet: facet.to_string(),
                    group: group.to_string(),
                    n: values.values.len(),
                    missing: values.missing,
                    ceiling: values.ceiling(),
                })
            })
            .collect()
    }
}

fn first_seen<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: IndexMap<&str, ()> = IndexMap::new();
    for label in labels {
        seen.entry(label).or_insert(());
    }
    seen.into_keys().collect()
}
