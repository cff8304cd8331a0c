//! Turning p-values into bracket label text.

mod format;
mod significance;

pub use format::format_p_value;
pub use significance::significance_symbol;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SigmarkError;

/// Label text written above each bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFormat {
    /// Star symbols (`***`, `**`, `*`, `ns`).
    #[default]
    Signif,
    /// Rounded p-value (`< 0.001`, `0.007`, `0.50`).
    Numeric,
    /// The p-value as a plain number.
    Raw,
}

impl LabelFormat {
    /// Render a p-value in this format. `None` or NaN renders as `NA`.
    pub fn render(&self, p: Option<f64>) -> String {
        match self {
            LabelFormat::Signif => significance_symbol(p).to_string(),
            LabelFormat::Numeric => format_p_value(p),
            LabelFormat::Raw => match defined(p) {
                Some(p) => p.to_string(),
                None => "NA".to_string(),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelFormat::Signif => "signif",
            LabelFormat::Numeric => "numeric",
            LabelFormat::Raw => "raw",
        }
    }
}

impl fmt::Display for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelFormat {
    type Err = SigmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signif" => Ok(LabelFormat::Signif),
            "numeric" => Ok(LabelFormat::Numeric),
            "raw" => Ok(LabelFormat::Raw),
            other => Err(SigmarkError::Config(format!(
                "unrecognized label format '{other}' (expected signif, numeric or raw)"
            ))),
        }
    }
}

/// Treat NaN the same as an absent p-value.
fn defined(p: Option<f64>) -> Option<f64> {
    p.filter(|v| !v.is_nan())
}
