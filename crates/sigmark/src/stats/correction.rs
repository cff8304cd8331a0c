//! Multiple-comparison p-value correction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SigmarkError;

/// Family-wise or false-discovery-rate adjustment applied to a run's p-values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMethod {
    /// Holm step-down (controls FWER, uniformly more powerful than Bonferroni).
    #[default]
    Holm,
    Bonferroni,
    /// Benjamini-Hochberg step-up (controls FDR).
    #[serde(alias = "bh", alias = "fdr")]
    BenjaminiHochberg,
}

impl CorrectionMethod {
    /// Adjust `p_values`, returning them in input order.
    pub fn adjust(&self, p_values: &[f64]) -> Vec<f64> {
        match self {
            CorrectionMethod::Holm => holm(p_values),
            CorrectionMethod::Bonferroni => bonferroni(p_values),
            CorrectionMethod::BenjaminiHochberg => benjamini_hochberg(p_values),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionMethod::Holm => "holm",
            CorrectionMethod::Bonferroni => "bonferroni",
            CorrectionMethod::BenjaminiHochberg => "benjamini_hochberg",
        }
    }
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionMethod {
    type Err = SigmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "holm" => Ok(CorrectionMethod::Holm),
            "bonferroni" => Ok(CorrectionMethod::Bonferroni),
            "bh" | "fdr" | "benjamini_hochberg" => Ok(CorrectionMethod::BenjaminiHochberg),
            other => Err(SigmarkError::Config(format!(
                "unrecognized correction method '{other}' (expected holm, bonferroni or bh)"
            ))),
        }
    }
}

fn bonferroni(p: &[f64]) -> Vec<f64> {
    let m = p.len() as f64;
    p.iter().map(|&v| (v * m).min(1.0)).collect()
}

/// Indices of `p` sorted by ascending p-value (stable for ties).
fn ascending_order(p: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..p.len()).collect();
    order.sort_by(|&i, &j| p[i].total_cmp(&p[j]));
    order
}

fn holm(p: &[f64]) -> Vec<f64> {
    let m = p.len();
    let mut adjusted = vec![0.0; m];
    let mut running_max: f64 = 0.0;
    for (rank, &idx) in ascending_order(p).iter().enumerate() {
        let value = (p[idx] * (m - rank) as f64).min(1.0);
        running_max = running_max.max(value);
        adjusted[idx] = running_max;
    }
    adjusted
}

fn benjamini_hochberg(p: &[f64]) -> Vec<f64> {
    let m = p.len();
    let mut adjusted = vec![0.0; m];
    let mut running_min: f64 = 1.0;
    for (rank, &idx) in ascending_order(p).iter().enumerate().rev() {
        let value = p[idx] * m as f64 / (rank + 1) as f64;
        running_min = running_min.min(value);
        adjusted[idx] = running_min;
    }
    adjusted
}
