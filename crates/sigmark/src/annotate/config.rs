//! Annotation options.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SigmarkError, Result};
use crate::label::LabelFormat;
use crate::stats::{CorrectionMethod, TestMethod};

/// Options controlling tests, labels and bracket placement.
///
/// Deserializes from JSON with every field optional; unknown keys are rejected
/// so a misspelled option fails instead of silently using the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotationConfig {
    /// Compare groups as paired samples (values matched by row order).
    pub paired_test: bool,
    /// Apply `correction` across every p-value of the run before labeling.
    pub adjust_p_values: bool,
    pub correction: CorrectionMethod,
    pub label_format: LabelFormat,
    /// Headroom factor above the taller group's ceiling.
    pub y_offset_multiplier: f64,
    /// Extra height per comparison index: `1 + index * stagger_step`.
    pub stagger_step: f64,
    pub test_method: TestMethod,
    /// Evaluate facets on the rayon thread pool.
    pub parallel: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            paired_test: false,
            adjust_p_values: false,
            correction: CorrectionMethod::default(),
            label_format: LabelFormat::default(),
            y_offset_multiplier: 1.05,
            stagger_step: 0.1,
            test_method: TestMethod::default(),
            parallel: false,
        }
    }
}

impl AnnotationConfig {
    /// Load options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| SigmarkError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric options.
    pub fn validate(&self) -> Result<()> {
        if !(self.y_offset_multiplier.is_finite() && self.y_offset_multiplier > 0.0) {
            return Err(SigmarkError::Config(format!(
                "y_offset_multiplier must be a positive finite number, got {}",
                self.y_offset_multiplier
            )));
        }
        if !(self.stagger_step.is_finite() && self.stagger_step >= 0.0) {
            return Err(SigmarkError::Config(format!(
                "stagger_step must be a non-negative finite number, got {}",
                self.stagger_step
            )));
        }
        Ok(())
    }
}
