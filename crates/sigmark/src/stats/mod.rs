//! Hypothesis tests and p-value correction.

mod correction;
mod testing;

pub use correction::CorrectionMethod;
pub use testing::{MIN_SAMPLE_SIZE, TestError, TestMethod, TestOutcome};
