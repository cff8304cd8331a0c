//! Two-sample location tests.
//!
//! All tests are two-sided. The rank tests use the normal approximation with
//! tie and continuity correction, so they stay usable for any sample size.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::function::erf::erfc;
use thiserror::Error;

use crate::error::SigmarkError;

/// Smallest sample size any test accepts per side.
pub const MIN_SAMPLE_SIZE: usize = 2;

/// Why a test could not produce a p-value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestError {
    /// One side has too few non-missing observations.
    #[error("need at least {needed} observations per group, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Paired tests need one value per pair on both sides.
    #[error("paired test needs equal sample sizes, got {a} and {b}")]
    UnequalPairs { a: usize, b: usize },

    /// The statistic is undefined for this input.
    #[error("{0}")]
    Degenerate(String),
}

/// Which two-sample test to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMethod {
    /// Welch's unequal-variance t-test (paired: paired t-test).
    #[default]
    Welch,
    /// Student's pooled-variance t-test (paired: paired t-test).
    Student,
    /// Wilcoxon rank-sum / Mann-Whitney U (paired: Wilcoxon signed-rank).
    MannWhitney,
}

impl TestMethod {
    /// Compare `a` against `b`.
    pub fn run(&self, a: &[f64], b: &[f64], paired: bool) -> Result<TestOutcome, TestError> {
        check_size(a.len().min(b.len()))?;
        match (self, paired) {
            (TestMethod::Welch, false) => welch_t_test(a, b),
            (TestMethod::Student, false) => student_t_test(a, b),
            (TestMethod::Welch | TestMethod::Student, true) => paired_t_test(a, b),
            (TestMethod::MannWhitney, false) => rank_sum_test(a, b),
            (TestMethod::MannWhitney, true) => signed_rank_test(a, b),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestMethod::Welch => "welch",
            TestMethod::Student => "student",
            TestMethod::MannWhitney => "mann_whitney",
        }
    }
}

impl fmt::Display for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestMethod {
    type Err = SigmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "welch" | "t" | "t_test" => Ok(TestMethod::Welch),
            "student" => Ok(TestMethod::Student),
            "mann_whitney" | "wilcoxon" | "rank_sum" => Ok(TestMethod::MannWhitney),
            other => Err(SigmarkError::Config(format!(
                "unrecognized test method '{other}' (expected welch, student or mann_whitney)"
            ))),
        }
    }
}

/// Result of a successful test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// t for the t-tests, W for rank-sum, V for signed-rank.
    pub statistic: f64,
    /// Degrees of freedom (t-tests only).
    pub df: Option<f64>,
    /// Two-sided p-value in [0, 1].
    pub p_value: f64,
}

fn check_size(n: usize) -> Result<(), TestError> {
    if n < MIN_SAMPLE_SIZE {
        Err(TestError::InsufficientData {
            needed: MIN_SAMPLE_SIZE,
            got: n,
        })
    } else {
        Ok(())
    }
}

fn check_pairs(a: &[f64], b: &[f64]) -> Result<(), TestError> {
    if a.len() != b.len() {
        return Err(TestError::UnequalPairs {
            a: a.len(),
            b: b.len(),
        });
    }
    Ok(())
}

fn mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// Sample variance (n - 1 denominator), two-pass.
fn variance(x: &[f64], mean: f64) -> f64 {
    x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (x.len() - 1) as f64
}

/// Constant samples: equal locations compare as p = 1, anything else is undefined.
fn constant_outcome(difference: f64, df: Option<f64>) -> Result<TestOutcome, TestError> {
    if difference == 0.0 {
        Ok(TestOutcome {
            statistic: 0.0,
            df,
            p_value: 1.0,
        })
    } else {
        Err(TestError::Degenerate("data are essentially constant".to_string()))
    }
}

fn is_negligible(se: f64, scale: f64) -> bool {
    se <= 10.0 * f64::EPSILON * scale
}

fn t_outcome(t: f64, df: f64) -> Result<TestOutcome, TestError> {
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| TestError::Degenerate(format!("invalid t distribution (df = {df}): {e}")))?;
    let p_value = (2.0 * dist.cdf(-t.abs())).min(1.0);
    Ok(TestOutcome {
        statistic: t,
        df: Some(df),
        p_value,
    })
}

fn welch_t_test(a: &[f64], b: &[f64]) -> Result<TestOutcome, TestError> {
    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (ma, mb) = (mean(a), mean(b));
    let sa = variance(a, ma) / na;
    let sb = variance(b, mb) / nb;
    let se = (sa + sb).sqrt();

    if is_negligible(se, ma.abs().max(mb.abs())) {
        return constant_outcome(ma - mb, None);
    }

    let df = (sa + sb).powi(2) / (sa.powi(2) / (na - 1.0) + sb.powi(2) / (nb - 1.0));
    t_outcome((ma - mb) / se, df)
}

fn student_t_test(a: &[f64], b: &[f64]) -> Result<TestOutcome, TestError> {
    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (ma, mb) = (mean(a), mean(b));
    let df = na + nb - 2.0;
    let pooled = ((na - 1.0) * variance(a, ma) + (nb - 1.0) * variance(b, mb)) / df;
    let se = (pooled * (1.0 / na + 1.0 / nb)).sqrt();

    if is_negligible(se, ma.abs().max(mb.abs())) {
        return constant_outcome(ma - mb, Some(df));
    }

    t_outcome((ma - mb) / se, df)
}

fn paired_t_test(a: &[f64], b: &[f64]) -> Result<TestOutcome, TestError> {
    check_pairs(a, b)?;
    let diffs: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    let n = diffs.len() as f64;
    let md = mean(&diffs);
    let se = (variance(&diffs, md) / n).sqrt();
    let df = n - 1.0;

    if is_negligible(se, md.abs()) {
        return constant_outcome(md, Some(df));
    }

    t_outcome(md / se, df)
}

/// Upper tail of the standard normal.
fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / std::f64::consts::SQRT_2)
}

/// Two-sided normal p-value with continuity correction.
fn corrected_normal_p(deviation: f64, sigma: f64) -> f64 {
    // f64::signum(0.0) is 1.0, so zero needs its own arm
    let z = if deviation == 0.0 {
        0.0
    } else {
        (deviation - 0.5 * deviation.signum()) / sigma
    };
    (2.0 * normal_sf(z.abs())).min(1.0)
}

/// Average ranks (1-based) plus the tie term sum(t^3 - t).
fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; values.len()];
    let mut ties = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] == values[order[start]] {
            end += 1;
        }
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = rank;
        }
        let t = (end - start + 1) as f64;
        ties += t.powi(3) - t;
        start = end + 1;
    }

    (ranks, ties)
}

fn rank_sum_test(a: &[f64], b: &[f64]) -> Result<TestOutcome, TestError> {
    let (na, nb) = (a.len() as f64, b.len() as f64);
    let n = na + nb;
    let combined: Vec<f64> = a.iter().chain(b).copied().collect();
    let (ranks, ties) = average_ranks(&combined);

    let rank_sum_a: f64 = ranks[..a.len()].iter().sum();
    let w = rank_sum_a - na * (na + 1.0) / 2.0;
    let mu = na * nb / 2.0;
    let sigma2 = na * nb / 12.0 * ((n + 1.0) - ties / (n * (n - 1.0)));

    if sigma2 <= 0.0 {
        // Every value tied
        return constant_outcome(w - mu, None).map(|o| TestOutcome { statistic: w, ..o });
    }

    Ok(TestOutcome {
        statistic: w,
        df: None,
        p_value: corrected_normal_p(w - mu, sigma2.sqrt()),
    })
}

fn signed_rank_test(a: &[f64], b: &[f64]) -> Result<TestOutcome, TestError> {
    check_pairs(a, b)?;
    let diffs: Vec<f64> = a
        .iter()
        .zip(b)
        .map(|(x, y)| x - y)
        .filter(|d| *d != 0.0)
        .collect();

    if diffs.is_empty() {
        return constant_outcome(0.0, None);
    }

    let n = diffs.len() as f64;
    let magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let (ranks, ties) = average_ranks(&magnitudes);

    let v: f64 = ranks
        .iter()
        .zip(&diffs)
        .filter(|(_, d)| **d > 0.0)
        .map(|(r, _)| r)
        .sum();
    let mu = n * (n + 1.0) / 4.0;
    let sigma2 = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - ties / 48.0;

    if sigma2 <= 0.0 {
        return Err(TestError::Degenerate(
            "signed-rank variance is zero".to_string(),
        ));
    }

    Ok(TestOutcome {
        statistic: v,
        df: None,
        p_value: corrected_normal_p(v - mu, sigma2.sqrt()),
    })
}
