//! Requested group pairs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SigmarkError;

/// An ordered pair of group labels to compare within every facet.
///
/// `group_a` becomes the bracket start and `group_b` the bracket end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comparison {
    pub group_a: String,
    pub group_b: String,
}

impl Comparison {
    pub fn new(group_a: impl Into<String>, group_b: impl Into<String>) -> Self {
        Self {
            group_a: group_a.into(),
            group_b: group_b.into(),
        }
    }

    /// Every unordered pair of `labels`, in label order.
    ///
    /// `["A", "B", "C"]` gives `A-B`, `A-C`, `B-C`.
    pub fn all_pairs<S: AsRef<str>>(labels: &[S]) -> Vec<Self> {
        let mut pairs = Vec::new();
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                pairs.push(Self::new(a.as_ref(), b.as_ref()));
            }
        }
        pairs
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.group_a, self.group_b)
    }
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for Comparison {
    fn from((a, b): (A, B)) -> Self {
        Self::new(a, b)
    }
}

/// Parses `A:B`.
impl FromStr for Comparison {
    type Err = SigmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
                Ok(Self::new(a.trim(), b.trim()))
            }
            _ => Err(SigmarkError::Config(format!(
                "invalid comparison '{s}' (expected GROUP_A:GROUP_B)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pairs() {
        let pairs = Comparison::all_pairs(&["Ctrl", "DrugA", "DrugB"]);
        assert_eq!(
            pairs,
            vec![
                Comparison::new("Ctrl", "DrugA"),
                Comparison::new("Ctrl", "DrugB"),
                Comparison::new("DrugA", "DrugB"),
            ]
        );
        assert!(Comparison::all_pairs(&["Ctrl"]).is_empty());
    }

    #[test]
    fn test_parse() {
        let c: Comparison = "Ctrl : Drug".parse().unwrap();
        assert_eq!(c, Comparison::new("Ctrl", "Drug"));
        assert!("Ctrl".parse::<Comparison>().is_err());
        assert!(":Drug".parse::<Comparison>().is_err());
    }

    #[test]
    fn test_from_tuple_and_display() {
        let c = Comparison::from(("Ctrl", "Drug"));
        assert_eq!(c.to_string(), "Ctrl vs Drug");
    }
}
