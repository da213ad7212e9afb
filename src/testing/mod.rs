//! Hypothesis tests and multiple testing correction used by the contingency-table engines.
//!
//! - **[`inference`]**: exact tests on counts (binomial test, Fisher's exact test)
//! - **[`correction`]**: p-value adjustment for many simultaneous tests

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EnrichmentError;

pub mod correction;
pub mod inference;

pub use correction::CorrectionMethod;

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    TwoSided,
    Less,
    /// Over-representation; the usual choice for ontology analysis.
    #[default]
    Greater,
}

impl Alternative {
    pub const ACCEPTED: [&'static str; 3] = ["greater", "less", "two-sided"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Alternative::TwoSided => "two-sided",
            Alternative::Less => "less",
            Alternative::Greater => "greater",
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alternative {
    type Err = EnrichmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greater" => Ok(Alternative::Greater),
            "less" => Ok(Alternative::Less),
            "two-sided" | "two_sided" => Ok(Alternative::TwoSided),
            other => Err(EnrichmentError::invalid_option(
                "mode",
                other,
                &Alternative::ACCEPTED,
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    /// The test statistic value (observed successes, observed overlap, ...)
    pub statistic: f64,
    /// The p-value of the test
    pub p_value: f64,
}

impl TestResult {
    pub fn new(statistic: f64, p_value: f64) -> Self {
        TestResult { statistic, p_value }
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternative_parsing() {
        assert_eq!("greater".parse::<Alternative>().unwrap(), Alternative::Greater);
        assert_eq!("two_sided".parse::<Alternative>().unwrap(), Alternative::TwoSided);
        let err = "bigger".parse::<Alternative>().unwrap_err();
        assert!(err.to_string().contains("'two-sided'"));
        assert!(err.to_string().contains("mode"));
    }

    #[test]
    fn test_alternative_display_round_trips() {
        for alt in [Alternative::TwoSided, Alternative::Less, Alternative::Greater] {
            assert_eq!(alt.to_string().parse::<Alternative>().unwrap(), alt);
        }
    }
}
