// Pluggable two-sample significance tests for benchmark deltas
//
// Each test consumes the raw (untrimmed) observations of the old and new
// configuration and answers with a two-sided p-value. Failures are local to
// one report cell and never abort the run.
//
// Variants:
// - none:  no claim of significance, always reports the skip sentinel
// - utest: Mann-Whitney U rank-sum test (nonparametric, tie corrected)
// - ttest: Welch's unequal-variance t-test via aprender

mod student_t;
mod ttest;
mod utest;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::ConfigError;

pub use ttest::welch_t_test;
pub use utest::mann_whitney_u_test;

/// p-value reported by [`DeltaTest::None`]: always below any threshold,
/// never printed
pub const SKIPPED_P_VALUE: f64 = -1.0;

/// Why a significance test could not produce a p-value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeltaTestError {
    #[error("too few samples")]
    TooFewSamples,

    #[error("zero variance")]
    ZeroVariance,

    #[error("{0}")]
    Backend(String),
}

/// Significance test applied to the delta between two configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaTest {
    /// Report raw percent deltas without testing
    None,
    /// Mann-Whitney U rank-sum test
    #[default]
    UTest,
    /// Welch's two-sample t-test
    TTest,
}

/// Accepted names, matched case-insensitively
const DELTA_TEST_NAMES: &[(&str, DeltaTest)] = &[
    ("none", DeltaTest::None),
    ("u", DeltaTest::UTest),
    ("u-test", DeltaTest::UTest),
    ("utest", DeltaTest::UTest),
    ("t", DeltaTest::TTest),
    ("t-test", DeltaTest::TTest),
    ("ttest", DeltaTest::TTest),
];

impl DeltaTest {
    /// Compare raw `old` and `new` observations
    ///
    /// Returns a p-value in `[0, 1]`, or [`SKIPPED_P_VALUE`] for
    /// [`DeltaTest::None`].
    pub fn compare(&self, old: &[f64], new: &[f64]) -> Result<f64, DeltaTestError> {
        match self {
            DeltaTest::None => Ok(SKIPPED_P_VALUE),
            DeltaTest::UTest => mann_whitney_u_test(old, new),
            DeltaTest::TTest => welch_t_test(old, new),
        }
    }

    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            DeltaTest::None => "none",
            DeltaTest::UTest => "utest",
            DeltaTest::TTest => "ttest",
        }
    }
}

impl FromStr for DeltaTest {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        DELTA_TEST_NAMES
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|&(_, test)| test)
            .ok_or_else(|| ConfigError::UnknownDeltaTest(s.to_string()))
    }
}

impl fmt::Display for DeltaTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_aliases() {
        for (name, expected) in DELTA_TEST_NAMES {
            assert_eq!(name.parse::<DeltaTest>().unwrap(), *expected);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("UTest".parse::<DeltaTest>().unwrap(), DeltaTest::UTest);
        assert_eq!("T-TEST".parse::<DeltaTest>().unwrap(), DeltaTest::TTest);
        assert_eq!("None".parse::<DeltaTest>().unwrap(), DeltaTest::None);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "wilcoxon".parse::<DeltaTest>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownDeltaTest("wilcoxon".to_string()));
    }

    #[test]
    fn test_default_is_utest() {
        assert_eq!(DeltaTest::default(), DeltaTest::UTest);
    }

    #[test]
    fn test_none_returns_sentinel() {
        let p = DeltaTest::None
            .compare(&[1.0, 2.0, 3.0], &[7.0, 8.0, 9.0])
            .unwrap();
        assert_eq!(p, SKIPPED_P_VALUE);
    }

    #[test]
    fn test_identical_samples_not_significant() {
        let same = [10.0, 10.0, 10.0, 10.0];
        let p = DeltaTest::UTest.compare(&same, &same).unwrap();
        assert!(p >= 0.05);
    }

    #[test]
    fn test_disjoint_constant_samples_significant() {
        let old = [100.0; 5];
        let new = [80.0; 5];
        for test in [DeltaTest::UTest, DeltaTest::TTest] {
            let p = test.compare(&old, &new).unwrap();
            assert!(p < 0.05, "{} gave p={}", test, p);
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for test in [DeltaTest::None, DeltaTest::UTest, DeltaTest::TTest] {
            assert_eq!(test.to_string().parse::<DeltaTest>().unwrap(), test);
        }
    }
}
