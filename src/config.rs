//! Comparison settings shared by the table assembler and the CLI

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::delta::DeltaTest;

/// Invalid comparison settings, reported before any input is read
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown delta test {0:?} (expected none, utest, u, u-test, ttest, t or t-test)")]
    UnknownDeltaTest(String),

    #[error("invalid alpha {0}: must be strictly between 0 and 1")]
    InvalidAlpha(f64),
}

/// Settings for comparing benchmark configurations
///
/// # Example
/// ```
/// use benchdelta::config::CompareConfig;
/// use benchdelta::delta::DeltaTest;
///
/// let config = CompareConfig::default();
/// assert_eq!(config.alpha, 0.05);
/// assert_eq!(config.delta_test, DeltaTest::UTest);
/// assert!(!config.geomean);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Significance test applied between the old and new configuration
    pub delta_test: DeltaTest,

    /// Significance level: a delta is shown only when `p < alpha`
    ///
    /// - 0.05 (default): 95% confidence
    /// - 0.01: stricter, fewer reported changes
    pub alpha: f64,

    /// Append a geometric-mean row to every table
    pub geomean: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            delta_test: DeltaTest::default(),
            alpha: 0.05,
            geomean: false,
        }
    }
}

impl CompareConfig {
    /// Check that α lies in the open interval (0, 1)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }

    /// Whether a p-value from [`DeltaTest::compare`] counts as a change
    ///
    /// The skip sentinel is negative, so it always counts.
    pub fn is_significant(&self, pvalue: f64) -> bool {
        pvalue < self.alpha
    }
}
