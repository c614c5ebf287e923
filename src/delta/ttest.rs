// Welch's two-sample t-test using aprender
//
// aprender and trueno work in f32, while benchmark values routinely reach
// 1e7..1e10 (ns/op). Both samples are shifted by the old mean and divided by
// the largest absolute deviation before the test; the t statistic is
// invariant under a common affine transform, so the p-value is unchanged.
//
// aprender supplies the t statistic and Welch-Satterthwaite degrees of
// freedom. Its tail probability is too coarse at the small df of typical
// benchmark runs, so the p-value comes from the Student's t CDF here.

use trueno::Vector;

use super::student_t::two_tailed_p_value;
use super::DeltaTestError;

/// Minimum observations required on each side
const MIN_SAMPLES: usize = 2;

/// Two-sided Welch t-test of `old` against `new` (unequal variances)
///
/// When both samples have zero variance the test is undefined: identical
/// samples are reported as [`DeltaTestError::ZeroVariance`], while constant
/// samples with different values are a certain change (`p = 0`).
pub fn welch_t_test(old: &[f64], new: &[f64]) -> Result<f64, DeltaTestError> {
    if old.len() < MIN_SAMPLES || new.len() < MIN_SAMPLES {
        return Err(DeltaTestError::TooFewSamples);
    }

    let old_mean = mean(old);
    let new_mean = mean(new);

    let spread = old
        .iter()
        .chain(new.iter())
        .map(|v| (v - old_mean).abs())
        .fold(0.0, f64::max);
    if spread == 0.0 {
        return Err(DeltaTestError::ZeroVariance);
    }

    let baseline = normalize(old, old_mean, spread);
    let current = normalize(new, old_mean, spread);

    let baseline_variance = variance(&baseline)?;
    let current_variance = variance(&current)?;
    if baseline_variance == 0.0 && current_variance == 0.0 {
        return if old_mean == new_mean {
            Err(DeltaTestError::ZeroVariance)
        } else {
            Ok(0.0)
        };
    }

    let result = aprender::stats::hypothesis::ttest_ind(&baseline, &current, false)
        .map_err(|e| DeltaTestError::Backend(e.to_string()))?;

    let statistic = f64::from(result.statistic);
    let df = f64::from(result.df);
    if statistic.is_nan() || !df.is_finite() || df <= 0.0 {
        return Err(DeltaTestError::Backend(format!(
            "undefined t statistic (t={}, df={})",
            statistic, df
        )));
    }
    let pvalue = two_tailed_p_value(statistic, df);

    tracing::trace!(statistic, df, pvalue, "welch t-test");

    Ok(pvalue.clamp(0.0, 1.0))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn normalize(values: &[f64], center: f64, spread: f64) -> Vec<f32> {
    values
        .iter()
        .map(|v| ((v - center) / spread) as f32)
        .collect()
}

/// Population variance via trueno's SIMD kernels
fn variance(values: &[f32]) -> Result<f32, DeltaTestError> {
    Vector::from_slice(values)
        .variance()
        .map_err(|e| DeltaTestError::Backend(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_difference() {
        let baseline = [10.0, 12.0, 11.0, 13.0, 10.0];
        let current = [25.0, 27.0, 26.0, 28.0, 25.0];

        let p = welch_t_test(&baseline, &current).unwrap();
        assert!(p < 0.05, "p-value {} should be < 0.05", p);
    }

    #[test]
    fn test_no_difference() {
        let baseline = [10.0, 12.0, 11.0, 13.0, 10.0];
        let current = [11.0, 13.0, 10.0, 12.0, 11.0];

        let p = welch_t_test(&baseline, &current).unwrap();
        assert!(p >= 0.05, "p-value {} should be >= 0.05", p);
    }

    fn assert_p_value(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-4 * expected.max(1e-3),
            "p-value {} should be {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_p_value_overlapping_samples() {
        // t = -0.2582, df = 7.860
        let p = welch_t_test(&[10.0, 12.0, 11.0, 13.0, 10.0], &[11.0, 13.0, 10.0, 12.0, 11.0])
            .unwrap();
        assert_p_value(p, 0.802_885);
    }

    #[test]
    fn test_p_value_with_outlier_inflated_variance() {
        // t = 0.7685, df = 4.011
        let p = welch_t_test(&[1.0, 2.0, 3.0, 4.0, 100.0], &[5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        assert_p_value(p, 0.484_959);
    }

    #[test]
    fn test_p_value_three_runs_each() {
        // t = -1.8708, df = 4: significant at 0.15 but not at 0.1
        let p = welch_t_test(&[0.0, 3.0, 1.0], &[2.0, 5.0, 4.0]).unwrap();
        assert_p_value(p, 0.134_702);
    }

    #[test]
    fn test_p_value_independent_of_offset() {
        let p = welch_t_test(&[1e9, 1e9 + 3.0, 1e9 + 1.0], &[1e9 + 2.0, 1e9 + 5.0, 1e9 + 4.0])
            .unwrap();
        assert_p_value(p, 0.134_702);
    }

    #[test]
    fn test_large_magnitudes_keep_precision() {
        // ns/op values far beyond f32's integer precision
        let baseline = [
            13_552_735.0,
            13_553_943.0,
            13_606_356.0,
            13_683_198.0,
        ];
        let current = [
            11_773_189.0,
            11_942_588.0,
            11_786_159.0,
            11_628_583.0,
            11_815_924.0,
        ];

        let p = welch_t_test(&baseline, &current).unwrap();
        // t = 30.78, df = 6.368
        assert!((p - 3.614e-8).abs() < 1e-10, "p-value {} should be 3.614e-8", p);
    }

    #[test]
    fn test_identical_constant_samples_are_degenerate() {
        assert_eq!(
            welch_t_test(&[10.0; 4], &[10.0; 4]),
            Err(DeltaTestError::ZeroVariance)
        );
    }

    #[test]
    fn test_distinct_constant_samples_are_certain() {
        assert_eq!(welch_t_test(&[100.0; 5], &[80.0; 5]), Ok(0.0));
    }

    #[test]
    fn test_insufficient_samples() {
        assert_eq!(
            welch_t_test(&[10.0], &[12.0, 13.0]),
            Err(DeltaTestError::TooFewSamples)
        );
    }

    #[test]
    fn test_variance_constant() {
        assert_eq!(variance(&[5.0, 5.0, 5.0, 5.0]).unwrap(), 0.0);
    }
}
