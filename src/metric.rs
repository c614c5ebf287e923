//! Per-series observation storage and outlier-robust reduction
//!
//! A [`Metric`] accumulates raw observations for one
//! (configuration, benchmark, unit) key during ingestion. Once every source
//! has been read, [`Metric::finalize`] trims outliers with the
//! interquartile-range rule and caches the summary used for display.

use crate::scaler::Scaler;

/// Tukey fence multiplier for the interquartile-range rule
const IQR_FENCE: f64 = 1.5;

/// Summary of the outlier-trimmed observations of one series
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Observations kept after trimming, sorted ascending
    pub retained: Vec<f64>,
}

impl Summary {
    /// Number of observations that survived outlier trimming
    pub fn retained_count(&self) -> usize {
        self.retained.len()
    }

    /// Relative spread of the retained observations around the mean, in percent
    ///
    /// This is the half-width of the smallest interval centred on the mean
    /// that contains every retained observation, divided by the mean.
    /// Returns `None` when the mean or max is zero.
    pub fn dispersion_percent(&self) -> Option<f64> {
        if self.mean == 0.0 || self.max == 0.0 {
            return None;
        }
        let below = 1.0 - self.min / self.mean;
        let above = self.max / self.mean - 1.0;
        Some(below.max(above) * 100.0)
    }
}

/// Observations of one benchmark under one configuration in one unit
#[derive(Debug, Clone)]
pub struct Metric {
    unit: String,
    values: Vec<f64>,
    summary: Option<Summary>,
}

impl Metric {
    /// Create an empty metric for `unit`
    ///
    /// Only the collection creates metrics, and only together with their
    /// first observation.
    pub(crate) fn new(unit: &str) -> Self {
        Self {
            unit: unit.to_string(),
            values: Vec::new(),
            summary: None,
        }
    }

    /// Append one raw observation
    pub(crate) fn push(&mut self, value: f64) {
        self.values.push(value);
        self.summary = None;
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Raw observations in ingestion order (untrimmed)
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Trim outliers and compute the summary
    ///
    /// Idempotent: the summary depends only on the multiset of raw values.
    pub fn finalize(&mut self) {
        self.summary = Some(reduce(&self.values));
    }

    /// Summary computed by [`Metric::finalize`], if it has run
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Mean of the retained observations, `None` until [`Metric::finalize`] runs
    pub fn mean(&self) -> Option<f64> {
        self.summary.as_ref().map(|s| s.mean)
    }

    /// Format the mean in `scaler`'s scale followed by the dispersion indicator
    pub fn format(&self, scaler: &Scaler) -> String {
        let Some(summary) = &self.summary else {
            return String::new();
        };
        let mean = scaler.format(summary.mean);
        match summary.dispersion_percent() {
            Some(pct) => format!("{} ±{:>3}", mean, format!("{:.0}%", pct)),
            None => format!("{}     ", mean),
        }
    }
}

/// Calculate percentile from sorted data by linear interpolation between
/// order statistics
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let index = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

/// Remove IQR outliers from `values` and summarize what remains
///
/// If trimming would leave nothing, the full sample is summarized instead.
pub fn reduce(values: &[f64]) -> Summary {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;
    let lo = q1 - IQR_FENCE * iqr;
    let hi = q3 + IQR_FENCE * iqr;

    let mut retained: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|&v| lo <= v && v <= hi)
        .collect();
    if retained.is_empty() {
        retained = sorted;
    }

    // Sum in sorted order so the result does not depend on ingestion order
    let (min, max) = match (retained.first(), retained.last()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => (0.0, 0.0),
    };
    let mean = if retained.is_empty() {
        0.0
    } else {
        retained.iter().sum::<f64>() / retained.len() as f64
    };

    Summary {
        mean,
        min,
        max,
        retained,
    }
}

/// Geometric mean of strictly non-negative, finite values
///
/// Returns `None` for an empty slice or when any value is negative or
/// non-finite. A zero value yields zero.
pub fn geomean(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return None;
    }
    if values.iter().any(|&v| v == 0.0) {
        return Some(0.0);
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    Some((log_sum / values.len() as f64).exp())
}
