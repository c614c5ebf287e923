//! Unit-aware value scaling
//!
//! A [`Scaler`] is chosen once from a baseline magnitude and then applied to
//! every value of a row, so that all cells of one row share a suffix and a
//! number of decimals.

/// Fixed scale, precision and suffix chosen from a baseline value
#[derive(Debug, Clone, PartialEq)]
pub struct Scaler {
    /// Multiplier applied before scaling (e.g. MB/s is rendered in B/s)
    prescale: f64,
    /// Divisor applied to the prescaled value
    scale: f64,
    /// Decimals printed
    precision: usize,
    suffix: String,
}

/// (threshold, scale, precision, suffix) for seconds-based time, checked top down
const TIME_STEPS: &[(f64, f64, usize, &str)] = &[
    (99.5, 1.0, 0, "s"),
    (9.95, 1.0, 1, "s"),
    (0.995, 1.0, 2, "s"),
    (0.0995, 1e3, 0, "ms"),
    (0.00995, 1e3, 1, "ms"),
    (0.000995, 1e3, 2, "ms"),
    (0.0000995, 1e6, 0, "µs"),
    (0.00000995, 1e6, 1, "µs"),
    (0.000000995, 1e6, 2, "µs"),
    (0.0000000995, 1e9, 0, "ns"),
    (0.00000000995, 1e9, 1, "ns"),
];

/// (threshold, scale, precision, suffix) for SI magnitudes, checked top down
const SI_STEPS: &[(f64, f64, usize, &str)] = &[
    (99.5e12, 1e12, 0, "T"),
    (9.95e12, 1e12, 1, "T"),
    (995e9, 1e12, 2, "T"),
    (99.5e9, 1e9, 0, "G"),
    (9.95e9, 1e9, 1, "G"),
    (995e6, 1e9, 2, "G"),
    (99.5e6, 1e6, 0, "M"),
    (9.95e6, 1e6, 1, "M"),
    (995e3, 1e6, 2, "M"),
    (99.5e3, 1e3, 0, "k"),
    (9.95e3, 1e3, 1, "k"),
    (995.0, 1e3, 2, "k"),
    (99.5, 1.0, 0, ""),
    (9.95, 1.0, 1, ""),
];

impl Scaler {
    /// Pick a scale for `baseline` expressed in `unit`
    ///
    /// `ns/op` scales through ns/µs/ms/s, `B/op` and `MB/s` through SI byte
    /// prefixes; any other unit keeps its magnitude with an SI prefix and no
    /// unit suffix.
    pub fn new(baseline: f64, unit: &str) -> Self {
        if unit == "ns/op" {
            return Self::time(baseline);
        }

        let prescale = if unit == "MB/s" { 1e6 } else { 1.0 };
        let x = baseline * prescale;
        let (scale, precision, prefix) = SI_STEPS
            .iter()
            .find(|(threshold, ..)| x >= *threshold)
            .map_or((1.0, 2, ""), |&(_, scale, precision, suffix)| {
                (scale, precision, suffix)
            });

        let suffix = match unit {
            "B/op" => format!("{}B", prefix),
            "MB/s" => format!("{}B/s", prefix),
            _ => prefix.to_string(),
        };

        Self {
            prescale,
            scale,
            precision,
            suffix,
        }
    }

    fn time(ns: f64) -> Self {
        let seconds = ns / 1e9;
        let (scale, precision, suffix) = TIME_STEPS
            .iter()
            .find(|(threshold, ..)| seconds >= *threshold)
            .map_or((1e9, 2, "ns"), |&(_, scale, precision, suffix)| {
                (scale, precision, suffix)
            });

        // Scale relative to seconds, so fold the ns→s conversion into prescale
        Self {
            prescale: 1e-9,
            scale: 1.0 / scale,
            precision,
            suffix: suffix.to_string(),
        }
    }

    /// Render `value` in this scaler's scale
    pub fn format(&self, value: f64) -> String {
        format!(
            "{:.*}{}",
            self.precision,
            value * self.prescale / self.scale,
            self.suffix
        )
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}
