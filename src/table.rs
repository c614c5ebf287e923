//! Table assembly: one comparison table per unit
//!
//! With exactly two configurations every table compares old against new and
//! carries a delta column. With any other number of configurations the
//! configurations are listed side by side without deltas.

use serde::Serialize;

use crate::collection::Collection;
use crate::config::CompareConfig;
use crate::delta::SKIPPED_P_VALUE;
use crate::metric::{geomean, Metric};
use crate::scaler::Scaler;

/// Name cell of the geometric-mean row
pub const GEOMEAN_LABEL: &str = "[Geo mean]";

/// Padding that keeps geomean cells aligned with "± X%" cells
const NO_DISPERSION_PAD: &str = "     ";

/// One report row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Benchmark name, or [`GEOMEAN_LABEL`]
    pub name: String,
    /// Formatted value per configuration; trailing blanks are trimmed
    pub cells: Vec<String>,
    /// Unscaled mean per configuration, `None` where there is no data
    pub means: Vec<Option<f64>>,
    /// `~`, a signed percent change, or blank for a significant change from
    /// zero (two-configuration tables only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    /// Percent change of new against old, when one is displayed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
    /// p-value from the delta test, when one was computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    /// `(p=… n=…+…)` annotation or `(error)` text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Row {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: Vec::new(),
            means: Vec::new(),
            delta: None,
            change_percent: None,
            p_value: None,
            note: None,
        }
    }

    fn trim(&mut self) {
        while self.cells.last().is_some_and(|c| c.is_empty()) {
            self.cells.pop();
        }
    }

    /// All displayed columns in order: name, values, delta, note
    pub fn columns(&self) -> Vec<&str> {
        let mut cols = vec![self.name.as_str()];
        cols.extend(self.cells.iter().map(String::as_str));
        cols.extend(self.delta.as_deref());
        cols.extend(self.note.as_deref());
        cols
    }
}

/// All rows sharing one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub unit: String,
    /// Metric label derived from the unit (`time/op`, `alloc/op`, …)
    pub metric: String,
    pub configs: Vec<String>,
    /// Header cells
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

/// Label for the quantity measured in `unit`
pub fn metric_of(unit: &str) -> &str {
    match unit {
        "ns/op" => "time/op",
        "B/op" => "alloc/op",
        "MB/s" => "speed",
        _ => unit,
    }
}

/// Percent change from `old` to `new`
///
/// Equal values are no change; any other change from zero has no percentage.
pub fn percent_change(old: f64, new: f64) -> Option<f64> {
    if old == new {
        return Some(0.0);
    }
    let change = ((new / old) - 1.0) * 100.0;
    change.is_finite().then_some(change)
}

/// A finalized series and its mean; unfinalized series count as missing
fn series<'a>(
    collection: &'a Collection,
    config: &str,
    benchmark: &str,
    unit: &str,
) -> Option<(&'a Metric, f64)> {
    let metric = collection.metric(config, benchmark, unit)?;
    Some((metric, metric.mean()?))
}

/// Build every table of the report from a finalized collection
pub fn assemble(collection: &Collection, config: &CompareConfig) -> Vec<Table> {
    match collection.configs() {
        [old, new] => collection
            .units()
            .iter()
            .filter_map(|unit| compare_pair(collection, config, unit, old, new))
            .collect(),
        configs => collection
            .units()
            .iter()
            .map(|unit| side_by_side(collection, config, unit, configs))
            .collect(),
    }
}

/// Old-versus-new table for `unit`; `None` when no benchmark has both sides
fn compare_pair(
    collection: &Collection,
    config: &CompareConfig,
    unit: &str,
    old_config: &str,
    new_config: &str,
) -> Option<Table> {
    let metric = metric_of(unit);
    let mut rows = Vec::new();

    for benchmark in collection.benchmarks() {
        let (Some(old), Some(new)) = (
            series(collection, old_config, benchmark, unit),
            series(collection, new_config, benchmark, unit),
        ) else {
            continue;
        };
        rows.push(compare_row(config, benchmark, old, new));
    }

    if rows.is_empty() {
        return None;
    }
    if config.geomean {
        rows.push(geomean_row(collection, unit, true));
    }

    Some(Table {
        unit: unit.to_string(),
        metric: metric.to_string(),
        configs: vec![old_config.to_string(), new_config.to_string()],
        header: vec![
            "name".to_string(),
            format!("old {}", metric),
            format!("new {}", metric),
            "delta".to_string(),
        ],
        rows,
    })
}

fn compare_row(
    config: &CompareConfig,
    benchmark: &str,
    (old, old_mean): (&Metric, f64),
    (new, new_mean): (&Metric, f64),
) -> Row {
    let scaler = Scaler::new(old_mean, old.unit());
    let mut row = Row::new(benchmark);
    row.cells = vec![old.format(&scaler), new.format(&scaler)];
    row.means = vec![Some(old_mean), Some(new_mean)];
    row.delta = Some("~".to_string());

    match config.delta_test.compare(old.values(), new.values()) {
        Err(err) => {
            tracing::debug!(benchmark, unit = old.unit(), %err, "delta test failed");
            row.note = Some(format!("({})", err));
        }
        Ok(pvalue) => {
            if config.is_significant(pvalue) {
                let change = percent_change(old_mean, new_mean);
                // blank rather than "~": the change is real but has no percentage
                row.delta = Some(change.map_or_else(String::new, |c| format!("{:+.2}%", c)));
                row.change_percent = change;
            }
            if pvalue != SKIPPED_P_VALUE {
                row.p_value = Some(pvalue);
                row.note = Some(format!(
                    "(p={:.3} n={}+{})",
                    pvalue,
                    old.values().len(),
                    new.values().len()
                ));
            }
        }
    }
    row
}

/// Side-by-side table for any number of configurations other than two
fn side_by_side(
    collection: &Collection,
    config: &CompareConfig,
    unit: &str,
    configs: &[String],
) -> Table {
    let metric = metric_of(unit);
    let header = if configs.len() > 1 {
        std::iter::once(format!("name \\ {}", metric))
            .chain(configs.iter().cloned())
            .collect()
    } else {
        vec!["name".to_string(), metric.to_string()]
    };

    let mut rows = Vec::new();
    for benchmark in collection.benchmarks() {
        let mut row = Row::new(benchmark);
        let mut scaler: Option<Scaler> = None;
        for cfg in configs {
            match series(collection, cfg, benchmark, unit) {
                Some((m, mean)) => {
                    let scaler = scaler.get_or_insert_with(|| Scaler::new(mean, m.unit()));
                    row.cells.push(m.format(scaler));
                    row.means.push(Some(mean));
                }
                None => {
                    row.cells.push(String::new());
                    row.means.push(None);
                }
            }
        }
        row.trim();
        if !row.cells.is_empty() {
            rows.push(row);
        }
    }

    if config.geomean && !rows.is_empty() {
        rows.push(geomean_row(collection, unit, false));
    }

    Table {
        unit: unit.to_string(),
        metric: metric.to_string(),
        configs: configs.to_vec(),
        header,
        rows,
    }
}

/// Geometric mean of every configuration's per-benchmark means for `unit`
///
/// A configuration missing any benchmark present for the unit gets a blank
/// cell, and the delta is then suppressed.
fn geomean_row(collection: &Collection, unit: &str, with_delta: bool) -> Row {
    let present: Vec<&String> = collection
        .benchmarks()
        .iter()
        .filter(|b| {
            collection
                .configs()
                .iter()
                .any(|c| series(collection, c, b, unit).is_some())
        })
        .collect();

    let geomeans: Vec<Option<f64>> = collection
        .configs()
        .iter()
        .map(|cfg| {
            let means: Option<Vec<f64>> = present
                .iter()
                .map(|b| series(collection, cfg, b, unit).map(|(_, mean)| mean))
                .collect();
            means.and_then(|m| geomean(&m))
        })
        .collect();

    let mut row = Row::new(GEOMEAN_LABEL);
    let scaler = geomeans
        .iter()
        .flatten()
        .next()
        .map(|&g| Scaler::new(g, unit));
    for g in &geomeans {
        match (g, &scaler) {
            (Some(g), Some(scaler)) => {
                row.cells.push(format!("{}{}", scaler.format(*g), NO_DISPERSION_PAD))
            }
            _ => row.cells.push(String::new()),
        }
    }
    row.means = geomeans.clone();

    if with_delta {
        if let [Some(old), Some(new)] = geomeans[..] {
            if let Some(change) = percent_change(old, new) {
                row.delta = Some(format!("{:+.2}%", change));
                row.change_percent = Some(change);
            }
        }
    } else {
        row.trim();
    }
    row
}
