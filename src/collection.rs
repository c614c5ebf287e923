//! Series store: raw benchmark records grouped by configuration, benchmark
//! and unit
//!
//! Names are registered in first-seen order; that order drives column order
//! (configurations), row order (benchmarks) and table order (units).
//!
//! A collection is filled by sequential [`Collection::ingest`] calls and then
//! reduced once by [`Collection::finalize`]. It has no internal locking;
//! callers sharing one across threads must serialize access themselves.

use std::collections::HashMap;

use crate::metric::Metric;

/// Prefix stripped from Go-style benchmark names
const BENCHMARK_PREFIX: &str = "Benchmark";

/// Composite identity of one observation set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub config: String,
    pub benchmark: String,
    pub unit: String,
}

impl Key {
    pub fn new(config: &str, benchmark: &str, unit: &str) -> Self {
        Self {
            config: config.to_string(),
            benchmark: benchmark.to_string(),
            unit: unit.to_string(),
        }
    }
}

/// Every observation set of one run, with first-seen ordering of names
#[derive(Debug, Default)]
pub struct Collection {
    configs: Vec<String>,
    benchmarks: Vec<String>,
    units: Vec<String>,
    metrics: HashMap<Key, Metric>,
}

/// One parsed benchmark line: a name and its (value, unit) pairs
#[derive(Debug, PartialEq)]
struct Record<'a> {
    name: &'a str,
    measurements: Vec<(f64, &'a str)>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every benchmark record in `text` under configuration `source`
    ///
    /// Lines must look like `<name> <iterations> <value> <unit> [<value> <unit>]...`;
    /// anything else is ignored. Returns the number of observations added.
    pub fn ingest(&mut self, source: &str, text: &str) -> usize {
        register(&mut self.configs, source);

        let mut added = 0;
        for record in text.lines().filter_map(parse_line) {
            for (value, unit) in record.measurements {
                self.add(source, record.name, unit, value);
                added += 1;
            }
        }

        tracing::debug!(source, observations = added, "ingested source");
        added
    }

    /// Append one observation, registering any new names
    pub fn add(&mut self, config: &str, benchmark: &str, unit: &str, value: f64) {
        register(&mut self.configs, config);
        register(&mut self.benchmarks, benchmark);
        register(&mut self.units, unit);

        self.metrics
            .entry(Key::new(config, benchmark, unit))
            .or_insert_with(|| Metric::new(unit))
            .push(value);
    }

    /// Reduce every metric; run once after all ingestion
    pub fn finalize(&mut self) {
        let keys: Vec<Key> = self.keys().collect();
        for key in keys {
            let Some(metric) = self.metrics.get_mut(&key) else {
                continue;
            };
            metric.finalize();
            if let Some(summary) = metric.summary() {
                tracing::debug!(
                    config = %key.config,
                    benchmark = %key.benchmark,
                    unit = %key.unit,
                    raw = metric.values().len(),
                    retained = summary.retained_count(),
                    mean = summary.mean,
                    "reduced series"
                );
            }
        }
    }

    /// Keys of every stored series, ordered by configuration, then
    /// benchmark, then unit, each in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.configs.iter().flat_map(move |config| {
            self.benchmarks.iter().flat_map(move |benchmark| {
                self.units
                    .iter()
                    .map(move |unit| Key::new(config, benchmark, unit))
                    .filter(move |key| self.metrics.contains_key(key))
            })
        })
    }

    /// Configuration names in first-seen order
    pub fn configs(&self) -> &[String] {
        &self.configs
    }

    /// Benchmark names in first-seen order
    pub fn benchmarks(&self) -> &[String] {
        &self.benchmarks
    }

    /// Units in first-seen order
    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn metric(&self, config: &str, benchmark: &str, unit: &str) -> Option<&Metric> {
        self.metrics.get(&Key::new(config, benchmark, unit))
    }

    pub fn get(&self, key: &Key) -> Option<&Metric> {
        self.metrics.get(key)
    }

    /// Number of (config, benchmark, unit) series
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

fn register(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

/// Parse one log line, or `None` if it is not a benchmark record
fn parse_line(line: &str) -> Option<Record<'_>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return None;
    }

    let name = match fields[0].strip_prefix(BENCHMARK_PREFIX) {
        Some(rest) if !rest.is_empty() => rest,
        _ => fields[0],
    };

    match fields[1].parse::<u64>() {
        Ok(iterations) if iterations > 0 => {}
        _ => return None,
    }

    let measurements: Vec<(f64, &str)> = fields[2..]
        .chunks_exact(2)
        .filter_map(|pair| {
            let value = pair[0].parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some((value, pair[1]))
        })
        .collect();

    if measurements.is_empty() {
        return None;
    }
    Some(Record { name, measurements })
}
