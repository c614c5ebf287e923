//! CLI argument parsing for benchdelta

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::CompareConfig;
use crate::delta::DeltaTest;

/// Output format for comparison reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain text (default)
    Text,
    /// HTML tables
    Html,
    /// CSV for spreadsheet analysis
    Csv,
    /// JSON for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "benchdelta")]
#[command(version)]
#[command(
    about = "Compute and compare statistics about benchmark runs",
    long_about = "Reads benchmark logs (`name iterations value unit [value unit]...` lines), \
                  removes outliers with the interquartile-range rule and reports the mean of \
                  every benchmark. With exactly two inputs the second is compared against the \
                  first and the change is tested for statistical significance."
)]
pub struct Cli {
    /// Significance test applied to the delta: utest, ttest or none
    #[arg(
        long = "delta-test",
        value_name = "TEST",
        default_value = "utest",
        value_parser = parse_delta_test
    )]
    pub delta_test: DeltaTest,

    /// Consider a change significant if p < ALPHA
    #[arg(long = "alpha", value_name = "ALPHA", default_value = "0.05")]
    pub alpha: f64,

    /// Print the geometric mean of each configuration
    #[arg(long = "geomean")]
    pub geomean: bool,

    /// Print results as HTML tables (shorthand for --format html)
    #[arg(long = "html")]
    pub html: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// Benchmark logs: old.txt [new.txt] [more.txt ...]
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

fn parse_delta_test(name: &str) -> Result<DeltaTest, String> {
    name.parse::<DeltaTest>().map_err(|e| e.to_string())
}

impl Cli {
    /// Comparison settings selected on the command line
    pub fn compare_config(&self) -> CompareConfig {
        CompareConfig {
            delta_test: self.delta_test,
            alpha: self.alpha,
            geomean: self.geomean,
        }
    }

    /// Effective output format, honouring `--html`
    pub fn output_format(&self) -> OutputFormat {
        if self.html {
            OutputFormat::Html
        } else {
            self.format
        }
    }
}
