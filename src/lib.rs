//! benchdelta - robust benchmark statistics and significance-tested comparisons
//!
//! This library ingests repeated benchmark measurements, reduces every
//! (configuration, benchmark, unit) series to an outlier-trimmed summary and,
//! when exactly two configurations are present, tests whether the change
//! between them is statistically significant.

pub mod cli;
pub mod collection;
pub mod config;
pub mod csv_output;
pub mod delta;
pub mod html_output;
pub mod json_output;
pub mod metric;
pub mod report;
pub mod scaler;
pub mod source;
pub mod table;
pub mod text_output;
