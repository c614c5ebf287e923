//! JSON output format for comparison reports
//!
//! Serializes the assembled tables directly, keeping both the formatted
//! cells and the unscaled numbers for machine consumers.

use serde::Serialize;

use crate::table::Table;

/// Top-level JSON document
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Delta test used for the comparison, when two configurations were compared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_test: Option<&'a str>,
    pub alpha: f64,
    pub tables: &'a [Table],
}

/// Render `report` as pretty-printed JSON
pub fn render(report: &JsonReport<'_>) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}
