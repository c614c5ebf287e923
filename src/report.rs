//! End-to-end report generation: collection → tables → rendered output

use anyhow::Result;

use crate::cli::OutputFormat;
use crate::collection::Collection;
use crate::config::CompareConfig;
use crate::json_output::JsonReport;
use crate::table::{assemble, Table};
use crate::{csv_output, html_output, json_output, text_output};

/// Render assembled tables in `format`
///
/// `compared` is whether exactly two configurations were loaded, even if no
/// benchmark ended up in both.
pub fn render(
    tables: &[Table],
    format: OutputFormat,
    config: &CompareConfig,
    compared: bool,
) -> Result<String> {
    let out = match format {
        OutputFormat::Text => text_output::render(tables),
        OutputFormat::Html => html_output::render(tables),
        OutputFormat::Csv => csv_output::render(tables),
        OutputFormat::Json => json_output::render(&JsonReport {
            delta_test: compared.then(|| config.delta_test.name()),
            alpha: config.alpha,
            tables,
        })?,
    };
    Ok(out)
}

/// Assemble and render the report for a finalized collection
pub fn generate(
    collection: &Collection,
    config: &CompareConfig,
    format: OutputFormat,
) -> Result<String> {
    let tables = assemble(collection, config);
    tracing::debug!(
        tables = tables.len(),
        configs = collection.configs().len(),
        delta_test = %config.delta_test,
        "assembled report"
    );
    render(&tables, format, config, collection.configs().len() == 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Collection {
        let mut c = Collection::new();
        c.ingest("old", &"Bench 1 100 ns/op\n".repeat(5));
        c.ingest("new", &"Bench 1 80 ns/op\n".repeat(5));
        c.finalize();
        c
    }

    #[test]
    fn test_generate_every_format() {
        let c = pair();
        let config = CompareConfig::default();
        for format in [
            OutputFormat::Text,
            OutputFormat::Html,
            OutputFormat::Csv,
            OutputFormat::Json,
        ] {
            let out = generate(&c, &config, format).unwrap();
            assert!(out.contains("-20.00%"), "{:?} output: {}", format, out);
        }
    }

    #[test]
    fn test_json_names_delta_test_only_when_comparing() {
        let config = CompareConfig::default();
        let json = generate(&pair(), &config, OutputFormat::Json).unwrap();
        assert!(json.contains("\"delta_test\": \"utest\""));

        let mut single = Collection::new();
        single.ingest("only", "Bench 1 1 ns/op\n");
        single.finalize();
        let json = generate(&single, &config, OutputFormat::Json).unwrap();
        assert!(!json.contains("delta_test"));
    }

    #[test]
    fn test_json_names_delta_test_without_shared_benchmarks() {
        let mut c = Collection::new();
        c.ingest("old", "Before 1 10 ns/op\n");
        c.ingest("new", "After 1 12 ns/op\n");
        c.finalize();

        let json = generate(&c, &CompareConfig::default(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["delta_test"], "utest");
        assert_eq!(value["tables"].as_array().unwrap().len(), 0);
    }
}
