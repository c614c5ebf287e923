//! CSV output format for comparison reports
//!
//! One header plus data rows per table, tables separated by a blank line.
//! The delta and the annotation get their own columns so spreadsheets can
//! sort on them.

use crate::table::Table;

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    // If field contains comma, quote, or newline, wrap in quotes and escape quotes
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn record<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let escaped: Vec<String> = fields.into_iter().map(escape_field).collect();
    escaped.join(",")
}

/// Render every table as CSV
pub fn render(tables: &[Table]) -> String {
    let mut out = String::new();

    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }

        let compare = table.header.last().is_some_and(|h| h == "delta");
        let mut header: Vec<&str> = table.header.iter().map(String::as_str).collect();
        if compare {
            header.push("note");
        }
        out.push_str(&record(header));
        out.push('\n');

        for row in &table.rows {
            let mut fields: Vec<&str> = vec![row.name.as_str()];
            fields.extend(row.cells.iter().map(String::as_str));
            if compare {
                // keep delta and note in fixed columns even when blank
                fields.resize(table.configs.len() + 1, "");
                fields.push(row.delta.as_deref().unwrap_or(""));
                fields.push(row.note.as_deref().unwrap_or(""));
            }
            out.push_str(&record(fields));
            out.push('\n');
        }
    }

    out
}
