//! HTML output format for comparison reports
//!
//! Emits an embeddable fragment: one style block, then an independent
//! `<table>` per unit.

use crate::table::{Row, Table};

/// Escape HTML special characters to prevent XSS
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Embedded CSS: numeric cells right-aligned, annotations left-aligned
fn generate_styles() -> &'static str {
    r#"<style>
.benchdelta { border-collapse: collapse; font-family: monospace; }
.benchdelta th, .benchdelta td { padding: 0em 1em; }
.benchdelta th { text-align: left; }
.benchdelta td.num { text-align: right; }
.benchdelta td.pval { text-align: left; }
</style>
"#
}

fn format_row(row: &Row) -> String {
    let mut cells = vec![format!("<td>{}</td>", escape_html(&row.name))];

    for cell in row.cells.iter().chain(row.delta.iter()) {
        cells.push(format!(r#"<td class="num">{}</td>"#, escape_html(cell)));
    }
    if let Some(note) = &row.note {
        cells.push(format!(r#"<td class="pval">{}</td>"#, escape_html(note)));
    }

    format!("<tr>{}</tr>", cells.join(""))
}

/// Render every table as HTML
pub fn render(tables: &[Table]) -> String {
    let mut html = String::new();
    if tables.is_empty() {
        return html;
    }

    html.push_str(generate_styles());
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            html.push('\n');
        }
        html.push_str("<table class=\"benchdelta\">\n");

        let header: Vec<String> = table
            .header
            .iter()
            .map(|h| format!("<th>{}</th>", escape_html(h)))
            .collect();
        html.push_str(&format!("<tr>{}</tr>\n", header.join("")));

        for row in &table.rows {
            html.push_str(&format_row(row));
            html.push('\n');
        }

        html.push_str("</table>\n");
    }

    html
}
