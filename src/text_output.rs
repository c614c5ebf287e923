//! Plain aligned text output (default format)
//!
//! Column widths are shared by every table of the report so that stacked
//! tables line up.

use crate::table::Table;

/// Render `tables` as aligned text, tables separated by a blank line
pub fn render(tables: &[Table]) -> String {
    let widths = column_widths(tables);
    let mut out = String::new();

    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }

        let last = table.header.len().saturating_sub(1);
        for (col, cell) in table.header.iter().enumerate() {
            if col == 0 {
                out.push_str(&format!("{:<w$}", cell, w = widths[col]));
            } else if col == last {
                out.push_str(&format!("  {}", cell));
            } else {
                out.push_str(&format!("  {:<w$}", cell, w = widths[col]));
            }
        }
        out.push('\n');

        for row in &table.rows {
            let columns = row.columns();
            let note_col = row.note.as_ref().map(|_| columns.len() - 1);
            for (col, cell) in columns.iter().enumerate() {
                if col == 0 {
                    out.push_str(&format!("{:<w$}", cell, w = widths[col]));
                } else if Some(col) == note_col {
                    // annotation stays left-aligned
                    out.push_str(&format!("  {}", cell));
                } else {
                    out.push_str(&format!("  {:>w$}", cell, w = widths[col]));
                }
            }
            out.push('\n');
        }
    }

    out
}

/// Widest cell of every column across all tables, in chars
fn column_widths(tables: &[Table]) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    let mut widen = |col: usize, cell: &str| {
        if widths.len() <= col {
            widths.resize(col + 1, 0);
        }
        widths[col] = widths[col].max(cell.chars().count());
    };

    for table in tables {
        for (col, cell) in table.header.iter().enumerate() {
            widen(col, cell);
        }
        for row in &table.rows {
            for (col, cell) in row.columns().into_iter().enumerate() {
                widen(col, cell);
            }
        }
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use crate::config::CompareConfig;
    use crate::table::assemble;

    fn report(sources: &[(&str, &str)], config: &CompareConfig) -> String {
        let mut c = Collection::new();
        for (name, text) in sources {
            c.ingest(name, text);
        }
        c.finalize();
        render(&assemble(&c, config))
    }

    #[test]
    fn test_single_file_summary() {
        let text = "\
BenchmarkGobEncode   \t100\t  13552735 ns/op
BenchmarkJSONEncode  \t 50\t  32395067 ns/op
BenchmarkGobEncode   \t100\t  13553943 ns/op
BenchmarkJSONEncode  \t 50\t  32334214 ns/op
BenchmarkGobEncode   \t100\t  13606356 ns/op
BenchmarkJSONEncode  \t 50\t  31992891 ns/op
BenchmarkGobEncode   \t100\t  13683198 ns/op
BenchmarkJSONEncode  \t 50\t  31735022 ns/op
";
        let out = report(&[("old.txt", text)], &CompareConfig::default());
        assert_eq!(
            out,
            "name        time/op\nGobEncode   13.6ms ± 1%\nJSONEncode  32.1ms ± 1%\n"
        );
    }

    #[test]
    fn test_two_file_comparison_layout() {
        let old = "Bench 1 100 ns/op\n".repeat(5);
        let new = "Bench 1 80 ns/op\n".repeat(5);
        let out = report(&[("old", &old), ("new", &new)], &CompareConfig::default());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "name   old time/op  new time/op  delta");
        assert_eq!(lines[1], "Bench   100ns ± 0%    80ns ± 0%  -20.00%  (p=0.008 n=5+5)");
    }

    #[test]
    fn test_tables_separated_by_blank_line() {
        let old = "Bench 1 100 ns/op 64 B/op\n".repeat(3);
        let new = "Bench 1 100 ns/op 64 B/op\n".repeat(3);
        let out = report(&[("old", &old), ("new", &new)], &CompareConfig::default());

        let blocks: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("name"));
        assert!(blocks[0].contains("time/op"));
        assert!(blocks[1].contains("alloc/op"));
    }

    #[test]
    fn test_change_from_zero_keeps_annotation_column() {
        let old = "Bench 1 0 B/op\n".repeat(5);
        let new = "Bench 1 16 B/op\n".repeat(5);
        let out = report(&[("old", &old), ("new", &new)], &CompareConfig::default());
        let lines: Vec<&str> = out.lines().collect();

        assert!(!out.contains("inf") && !out.contains("NaN"));
        let note = "(p=0.008 n=5+5)";
        assert!(lines[1].ends_with(note));
        // widths are in chars; "±" is two bytes
        let delta_end = lines[0].chars().count();
        let note_start = lines[1].chars().count() - note.len();
        assert_eq!(note_start, delta_end + 2);
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(render(&[]), "");
    }
}
