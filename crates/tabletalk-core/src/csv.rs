//! Naive CSV import and export
//!
//! Lines are split on `,` with no quoting or escaping support. Parsing never
//! fails: short rows are padded with empty strings, extra fields are ignored
//! and anything that is not a number stays a string.

use crate::types::{Column, ColumnType, Row, Table};
use tracing::debug;

const DELIMITER: char = ',';

/// Columns and rows produced by [`parse_csv`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCsv {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// Parse raw CSV text into a typed schema and rows
///
/// A column becomes [`ColumnType::Number`] as soon as one of its values is
/// numeric, and stays numeric even if later values are not. Values are kept
/// as parsed per row. With duplicate headers both columns are listed and the
/// later field wins inside each row.
pub fn parse_csv(text: &str) -> ParsedCsv {
    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return ParsedCsv::default();
    };

    let headers: Vec<String> = header_line
        .split(DELIMITER)
        .map(|h| h.trim().to_string())
        .collect();

    for (i, header) in headers.iter().enumerate() {
        if headers[..i].contains(header) {
            debug!("Duplicate CSV header '{}' shadows the earlier column", header);
        }
    }

    let mut columns: Vec<Column> = headers.iter().map(Column::new).collect();

    let rows = lines
        .map(|line| {
            let values: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
            let mut row = Row::new();

            for (index, header) in headers.iter().enumerate() {
                let raw = values.get(index).copied().unwrap_or("");
                match parse_number(raw) {
                    Some(number) => {
                        row.insert(header.as_str(), number);
                        columns[index].column_type = ColumnType::Number;
                    }
                    None => row.insert(header.as_str(), raw),
                }
            }

            row
        })
        .collect::<Vec<_>>();

    debug!(
        "Parsed CSV with {} column(s) and {} row(s)",
        columns.len(),
        rows.len()
    );

    ParsedCsv { columns, rows }
}

/// A field counts as numeric when it is non-empty and wholly a finite number
fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a table as CSV text
///
/// The header line uses column headers; each row lists its values in column
/// order. Nulls render as empty fields.
pub fn export_csv(table: &Table) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(table.headers().join(","));

    for row in &table.rows {
        let fields: Vec<String> = table
            .columns
            .iter()
            .map(|c| row.get(&c.accessor).to_string())
            .collect();
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

/// Derive a table name from a file name by dropping its last extension
pub fn table_name_from_file(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => base[..idx].to_string(),
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, TableKind};

    #[test]
    fn test_parse_basic() {
        let parsed = parse_csv("id, name ,score\n1,alice,9.5\n2, bob ,7\n");

        assert_eq!(parsed.columns.len(), 3);
        assert_eq!(parsed.columns[1].accessor, "name");
        assert_eq!(parsed.columns[1].header, "name");
        assert_eq!(parsed.columns[0].column_type, ColumnType::Number);
        assert_eq!(parsed.columns[1].column_type, ColumnType::String);
        assert_eq!(parsed.columns[2].column_type, ColumnType::Number);

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].get("name"), &CellValue::text("bob"));
        assert_eq!(parsed.rows[0].get("score"), &CellValue::Number(9.5));
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let parsed = parse_csv("a,b\r\n\r\n1,x\r\n   \n2,y\r\n");
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.columns[1].accessor, "b");
        assert_eq!(parsed.rows[0].get("b"), &CellValue::text("x"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_csv(""), ParsedCsv::default());
        assert_eq!(parse_csv("\n  \n\t\n"), ParsedCsv::default());
    }

    #[test]
    fn test_short_and_long_rows() {
        let parsed = parse_csv("a,b,c\n1\n4,5,6,7");
        assert_eq!(parsed.rows[0].get("b"), &CellValue::text(""));
        assert_eq!(parsed.rows[0].get("c"), &CellValue::text(""));
        assert!(parsed.rows[0].contains_key("c"));
        assert_eq!(parsed.rows[1].len(), 3);
    }

    #[test]
    fn test_numeric_upgrade_is_sticky() {
        let parsed = parse_csv("code\nabc\n12\nxyz");
        assert_eq!(parsed.columns[0].column_type, ColumnType::Number);
        // values keep their per-row parse
        assert_eq!(parsed.rows[0].get("code"), &CellValue::text("abc"));
        assert_eq!(parsed.rows[1].get("code"), &CellValue::Number(12.0));
        assert_eq!(parsed.rows[2].get("code"), &CellValue::text("xyz"));
    }

    #[test]
    fn test_non_finite_values_stay_text() {
        let parsed = parse_csv("v\nNaN\ninf\n");
        assert_eq!(parsed.columns[0].column_type, ColumnType::String);
        assert_eq!(parsed.rows[0].get("v"), &CellValue::text("NaN"));
    }

    #[test]
    fn test_radix_literals_stay_text() {
        let parsed = parse_csv("v\n0x1F\n0b1\n1e3");
        assert_eq!(parsed.rows[0].get("v"), &CellValue::text("0x1F"));
        assert_eq!(parsed.rows[1].get("v"), &CellValue::text("0b1"));
        assert_eq!(parsed.rows[2].get("v"), &CellValue::Number(1000.0));
    }

    #[test]
    fn test_duplicate_headers_shadow_last() {
        let parsed = parse_csv("id,id\n1,2");
        assert_eq!(parsed.columns.len(), 2);
        assert_eq!(parsed.rows[0].get("id"), &CellValue::Number(2.0));
    }

    #[test]
    fn test_export_then_parse_round_trip() {
        let parsed = parse_csv("id,name,amount\n1,alice,10.5\n2,bob,\n3,,7");
        let table = Table::uploaded("t", parsed.columns.clone(), parsed.rows.clone());
        assert_eq!(table.kind, TableKind::Uploaded);

        let text = export_csv(&table);
        assert_eq!(text, "id,name,amount\n1,alice,10.5\n2,bob,\n3,,7");
        assert_eq!(parse_csv(&text), parsed);
    }

    #[test]
    fn test_export_renders_null_as_empty() {
        let mut row = Row::new();
        row.insert("a", CellValue::Null);
        let table = Table::uploaded("t", vec![Column::new("a"), Column::new("b")], vec![row]);
        assert_eq!(export_csv(&table), "a,b\n,");
    }

    #[test]
    fn test_table_name_from_file() {
        assert_eq!(table_name_from_file("sales.csv"), "sales");
        assert_eq!(table_name_from_file("data/q3.report.csv"), "q3.report");
        assert_eq!(table_name_from_file("README"), "README");
        assert_eq!(table_name_from_file(".hidden"), ".hidden");
    }
}
