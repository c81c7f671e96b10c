//! Rule-based table assistant
//!
//! Answers a handful of fixed question shapes about one table. Rules are
//! checked in order against the lowercased message and the first hit wins.

use crate::types::{CellValue, Column, Table, format_number};
use once_cell::sync::Lazy;
use regex::Regex;

const HELP: &str = "I'm your AI data assistant. You can ask me questions about this table such as counting rows, finding column information, calculating averages, or finding maximum values.";

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    RowCount,
    Columns,
    Average,
    Maximum,
}

const RULES: [(Rule, &[&str]); 4] = [
    (Rule::RowCount, &["how many"]),
    (Rule::Columns, &["column", "fields"]),
    (Rule::Average, &["average", "mean"]),
    (Rule::Maximum, &["max"]),
];

/// Answer `message` about `table`
pub fn answer(message: &str, table: &Table) -> String {
    let lowered = message.to_lowercase();
    let rule = RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| lowered.contains(n)))
        .map(|(rule, _)| *rule);

    match rule {
        Some(Rule::RowCount) => format!("There are {} rows in this table.", table.row_count),
        Some(Rule::Columns) => format!(
            "The table has the following columns: {}.",
            table.headers().join(", ")
        ),
        Some(Rule::Average) => average(table),
        Some(Rule::Maximum) => maximum(table),
        None => HELP.to_string(),
    }
}

fn average(table: &Table) -> String {
    let Some(column) = table.first_numeric_column() else {
        return "I couldn't find a numeric column to calculate the average.".to_string();
    };
    if table.row_count == 0 {
        return format!("There are no rows to calculate the average of {}.", column.header);
    }
    let sum: f64 = column_values(table, column).sum();
    let avg = sum / table.row_count as f64;
    format!("The average of {} is {}.", column.header, two_decimals(avg))
}

/// Two decimal places with exact ties rounded away from zero
///
/// `{:.2}` rounds the exact binary value half-to-even, so only exact ties
/// (`0.625`, `0.125`) need help: they are nudged one ulp away from zero.
fn two_decimals(value: f64) -> String {
    let exact = format!("{:.60}", value.abs());
    let is_tie = exact
        .split_once('.')
        .map(|(_, frac)| frac[2..].starts_with('5') && frac[3..].bytes().all(|b| b == b'0'))
        .unwrap_or(false);

    if is_tie {
        let nudged = f64::from_bits(value.abs().to_bits() + 1);
        format!("{:.2}", nudged.copysign(value))
    } else {
        format!("{:.2}", value)
    }
}

fn maximum(table: &Table) -> String {
    let Some(column) = table.first_numeric_column() else {
        return "I couldn't find a numeric column to calculate the maximum value.".to_string();
    };
    let Some(max) = column_values(table, column).reduce(f64::max) else {
        return format!("There are no rows to find the maximum value of {}.", column.header);
    };
    format!("The maximum value in {} is {}.", column.header, format_number(max))
}

fn column_values<'a>(table: &'a Table, column: &'a Column) -> impl Iterator<Item = f64> + 'a {
    table
        .rows
        .iter()
        .map(move |row| lenient_number(row.get(&column.accessor)).unwrap_or(0.0))
}

/// Leading-prefix number parse: `"12abc"` is 12, `"abc"` is nothing
fn lenient_number(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => LEADING_NUMBER
            .find(s.trim_start())
            .and_then(|m| m.as_str().parse::<f64>().ok()),
        CellValue::Bool(_) | CellValue::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::parse_csv;

    fn table(csv: &str) -> Table {
        let parsed = parse_csv(csv);
        Table::uploaded("t", parsed.columns, parsed.rows)
    }

    #[test]
    fn test_how_many() {
        let t = table("a\n1\n2\n3\n4\n5");
        assert_eq!(answer("How many rows?", &t), "There are 5 rows in this table.");
    }

    #[test]
    fn test_columns() {
        let t = table("id,name,score\n1,a,2");
        assert_eq!(
            answer("Which FIELDS exist?", &t),
            "The table has the following columns: id, name, score."
        );
    }

    #[test]
    fn test_first_rule_wins() {
        let t = table("id,score\n1,2");
        // mentions both "how many" and "column"
        assert_eq!(answer("how many columns?", &t), "There are 1 rows in this table.");
        // "maximum" contains "max" but "mean" is checked first
        assert!(answer("mean or maximum", &t).starts_with("The average of id"));
    }

    #[test]
    fn test_average_uses_first_numeric_column() {
        let t = table("name,price,qty\na,10,1\nb,20,1\nc,x,1");
        // non-numeric "x" counts as 0 and the divisor is the row count
        assert_eq!(answer("what is the average?", &t), "The average of price is 10.00.");
    }

    #[test]
    fn test_average_ties_round_away_from_zero() {
        // 5 / 8 = 0.625 exactly
        let t = table("v\n5\n0\n0\n0\n0\n0\n0\n0");
        assert_eq!(answer("average", &t), "The average of v is 0.63.");

        // 1 / 8 = 0.125 exactly
        let t = table("v\n1\n0\n0\n0\n0\n0\n0\n0");
        assert_eq!(answer("mean?", &t), "The average of v is 0.13.");
    }

    #[test]
    fn test_two_decimals() {
        assert_eq!(two_decimals(0.625), "0.63");
        assert_eq!(two_decimals(-0.625), "-0.63");
        assert_eq!(two_decimals(2.5), "2.50");
        // 1.005 is stored just below the tie
        assert_eq!(two_decimals(1.005), "1.00");
        assert_eq!(two_decimals(10.0 / 3.0), "3.33");
        assert_eq!(two_decimals(0.0), "0.00");
    }

    #[test]
    fn test_average_without_numeric_column() {
        let t = table("name\na");
        assert_eq!(
            answer("average please", &t),
            "I couldn't find a numeric column to calculate the average."
        );
    }

    #[test]
    fn test_zero_rows_are_guarded() {
        let mut t = table("v\n1");
        t.rows.clear();
        t.row_count = 0;
        assert_eq!(answer("average", &t), "There are no rows to calculate the average of v.");
        assert_eq!(answer("max", &t), "There are no rows to find the maximum value of v.");
    }

    #[test]
    fn test_max() {
        let t = table("v\n3\n17.5\n-2");
        assert_eq!(answer("MAX value?", &t), "The maximum value in v is 17.5.");

        let t = table("v\n-3\n-1");
        assert_eq!(answer("max", &t), "The maximum value in v is -1.");
    }

    #[test]
    fn test_help_fallback() {
        let t = table("v\n1");
        assert_eq!(answer("hello there", &t), HELP);
    }

    #[test]
    fn test_lenient_number() {
        assert_eq!(lenient_number(&CellValue::text("12abc")), Some(12.0));
        assert_eq!(lenient_number(&CellValue::text("  -1.5e2x")), Some(-150.0));
        assert_eq!(lenient_number(&CellValue::text(".5")), Some(0.5));
        assert_eq!(lenient_number(&CellValue::text("abc")), None);
        assert_eq!(lenient_number(&CellValue::Null), None);
    }
}
