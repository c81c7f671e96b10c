//! Relational join engine
//!
//! Joins a base table with a second table on one or more equi-join key
//! pairs. Keys compare by their string form (see [`CellValue::join_key`]),
//! and every pair in the [`ColumnMapping`] must match for two rows to join.
//! An empty mapping matches every pair of rows.
//!
//! [`CellValue::join_key`]: crate::types::CellValue::join_key

mod index;
mod mapping;
mod plan;

pub use mapping::ColumnMapping;
pub use plan::ColumnPlan;

use crate::error::{TabletalkError, TabletalkResult};
use crate::types::{Column, Row, Table};
use index::KeyIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Join kind selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Outer,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "inner"),
            JoinKind::Left => write!(f, "left"),
            JoinKind::Right => write!(f, "right"),
            JoinKind::Outer => write!(f, "outer"),
        }
    }
}

impl FromStr for JoinKind {
    type Err = TabletalkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inner" => Ok(JoinKind::Inner),
            "left" => Ok(JoinKind::Left),
            "right" => Ok(JoinKind::Right),
            "outer" => Ok(JoinKind::Outer),
            other => Err(TabletalkError::invalid_input(format!(
                "Unknown join kind '{}', expected one of inner, left, right, outer",
                other
            ))),
        }
    }
}

/// Columns and rows produced by a join
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinOutput {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// Join `base` with `second`
pub fn join_tables(
    base: &Table,
    second: &Table,
    kind: JoinKind,
    mapping: &ColumnMapping,
) -> JoinOutput {
    if mapping.is_empty() {
        warn!(
            "Joining '{}' with '{}' without key columns produces a cross product",
            base.name, second.name
        );
    }
    for (base_col, second_col) in mapping.pairs() {
        if !base.has_column(base_col) {
            warn!("Join key '{}' is not a column of '{}'", base_col, base.name);
        }
        if !second.has_column(second_col) {
            warn!("Join key '{}' is not a column of '{}'", second_col, second.name);
        }
    }

    let plan = ColumnPlan::new(base, second, mapping);
    let rows = match kind {
        JoinKind::Inner => inner_rows(base, second, mapping, &plan),
        JoinKind::Left => left_rows(base, second, mapping, &plan),
        JoinKind::Right => right_rows(base, second, mapping, &plan),
        JoinKind::Outer => outer_rows(base, second, mapping, &plan),
    };

    debug!(
        "{} join of '{}' ({} rows) and '{}' ({} rows) produced {} rows",
        kind,
        base.name,
        base.rows.len(),
        second.name,
        second.rows.len(),
        rows.len()
    );

    JoinOutput {
        columns: plan.into_columns(),
        rows,
    }
}

/// Join the first two tables of `tables`, ignoring any others
pub fn join_leading_pair(
    tables: &[&Table],
    kind: JoinKind,
    mapping: &ColumnMapping,
) -> TabletalkResult<JoinOutput> {
    match tables {
        [base, second, ..] => Ok(join_tables(base, second, kind, mapping)),
        _ => Err(TabletalkError::InsufficientTables {
            found: tables.len(),
        }),
    }
}

fn second_index(second: &Table, mapping: &ColumnMapping) -> KeyIndex {
    let keys: Vec<&str> = mapping.pairs().map(|(_, s)| s).collect();
    KeyIndex::build(&second.rows, &keys)
}

fn base_index(base: &Table, mapping: &ColumnMapping) -> KeyIndex {
    let keys: Vec<&str> = mapping.pairs().map(|(b, _)| b).collect();
    KeyIndex::build(&base.rows, &keys)
}

fn inner_rows(base: &Table, second: &Table, mapping: &ColumnMapping, plan: &ColumnPlan) -> Vec<Row> {
    let index = second_index(second, mapping);
    let base_keys: Vec<&str> = mapping.pairs().map(|(b, _)| b).collect();

    let mut rows = Vec::new();
    for base_row in &base.rows {
        for &i in index.lookup(base_row, &base_keys) {
            rows.push(plan.matched_row(base_row, &second.rows[i]));
        }
    }
    rows
}

fn left_rows(base: &Table, second: &Table, mapping: &ColumnMapping, plan: &ColumnPlan) -> Vec<Row> {
    let index = second_index(second, mapping);
    let base_keys: Vec<&str> = mapping.pairs().map(|(b, _)| b).collect();

    let mut rows = Vec::new();
    for base_row in &base.rows {
        let matches = index.lookup(base_row, &base_keys);
        if matches.is_empty() {
            rows.push(plan.unmatched_base_row(base_row));
        } else {
            for &i in matches {
                rows.push(plan.matched_row(base_row, &second.rows[i]));
            }
        }
    }
    rows
}

fn right_rows(base: &Table, second: &Table, mapping: &ColumnMapping, plan: &ColumnPlan) -> Vec<Row> {
    let index = base_index(base, mapping);
    let second_keys: Vec<&str> = mapping.pairs().map(|(_, s)| s).collect();

    let mut rows = Vec::new();
    for second_row in &second.rows {
        let matches = index.lookup(second_row, &second_keys);
        if matches.is_empty() {
            rows.push(plan.unmatched_second_row(second_row, mapping));
        } else {
            for &i in matches {
                rows.push(plan.matched_row(&base.rows[i], second_row));
            }
        }
    }
    rows
}

fn outer_rows(base: &Table, second: &Table, mapping: &ColumnMapping, plan: &ColumnPlan) -> Vec<Row> {
    let mut rows = left_rows(base, second, mapping, plan);

    let index = base_index(base, mapping);
    let second_keys: Vec<&str> = mapping.pairs().map(|(_, s)| s).collect();
    for second_row in &second.rows {
        if index.lookup(second_row, &second_keys).is_empty() {
            rows.push(plan.unmatched_second_row(second_row, mapping));
        }
    }
    rows
}
