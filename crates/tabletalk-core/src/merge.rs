//! Merge orchestration
//!
//! Turns a [`MergeRequest`] plus already-resolved source tables into a new
//! merged [`Table`]. Registration is left to the caller so a failed merge
//! never leaves anything behind.

use crate::error::{TabletalkError, TabletalkResult};
use crate::join::{self, ColumnMapping, JoinKind, JoinOutput};
use crate::types::{Column, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// How the source tables are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Relational join of the first two tables
    #[default]
    Join,
    /// Union of columns and concatenation of rows across all tables
    ByColumns,
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::Join => write!(f, "join"),
            MergeStrategy::ByColumns => write!(f, "by-columns"),
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = TabletalkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "join" => Ok(MergeStrategy::Join),
            "by-columns" | "by_columns" | "union" => Ok(MergeStrategy::ByColumns),
            other => Err(TabletalkError::invalid_input(format!(
                "Unknown merge strategy '{}', expected join or by-columns",
                other
            ))),
        }
    }
}

/// A merge invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    /// Source tables, base first
    pub table_ids: Vec<String>,

    /// Name of the merged table; blank picks a default
    #[serde(default)]
    pub name: String,

    /// Join kind used by [`MergeStrategy::Join`]
    #[serde(default)]
    pub join_kind: JoinKind,

    /// Key pairs used by [`MergeStrategy::Join`]
    #[serde(default)]
    pub column_mappings: ColumnMapping,

    /// Join or union-all
    #[serde(default)]
    pub strategy: MergeStrategy,
}

impl MergeRequest {
    /// Create a join request over `table_ids`
    pub fn new<I, S>(table_ids: I, name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table_ids: table_ids.into_iter().map(Into::into).collect(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the join kind
    pub fn with_join_kind(mut self, kind: JoinKind) -> Self {
        self.join_kind = kind;
        self
    }

    /// Set the key pairs
    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.column_mappings = mapping;
        self
    }

    /// Set the strategy
    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Default name offered when two tables are picked for a merge
pub fn suggested_merge_name(first: &str, second: &str) -> String {
    format!("{} + {}", first, second)
}

/// Build the merged table from resolved `sources`
///
/// `sources` must be in request order. `name` is used verbatim; the caller
/// resolves blank names.
pub fn merge_tables(
    sources: &[&Table],
    name: &str,
    request: &MergeRequest,
) -> TabletalkResult<Table> {
    if sources.len() < 2 {
        return Err(TabletalkError::InsufficientTables {
            found: sources.len(),
        });
    }

    let output = match request.strategy {
        MergeStrategy::Join => {
            join::join_leading_pair(sources, request.join_kind, &request.column_mappings)?
        }
        MergeStrategy::ByColumns => union_by_columns(sources),
    };

    let parent_ids = sources.iter().map(|t| t.id.clone()).collect();
    let table = Table::merged(name, output.columns, output.rows, parent_ids);

    info!(
        "Merged {} table(s) into '{}' ({} strategy, {} rows)",
        sources.len(),
        table.name,
        request.strategy,
        table.row_count
    );

    Ok(table)
}

/// Union-all: every column of every table, every row of every table
///
/// Columns are unioned by accessor in first-seen order and keep the type of
/// their first occurrence. Rows are copied as-is, so columns a row's table
/// lacks read as null.
pub fn union_by_columns(tables: &[&Table]) -> JoinOutput {
    let mut seen = HashSet::new();
    let mut columns: Vec<Column> = Vec::new();
    for table in tables {
        for col in &table.columns {
            if seen.insert(col.accessor.clone()) {
                columns.push(col.clone());
            }
        }
    }

    let rows = tables
        .iter()
        .flat_map(|t| t.rows.iter().cloned())
        .collect();

    JoinOutput { columns, rows }
}
