//! Core table types
//!
//! A [`Table`] is an ordered list of [`Column`]s plus a list of [`Row`]s.
//! Rows are keyed by column accessor; a key that is absent from a row reads
//! as [`CellValue::Null`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Inferred type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::String => write!(f, "string"),
            ColumnType::Number => write!(f, "number"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Date => write!(f, "date"),
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Key used to read this column's value from a row
    pub accessor: String,

    /// Display label
    pub header: String,

    /// Inferred value type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    /// Create a string column whose header equals its accessor
    pub fn new(accessor: impl Into<String>) -> Self {
        let accessor = accessor.into();
        Self {
            header: accessor.clone(),
            accessor,
            column_type: ColumnType::String,
        }
    }

    /// Set the column type
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }
}

/// A single scalar cell value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

static NULL_CELL: CellValue = CellValue::Null;

impl CellValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Check for null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// String form used when comparing join keys
    ///
    /// Numbers and text compare by their rendered form, so `42` and `"42"`
    /// produce the same key. Null has no string form and only equals null.
    pub fn join_key(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(format_number(*n)),
            Self::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Render a number in its shortest form (`42`, `1.5`)
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // -0 renders as 0
        return "0".to_string();
    }
    value.to_string()
}

/// A table row: accessor -> value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(HashMap<String, CellValue>);

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Value under `accessor`, null when absent
    pub fn get(&self, accessor: &str) -> &CellValue {
        self.0.get(accessor).unwrap_or(&NULL_CELL)
    }

    /// Set a value, replacing any previous one
    pub fn insert(&mut self, accessor: impl Into<String>, value: impl Into<CellValue>) {
        self.0.insert(accessor.into(), value.into());
    }

    /// Whether the row carries an explicit entry for `accessor`
    pub fn contains_key(&self, accessor: &str) -> bool {
        self.0.contains_key(accessor)
    }

    /// Iterate over explicit entries (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CellValue)> {
        self.0.iter()
    }

    /// Number of explicit entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the row has no explicit entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// How a table came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Uploaded,
    Merged,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Uploaded => write!(f, "uploaded"),
            TableKind::Merged => write!(f, "merged"),
        }
    }
}

/// An in-memory table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Unique table identifier (`table-<uuid>` or `merged-<uuid>`)
    pub id: String,

    /// Display name
    pub name: String,

    /// Uploaded or merged
    pub kind: TableKind,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Ordered column definitions
    pub columns: Vec<Column>,

    /// Row data
    pub rows: Vec<Row>,

    /// Source tables of a merge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_table_ids: Option<Vec<String>>,

    /// Number of rows
    pub row_count: usize,
}

impl Table {
    /// Create an uploaded table
    pub fn uploaded(name: impl Into<String>, columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            id: format!("table-{}", Uuid::new_v4()),
            name: name.into(),
            kind: TableKind::Uploaded,
            created_at: Utc::now(),
            row_count: rows.len(),
            columns,
            rows,
            parent_table_ids: None,
        }
    }

    /// Create a merged table recording its source tables
    pub fn merged(
        name: impl Into<String>,
        columns: Vec<Column>,
        rows: Vec<Row>,
        parent_table_ids: Vec<String>,
    ) -> Self {
        Self {
            id: format!("merged-{}", Uuid::new_v4()),
            name: name.into(),
            kind: TableKind::Merged,
            created_at: Utc::now(),
            row_count: rows.len(),
            columns,
            rows,
            parent_table_ids: Some(parent_table_ids),
        }
    }

    /// Look up a column by accessor
    pub fn column(&self, accessor: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.accessor == accessor)
    }

    /// Check if a column with this accessor exists
    pub fn has_column(&self, accessor: &str) -> bool {
        self.column(accessor).is_some()
    }

    /// Column accessors in display order
    pub fn accessors(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.accessor.as_str()).collect()
    }

    /// Column headers in display order
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// First column whose inferred type is numeric
    pub fn first_numeric_column(&self) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.column_type == ColumnType::Number)
    }
}
