//! Output schema of a join and row composition
//!
//! The plan is computed once per join. Every output row is written through
//! it, so row keys always agree with the column list.

use super::ColumnMapping;
use crate::types::{CellValue, Column, Row, Table};
use std::collections::HashSet;

/// Merged column list plus where each second-table field lands
#[derive(Debug, Clone)]
pub struct ColumnPlan {
    columns: Vec<Column>,
    base_accessors: Vec<String>,
    /// (second-table accessor, output accessor), in second-table column order
    second_fields: Vec<(String, String)>,
}

impl ColumnPlan {
    /// Plan the merged schema of `base` and `second`
    ///
    /// Base columns come first, unchanged. Second-table columns that are
    /// join targets are dropped. A remaining second-table column whose
    /// accessor is already taken is renamed `{table}_{accessor}` with header
    /// `{table} {header}`.
    pub fn new(base: &Table, second: &Table, mapping: &ColumnMapping) -> Self {
        let mut columns = base.columns.clone();
        let mut taken: HashSet<String> = columns.iter().map(|c| c.accessor.clone()).collect();
        let mut second_fields = Vec::new();

        for col in &second.columns {
            if mapping.is_mapped_to(&col.accessor) {
                continue;
            }

            let mut accessor = col.accessor.clone();
            let mut header = col.header.clone();
            while taken.contains(&accessor) {
                accessor = format!("{}_{}", second.name, accessor);
                header = format!("{} {}", second.name, header);
            }

            taken.insert(accessor.clone());
            second_fields.push((col.accessor.clone(), accessor.clone()));
            columns.push(Column {
                accessor,
                header,
                column_type: col.column_type,
            });
        }

        Self {
            base_accessors: base.columns.iter().map(|c| c.accessor.clone()).collect(),
            columns,
            second_fields,
        }
    }

    /// Planned columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Consume the plan, returning the merged columns
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Base row fields plus the second row's non-key fields
    pub fn matched_row(&self, base_row: &Row, second_row: &Row) -> Row {
        let mut row = base_row.clone();
        self.write_second_fields(&mut row, second_row);
        row
    }

    /// Base row fields with every second-table field set to null
    pub fn unmatched_base_row(&self, base_row: &Row) -> Row {
        let mut row = base_row.clone();
        for (_, out) in &self.second_fields {
            row.insert(out.as_str(), CellValue::Null);
        }
        row
    }

    /// Second row fields with base columns null, except base-side join keys
    /// which take the second row's key values
    ///
    /// A mapped base accessor that is not a base column is not written.
    pub fn unmatched_second_row(&self, second_row: &Row, mapping: &ColumnMapping) -> Row {
        let mut row = Row::new();
        for accessor in &self.base_accessors {
            row.insert(accessor.as_str(), CellValue::Null);
        }
        for (base_col, second_col) in mapping.pairs() {
            if self.base_accessors.iter().any(|a| a == base_col) {
                row.insert(base_col, second_row.get(second_col).clone());
            }
        }
        self.write_second_fields(&mut row, second_row);
        row
    }

    fn write_second_fields(&self, row: &mut Row, second_row: &Row) {
        for (second_accessor, out) in &self.second_fields {
            row.insert(out.as_str(), second_row.get(second_accessor).clone());
        }
    }
}
