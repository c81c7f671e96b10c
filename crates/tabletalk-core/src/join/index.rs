//! Hash index over join keys
//!
//! Buckets row positions by their composite key. Positions inside a bucket
//! stay in row order, so probing yields matches in the same order as a
//! nested-loop scan would.

use crate::types::Row;
use std::collections::HashMap;

type JoinKey = Vec<Option<String>>;

pub(super) struct KeyIndex {
    buckets: HashMap<JoinKey, Vec<usize>>,
}

impl KeyIndex {
    /// Index `rows` by the values under `accessors`
    pub(super) fn build(rows: &[Row], accessors: &[&str]) -> Self {
        let mut buckets: HashMap<JoinKey, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            buckets.entry(make_key(row, accessors)).or_default().push(idx);
        }
        Self { buckets }
    }

    /// Positions of indexed rows whose key equals `row`'s key under `accessors`
    pub(super) fn lookup(&self, row: &Row, accessors: &[&str]) -> &[usize] {
        self.buckets
            .get(&make_key(row, accessors))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn make_key(row: &Row, accessors: &[&str]) -> JoinKey {
    accessors.iter().map(|a| row.get(a).join_key()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_lookup_preserves_row_order() {
        let rows = vec![
            row(&[("k", CellValue::Number(1.0))]),
            row(&[("k", CellValue::Number(2.0))]),
            row(&[("k", CellValue::text("1"))]),
        ];
        let index = KeyIndex::build(&rows, &["k"]);

        let other_row = row(&[("id", CellValue::text("1"))]);
        assert_eq!(index.lookup(&other_row, &["id"]), &[0, 2]);

        let miss = row(&[("id", CellValue::text("7"))]);
        assert!(index.lookup(&miss, &["id"]).is_empty());
    }

    #[test]
    fn test_empty_key_matches_everything() {
        let rows = vec![Row::new(), Row::new()];
        let index = KeyIndex::build(&rows, &[]);
        assert_eq!(index.lookup(&Row::new(), &[]), &[0, 1]);
    }
}
