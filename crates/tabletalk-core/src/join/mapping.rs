//! Equi-join key pairs

use crate::error::{TabletalkError, TabletalkResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base-table accessor -> second-table accessor pairs
///
/// Each base accessor appears at most once. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, String>);

impl ColumnMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from pairs; a repeated base accessor keeps the last pair
    pub fn from_pairs<B, S>(pairs: impl IntoIterator<Item = (B, S)>) -> Self
    where
        B: Into<String>,
        S: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(b, s)| (b.into(), s.into()))
                .collect(),
        )
    }

    /// Add or replace the pair for `base_accessor`
    pub fn insert(&mut self, base_accessor: impl Into<String>, second_accessor: impl Into<String>) {
        self.0.insert(base_accessor.into(), second_accessor.into());
    }

    /// Parse a `BASE=SECOND` pair
    pub fn parse_pair(pair: &str) -> TabletalkResult<(String, String)> {
        let (base, second) = pair.split_once('=').ok_or_else(|| {
            TabletalkError::invalid_input(format!(
                "Column mapping '{}' must look like BASE=SECOND",
                pair
            ))
        })?;
        let (base, second) = (base.trim(), second.trim());
        if base.is_empty() || second.is_empty() {
            return Err(TabletalkError::invalid_input(format!(
                "Column mapping '{}' has an empty side",
                pair
            )));
        }
        Ok((base.to_string(), second.to_string()))
    }

    /// Iterate over `(base, second)` pairs
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(b, s)| (b.as_str(), s.as_str()))
    }

    /// Whether `accessor` is the second-table side of some pair
    pub fn is_mapped_to(&self, accessor: &str) -> bool {
        self.0.values().any(|s| s == accessor)
    }

    /// Second-table accessor paired with `base_accessor`
    pub fn second_for(&self, base_accessor: &str) -> Option<&str> {
        self.0.get(base_accessor).map(String::as_str)
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check for an empty mapping
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<B: Into<String>, S: Into<String>> FromIterator<(B, S)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (B, S)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            ColumnMapping::parse_pair(" customer_id = id ").unwrap(),
            ("customer_id".to_string(), "id".to_string())
        );
        assert!(ColumnMapping::parse_pair("customer_id").is_err());
        assert!(ColumnMapping::parse_pair("=id").is_err());
    }

    #[test]
    fn test_last_pair_wins() {
        let mapping = ColumnMapping::from_pairs([("a", "x"), ("a", "y")]);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.second_for("a"), Some("y"));
        assert!(mapping.is_mapped_to("y"));
        assert!(!mapping.is_mapped_to("x"));
    }

    #[test]
    fn test_json_object_shape() {
        let mapping: ColumnMapping = serde_json::from_str(r#"{"id":"customer_id"}"#).unwrap();
        assert_eq!(mapping.second_for("id"), Some("customer_id"));
        assert_eq!(serde_json::to_string(&mapping).unwrap(), r#"{"id":"customer_id"}"#);
    }
}
