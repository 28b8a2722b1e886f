//! Filter sets and row-membership evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{AttributeIndex, AttributeSet};
use crate::table::{COL_PRODUCT_NAME, COL_VARIANT_ID, Row};

/// A mapping from filter key to accepted values.
///
/// Keys are value-driver ids for attribute filters or literal column
/// names for column filters. An empty accepted list (or an absent key)
/// places no constraint; a set with zero populated keys matches every
/// row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<String, Vec<String>>);

impl FilterSet {
    /// Create an empty (match-everything) filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: accept the given values for a key.
    pub fn allow<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert(key, values.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the accepted values for a key.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.0.insert(key.into(), values);
    }

    /// Accepted values for a key, if present.
    pub fn accepted(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Keys that actually constrain rows (non-empty accepted lists).
    pub fn constrained(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Whether this set places no constraint at all.
    pub fn is_unconstrained(&self) -> bool {
        self.constrained().next().is_none()
    }

    /// Union-merge another set into this one. Accepted lists are
    /// de-duplicated and sorted so merge order never shows in output.
    pub fn merge_from(&mut self, other: &FilterSet) {
        for (key, values) in &other.0 {
            let entry = self.0.entry(key.clone()).or_default();
            for value in values {
                if !entry.contains(value) {
                    entry.push(value.clone());
                }
            }
            entry.sort();
        }
    }

    /// Iterate over all keys, constrained or not.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K: Into<String>, const N: usize> From<[(K, Vec<String>); N]> for FilterSet {
    fn from(entries: [(K, Vec<String>); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for FilterSet {
    fn from_iter<T: IntoIterator<Item = (K, Vec<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Which index key a row is resolved through for attribute filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    /// Resolve via `Product Name` and the by-name index (scenario
    /// creation path; names carry merged variant attributes).
    ProductName,
    /// Resolve via `Product Variant Id` and the by-id index
    /// (interactive filtering path).
    VariantId,
}

/// Decides row membership for a pair of column + attribute filter sets.
pub struct FilterEvaluator<'a> {
    index: &'a AttributeIndex,
}

impl<'a> FilterEvaluator<'a> {
    /// Create an evaluator over a built attribute index.
    pub fn new(index: &'a AttributeIndex) -> Self {
        Self { index }
    }

    /// Evaluate one row.
    ///
    /// Column filters run first and short-circuit; attribute filters
    /// are only consulted when every column filter passes. A row whose
    /// product cannot be resolved in the index fails any populated
    /// attribute filter but still passes the no-filter case.
    pub fn matches(
        &self,
        row: &Row,
        column_filters: &FilterSet,
        attribute_filters: &FilterSet,
        key: LookupKey,
    ) -> bool {
        if !column_filters_pass(row, column_filters) {
            return false;
        }
        if attribute_filters.is_unconstrained() {
            return true;
        }

        let attributes = match key {
            LookupKey::ProductName => row
                .get(COL_PRODUCT_NAME)
                .and_then(|cell| self.index.attributes_for_name(&cell.to_string())),
            LookupKey::VariantId => row
                .get(COL_VARIANT_ID)
                .and_then(|cell| self.index.attributes_for_id(&cell.to_string())),
        };
        let Some(attributes) = attributes else {
            return false;
        };
        attribute_filters_pass(attributes, attribute_filters)
    }
}

fn column_filters_pass(row: &Row, filters: &FilterSet) -> bool {
    for (column, accepted) in filters.constrained() {
        let Some(value) = row.get(column) else {
            return false;
        };
        let value = value.to_string();
        if !accepted.iter().any(|a| *a == value) {
            return false;
        }
    }
    true
}

fn attribute_filters_pass(attributes: &AttributeSet, filters: &FilterSet) -> bool {
    for (driver, accepted) in filters.constrained() {
        match attributes.get(driver) {
            Some(value) if value.matches_any(accepted) => {}
            _ => return false,
        }
    }
    true
}
