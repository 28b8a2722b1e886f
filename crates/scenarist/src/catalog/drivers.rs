//! Value-driver extraction: every filterable attribute dimension and
//! the values it takes across the catalog.

use std::collections::{BTreeMap, BTreeSet};

use super::index::{direct_attributes, variant_effective};
use super::model::Product;

/// Driver id → sorted, de-duplicated value ids observed anywhere in the
/// catalog. Drives filter UIs and validates filter keys.
pub type ValueDriverMap = BTreeMap<String, Vec<String>>;

/// Collect every value id per driver across products and variant
/// effective attribute sets (aggregations included, normalized).
///
/// Deterministic and idempotent: the map is sorted by driver id and
/// each value list is sorted lexicographically. Drivers that never
/// yield a valid value are omitted entirely.
pub fn extract_value_drivers(catalog: &[Product]) -> ValueDriverMap {
    let mut observed: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    let mut record = |driver: &str, value: &str| {
        if driver.is_empty() || value.is_empty() {
            return;
        }
        observed
            .entry(driver.to_string())
            .or_default()
            .insert(value.to_string());
    };

    for product in catalog {
        let product_attrs = direct_attributes(product);
        for (driver, value) in &product_attrs {
            record(driver, value);
        }
        for variant in &product.variants {
            for (driver, value) in variant_effective(&product_attrs, variant) {
                record(&driver, &value);
            }
        }
    }

    observed
        .into_iter()
        .map(|(driver, values)| (driver, values.into_iter().collect()))
        .collect()
}
