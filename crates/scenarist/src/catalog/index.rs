//! Attribute indexing: fast per-row lookup of effective product
//! attributes, keyed by variant/product id and by display name.
//!
//! Built once per catalog load and read-only afterwards, so an index
//! can be shared freely across any number of filter or transform
//! passes.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::model::{Product, Variant};

/// The value(s) a driver takes for one product.
///
/// `Many` carries the ambiguous-driver case: a display name whose
/// variants disagree on a driver keeps every distinct value id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Single(String),
    Many(Vec<String>),
}

impl AttributeValue {
    /// Whether any of this attribute's values is in the accepted list.
    pub fn matches_any(&self, accepted: &[String]) -> bool {
        match self {
            AttributeValue::Single(v) => accepted.iter().any(|a| a == v),
            AttributeValue::Many(vs) => vs.iter().any(|v| accepted.iter().any(|a| a == v)),
        }
    }

    /// All value ids carried by this attribute.
    pub fn values(&self) -> &[String] {
        match self {
            AttributeValue::Single(v) => std::slice::from_ref(v),
            AttributeValue::Many(vs) => vs.as_slice(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            AttributeValue::Single(existing) => {
                if *existing != value {
                    let first = std::mem::take(existing);
                    *self = AttributeValue::Many(vec![first, value]);
                }
            }
            AttributeValue::Many(vs) => {
                if !vs.contains(&value) {
                    vs.push(value);
                }
            }
        }
    }
}

/// Effective attribute set for one product or variant: driver id →
/// value(s).
pub type AttributeSet = BTreeMap<String, AttributeValue>;

/// By-name index entry: the merged attribute set plus the source
/// catalog entry it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct NameEntry {
    pub attributes: AttributeSet,
    pub product: Product,
}

/// Read-only lookup structures over a catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeIndex {
    by_id: HashMap<String, AttributeSet>,
    by_name: HashMap<String, NameEntry>,
}

impl AttributeIndex {
    /// Build both lookup maps from a catalog.
    ///
    /// Products and variants with missing identifiers or names simply
    /// do not appear under the corresponding key; nothing errors.
    pub fn build(catalog: &[Product]) -> Self {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();

        for product in catalog {
            let product_attrs = direct_attributes(product);

            if let Some(id) = &product.reference_id {
                by_id.insert(id.clone(), to_attribute_set(&product_attrs));
            }

            let mut merged = AttributeSet::new();
            if product.variants.is_empty() {
                merged = to_attribute_set(&product_attrs);
            }
            for variant in &product.variants {
                let effective = variant_effective(&product_attrs, variant);
                if let Some(id) = &variant.reference_id {
                    by_id.insert(id.clone(), to_attribute_set(&effective));
                }
                for (driver, value) in effective {
                    merged
                        .entry(driver)
                        .and_modify(|existing| existing.push(value.clone()))
                        .or_insert(AttributeValue::Single(value));
                }
            }

            if let Some(name) = &product.name {
                // Duplicate display names: last entry wins.
                by_name.insert(
                    name.clone(),
                    NameEntry {
                        attributes: merged,
                        product: product.clone(),
                    },
                );
            }
        }

        Self { by_id, by_name }
    }

    /// Effective attributes for a variant or product id.
    pub fn attributes_for_id(&self, id: &str) -> Option<&AttributeSet> {
        self.by_id.get(id)
    }

    /// Index entry for a product display name.
    pub fn entry_for_name(&self, name: &str) -> Option<&NameEntry> {
        self.by_name.get(name)
    }

    /// Merged attributes for a product display name.
    pub fn attributes_for_name(&self, name: &str) -> Option<&AttributeSet> {
        self.by_name.get(name).map(|entry| &entry.attributes)
    }

    /// Number of id-keyed entries.
    pub fn id_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of name-keyed entries.
    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }
}

/// Normalize one aggregation entry into a value id.
///
/// The raw scalar is stringified; if it already starts with
/// `"{driver}_"` it is used verbatim, otherwise the prefix is
/// synthesized. Null and empty entries are skipped. The prefix test is
/// plain string matching and can misfire on accidental shared prefixes;
/// a known limitation of the data format.
pub(crate) fn normalize_aggregation(driver: &str, raw: &Value) -> Option<String> {
    let text = match raw {
        Value::Null => return None,
        Value::String(s) if s.is_empty() => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => return None,
    };
    if text.starts_with(&format!("{driver}_")) {
        Some(text)
    } else {
        Some(format!("{driver}_{text}"))
    }
}

/// A product's own attributes as a scalar driver → value map.
pub(crate) fn direct_attributes(product: &Product) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();
    for attr in &product.attributes {
        attrs.insert(attr.value_driver_id.clone(), attr.value_id.clone());
    }
    attrs
}

/// A variant's effective attributes: parent attributes overlaid with
/// the variant's own, then with its normalized aggregations.
pub(crate) fn variant_effective(
    product_attrs: &BTreeMap<String, String>,
    variant: &Variant,
) -> BTreeMap<String, String> {
    let mut attrs = product_attrs.clone();
    for attr in &variant.attributes {
        attrs.insert(attr.value_driver_id.clone(), attr.value_id.clone());
    }
    for (driver, raw) in &variant.aggregations {
        if driver.is_empty() {
            continue;
        }
        if let Some(value) = normalize_aggregation(driver, raw) {
            attrs.insert(driver.clone(), value);
        }
    }
    attrs
}

fn to_attribute_set(attrs: &BTreeMap<String, String>) -> AttributeSet {
    attrs
        .iter()
        .map(|(driver, value)| (driver.clone(), AttributeValue::Single(value.clone())))
        .collect()
}
