//! Catalog entry model: products, variants, attributes.
//!
//! The product master arrives as JSON from an external system and is
//! parsed leniently: entries with missing or non-string fields are
//! dropped piecemeal, never reported as errors. A fully malformed
//! catalog is simply an empty one.

use indexmap::IndexMap;
use serde_json::Value;

/// One product attribute: a value-driver dimension and the value id it
/// takes (e.g. `brand` → `brand_competitor_01`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub value_driver_id: String,
    pub value_id: String,
}

impl Attribute {
    /// Create an attribute pair.
    pub fn new(value_driver_id: impl Into<String>, value_id: impl Into<String>) -> Self {
        Self {
            value_driver_id: value_driver_id.into(),
            value_id: value_id.into(),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let driver = non_empty_string(value.get("valueDriverReferenceId")?)?;
        let value_id = non_empty_string(value.get("referenceId")?)?;
        Some(Self::new(driver, value_id))
    }
}

/// A sellable unit of a product. Inherits the parent product's
/// attributes; its own attributes and aggregations overlay them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variant {
    pub reference_id: Option<String>,
    pub attributes: Vec<Attribute>,
    /// Raw aggregation scalars keyed by driver id (e.g. pack size).
    /// Normalized into value ids at indexing time.
    pub aggregations: IndexMap<String, Value>,
}

impl Variant {
    /// Create a variant with the given identifier.
    pub fn new(reference_id: impl Into<String>) -> Self {
        Self {
            reference_id: Some(reference_id.into()),
            attributes: Vec::new(),
            aggregations: IndexMap::new(),
        }
    }

    /// Add an attribute override.
    pub fn with_attribute(
        mut self,
        driver: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes.push(Attribute::new(driver, value));
        self
    }

    /// Add a raw aggregation entry.
    pub fn with_aggregation(mut self, driver: impl Into<String>, raw: Value) -> Self {
        self.aggregations.insert(driver.into(), raw);
        self
    }

    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let aggregations = obj
            .get("aggregations")
            .and_then(Value::as_object)
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        Some(Self {
            reference_id: obj.get("referenceId").and_then(non_empty_string),
            attributes: attributes_from(obj.get("attributes")),
            aggregations,
        })
    }
}

/// A catalog entry: identifier, display name, direct attributes, and
/// zero or more variants.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Product {
    pub reference_id: Option<String>,
    pub name: Option<String>,
    pub attributes: Vec<Attribute>,
    pub variants: Vec<Variant>,
}

impl Product {
    /// Create a product with an identifier and display name.
    pub fn new(reference_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            reference_id: Some(reference_id.into()),
            name: Some(name.into()),
            attributes: Vec::new(),
            variants: Vec::new(),
        }
    }

    /// Add a direct attribute.
    pub fn with_attribute(
        mut self,
        driver: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes.push(Attribute::new(driver, value));
        self
    }

    /// Add a variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Build a product from a raw JSON value, dropping malformed parts.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            reference_id: obj.get("referenceId").and_then(non_empty_string),
            name: obj.get("name").and_then(non_empty_string),
            attributes: attributes_from(obj.get("attributes")),
            variants: obj
                .get("variants")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(Variant::from_value).collect())
                .unwrap_or_default(),
        })
    }
}

/// Parse a raw product-master JSON value into catalog entries.
///
/// Anything that is not an array yields an empty catalog; array items
/// that are not objects are skipped.
pub fn parse_catalog(value: &Value) -> Vec<Product> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Product::from_value).collect())
        .unwrap_or_default()
}

fn attributes_from(value: Option<&Value>) -> Vec<Attribute> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Attribute::from_value).collect())
        .unwrap_or_default()
}

fn non_empty_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
