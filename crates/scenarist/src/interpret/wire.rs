//! The wire shape for change specifications: what remote models emit
//! and what change files contain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ScenaristError};
use crate::scenario::{ChangeKind, ChangeSpec, MetricChange, MetricSpec};
use crate::table::parse_decimal;

/// One change object as serialized by the intent interpreter or a
/// hand-written changes file. Numbers may arrive as JSON numbers or
/// strings; anything unparseable degrades to "not declared".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireChange {
    /// Value-driver filters, keyed by driver id.
    pub filters: BTreeMap<String, Vec<String>>,
    /// Direct column filters, keyed by column name.
    pub csv_filters: BTreeMap<String, Vec<String>>,

    pub price_change: Option<Value>,
    pub price_change_type: Option<String>,
    pub price_change_range: bool,
    pub price_change_from: Option<Value>,
    pub price_change_to: Option<Value>,
    pub price_change_step: Option<Value>,

    pub availability_change: Option<Value>,
    pub availability_change_type: Option<String>,
    pub availability_change_range: bool,
    pub availability_change_from: Option<Value>,
    pub availability_change_to: Option<Value>,
    pub availability_change_step: Option<Value>,

    pub cost_change: Option<Value>,
    pub cost_change_type: Option<String>,
    pub cost_change_range: bool,
    pub cost_change_from: Option<Value>,
    pub cost_change_to: Option<Value>,
    pub cost_change_step: Option<Value>,
}

impl WireChange {
    /// Convert a typed change specification back to the wire shape,
    /// so interpreted changes can be saved and replayed as a changes
    /// file.
    pub fn from_change_spec(spec: &ChangeSpec) -> Self {
        let mut wire = WireChange {
            filters: spec
                .attribute_filters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_vec()))
                .collect(),
            csv_filters: spec
                .column_filters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_vec()))
                .collect(),
            ..WireChange::default()
        };

        {
            let (value, range, from, to, step, kind) = wire_metric(&spec.price);
            wire.price_change = value;
            wire.price_change_range = range;
            wire.price_change_from = from;
            wire.price_change_to = to;
            wire.price_change_step = step;
            wire.price_change_type = kind;
        }
        {
            let (value, range, from, to, step, kind) = wire_metric(&spec.availability);
            wire.availability_change = value;
            wire.availability_change_range = range;
            wire.availability_change_from = from;
            wire.availability_change_to = to;
            wire.availability_change_step = step;
            wire.availability_change_type = kind;
        }
        {
            let (value, range, from, to, step, kind) = wire_metric(&spec.cost);
            wire.cost_change = value;
            wire.cost_change_range = range;
            wire.cost_change_from = from;
            wire.cost_change_to = to;
            wire.cost_change_step = step;
            wire.cost_change_type = kind;
        }
        wire
    }

    /// Convert into the typed change specification.
    pub fn into_change_spec(self) -> ChangeSpec {
        let price = metric_change(
            self.price_change_range,
            &self.price_change_from,
            &self.price_change_to,
            &self.price_change_step,
            &self.price_change,
            self.price_change_type.as_deref(),
            true,
        );
        let availability = metric_change(
            self.availability_change_range,
            &self.availability_change_from,
            &self.availability_change_to,
            &self.availability_change_step,
            &self.availability_change,
            self.availability_change_type.as_deref(),
            false,
        );
        let cost = metric_change(
            self.cost_change_range,
            &self.cost_change_from,
            &self.cost_change_to,
            &self.cost_change_step,
            &self.cost_change,
            self.cost_change_type.as_deref(),
            false,
        );

        ChangeSpec {
            attribute_filters: self.filters.into_iter().collect(),
            column_filters: self.csv_filters.into_iter().collect(),
            price,
            availability,
            cost,
        }
    }
}

type WireMetric = (
    Option<Value>,
    bool,
    Option<Value>,
    Option<Value>,
    Option<Value>,
    Option<String>,
);

fn wire_metric(change: &MetricChange) -> WireMetric {
    let kind = Some(change.kind.as_str().to_string());
    match change.spec {
        MetricSpec::Absent => (None, false, None, None, None, None),
        MetricSpec::Value(value) => (Some(json_number(value)), false, None, None, None, kind),
        MetricSpec::Range { from, to, step } => (
            None,
            true,
            Some(json_number(from)),
            Some(json_number(to)),
            Some(json_number(step)),
            kind,
        ),
    }
}

fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn metric_change(
    range: bool,
    from: &Option<Value>,
    to: &Option<Value>,
    step: &Option<Value>,
    single: &Option<Value>,
    kind_text: Option<&str>,
    allow_target: bool,
) -> MetricChange {
    let kind = kind_text.map(ChangeKind::parse).unwrap_or_default();
    // Target outside price is a wire-level mistake; degrade quietly.
    let kind = if kind == ChangeKind::Target && !allow_target {
        ChangeKind::Absolute
    } else {
        kind
    };

    if range {
        if let (Some(from), Some(to)) = (wire_number(from), wire_number(to)) {
            return MetricChange::range(from, to, wire_number(step).unwrap_or(1.0), kind);
        }
    }
    match wire_number(single) {
        Some(value) => MetricChange::value(value, kind),
        None => MetricChange::absent(),
    }
}

/// A wire number: a JSON number or a numeric string.
fn wire_number(value: &Option<Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|n| n.is_finite()),
        Some(Value::String(s)) => parse_decimal(s),
        _ => None,
    }
}

/// Extract change specifications from a parsed JSON value.
///
/// Accepts a bare array, an object with a `changes` array, or a single
/// change object; models produce all three shapes.
pub fn changes_from_value(value: &Value) -> Result<Vec<ChangeSpec>> {
    let items: Vec<&Value> = if let Some(array) = value.as_array() {
        array.iter().collect()
    } else if let Some(changes) = value.get("changes") {
        match changes.as_array() {
            Some(array) => array.iter().collect(),
            None => vec![changes],
        }
    } else if value.is_object() {
        vec![value]
    } else {
        return Err(ScenaristError::Interpretation(
            "unexpected change format: expected an array or object".to_string(),
        ));
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<WireChange>(item.clone())
                .map(WireChange::into_change_spec)
                .map_err(ScenaristError::from)
        })
        .collect()
}

/// Parse a changes file (raw JSON bytes).
pub fn changes_from_slice(bytes: &[u8]) -> Result<Vec<ChangeSpec>> {
    let value: Value = serde_json::from_slice(bytes)?;
    changes_from_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_value_change() {
        let specs = changes_from_value(&json!([{
            "filters": {"brand": ["brand_own"]},
            "priceChange": 5,
            "priceChangeType": "Percentage"
        }]))
        .unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].price.spec, MetricSpec::Value(5.0));
        assert_eq!(specs[0].price.kind, ChangeKind::Percentage);
        assert_eq!(
            specs[0].attribute_filters.accepted("brand"),
            Some(&["brand_own".to_string()][..])
        );
    }

    #[test]
    fn test_range_change_with_string_numbers() {
        let specs = changes_from_value(&json!({
            "changes": [{
                "priceChangeRange": true,
                "priceChangeFrom": "5",
                "priceChangeTo": "15",
                "priceChangeStep": "5",
                "priceChangeType": "Percentage"
            }]
        }))
        .unwrap();

        assert_eq!(
            specs[0].price.spec,
            MetricSpec::Range {
                from: 5.0,
                to: 15.0,
                step: 5.0
            }
        );
    }

    #[test]
    fn test_missing_step_defaults_to_one() {
        let specs = changes_from_value(&json!([{
            "costChangeRange": true,
            "costChangeFrom": 1,
            "costChangeTo": 3
        }]))
        .unwrap();

        assert_eq!(
            specs[0].cost.spec,
            MetricSpec::Range {
                from: 1.0,
                to: 3.0,
                step: 1.0
            }
        );
    }

    #[test]
    fn test_target_on_availability_degrades_to_absolute() {
        let specs = changes_from_value(&json!([{
            "availabilityChange": 50,
            "availabilityChangeType": "Target"
        }]))
        .unwrap();
        assert_eq!(specs[0].availability.kind, ChangeKind::Absolute);
    }

    #[test]
    fn test_unparseable_value_is_absent() {
        let specs = changes_from_value(&json!([{
            "priceChange": "lots",
            "csvFilters": {"Region": ["North"]}
        }]))
        .unwrap();

        assert_eq!(specs[0].price.spec, MetricSpec::Absent);
        assert_eq!(
            specs[0].column_filters.accepted("Region"),
            Some(&["North".to_string()][..])
        );
    }

    #[test]
    fn test_single_object_accepted() {
        let specs = changes_from_value(&json!({"priceChange": 1})).unwrap();
        assert_eq!(specs.len(), 1);
    }

    #[test]
    fn test_wire_round_trip() {
        let spec = ChangeSpec::new()
            .with_attribute_filter("brand", ["brand_own"])
            .with_column_filter("Region", ["North"])
            .with_price(MetricChange::value(-2.5, ChangeKind::Target))
            .with_cost(MetricChange::range(1.0, 3.0, 0.5, ChangeKind::Percentage));

        let wire = WireChange::from_change_spec(&spec);
        assert_eq!(wire.into_change_spec(), spec);
    }

    #[test]
    fn test_scalar_is_an_error() {
        assert!(matches!(
            changes_from_value(&json!(42)),
            Err(ScenaristError::Interpretation(_))
        ));
    }
}
