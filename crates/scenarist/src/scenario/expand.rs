//! Change-set expansion: merge filters across specifications and take
//! the cartesian product of per-metric value sets.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScenaristError};

use super::change::{ChangeKind, ChangeSpec, Metric, MetricSpec};
use super::filter::FilterSet;

/// Tolerance for the inclusive upper bound of range enumeration, so
/// accumulated floating-point steps still reach `to`.
const RANGE_EPSILON: f64 = 1e-9;

/// What to do when multiple specifications disagree on a metric's
/// change kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindConflict {
    /// The first specification that declared the metric wins.
    #[default]
    FirstWins,
    /// Disagreement is a validation error.
    Reject,
}

/// Options for [`expand_changes`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandOptions {
    pub kind_conflict: KindConflict,
}

/// One resolved metric value with its change kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricParam {
    pub value: f64,
    pub kind: ChangeKind,
}

/// One fully resolved point of the expansion: merged filters and at
/// most one value per metric. Consumed immediately by the row
/// transformer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub attribute_filters: FilterSet,
    pub column_filters: FilterSet,
    pub price: Option<MetricParam>,
    pub availability: Option<MetricParam>,
    pub cost: Option<MetricParam>,
}

impl ScenarioParams {
    /// The resolved value for a metric, if any.
    pub fn metric(&self, metric: Metric) -> Option<&MetricParam> {
        match metric {
            Metric::Price => self.price.as_ref(),
            Metric::Availability => self.availability.as_ref(),
            Metric::Cost => self.cost.as_ref(),
        }
    }

    /// Whether no metric carries a value (a filter-only scenario).
    pub fn is_filter_only(&self) -> bool {
        self.price.is_none() && self.availability.is_none() && self.cost.is_none()
    }
}

/// Expand change specifications into concrete scenario parameters.
///
/// Output order is deterministic: price ascending outermost, then
/// availability, then cost. If no specification declares any metric at
/// all, exactly one all-absent entry is produced (a pure filter-only
/// scenario); otherwise the all-absent combination never appears.
pub fn expand_changes(
    specs: &[ChangeSpec],
    options: &ExpandOptions,
) -> Result<Vec<ScenarioParams>> {
    let mut attribute_filters = FilterSet::new();
    let mut column_filters = FilterSet::new();
    for spec in specs {
        attribute_filters.merge_from(&spec.attribute_filters);
        column_filters.merge_from(&spec.column_filters);
    }

    let mut per_metric: Vec<(Vec<f64>, ChangeKind)> = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let (values, kind) = collect_metric(specs, metric, options)?;
        per_metric.push((values, kind));
    }

    let all_empty = per_metric.iter().all(|(values, _)| values.is_empty());
    if all_empty {
        return Ok(vec![ScenarioParams {
            attribute_filters,
            column_filters,
            ..ScenarioParams::default()
        }]);
    }

    let slot = |index: usize| -> Vec<Option<MetricParam>> {
        let (values, kind) = &per_metric[index];
        if values.is_empty() {
            vec![None]
        } else {
            values
                .iter()
                .map(|&value| Some(MetricParam { value, kind: *kind }))
                .collect()
        }
    };

    let mut combinations = Vec::new();
    for price in slot(0) {
        for availability in slot(1) {
            for cost in slot(2) {
                combinations.push(ScenarioParams {
                    attribute_filters: attribute_filters.clone(),
                    column_filters: column_filters.clone(),
                    price,
                    availability,
                    cost,
                });
            }
        }
    }
    Ok(combinations)
}

/// Union all specs' values for one metric (sorted, de-duplicated) and
/// resolve the change kind from the first spec declaring the metric.
fn collect_metric(
    specs: &[ChangeSpec],
    metric: Metric,
    options: &ExpandOptions,
) -> Result<(Vec<f64>, ChangeKind)> {
    let mut values: Vec<f64> = Vec::new();
    let mut kind: Option<ChangeKind> = None;

    for spec in specs {
        let change = spec.metric(metric);
        if !change.spec.is_declared() {
            continue;
        }
        if change.kind == ChangeKind::Target && metric != Metric::Price {
            return Err(ScenaristError::Validation(format!(
                "Target changes are only valid for price, not {metric:?}"
            )));
        }
        match kind {
            None => kind = Some(change.kind),
            Some(first) if first != change.kind => {
                if options.kind_conflict == KindConflict::Reject {
                    return Err(ScenaristError::Validation(format!(
                        "conflicting change kinds for {metric:?}: {first:?} vs {:?}",
                        change.kind
                    )));
                }
            }
            Some(_) => {}
        }
        values.extend(enumerate(&change.spec));
    }

    values.sort_by(f64::total_cmp);
    values.dedup();
    Ok((values, kind.unwrap_or_default()))
}

/// Enumerate the concrete values a metric spec declares.
///
/// Ranges are inclusive of `to`. A missing step is 1; a zero or
/// negative step yields no values (the source walked such ranges
/// forever).
fn enumerate(spec: &MetricSpec) -> Vec<f64> {
    match *spec {
        MetricSpec::Absent => Vec::new(),
        MetricSpec::Value(value) => {
            if value.is_finite() {
                vec![value]
            } else {
                Vec::new()
            }
        }
        MetricSpec::Range { from, to, step } => {
            if !from.is_finite() || !to.is_finite() {
                return Vec::new();
            }
            let step = if step.is_nan() { 1.0 } else { step };
            if step <= 0.0 {
                return Vec::new();
            }
            let mut values = Vec::new();
            let mut index = 0u32;
            loop {
                let value = from + f64::from(index) * step;
                if value > to + RANGE_EPSILON {
                    break;
                }
                values.push(value);
                index += 1;
            }
            values
        }
    }
}
