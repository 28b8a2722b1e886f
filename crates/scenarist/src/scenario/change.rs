//! Change specifications: the user-authored, possibly range-valued
//! description of intended changes, prior to expansion.

use serde::{Deserialize, Serialize};

use super::filter::FilterSet;

/// How a declared number is applied to a current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// Additive delta.
    #[default]
    Absolute,
    /// Multiplicative delta in percent.
    Percentage,
    /// The declared value is the new value (price only).
    Target,
}

impl ChangeKind {
    /// Parse the wire spelling used by change files and the intent
    /// interpreter. Unknown spellings fall back to `Absolute`.
    pub fn parse(text: &str) -> Self {
        match text {
            "Percentage" => ChangeKind::Percentage,
            "Target" => ChangeKind::Target,
            _ => ChangeKind::Absolute,
        }
    }

    /// The wire spelling of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Absolute => "Absolute",
            ChangeKind::Percentage => "Percentage",
            ChangeKind::Target => "Target",
        }
    }
}

/// The declared value(s) for one metric in a change specification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetricSpec {
    /// No change declared for this metric.
    #[default]
    Absent,
    /// A single delta or target value.
    Value(f64),
    /// An inclusive from/to range walked in `step` increments.
    Range { from: f64, to: f64, step: f64 },
}

impl MetricSpec {
    /// Whether the spec declares anything for this metric.
    pub fn is_declared(&self) -> bool {
        !matches!(self, MetricSpec::Absent)
    }
}

/// One metric's declaration: the value(s) and how to apply them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricChange {
    pub spec: MetricSpec,
    pub kind: ChangeKind,
}

impl MetricChange {
    /// A single-value change.
    pub fn value(value: f64, kind: ChangeKind) -> Self {
        Self {
            spec: MetricSpec::Value(value),
            kind,
        }
    }

    /// A ranged change.
    pub fn range(from: f64, to: f64, step: f64, kind: ChangeKind) -> Self {
        Self {
            spec: MetricSpec::Range { from, to, step },
            kind,
        }
    }

    /// No change for this metric.
    pub fn absent() -> Self {
        Self::default()
    }
}

/// The three transformable metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Price,
    Availability,
    Cost,
}

impl Metric {
    /// All metrics in expansion priority order (price outermost).
    pub const ALL: [Metric; 3] = [Metric::Price, Metric::Availability, Metric::Cost];

    /// The column holding the current value.
    pub fn current_column(self) -> &'static str {
        match self {
            Metric::Price => crate::table::COL_CURRENT_PRICE,
            Metric::Availability => crate::table::COL_CURRENT_AVAILABILITY,
            Metric::Cost => crate::table::COL_CURRENT_COST,
        }
    }

    /// The annotation column recording the applied change value.
    pub fn change_column(self) -> &'static str {
        match self {
            Metric::Price => "Price Change",
            Metric::Availability => "Availability Change",
            Metric::Cost => "Cost Change",
        }
    }

    /// The annotation column recording the change-type label.
    pub fn change_type_column(self) -> &'static str {
        match self {
            Metric::Price => "Price Change Type",
            Metric::Availability => "Availability Change Type",
            Metric::Cost => "Cost Change Type",
        }
    }

    /// Single-letter tag used in scenario names.
    pub fn tag(self) -> char {
        match self {
            Metric::Price => 'P',
            Metric::Availability => 'A',
            Metric::Cost => 'C',
        }
    }
}

/// One user-authored change: filters plus per-metric declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeSpec {
    /// Filters matched through the attribute index, keyed by driver id.
    pub attribute_filters: FilterSet,
    /// Filters matched directly against row columns.
    pub column_filters: FilterSet,
    pub price: MetricChange,
    pub availability: MetricChange,
    pub cost: MetricChange,
}

impl ChangeSpec {
    /// Create an empty change (matches everything, changes nothing).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: accept values for an attribute driver.
    pub fn with_attribute_filter<I, V>(mut self, driver: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attribute_filters = self.attribute_filters.allow(driver, values);
        self
    }

    /// Builder-style: accept values for a row column.
    pub fn with_column_filter<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.column_filters = self.column_filters.allow(column, values);
        self
    }

    /// Builder-style: set the price change.
    pub fn with_price(mut self, change: MetricChange) -> Self {
        self.price = change;
        self
    }

    /// Builder-style: set the availability change.
    pub fn with_availability(mut self, change: MetricChange) -> Self {
        self.availability = change;
        self
    }

    /// Builder-style: set the cost change.
    pub fn with_cost(mut self, change: MetricChange) -> Self {
        self.cost = change;
        self
    }

    /// The declaration for a metric.
    pub fn metric(&self, metric: Metric) -> &MetricChange {
        match metric {
            Metric::Price => &self.price,
            Metric::Availability => &self.availability,
            Metric::Cost => &self.cost,
        }
    }
}
