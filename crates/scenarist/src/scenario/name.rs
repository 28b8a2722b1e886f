//! Scenario naming: `Scenario_<ordinal>_<parts>_<date>`.

use chrono::NaiveDate;

use super::change::{ChangeKind, Metric};
use super::expand::ScenarioParams;

/// The per-metric name tags, e.g. `["P5%", "A-10"]`.
///
/// Absent metrics contribute nothing; Percentage values carry a `%`
/// suffix. Values print minimally (`3`, not `3.0`).
pub fn change_parts(params: &ScenarioParams) -> Vec<String> {
    Metric::ALL
        .iter()
        .filter_map(|&metric| {
            params.metric(metric).map(|param| {
                let suffix = if param.kind == ChangeKind::Percentage { "%" } else { "" };
                format!("{}{}{}", metric.tag(), param.value, suffix)
            })
        })
        .collect()
}

/// Compose a scenario name from the session ordinal, the change tags,
/// and a date. Names sort by ordinal; uniqueness beyond the ordinal is
/// not required.
pub fn scenario_name(ordinal: usize, params: &ScenarioParams, date: NaiveDate) -> String {
    format!(
        "Scenario_{}_{}_{}",
        ordinal,
        change_parts(params).join("_"),
        date.format("%Y-%m-%d")
    )
}
