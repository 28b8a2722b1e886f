//! The scenario-generation engine: filters, change specifications,
//! combinatorial expansion, row transformation, naming, and session
//! state.

mod change;
mod expand;
mod filter;
mod name;
mod session;
mod transform;

pub use change::{ChangeKind, ChangeSpec, Metric, MetricChange, MetricSpec};
pub use expand::{ExpandOptions, KindConflict, MetricParam, ScenarioParams, expand_changes};
pub use filter::{FilterEvaluator, FilterSet, LookupKey};
pub use name::{change_parts, scenario_name};
pub use session::{Scenario, ScenarioMeta, ScenarioSession};
pub use transform::{TransformOutcome, apply_params};
