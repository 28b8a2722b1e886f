//! Session state: the ordinal counter, the in-memory scenario list,
//! and best-effort persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::AttributeIndex;
use crate::error::Result;
use crate::store::ScenarioStore;
use crate::table::Table;

use super::change::ChangeSpec;
use super::expand::{ExpandOptions, expand_changes};
use super::filter::FilterEvaluator;
use super::name::{change_parts, scenario_name};
use super::transform::apply_params;

/// Summary metadata attached to a generated scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMeta {
    /// The per-metric name tags, e.g. `["P5%", "A-10"]`.
    pub change_parts: Vec<String>,
    /// Rows that actually changed.
    pub modified_rows: usize,
    /// Total rows in the derived table.
    pub total_rows: usize,
}

/// One materialized derived table. Owned by the caller after creation
/// and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub table: Table,
    pub meta: ScenarioMeta,
    pub created_at: DateTime<Utc>,
}

/// Owns everything that was ambient state in the original design: the
/// monotonically increasing scenario ordinal (1-based, continuing
/// across batches) and the list of scenarios created so far.
#[derive(Default)]
pub struct ScenarioSession {
    created: usize,
    scenarios: Vec<Scenario>,
    options: ExpandOptions,
    store: Option<Arc<dyn ScenarioStore>>,
}

impl ScenarioSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set expansion options.
    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach a scenario store. Persistence is best-effort: a failed
    /// save is logged and the scenario stays available in memory.
    pub fn with_store(mut self, store: impl ScenarioStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Expand the given change specifications and materialize one
    /// scenario per concrete parameter combination.
    ///
    /// Returns the slice of newly created scenarios; the full list
    /// stays available through [`scenarios`](Self::scenarios).
    pub fn create_scenarios(
        &mut self,
        table: &Table,
        index: &AttributeIndex,
        specs: &[ChangeSpec],
    ) -> Result<&[Scenario]> {
        let combinations = expand_changes(specs, &self.options)?;
        let evaluator = FilterEvaluator::new(index);
        let today = Utc::now().date_naive();
        let start = self.scenarios.len();

        for params in &combinations {
            self.created += 1;
            let outcome = apply_params(table, params, &evaluator);
            let scenario = Scenario {
                name: scenario_name(self.created, params, today),
                meta: ScenarioMeta {
                    change_parts: change_parts(params),
                    modified_rows: outcome.modified_rows,
                    total_rows: outcome.table.row_count(),
                },
                table: outcome.table,
                created_at: Utc::now(),
            };

            if let Some(store) = &self.store {
                if let Err(err) = store.save(&scenario) {
                    log::warn!(
                        "failed to persist scenario '{}' to {}: {err}",
                        scenario.name,
                        store.name()
                    );
                }
            }
            self.scenarios.push(scenario);
        }

        Ok(&self.scenarios[start..])
    }

    /// All scenarios created in this session, in creation order.
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// How many scenarios this session has created.
    pub fn created_count(&self) -> usize {
        self.created
    }
}
