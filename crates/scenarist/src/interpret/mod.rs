//! Intent interpretation: free text in, change specifications out.
//!
//! Interpretation is pluggable: a pattern-matching heuristic works
//! offline, a remote-model-backed interpreter produces the same wire
//! shape, and callers treat either's output exactly like directly
//! authored changes. The core never depends on interpretation quality.

mod heuristic;
mod mock;
mod openai;
mod prompts;
mod wire;

use std::collections::BTreeMap;

use crate::catalog::ValueDriverMap;
use crate::error::Result;
use crate::scenario::ChangeSpec;
use crate::table::Table;

pub use heuristic::HeuristicInterpreter;
pub use mock::MockInterpreter;
pub use openai::{InterpreterConfig, OpenAiInterpreter};
pub use wire::{WireChange, changes_from_slice, changes_from_value};

/// Maximum sample values collected per column for interpreter context.
const SAMPLE_LIMIT: usize = 20;

/// What the interpreter knows about the loaded dataset: the value
/// drivers and their options, plus column names with sample values.
#[derive(Debug, Clone, Default)]
pub struct InterpretContext {
    pub value_drivers: ValueDriverMap,
    pub columns: Vec<String>,
    pub column_values: BTreeMap<String, Vec<String>>,
}

impl InterpretContext {
    /// Context from a driver map alone.
    pub fn new(value_drivers: ValueDriverMap) -> Self {
        Self {
            value_drivers,
            columns: Vec::new(),
            column_values: BTreeMap::new(),
        }
    }

    /// Context from a driver map plus a loaded table; collects up to
    /// twenty distinct sample values per column.
    pub fn from_table(value_drivers: ValueDriverMap, table: &Table) -> Self {
        let columns = table.columns.clone();
        let column_values = columns
            .iter()
            .map(|column| (column.clone(), table.sample_values(column, SAMPLE_LIMIT)))
            .collect();
        Self {
            value_drivers,
            columns,
            column_values,
        }
    }

    /// Sample values for a column, empty when unknown.
    pub fn samples(&self, column: &str) -> &[String] {
        self.column_values
            .get(column)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Turns free text into change specifications.
///
/// Implementations must be thread-safe (Send + Sync) so a single
/// interpreter can serve concurrent sessions.
pub trait IntentInterpreter: Send + Sync {
    /// Interpret a prompt against the dataset context.
    ///
    /// Returns the parsed changes, or an
    /// [`Interpretation`](crate::ScenaristError::Interpretation) error
    /// when the text could not be understood.
    fn interpret(&self, prompt: &str, context: &InterpretContext) -> Result<Vec<ChangeSpec>>;

    /// Interpreter name for logging/debugging.
    fn name(&self) -> &str;
}
