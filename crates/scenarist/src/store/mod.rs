//! Scenario persistence: a pluggable store interface with a local
//! file-backed implementation.
//!
//! Persistence is deliberately decoupled from scenario creation: the
//! session treats a finished in-memory [`Scenario`] as the source of
//! truth and saves are best-effort. Callers that want explicit control
//! can drive a store directly.

mod file;
mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scenario::Scenario;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A persisted scenario record with its store-assigned identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredScenario {
    pub id: String,
    #[serde(flatten)]
    pub scenario: Scenario,
}

impl StoredScenario {
    /// Wrap a scenario with an identifier.
    pub fn new(id: impl Into<String>, scenario: Scenario) -> Self {
        Self {
            id: id.into(),
            scenario,
        }
    }

    /// When the record was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.scenario.created_at
    }
}

/// Store interface for finished scenarios.
///
/// A local fallback and a remote implementation must behave
/// identically from the caller's point of view: same shape in, same
/// shape out, listing ordered newest-first.
pub trait ScenarioStore: Send + Sync {
    /// Persist a scenario; returns the stored-record identifier.
    fn save(&self, scenario: &Scenario) -> Result<String>;

    /// All stored scenarios, newest first.
    fn list(&self) -> Result<Vec<StoredScenario>>;

    /// Remove a stored scenario by identifier.
    fn delete(&self, id: &str) -> Result<()>;

    /// Store name for logging.
    fn name(&self) -> &str;
}
