//! In-memory scenario store, mainly for tests and ephemeral sessions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Result, ScenaristError};
use crate::scenario::Scenario;

use super::{ScenarioStore, StoredScenario};

/// Keeps stored scenarios in a shared vector.
///
/// Clones share the same backing storage, so a handle kept by a test
/// observes what the session saved.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<StoredScenario>>>,
    counter: Arc<AtomicU64>,
    fail_saves: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail, for exercising the
    /// fire-and-forget persistence path.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }
}

impl ScenarioStore for MemoryStore {
    fn save(&self, scenario: &Scenario) -> Result<String> {
        if self.fail_saves {
            return Err(ScenaristError::Persistence(
                "memory store configured to fail".to_string(),
            ));
        }
        let id = format!("mem_{:03}", self.counter.fetch_add(1, Ordering::SeqCst) + 1);
        let mut records = self
            .records
            .lock()
            .map_err(|_| ScenaristError::Persistence("store lock poisoned".to_string()))?;
        records.push(StoredScenario::new(id.clone(), scenario.clone()));
        Ok(id)
    }

    fn list(&self) -> Result<Vec<StoredScenario>> {
        let records = self
            .records
            .lock()
            .map_err(|_| ScenaristError::Persistence("store lock poisoned".to_string()))?;
        let mut listed: Vec<StoredScenario> = records.clone();
        listed.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(listed)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| ScenaristError::Persistence("store lock poisoned".to_string()))?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(ScenaristError::Persistence(format!(
                "no stored scenario with id '{id}'"
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory store"
    }
}
