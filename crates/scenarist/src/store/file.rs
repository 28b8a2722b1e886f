//! Local file-backed scenario store: one JSON file per scenario.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, ScenaristError};
use crate::scenario::Scenario;

use super::{ScenarioStore, StoredScenario};

/// Stores scenarios as pretty-printed JSON files in a directory.
///
/// This is the no-network fallback; it presents the same interface and
/// record shape as any remote store.
pub struct FileStore {
    dir: PathBuf,
    counter: AtomicU64,
}

impl FileStore {
    /// Open (and create if needed) a store directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            ScenaristError::Persistence(format!(
                "failed to create store directory '{}': {e}",
                dir.display()
            ))
        })?;
        Ok(Self {
            dir,
            counter: AtomicU64::new(1),
        })
    }

    /// The directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_id(&self, scenario: &Scenario) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::SeqCst);
        format!(
            "sc_{}_{:03}",
            scenario.created_at.format("%Y%m%dT%H%M%S%3f"),
            sequence
        )
    }
}

impl ScenarioStore for FileStore {
    fn save(&self, scenario: &Scenario) -> Result<String> {
        let id = self.next_id(scenario);
        let path = self.dir.join(format!("{id}.json"));
        let file = File::create(&path).map_err(|e| {
            ScenaristError::Persistence(format!("failed to create '{}': {e}", path.display()))
        })?;

        let record = StoredScenario::new(id.clone(), scenario.clone());
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &record).map_err(|e| {
            ScenaristError::Persistence(format!("failed to serialize scenario: {e}"))
        })?;

        Ok(id)
    }

    fn list(&self) -> Result<Vec<StoredScenario>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            ScenaristError::Persistence(format!(
                "failed to read store directory '{}': {e}",
                self.dir.display()
            ))
        })?;

        let mut records = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            // Unreadable or stale records are skipped, not fatal.
            match File::open(&path) {
                Ok(file) => match serde_json::from_reader(BufReader::new(file)) {
                    Ok(record) => records.push(record),
                    Err(err) => {
                        log::warn!("skipping unreadable record '{}': {err}", path.display());
                    }
                },
                Err(err) => {
                    log::warn!("skipping unreadable record '{}': {err}", path.display());
                }
            }
        }

        records.sort_by(|a: &StoredScenario, b: &StoredScenario| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let path = self.dir.join(format!("{id}.json"));
        fs::remove_file(&path).map_err(|e| {
            ScenaristError::Persistence(format!("failed to delete '{}': {e}", path.display()))
        })
    }

    fn name(&self) -> &str {
        "file store"
    }
}
