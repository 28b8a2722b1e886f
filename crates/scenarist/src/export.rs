//! Scenario export: delimited text and zip bundles.
//!
//! Uses the same `;` delimiter as the loader so an exported scenario
//! re-parses to the same values (modulo the 2-decimal formatting the
//! transformer applied).

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use chrono::NaiveDate;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Result, ScenaristError};
use crate::input::DELIMITER;
use crate::scenario::Scenario;
use crate::table::Table;

/// Serialize a table to semicolon-delimited text.
pub fn table_to_csv(table: &Table) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(Vec::new());

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|column| row.get(column).map(|cell| cell.to_string()).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScenaristError::Export(format!("failed to flush CSV writer: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| ScenaristError::Export(format!("CSV output was not valid UTF-8: {e}")))
}

/// Serialize one scenario's derived table.
pub fn scenario_to_csv(scenario: &Scenario) -> Result<String> {
    table_to_csv(&scenario.table)
}

/// Bundle scenarios into a zip archive, one `<name>.csv` per scenario.
pub fn archive_bytes(scenarios: &[Scenario]) -> Result<Vec<u8>> {
    if scenarios.is_empty() {
        return Err(ScenaristError::EmptyData("no scenarios to bundle".to_string()));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for scenario in scenarios {
        let csv = scenario_to_csv(scenario)?;
        writer
            .start_file(format!("{}.csv", scenario.name), options)
            .map_err(|e| ScenaristError::Export(format!("failed to add zip member: {e}")))?;
        writer
            .write_all(csv.as_bytes())
            .map_err(|e| ScenaristError::Export(format!("failed to write zip member: {e}")))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| ScenaristError::Export(format!("failed to finish zip archive: {e}")))?;
    Ok(cursor.into_inner())
}

/// Write a scenario bundle to disk.
pub fn write_archive(path: impl AsRef<Path>, scenarios: &[Scenario]) -> Result<()> {
    let path = path.as_ref();
    let bytes = archive_bytes(scenarios)?;
    fs::write(path, bytes).map_err(|e| ScenaristError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Default bundle file name for a given date.
pub fn archive_filename(date: NaiveDate) -> String {
    format!("scenarios_{}.zip", date.format("%Y-%m-%d"))
}
