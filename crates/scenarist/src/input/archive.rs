//! Zip upload loader: one archive carrying the base-table CSV and the
//! product-master JSON together.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::catalog::Product;
use crate::error::{Result, ScenaristError};
use crate::table::Table;

use super::catalog::parse_catalog_bytes;
use super::parser::parse_table_bytes;

/// Parse a zip archive containing a CSV member (optionally `.csv.gz`)
/// and a JSON member.
///
/// Each missing piece gets its own distinguishable error so an upload
/// UI can tell the user exactly what the archive lacked.
pub fn parse_archive_bytes(bytes: &[u8]) -> Result<(Table, Vec<Product>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ScenaristError::Archive(format!("not a valid zip archive: {e}")))?;

    let mut table: Option<Table> = None;
    let mut catalog: Option<Vec<Product>> = None;

    for index in 0..archive.len() {
        let mut member = archive
            .by_index(index)
            .map_err(|e| ScenaristError::Archive(format!("failed to read zip member: {e}")))?;
        if member.is_dir() {
            continue;
        }
        let name = member.name().to_string();

        let mut contents = Vec::new();
        member.read_to_end(&mut contents).map_err(|e| {
            ScenaristError::Archive(format!("failed to read zip member '{name}': {e}"))
        })?;

        if name.ends_with(".json") {
            catalog = Some(parse_catalog_bytes(&contents)?);
        } else if name.contains(".csv") {
            // Gzipped members are handled by the table parser itself.
            table = Some(parse_table_bytes(&contents)?);
        }
    }

    match (table, catalog) {
        (Some(table), Some(catalog)) => Ok((table, catalog)),
        (None, None) => Err(ScenaristError::Archive(
            "no CSV or JSON files found in archive".to_string(),
        )),
        (None, Some(_)) => Err(ScenaristError::Archive(
            "CSV file not found in archive".to_string(),
        )),
        (Some(_), None) => Err(ScenaristError::Archive(
            "JSON file not found in archive".to_string(),
        )),
    }
}
