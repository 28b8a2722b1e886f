//! Base-table CSV parser.
//!
//! The tabular format uses `;` as field delimiter because numeric
//! fields may carry decimal commas; a comma delimiter would split
//! them. Files may arrive gzip-compressed.

use std::borrow::Cow;
use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Result, ScenaristError};
use crate::table::{CellValue, Row, Table};

/// Field delimiter for tabular text, shared with the exporter.
pub const DELIMITER: u8 = b';';

/// Gzip magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Parse raw table bytes (optionally gzipped) into a [`Table`].
///
/// Column order is taken from the header row; short records are padded
/// with empty cells and long ones truncated to the header width. All
/// cells load as text; numeric interpretation happens lazily where a
/// transformation needs it.
pub fn parse_table_bytes(bytes: &[u8]) -> Result<Table> {
    let bytes = maybe_gunzip(bytes)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes.as_ref());

    let columns: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    if columns.is_empty() {
        return Err(ScenaristError::EmptyData("No columns found".to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let mut row = Row::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let value = record.get(i).unwrap_or("");
            row.insert(column.clone(), CellValue::from(value));
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ScenaristError::EmptyData("No data rows found".to_string()));
    }

    Ok(Table::new(columns, rows))
}

/// Parse a table file from disk.
pub fn parse_table_file(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| ScenaristError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_table_bytes(&bytes)
}

/// Decompress if the payload looks like gzip, otherwise pass through.
fn maybe_gunzip(bytes: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(bytes));
    }
    let mut decoder = GzDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| ScenaristError::Archive(format!("failed to decompress gzip data: {e}")))?;
    Ok(Cow::Owned(decompressed))
}
