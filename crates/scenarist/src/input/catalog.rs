//! Product-master JSON loader.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::catalog::{Product, parse_catalog};
use crate::error::{Result, ScenaristError};

/// Parse raw product-master bytes.
///
/// Invalid JSON is a loader error; structurally surprising but
/// syntactically valid JSON degrades to an empty or partial catalog
/// (see [`parse_catalog`]).
pub fn parse_catalog_bytes(bytes: &[u8]) -> Result<Vec<Product>> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(parse_catalog(&value))
}

/// Parse a product-master file from disk.
pub fn parse_catalog_file(path: impl AsRef<Path>) -> Result<Vec<Product>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| ScenaristError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_catalog_bytes(&bytes)
}
