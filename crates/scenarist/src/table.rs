//! Tabular base data: cells, rows, and the table itself.
//!
//! Rows are ordered mappings from column name to a tagged cell value so
//! that unknown columns survive a transformation round-trip byte for
//! byte and column order stays stable from header to export.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Row-level product identifier column.
pub const COL_VARIANT_ID: &str = "Product Variant Id";
/// Display-name column used to resolve rows against the catalog.
pub const COL_PRODUCT_NAME: &str = "Product Name";
/// Price column, read and rewritten by price changes.
pub const COL_CURRENT_PRICE: &str = "Current Price";
/// Availability column (percentage points, 0-100).
pub const COL_CURRENT_AVAILABILITY: &str = "Current Availability";
/// Cost column.
pub const COL_CURRENT_COST: &str = "Current Cost";

/// A single cell value: raw text or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Interpret the cell as a finite number, if possible.
    ///
    /// Text cells accept both dot and single-comma decimal notation,
    /// since the source data uses `;` as the field delimiter precisely
    /// because its numbers may carry decimal commas.
    pub fn as_finite(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => n.is_finite().then_some(*n),
            CellValue::Text(s) => parse_decimal(s),
        }
    }

    /// The cell as borrowed text, if it is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            CellValue::Number(_) => None,
        }
    }

    /// Whether the cell is empty text.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Parse a decimal number, accepting a single decimal comma.
pub(crate) fn parse_decimal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        return n.is_finite().then_some(n);
    }
    // "3,5" is a decimal comma; "1,2,3" is not a number.
    if trimmed.matches(',').count() == 1 && !trimmed.contains('.') {
        if let Ok(n) = trimmed.replace(',', ".").parse::<f64>() {
            return n.is_finite().then_some(n);
        }
    }
    None
}

/// One record of the base dataset: column name → cell, in column order.
pub type Row = IndexMap<String, CellValue>;

/// Read a row's cell as a finite number, defaulting to zero.
///
/// Matches the source dataset convention: a blank or unparseable
/// current value is treated as 0 rather than an error.
pub fn number_or_zero(row: &Row, column: &str) -> f64 {
    row.get(column).and_then(CellValue::as_finite).unwrap_or(0.0)
}

/// Parsed tabular data with a stable column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column names in header order. Transformations may append
    /// annotation columns at the end.
    pub columns: Vec<String>,
    /// Data rows.
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a table from a column list and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the header carries the given column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Append a column to the header if it is not already present.
    pub fn ensure_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }

    /// Up to `limit` distinct non-empty values of a column, in first-seen
    /// order. Used to give the intent interpreter sample values.
    pub fn sample_values(&self, column: &str, limit: usize) -> Vec<String> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if let Some(cell) = row.get(column) {
                if cell.is_empty() {
                    continue;
                }
                let text = cell.to_string();
                if !seen.contains(&text) {
                    seen.push(text);
                    if seen.len() == limit {
                        break;
                    }
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("3.5"), Some(3.5));
        assert_eq!(parse_decimal("3,5"), Some(3.5));
        assert_eq!(parse_decimal(" 12 "), Some(12.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("1,2,3"), None);
        assert_eq!(parse_decimal("1.2,3"), None);
    }

    #[test]
    fn test_cell_as_finite() {
        assert_eq!(CellValue::Number(2.5).as_finite(), Some(2.5));
        assert_eq!(CellValue::Number(f64::NAN).as_finite(), None);
        assert_eq!(CellValue::from("4,99").as_finite(), Some(4.99));
        assert_eq!(CellValue::from("n/a").as_finite(), None);
    }

    #[test]
    fn test_number_or_zero() {
        let mut row = Row::new();
        row.insert(COL_CURRENT_PRICE.to_string(), CellValue::from("9.90"));
        row.insert(COL_CURRENT_COST.to_string(), CellValue::from(""));
        assert_eq!(number_or_zero(&row, COL_CURRENT_PRICE), 9.9);
        assert_eq!(number_or_zero(&row, COL_CURRENT_COST), 0.0);
        assert_eq!(number_or_zero(&row, "Missing"), 0.0);
    }

    #[test]
    fn test_ensure_column() {
        let mut table = Table::new(vec!["A".to_string()], Vec::new());
        table.ensure_column("B");
        table.ensure_column("A");
        assert_eq!(table.columns, vec!["A", "B"]);
    }

    #[test]
    fn test_sample_values_dedup_and_limit() {
        let rows = ["x", "y", "x", "z", ""]
            .iter()
            .map(|v| {
                let mut row = Row::new();
                row.insert("Region".to_string(), CellValue::from(*v));
                row
            })
            .collect();
        let table = Table::new(vec!["Region".to_string()], rows);
        assert_eq!(table.sample_values("Region", 2), vec!["x", "y"]);
        assert_eq!(table.sample_values("Region", 10), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_cell_value_untagged_serde() {
        let row: Row = serde_json::from_str(r#"{"a": "text", "b": 2.5}"#).unwrap();
        assert_eq!(row["a"], CellValue::from("text"));
        assert_eq!(row["b"], CellValue::Number(2.5));
    }
}
