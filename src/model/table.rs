//! Table, Row, and Cell data structures

use std::borrow::Cow;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::schema::{CellType, Column};
use crate::error::{Error, Result};

/// A cell value: text, a number, or the missing marker.
///
/// `Missing` is distinct from `Text("")`: only missing cells count towards
/// empty-row and empty-column detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Missing, CellValue::Missing) => true,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            // Cross-type numeric comparison
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64) == *b,
            (CellValue::Float(a), CellValue::Int(b)) => *a == (*b as f64),
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl CellValue {
    /// Check if the value is the missing marker
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Render the value as a CSV field. Missing renders as an empty field.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Missing => Cow::Borrowed(""),
            CellValue::Int(i) => Cow::Owned(i.to_string()),
            CellValue::Float(f) => Cow::Owned(format_float(*f)),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

/// Format a float so it reads back as a float: integral values keep `.0`.
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Missing => write!(f, "NaN"),
            other => write!(f, "{}", other.display()),
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

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Missing,
        }
    }
}

/// A row in the table
#[derive(Debug, Clone)]
pub struct Row {
    /// Cell values in column order
    pub cells: Vec<CellValue>,
    /// Original line number in the source file (1-indexed, header is line 1)
    pub source_line: usize,
}

impl Row {
    pub fn new(cells: Vec<CellValue>, source_line: usize) -> Self {
        Self { cells, source_line }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// True when every cell is missing
    pub fn is_all_missing(&self) -> bool {
        self.cells.iter().all(CellValue::is_missing)
    }
}

/// A table of uniquely named columns and equal-length rows.
///
/// Tables are values: every transformation takes `&Table` and builds a new
/// one, so a table can be shared between readers without coordination.
#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) columns: Vec<Column>,
    pub(crate) rows: Vec<Row>,
}

impl Table {
    /// Build a table from column names and rows, checking that names are
    /// unique and every row has one cell per column.
    pub fn from_parts(names: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateColumn { name: name.clone() });
            }
        }

        for row in &rows {
            if row.cells.len() != names.len() {
                return Err(Error::MalformedTable {
                    row: Some(row.source_line),
                    reason: format!(
                        "expected {} fields, found {}",
                        names.len(),
                        row.cells.len()
                    ),
                });
            }
        }

        Ok(Self::from_parts_unchecked(names, rows))
    }

    /// Build a table whose names are unique and whose rows are all as wide
    /// as `names`. Column types are re-inferred.
    pub(crate) fn from_parts_unchecked(names: Vec<String>, rows: Vec<Row>) -> Self {
        let types = infer_column_types(&rows, names.len());
        let columns = names
            .into_iter()
            .zip(types)
            .enumerate()
            .map(|(i, (name, t))| Column::with_type(name, i, t))
            .collect();

        Self { columns, rows }
    }

    /// Build a table from column names and plain cell vectors
    pub fn from_rows<S: Into<String>>(names: Vec<S>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let names = names.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| Row::new(cells, i + 2))
            .collect();
        Self::from_parts(names, rows)
    }

    /// Column definitions
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// All rows in load order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell at a row position in a named column
    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// The first `n` rows as a new table
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Column names present in both tables, in this table's order
    pub fn common_columns(&self, other: &Table) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| other.column_index(&c.name).is_some())
            .map(|c| c.name.clone())
            .collect()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.column_names() == other.column_names()
            && self.rows.len() == other.rows.len()
            && self
                .rows
                .iter()
                .zip(&other.rows)
                .all(|(a, b)| a.cells == b.cells)
    }
}

/// Infer column types from data
fn infer_column_types(rows: &[Row], column_count: usize) -> Vec<CellType> {
    let mut types = vec![CellType::Missing; column_count];
    for row in rows {
        for (t, cell) in types.iter_mut().zip(&row.cells) {
            *t = t.widen(CellType::of(cell));
        }
    }
    types
}
