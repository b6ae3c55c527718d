//! Join key normalization and lookup

use rustc_hash::FxHashMap;

use super::table::{CellValue, Table};

/// Normalized form of a key cell used to decide row equality in a join.
///
/// Numbers compare by their canonical text, so `1` and `1.0` match. Missing
/// keys match each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    Missing,
    Number(String),
    Text(String),
}

impl JoinKey {
    pub fn from_cell(cell: &CellValue) -> Self {
        match cell {
            CellValue::Missing => JoinKey::Missing,
            CellValue::Int(i) => JoinKey::Number(i.to_string()),
            CellValue::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.2e18 {
                    JoinKey::Number((*f as i64).to_string())
                } else {
                    JoinKey::Number(f.to_string())
                }
            }
            CellValue::Text(s) => JoinKey::Text(s.clone()),
        }
    }
}

/// Index from key value to the positions of the rows carrying it
pub struct KeyIndex {
    positions: FxHashMap<JoinKey, Vec<usize>>,
}

impl KeyIndex {
    /// Index the rows of `table` by the column at `column`
    pub fn build(table: &Table, column: usize) -> Self {
        let mut positions: FxHashMap<JoinKey, Vec<usize>> = FxHashMap::default();
        for (i, row) in table.rows().iter().enumerate() {
            if let Some(cell) = row.get(column) {
                positions.entry(JoinKey::from_cell(cell)).or_default().push(i);
            }
        }
        Self { positions }
    }

    /// Row positions whose key equals `cell`, in row order
    pub fn lookup(&self, cell: &CellValue) -> &[usize] {
        self.positions
            .get(&JoinKey::from_cell(cell))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
