//! Column renaming

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::Table;

/// Mapping from existing column name to the name it should get
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    entries: IndexMap<String, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any earlier target for `from`
    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.entries.insert(from.into(), to.into());
        self
    }

    /// Target name for `from`, if mapped
    pub fn get(&self, from: &str) -> Option<&str> {
        self.entries.get(from).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse an `OLD=NEW` pair. The first `=` separates the names.
pub fn parse_mapping_pair(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => {
            Ok((from.to_string(), to.to_string()))
        }
        _ => Err(format!("expected OLD=NEW, got '{}'", s)),
    }
}

/// Rename the columns named in `mapping`. Unmapped columns keep their
/// names; mapping keys that match no column are ignored.
///
/// Fails with `DuplicateColumn` if two columns would end up with the same name.
pub fn rename(table: &Table, mapping: &ColumnMapping) -> Result<Table> {
    for (from, _) in mapping.iter() {
        if table.column_index(from).is_none() {
            warn!(column = %from, "rename mapping names a column that does not exist");
        }
    }

    let names: Vec<String> = table
        .columns()
        .iter()
        .map(|c| mapping.get(&c.name).unwrap_or(&c.name).to_string())
        .collect();

    let renamed = table
        .columns()
        .iter()
        .zip(&names)
        .filter(|(c, n)| &c.name != *n)
        .count();

    let result = Table::from_parts(names, table.rows().to_vec())?;
    debug!(renamed, "renamed columns");
    Ok(result)
}
