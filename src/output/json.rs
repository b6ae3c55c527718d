//! JSON records preview

use std::io::Write;

use indexmap::IndexMap;

use crate::error::Result;
use crate::model::{CellValue, Table};

use super::PreviewFormatter;

/// Renders a table as an array of objects keyed by column name
pub struct JsonPreview {
    pretty: bool,
}

impl JsonPreview {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonPreview {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewFormatter for JsonPreview {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        let records: Vec<IndexMap<&str, &CellValue>> = table
            .rows()
            .iter()
            .map(|row| {
                table
                    .columns()
                    .iter()
                    .map(|c| c.name.as_str())
                    .zip(&row.cells)
                    .collect()
            })
            .collect();

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &records)?;
        } else {
            serde_json::to_writer(&mut *writer, &records)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
