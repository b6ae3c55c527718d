//! Boxed terminal preview

use std::io::Write;

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::error::Result;
use crate::model::Table;

use super::PreviewFormatter;

/// Renders a table as a bordered grid
pub struct TerminalPreview;

impl TerminalPreview {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalPreview {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewFormatter for TerminalPreview {
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        if table.column_count() == 0 {
            writeln!(writer, "(empty table)")?;
            return Ok(());
        }

        let mut builder = Builder::default();
        builder.push_record(table.columns().iter().map(|c| c.name.clone()));
        for row in table.rows() {
            // Missing shows as NaN so it reads differently from empty text
            builder.push_record(row.cells.iter().map(|c| c.to_string()));
        }

        let mut grid = builder.build();
        grid.with(Style::modern());
        writeln!(writer, "{}", grid)?;
        Ok(())
    }
}
