//! Table exporter and previews

mod csv;
mod json;
mod terminal;

use std::io::Write;

use crate::config::{ExportOptions, PreviewFormat};
use crate::error::Result;
use crate::model::Table;

pub use self::csv::{to_csv_bytes, to_csv_bytes_with, CsvExporter};
pub use json::JsonPreview;
pub use terminal::TerminalPreview;

/// Content type of every download
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Default download names per action
pub const CLEANED_FILE_NAME: &str = "cleaned.csv";
pub const MERGED_FILE_NAME: &str = "merged.csv";
pub const MAPPED_FILE_NAME: &str = "shopify_mapped.csv";

/// Bytes ready to hand to the user, with a file name and content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Export `table` as a CSV download
    pub fn csv(table: &Table, file_name: impl Into<String>, options: &ExportOptions) -> Result<Self> {
        Ok(Self {
            file_name: file_name.into(),
            content_type: CSV_CONTENT_TYPE,
            bytes: to_csv_bytes_with(table, options)?,
        })
    }
}

/// Trait for table preview formatters
pub trait PreviewFormatter {
    /// Render the whole table to a writer
    fn render(&self, table: &Table, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating preview formatters
pub struct PreviewFactory;

impl PreviewFactory {
    pub fn create(format: PreviewFormat) -> Box<dyn PreviewFormatter> {
        match format {
            PreviewFormat::Table => Box::new(TerminalPreview::new()),
            PreviewFormat::Json => Box::new(JsonPreview::new()),
        }
    }
}

/// Render the first `rows` rows of `table`
pub fn render_preview(
    table: &Table,
    rows: usize,
    format: PreviewFormat,
    writer: &mut dyn Write,
) -> Result<()> {
    PreviewFactory::create(format).render(&table.head(rows), writer)
}
