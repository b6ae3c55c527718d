//! Table loader: uploaded bytes to a table

mod csv;
mod encoding;

use std::path::Path;

use tracing::{debug, warn};

use crate::config::LoadOptions;
use crate::error::Result;
use crate::model::Table;

pub use self::csv::CsvParser;
pub use self::encoding::{decode, Decoded, FALLBACK_ENCODING};

/// A non-fatal condition noticed while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The bytes were not UTF-8 and were decoded with the fallback encoding
    EncodingFallback {
        encoding: &'static str,
        valid_up_to: usize,
    },
    /// A blank or repeated header was given a generated name
    HeaderRenamed { original: String, renamed: String },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::EncodingFallback {
                encoding,
                valid_up_to,
            } => write!(
                f,
                "input is not valid UTF-8 (first bad byte at offset {}); loaded with fallback encoding {}",
                valid_up_to, encoding
            ),
            LoadWarning::HeaderRenamed { original, renamed } => {
                write!(f, "duplicate column '{}' renamed to '{}'", original, renamed)
            }
        }
    }
}

/// A loaded table plus the warnings raised while loading it
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Table,
    pub warnings: Vec<LoadWarning>,
}

impl Loaded {
    /// Whether the fallback encoding was used
    pub fn used_fallback(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, LoadWarning::EncodingFallback { .. }))
    }
}

/// Decode and parse an uploaded byte stream
pub fn load(bytes: &[u8], options: &LoadOptions) -> Result<Loaded> {
    let decoded = decode(bytes);
    let mut warnings = Vec::new();

    if let Decoded::Latin1 { valid_up_to, .. } = &decoded {
        warn!(
            valid_up_to = *valid_up_to,
            encoding = FALLBACK_ENCODING,
            "input is not UTF-8, using fallback encoding"
        );
        warnings.push(LoadWarning::EncodingFallback {
            encoding: FALLBACK_ENCODING,
            valid_up_to: *valid_up_to,
        });
    }

    let (table, header_warnings) = CsvParser::new(options).parse(decoded.text())?;
    warnings.extend(header_warnings);

    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        fallback = decoded.is_fallback(),
        "loaded table"
    );

    Ok(Loaded { table, warnings })
}

/// Read a file and load it
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Loaded> {
    let bytes = std::fs::read(path)?;
    load(&bytes, options)
}
