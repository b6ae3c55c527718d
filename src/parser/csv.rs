//! CSV text parser

use rustc_hash::FxHashSet;
use tracing::warn;

use crate::config::LoadOptions;
use crate::error::{Error, Result};
use crate::model::{CellValue, Row, Table};

use super::LoadWarning;

/// Parser for decoded CSV text
pub struct CsvParser<'a> {
    options: &'a LoadOptions,
}

impl<'a> CsvParser<'a> {
    pub fn new(options: &'a LoadOptions) -> Self {
        Self { options }
    }

    /// Parse CSV text into a table. The first record is the header.
    pub fn parse(&self, text: &str) -> Result<(Table, Vec<LoadWarning>)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.options.delimiter)
            .from_reader(text.as_bytes());

        let headers = csv_reader.headers().map_err(malformed)?.clone();
        if headers.is_empty() {
            return Err(Error::MalformedTable {
                row: None,
                reason: "no columns to parse".to_string(),
            });
        }

        let mut warnings = Vec::new();
        let names = normalize_headers(headers.iter(), &mut warnings);

        let mut rows = Vec::new();
        for (i, result) in csv_reader.records().enumerate() {
            let record = result.map_err(malformed)?;
            // +2 for 1-indexing and header
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 2);

            if record.len() != names.len() {
                return Err(Error::MalformedTable {
                    row: Some(line),
                    reason: format!("expected {} fields, found {}", names.len(), record.len()),
                });
            }

            let cells = record
                .iter()
                .map(|field| parse_cell_value(field, self.options))
                .collect();
            rows.push(Row::new(cells, line));
        }

        let table = Table::from_parts(names, rows)?;
        Ok((table, warnings))
    }
}

fn malformed(err: csv::Error) -> Error {
    Error::MalformedTable {
        row: err.position().map(|p| p.line() as usize),
        reason: err.to_string(),
    }
}

/// Fill in blank header names and make duplicates unique
fn normalize_headers<'h>(
    headers: impl Iterator<Item = &'h str>,
    warnings: &mut Vec<LoadWarning>,
) -> Vec<String> {
    let raw: Vec<String> = headers
        .enumerate()
        .map(|(i, name)| {
            if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut taken: FxHashSet<String> = raw.iter().cloned().collect();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut names = Vec::with_capacity(raw.len());

    for name in &raw {
        if seen.insert(name.as_str()) {
            names.push(name.clone());
            continue;
        }

        let mut suffix = 1;
        let renamed = loop {
            let candidate = format!("{}.{}", name, suffix);
            if !taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        warn!(original = %name, renamed = %renamed, "duplicate header renamed");
        taken.insert(renamed.clone());
        warnings.push(LoadWarning::HeaderRenamed {
            original: name.clone(),
            renamed: renamed.clone(),
        });
        names.push(renamed);
    }

    names
}

/// Parse a field into a CellValue with type inference
fn parse_cell_value(field: &str, options: &LoadOptions) -> CellValue {
    if field.is_empty() || options.na_values.iter().any(|na| na == field) {
        return CellValue::Missing;
    }

    if options.infer_numbers && looks_numeric(field) {
        if let Ok(i) = field.parse::<i64>() {
            return CellValue::Int(i);
        }
        // Overflowing literals such as 1e999 stay text
        if let Ok(f) = field.parse::<f64>() {
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }
    }

    CellValue::Text(field.to_string())
}

/// Digits with optional sign, point and exponent. Keeps words such as
/// `inf` and `nan` as text.
fn looks_numeric(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}
