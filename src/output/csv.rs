//! CSV export

use crate::config::ExportOptions;
use crate::error::{Error, Result};
use crate::model::Table;

/// Serializes tables back to CSV bytes
pub struct CsvExporter {
    options: ExportOptions,
}

impl CsvExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Write the header then every row in table order, UTF-8 encoded.
    /// Fields are quoted only when they contain the delimiter, a quote or a
    /// line break; embedded quotes are doubled.
    pub fn to_bytes(&self, table: &Table) -> Result<Vec<u8>> {
        if table.column_count() == 0 {
            return Ok(Vec::new());
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.options.delimiter)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(table.columns().iter().map(|c| c.name.as_str()))?;
        for row in table.rows() {
            let fields: Vec<_> = row.cells.iter().map(|c| c.display()).collect();
            writer.write_record(fields.iter().map(|f| f.as_bytes()))?;
        }

        writer.into_inner().map_err(|e| Error::Io(e.into_error()))
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

/// Serialize a table to CSV bytes with default options
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    CsvExporter::default().to_bytes(table)
}

/// Serialize a table to CSV bytes
pub fn to_csv_bytes_with(table: &Table, options: &ExportOptions) -> Result<Vec<u8>> {
    CsvExporter::new(*options).to_bytes(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadOptions;
    use crate::model::CellValue;
    use crate::parser::load;

    fn export(table: &Table) -> String {
        String::from_utf8(to_csv_bytes(table).unwrap()).unwrap()
    }

    #[test]
    fn test_export_plain() {
        let table = Table::from_rows(
            vec!["id", "name", "price"],
            vec![
                vec![CellValue::Int(1), "Shirt".into(), CellValue::Float(9.5)],
                vec![CellValue::Int(2), CellValue::Missing, CellValue::Float(10.0)],
            ],
        )
        .unwrap();
        assert_eq!(export(&table), "id,name,price\n1,Shirt,9.5\n2,,10.0\n");
    }

    #[test]
    fn test_export_quoting() {
        let table = Table::from_rows(
            vec!["a", "b", "c"],
            vec![vec!["x, y".into(), "say \"hi\"".into(), "two\nlines".into()]],
        )
        .unwrap();
        assert_eq!(
            export(&table),
            "a,b,c\n\"x, y\",\"say \"\"hi\"\"\",\"two\nlines\"\n"
        );
    }

    #[test]
    fn test_export_delimiter() {
        let table = Table::from_rows(vec!["a", "b"], vec![vec!["1;2".into(), "x".into()]]).unwrap();
        let bytes = to_csv_bytes_with(&table, &ExportOptions { delimiter: b';' }).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a;b\n\"1;2\";x\n");
    }

    #[test]
    fn test_export_no_columns() {
        let table = Table::from_rows(Vec::<String>::new(), vec![]).unwrap();
        assert!(to_csv_bytes(&table).unwrap().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let table = Table::from_rows(
            vec!["Handle", "Title", "Variant Price", "Notes"],
            vec![
                vec!["tee".into(), "Basic Tee".into(), CellValue::Float(19.0), "soft, light".into()],
                vec!["mug".into(), "Mug \"XL\"".into(), CellValue::Int(8), CellValue::Missing],
                vec!["cap".into(), CellValue::Missing, CellValue::Float(12.25), "line one\nline two".into()],
            ],
        )
        .unwrap();

        let loaded = load(&to_csv_bytes(&table).unwrap(), &LoadOptions::default()).unwrap();
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.table, table);
        assert_eq!(
            loaded.table.columns()[2].inferred_type,
            table.columns()[2].inferred_type
        );
    }

    #[test]
    fn test_round_trip_single_column_with_missing() {
        let table = Table::from_rows(
            vec!["only"],
            vec![vec!["a".into()], vec![CellValue::Missing], vec!["b".into()]],
        )
        .unwrap();
        let loaded = load(&to_csv_bytes(&table).unwrap(), &LoadOptions::default()).unwrap();
        assert_eq!(loaded.table, table);
    }

    #[test]
    fn test_round_trip_overflowing_number() {
        let loaded = load(b"x\n1e999\n", &LoadOptions::default()).unwrap();
        assert_eq!(loaded.table.cell(0, "x"), Some(&CellValue::from("1e999")));

        let bytes = to_csv_bytes(&loaded.table).unwrap();
        assert_eq!(bytes, b"x\n1e999\n");
        let back = load(&bytes, &LoadOptions::default()).unwrap();
        assert_eq!(back.table, loaded.table);
    }
}
